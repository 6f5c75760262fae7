//! Sparse p-adic digit arithmetic.
//!
//! [`PAdicElement`] stores the non-zero digits of a p-adic number by absolute
//! position and keeps them in canonical form: every digit in `[1, p-1]`,
//! carries propagated upward. Addition, multiplication, integer powers and
//! rational conversion all return fresh normalized elements.
//!
//! With the `std` feature, [`ideal`] adds Q-divisors and binary predicates
//! for test-ideal membership.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod algebra;
pub mod error;
#[cfg(feature = "std")]
pub mod ideal;
pub mod structures;
pub mod utils;

pub use algebra::ring::Ring;
pub use error::{PAdicError, PAdicResult};

pub use structures::binary::BinaryDigits;
pub use structures::padic::{PAdicElement, POSITION_LIMIT};
pub use structures::valuation::Valuation;
pub use utils::{gcd, is_prime};
