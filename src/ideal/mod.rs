//! Q-divisors, binary predicates and test-ideal membership.
//!
//! Requires the `std` feature.

pub mod classifier;
pub mod divisor;
pub mod predicate;

pub use classifier::FormulationClassifier;
pub use divisor::{Coefficient, QDivisor};
pub use predicate::{test_ideal_membership, test_set, BinaryPredicate};
