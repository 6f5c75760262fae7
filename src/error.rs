use core::fmt;

use alloc::string::String;

/// Result alias used by every fallible operation in this crate.
pub type PAdicResult<T> = Result<T, PAdicError>;

/// Errors raised by p-adic construction, arithmetic and predicate evaluation.
///
/// Every operation either returns a fully normalized value or one of these;
/// operands are never modified on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PAdicError {
    /// The prime is below 2 or not prime.
    Configuration { prime: u32 },
    /// Two operands carry different primes.
    PrimeMismatch { left: u32, right: u32 },
    /// The requested operation is not implemented (negative powers,
    /// non-unit or non-`1/p` rational exponents).
    NotSupported(&'static str),
    /// Rational conversion has no invertible cofactor.
    Division(&'static str),
    /// A coefficient outside its admissible range: truncation coefficients
    /// lie strictly between 0 and 1, divisor coefficients are positive.
    InvalidCoefficient,
    /// A formulation name that was never registered.
    UnknownFormulation(String),
    /// A digit position outside `±POSITION_LIMIT`.
    PositionOutOfRange,
}

impl fmt::Display for PAdicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PAdicError::Configuration { prime } => {
                write!(f, "invalid prime {}: must be a prime >= 2", prime)
            }
            PAdicError::PrimeMismatch { left, right } => {
                write!(f, "prime mismatch: {} vs {}", left, right)
            }
            PAdicError::NotSupported(what) => write!(f, "not supported: {}", what),
            PAdicError::Division(what) => write!(f, "division error: {}", what),
            PAdicError::InvalidCoefficient => {
                write!(f, "coefficient out of range")
            }
            PAdicError::UnknownFormulation(name) => {
                write!(f, "formulation not registered: {}", name)
            }
            PAdicError::PositionOutOfRange => write!(f, "digit position out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PAdicError {}
