use core::cmp::Ordering;
use core::fmt;
use core::ops::Add;

/// The p-adic valuation of an element: the lowest populated digit position,
/// or `Infinite` for zero.
///
/// `Infinite` compares greater than every finite valuation, so a smaller
/// valuation means a larger p-adic absolute value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Valuation {
    Finite(i64),
    Infinite,
}

impl Valuation {
    /// The finite value, or `None` for zero's valuation.
    pub const fn finite(self) -> Option<i64> {
        match self {
            Valuation::Finite(v) => Some(v),
            Valuation::Infinite => None,
        }
    }

    pub const fn is_infinite(self) -> bool {
        matches!(self, Valuation::Infinite)
    }
}

impl From<i64> for Valuation {
    fn from(v: i64) -> Self {
        Valuation::Finite(v)
    }
}

impl Ord for Valuation {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Valuation::Finite(a), Valuation::Finite(b)) => a.cmp(b),
            (Valuation::Finite(_), Valuation::Infinite) => Ordering::Less,
            (Valuation::Infinite, Valuation::Finite(_)) => Ordering::Greater,
            (Valuation::Infinite, Valuation::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Valuation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Valuation of a product: `v(ab) = v(a) + v(b)`, with `∞` absorbing.
impl Add for Valuation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Valuation::Finite(a), Valuation::Finite(b)) => Valuation::Finite(a + b),
            _ => Valuation::Infinite,
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valuation::Finite(v) => write!(f, "{}", v),
            Valuation::Infinite => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn infinite_is_greatest() {
        assert!(Valuation::Finite(i64::MAX) < Valuation::Infinite);
        assert!(Valuation::Finite(-3) < Valuation::Finite(2));
        assert_eq!(Valuation::Finite(4).min(Valuation::Infinite), Valuation::Finite(4));
    }

    #[test]
    fn addition_absorbs_infinity() {
        assert_eq!(Valuation::Finite(2) + Valuation::Finite(-5), Valuation::Finite(-3));
        assert_eq!(Valuation::Finite(2) + Valuation::Infinite, Valuation::Infinite);
    }

    #[test]
    fn display() {
        assert_eq!(Valuation::Finite(-1).to_string(), "-1");
        assert_eq!(Valuation::Infinite.to_string(), "∞");
        assert_eq!(Valuation::from(3).finite(), Some(3));
        assert!(Valuation::Infinite.is_infinite());
    }
}
