use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PAdicError, PAdicResult};
use crate::utils::gcd;

/// A positive rational coefficient `numer / denom` in lowest terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(u64, u64)", into = "(u64, u64)")
)]
pub struct Coefficient {
    numer: u64,
    denom: u64,
}

impl Coefficient {
    /// Fails with [`PAdicError::InvalidCoefficient`] if either part is zero.
    pub fn new(numer: u64, denom: u64) -> PAdicResult<Self> {
        if numer == 0 || denom == 0 {
            return Err(PAdicError::InvalidCoefficient);
        }
        let g = gcd(numer, denom);
        Ok(Self {
            numer: numer / g,
            denom: denom / g,
        })
    }

    pub const fn numer(self) -> u64 {
        self.numer
    }

    pub const fn denom(self) -> u64 {
        self.denom
    }

    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// `ceil(1 / c)`.
    pub fn reciprocal_ceil(self) -> u64 {
        self.denom.div_ceil(self.numer)
    }

    /// `n / (m · p^k)` where `k = ceil(log_p m)` for `c = n / m`.
    pub fn epsilon(self, p: u32) -> f64 {
        let p = p as u64;
        let mut scale = 1u64;
        while scale < self.denom {
            scale = scale.saturating_mul(p);
        }
        self.numer as f64 / (self.denom as f64 * scale as f64)
    }
}

impl Coefficient {
    /// The reduced sum, or `None` if it does not fit in `u64 / u64`.
    ///
    /// Intermediates are widened to `u128`, so only the reduced result is
    /// bounded.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let (a, b) = (self.denom as u128, rhs.denom as u128);
        let l = a / gcd_wide(a, b) * b;
        let numer = (self.numer as u128 * (l / a))
            .checked_add(rhs.numer as u128 * (l / b))?;
        let g = gcd_wide(numer, l);
        Some(Self {
            numer: u64::try_from(numer / g).ok()?,
            denom: u64::try_from(l / g).ok()?,
        })
    }
}

const fn gcd_wide(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

impl TryFrom<(u64, u64)> for Coefficient {
    type Error = PAdicError;

    fn try_from((numer, denom): (u64, u64)) -> PAdicResult<Self> {
        Self::new(numer, denom)
    }
}

impl From<Coefficient> for (u64, u64) {
    fn from(c: Coefficient) -> Self {
        (c.numer, c.denom)
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// A Q-divisor: named prime divisors with positive rational coefficients.
///
/// # Example
///
/// ```
/// use padic_ideals::ideal::{Coefficient, QDivisor};
///
/// let delta = QDivisor::new()
///     .with("D1", Coefficient::new(2, 3).unwrap())
///     .and_then(|d| d.with("D2", Coefficient::new(3, 5)?))
///     .unwrap();
/// assert_eq!(delta.threshold(), Some(2));
/// assert_eq!(delta.to_string(), "2/3·div(D1) + 3/5·div(D2)");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QDivisor {
    components: BTreeMap<String, Coefficient>,
}

impl QDivisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coefficient · name`, summing with an existing component.
    pub fn with(
        mut self,
        name: impl Into<String>,
        coefficient: Coefficient,
    ) -> PAdicResult<Self> {
        self.insert(name, coefficient)?;
        Ok(self)
    }

    /// Fails with [`PAdicError::InvalidCoefficient`] if the summed
    /// coefficient overflows. The divisor is unchanged on failure.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        coefficient: Coefficient,
    ) -> PAdicResult<()> {
        match self.components.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                let sum = entry
                    .get()
                    .checked_add(coefficient)
                    .ok_or(PAdicError::InvalidCoefficient)?;
                entry.insert(sum);
            }
            Entry::Vacant(entry) => {
                entry.insert(coefficient);
            }
        }
        Ok(())
    }

    /// The component-wise sum `self + other`.
    pub fn merge(&self, other: &Self) -> PAdicResult<Self> {
        let mut out = self.clone();
        for (name, &c) in &other.components {
            out.insert(name.as_str(), c)?;
        }
        Ok(out)
    }

    pub fn coefficient(&self, name: &str) -> Option<Coefficient> {
        self.components.get(name).copied()
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, Coefficient)> {
        self.components.iter().map(|(k, &c)| (k.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The valuation threshold `t_Δ = ceil(min 1/c_i)`, `None` when empty.
    pub fn threshold(&self) -> Option<u64> {
        self.components
            .values()
            .map(|c| c.reciprocal_ceil())
            .min()
    }

    /// The complexity bound `C_Δ = Σ c_i (1 + δ_i)` with
    /// `δ_i = Σ_j c_j · gcd(m_i, m_j) / m_i` over all components `j`.
    pub fn complexity_bound(&self) -> f64 {
        let coeffs: Vec<Coefficient> = self.components.values().copied().collect();
        coeffs
            .iter()
            .map(|ci| {
                let delta: f64 = coeffs
                    .iter()
                    .map(|cj| cj.to_f64() * gcd(ci.denom, cj.denom) as f64 / ci.denom as f64)
                    .sum();
                ci.to_f64() * (1.0 + delta)
            })
            .sum()
    }

    /// The weight `w_i(Δ) = Σ c_i · p^(-position · ε_i)` at a digit position.
    pub fn weight(&self, position: u64, p: u32) -> f64 {
        self.components
            .values()
            .map(|c| c.to_f64() * (p as f64).powf(-(position as f64) * c.epsilon(p)))
            .sum()
    }
}

impl fmt::Display for QDivisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "0");
        }
        for (i, (name, c)) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}·div({})", c, name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: u64, d: u64) -> Coefficient {
        Coefficient::new(n, d).unwrap()
    }

    fn sample() -> QDivisor {
        QDivisor::new()
            .with("D1", c(2, 3))
            .and_then(|d| d.with("D2", c(3, 5)))
            .unwrap()
    }

    fn single(name: &str, coefficient: Coefficient) -> QDivisor {
        QDivisor::new().with(name, coefficient).unwrap()
    }

    #[test]
    fn coefficient_reduces() {
        assert_eq!(c(4, 6), c(2, 3));
        assert_eq!(c(4, 2).to_string(), "2");
        assert_eq!(Coefficient::new(0, 3), Err(PAdicError::InvalidCoefficient));
        assert_eq!(Coefficient::new(3, 0), Err(PAdicError::InvalidCoefficient));
    }

    #[test]
    fn coefficient_sum() {
        assert_eq!(c(1, 6).checked_add(c(1, 3)), Some(c(1, 2)));
        assert_eq!(c(1, 2).checked_add(c(1, 2)), Some(c(1, 1)));
    }

    #[test]
    fn coefficient_sum_near_u64_max() {
        let big = c(u64::MAX - 1, u64::MAX);
        // the cross terms exceed u64 but the sum reduces to 1
        assert_eq!(big.checked_add(c(1, u64::MAX)), Some(c(1, 1)));
        // 2(M - 1) / M is already reduced and its numerator overflows
        assert_eq!(big.checked_add(big), None);
        assert_eq!(c(1, u64::MAX).checked_add(c(1, u64::MAX - 1)), None);
    }

    #[test]
    fn insert_overflow_is_an_error() {
        let big = c(u64::MAX - 1, u64::MAX);
        let mut d = single("D", big);
        assert_eq!(d.insert("D", big), Err(PAdicError::InvalidCoefficient));
        assert_eq!(d.coefficient("D"), Some(big));
        assert_eq!(
            single("D", big).with("D", big),
            Err(PAdicError::InvalidCoefficient)
        );
        assert!(d.merge(&d.clone()).is_err());
    }

    #[test]
    fn epsilon_scales_by_prime_power() {
        // 2/3 with p = 5: 2 / (3 · 5)
        assert!((c(2, 3).epsilon(5) - 2.0 / 15.0).abs() < 1e-12);
        // denominator 1 needs no scaling
        assert!((c(1, 1).epsilon(5) - 1.0).abs() < 1e-12);
        // 1/25 with p = 5: 1 / (25 · 25)
        assert!((c(1, 25).epsilon(5) - 1.0 / 625.0).abs() < 1e-12);
    }

    #[test]
    fn threshold() {
        assert_eq!(sample().threshold(), Some(2));
        assert_eq!(single("D", c(1, 4)).threshold(), Some(4));
        assert_eq!(QDivisor::new().threshold(), None);
    }

    #[test]
    fn complexity_bound() {
        // 2/3 · 28/15 + 3/5 · 26/15 = 514/225
        assert!((sample().complexity_bound() - 514.0 / 225.0).abs() < 1e-12);
        assert_eq!(QDivisor::new().complexity_bound(), 0.0);
    }

    #[test]
    fn weight_decreases_with_position() {
        let d = sample();
        assert!((d.weight(0, 5) - (2.0 / 3.0 + 3.0 / 5.0)).abs() < 1e-12);
        assert!(d.weight(10, 5) < d.weight(1, 5));
    }

    #[test]
    fn merge_sums_components() {
        let a = single("D1", c(1, 3));
        let sum = a.merge(&sample()).unwrap();
        assert_eq!(sum.coefficient("D1"), Some(c(1, 1)));
        assert_eq!(sum.coefficient("D2"), Some(c(3, 5)));
        assert_eq!(sum.components().count(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(QDivisor::new().to_string(), "0");
        assert_eq!(sample().to_string(), "2/3·div(D1) + 3/5·div(D2)");
    }
}
