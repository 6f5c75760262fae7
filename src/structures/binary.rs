use alloc::vec::Vec;
use core::fmt;

use crate::error::{PAdicError, PAdicResult};
use crate::structures::padic::PAdicElement;

/// The 0/1 view of an element's leading digits.
///
/// Bit `i` is set iff the digit at `valuation + i` is non-zero. The view is a
/// pointwise function of the digits and carries no other state; it is the
/// input to binary predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryDigits {
    bits: Vec<bool>,
}

impl BinaryDigits {
    /// The view over the first `n` digits of `element` from its valuation.
    pub fn from_element(element: &PAdicElement, n: usize) -> Self {
        let bits = element
            .get_digits_up_to(n)
            .into_iter()
            .map(|d| d != 0)
            .collect();
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Offsets of the set bits, ascending.
    pub fn one_positions(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// True iff a set bit occurs among the first `floor(len · coefficient)` bits.
    ///
    /// `coefficient` must lie strictly between 0 and 1.
    ///
    /// # Example
    ///
    /// ```
    /// use padic_ideals::PAdicElement;
    ///
    /// // digits 1, 0, 0, 3 in Q_5
    /// let a = PAdicElement::new(5, [(0, 1), (3, 3)], 0).unwrap();
    /// let bits = a.binary_digits(4);
    /// assert!(bits.truncation_predicate(0.5).unwrap());
    /// assert!(bits.truncation_predicate(1.5).is_err());
    /// ```
    pub fn truncation_predicate(&self, coefficient: f64) -> PAdicResult<bool> {
        if !(coefficient > 0.0 && coefficient < 1.0) {
            return Err(PAdicError::InvalidCoefficient);
        }
        let cut = (self.bits.len() as f64 * coefficient) as usize;
        Ok(self.bits[..cut].iter().any(|&b| b))
    }
}

/// Most significant bit first, `0` for an empty view.
impl fmt::Display for BinaryDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bits.is_empty() {
            return write!(f, "0");
        }
        for &b in self.bits.iter().rev() {
            write!(f, "{}", b as u8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn bits_of(digits: &[(i64, u64)], n: usize) -> BinaryDigits {
        PAdicElement::new(7, digits.iter().copied(), 0)
            .unwrap()
            .binary_digits(n)
    }

    #[test]
    fn bits_follow_digits() {
        let b = bits_of(&[(0, 3), (2, 6)], 4);
        assert_eq!(b.bits(), &[true, false, true, false]);
        assert_eq!(b.count_ones(), 2);
        assert_eq!(b.one_positions(), vec![0, 2]);
        assert_eq!(b.to_string(), "0101");
    }

    #[test]
    fn view_starts_at_valuation() {
        let b = bits_of(&[(3, 1), (4, 1)], 3);
        assert_eq!(b.bits(), &[true, true, false]);
    }

    #[test]
    fn zero_view() {
        let b = bits_of(&[], 3);
        assert_eq!(b.count_ones(), 0);
        assert!(bits_of(&[], 0).is_empty());
        assert_eq!(bits_of(&[], 0).to_string(), "0");
    }

    #[test]
    fn truncation_predicate_cuts() {
        let a = PAdicElement::new(7, [(0, 1), (2, 1)], 0).unwrap();
        let b = a.binary_digits(4);
        assert!(b.truncation_predicate(0.25).unwrap());

        // a view over real digits always starts with a set bit
        let c = BinaryDigits {
            bits: vec![false, false, true, false],
        };
        assert!(!c.truncation_predicate(0.5).unwrap());
        assert!(c.truncation_predicate(0.75).unwrap());
        // floor(4 · 0.2) = 0 bits inspected
        assert!(!b.truncation_predicate(0.2).unwrap());
    }

    #[test]
    fn truncation_predicate_rejects_bad_coefficients() {
        let b = bits_of(&[(0, 1)], 2);
        for c in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            assert_eq!(b.truncation_predicate(c), Err(PAdicError::InvalidCoefficient));
        }
    }
}
