use std::fmt;

use crate::error::{PAdicError, PAdicResult};
use crate::ideal::divisor::QDivisor;
use crate::structures::padic::{validate_prime, PAdicElement};
use crate::structures::valuation::Valuation;

/// Extra digits of precision the probe set is built with beyond `t`.
const PROBE_MARGIN: u64 = 10;

/// A binary predicate `φ(a, t)` over p-adic elements, optionally tied to the
/// Q-divisor it was derived from.
pub struct BinaryPredicate {
    func: Box<dyn Fn(&PAdicElement, u64) -> bool>,
    prime: u32,
    divisor: Option<QDivisor>,
}

impl BinaryPredicate {
    /// Wrap `func` as a predicate over `Q_prime`.
    pub fn new<F>(prime: u32, func: F) -> PAdicResult<Self>
    where
        F: Fn(&PAdicElement, u64) -> bool + 'static,
    {
        validate_prime(prime)?;
        Ok(Self {
            func: Box::new(func),
            prime,
            divisor: None,
        })
    }

    /// Attach the divisor this predicate was derived from.
    pub fn with_divisor(mut self, divisor: QDivisor) -> Self {
        self.divisor = Some(divisor);
        self
    }

    pub const fn prime(&self) -> u32 {
        self.prime
    }

    pub fn divisor(&self) -> Option<&QDivisor> {
        self.divisor.as_ref()
    }

    /// Evaluate `φ(element, t)`. Fails if the element lives over another prime.
    pub fn evaluate(&self, element: &PAdicElement, t: u64) -> PAdicResult<bool> {
        self.check_prime(element)?;
        Ok((self.func)(element, t))
    }

    /// Membership of `element` in the test ideal `τ(R, φ, p^t)`.
    pub fn contains(&self, element: &PAdicElement, t: u64) -> PAdicResult<bool> {
        test_ideal_membership(self, element, t)
    }

    /// Membership of the integer `n`, read as the single digit `n` at
    /// position 0 and carried into canonical form.
    pub fn contains_integer(&self, n: u64, t: u64) -> PAdicResult<bool> {
        let element = PAdicElement::new(self.prime, [(0, n)], 0)?;
        test_ideal_membership(self, &element, t)
    }

    fn check_prime(&self, element: &PAdicElement) -> PAdicResult<()> {
        if element.prime() != self.prime {
            return Err(PAdicError::PrimeMismatch {
                left: self.prime,
                right: element.prime(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for BinaryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPredicate")
            .field("prime", &self.prime)
            .field("divisor", &self.divisor)
            .finish_non_exhaustive()
    }
}

/// The probe elements used to test ideal membership.
///
/// - the identity `1`
/// - for each `1 <= i < min(p, 5)`, the unit `i + Σ (i·j mod p)·p^j` over
///   `1 <= j < min(precision, 3)`
/// - `p^v` for `1 <= v < min(precision / 2, 3)`
pub fn test_set(prime: u32, precision: u64) -> PAdicResult<Vec<PAdicElement>> {
    let mut probes = vec![PAdicElement::one(prime)?];

    let p = prime as u64;
    for i in 1..p.min(5) {
        let mut digits = vec![(0i64, i)];
        for j in 1..precision.min(3) {
            digits.push((j as i64, (i * j) % p));
        }
        probes.push(PAdicElement::new(prime, digits, 0)?);
    }

    for v in 1..(precision / 2).min(3) {
        probes.push(PAdicElement::new(prime, [(0, 1)], v as i64)?);
    }
    Ok(probes)
}

/// Whether `element` lies in the test ideal `τ(R, φ, p^t)`.
///
/// When the predicate carries a divisor with threshold `t_Δ < t`, membership
/// reduces to divisibility: the element must have valuation at least
/// `t - t_Δ`. Otherwise `φ(element · x, t)` must hold for every probe `x`
/// of [`test_set`] at precision `t + 10`.
///
/// # Example
///
/// ```
/// use padic_ideals::ideal::{test_ideal_membership, BinaryPredicate};
/// use padic_ideals::PAdicElement;
///
/// // φ(a, t): a is divisible by p^t
/// let phi = BinaryPredicate::new(5, |a: &PAdicElement, t| {
///     a.valuation() >= padic_ideals::Valuation::Finite(t as i64)
/// })
/// .unwrap();
/// let x = PAdicElement::new(5, [(0, 1)], 3).unwrap();
/// assert!(test_ideal_membership(&phi, &x, 2).unwrap());
/// assert!(!test_ideal_membership(&phi, &x, 4).unwrap());
/// ```
pub fn test_ideal_membership(
    predicate: &BinaryPredicate,
    element: &PAdicElement,
    t: u64,
) -> PAdicResult<bool> {
    predicate.check_prime(element)?;

    if let Some(threshold) = predicate.divisor().and_then(QDivisor::threshold) {
        if t > threshold {
            let depth = (t - threshold) as i64;
            return Ok(element.valuation() >= Valuation::Finite(depth));
        }
    }

    for probe in test_set(predicate.prime, t + PROBE_MARGIN)? {
        if !predicate.evaluate(&(element * &probe), t)? {
            return Ok(false);
        }
    }
    Ok(true)
}
