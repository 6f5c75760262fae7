use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Mul};

use crate::algebra::ring::Ring;
use crate::error::{PAdicError, PAdicResult};
use crate::structures::binary::BinaryDigits;
use crate::structures::valuation::Valuation;
use crate::utils::{gcd, is_prime, mod_inverse, split_prime_power};

/// Highest relative position filled in by [`PAdicElement::pow_ratio`].
const ROOT_TERMS: i64 = 10;

/// Bound on the absolute value of every stored digit position.
///
/// Sums of two in-range positions plus any carry chain stay well inside
/// `i64`, so convolution and normalization never overflow.
pub const POSITION_LIMIT: i64 = 1 << 61;

/// An element of the p-adic numbers with finitely many non-zero digits.
///
/// Digits are stored sparsely by absolute position: the entry `(k, d)` is the
/// term `d · p^k`. Positions may be negative. After construction every
/// stored digit lies in `[1, p-1]`; zero digits are never stored, so the
/// zero element has an empty map and infinite valuation.
///
/// Elements are immutable values. Arithmetic returns fresh elements and
/// never touches its operands.
///
/// # Example
///
/// ```
/// use padic_ideals::{PAdicElement, Valuation};
///
/// // 7 = 2 + 1·5
/// let a = PAdicElement::new(5, [(0, 7)], 0).unwrap();
/// assert_eq!(a.get_digits_up_to(3), vec![2, 1, 0]);
/// assert_eq!(a.valuation(), Valuation::Finite(0));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PAdicElement {
    prime: u32,
    digits: BTreeMap<i64, u32>,
}

impl PAdicElement {
    /// Create an element from raw digits.
    ///
    /// The digit at key `k` is the coefficient of `p^(valuation + k)`.
    /// Raw digits may exceed `p - 1` and repeated keys are summed; both are
    /// absorbed by carry propagation. The stored valuation is recomputed
    /// from the normalized digits, so `valuation` acts as an offset.
    ///
    /// Fails with [`PAdicError::Configuration`] unless `prime` is a prime,
    /// and with [`PAdicError::PositionOutOfRange`] if a position, before or
    /// after carrying, leaves `±POSITION_LIMIT`.
    pub fn new<I>(prime: u32, digits: I, valuation: i64) -> PAdicResult<Self>
    where
        I: IntoIterator<Item = (i64, u64)>,
    {
        validate_prime(prime)?;
        let mut raw = BTreeMap::new();
        for (k, d) in digits {
            let pos = valuation
                .checked_add(k)
                .filter(|pos| pos.abs() <= POSITION_LIMIT)
                .ok_or(PAdicError::PositionOutOfRange)?;
            *raw.entry(pos).or_insert(0u128) += d as u128;
        }
        Self::from_raw(prime, raw).in_range()
    }

    /// The zero element of `Q_p`.
    pub fn zero(prime: u32) -> PAdicResult<Self> {
        validate_prime(prime)?;
        Ok(Self {
            prime,
            digits: BTreeMap::new(),
        })
    }

    /// The multiplicative identity: digit 1 at position 0.
    pub fn one(prime: u32) -> PAdicResult<Self> {
        Self::new(prime, [(0, 1)], 0)
    }

    /// Convert `num / den` to a p-adic element with `precision` digits.
    ///
    /// Powers of `p` are factored out of numerator and denominator; the net
    /// valuation is `v(num) - v(den)`. The digits are those of the unit part
    /// `u / w` modulo `p^precision`, extracted one at a time so that no
    /// power of `p` is ever materialized.
    ///
    /// A negative net valuation is cleared by multiplying through by the
    /// matching power of `p`: the result is the unit part at valuation 0.
    ///
    /// Fails with [`PAdicError::Division`] only for `den == 0`. Since the
    /// prime is validated first, the cofactor of `den` is always a unit
    /// modulo `p` and the non-invertible case cannot occur.
    ///
    /// # Example
    ///
    /// ```
    /// use padic_ideals::{PAdicElement, Valuation};
    ///
    /// // -1 = 4 + 4·5 + 4·5² + ...
    /// let minus_one = PAdicElement::from_rational(-1, 1, 5, 4).unwrap();
    /// assert_eq!(minus_one.get_digits_up_to(4), vec![4, 4, 4, 4]);
    ///
    /// // 1/3 in Z_5: 3 · 2 = 6 ≡ 1, so the first digit is 2
    /// let third = PAdicElement::from_rational(1, 3, 5, 6).unwrap();
    /// assert_eq!(third.get_digit(0), 2);
    /// ```
    pub fn from_rational(num: i64, den: i64, prime: u32, precision: usize) -> PAdicResult<Self> {
        if den == 0 {
            return Err(PAdicError::Division("zero denominator"));
        }
        validate_prime(prime)?;
        if num == 0 || precision == 0 {
            return Self::zero(prime);
        }

        let (val_num, unit_num) = split_prime_power(num as i128, prime);
        let (val_den, unit_den) = split_prime_power(den as i128, prime);
        let valuation = (val_num as i64 - val_den as i64).max(0);
        let den_inv = mod_inverse(unit_den, prime)
            .ok_or(PAdicError::Division("denominator cofactor is not invertible"))?
            as i128;

        let p = prime as i128;
        let mut x = unit_num;
        let mut digits = Vec::with_capacity(precision);
        for k in 0..precision {
            let d = (x.rem_euclid(p) * den_inv) % p;
            digits.push((k as i64, d as u64));
            // x - d·w is divisible by p by choice of d
            x = (x - d * unit_den) / p;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(num, den, prime, precision, valuation, "converted rational to p-adic");

        Self::new(prime, digits, valuation)
    }

    /// Convert an integer, keeping `precision` digits from its valuation.
    pub fn from_integer(n: i64, prime: u32, precision: usize) -> PAdicResult<Self> {
        Self::from_rational(n, 1, prime, precision)
    }

    /// A random element with `precision` uniform digits starting at position 0.
    #[cfg(feature = "rand")]
    pub fn random<R: rand::Rng + ?Sized>(
        prime: u32,
        precision: usize,
        rng: &mut R,
    ) -> PAdicResult<Self> {
        let digits: Vec<(i64, u64)> = (0..precision)
            .map(|k| (k as i64, rng.gen_range(0..prime) as u64))
            .collect();
        Self::new(prime, digits, 0)
    }

    /// Build from an accumulator of absolute positions. `prime` must be valid.
    fn from_raw(prime: u32, raw: BTreeMap<i64, u128>) -> Self {
        Self {
            prime,
            digits: normalize(prime, raw),
        }
    }

    pub const fn prime(&self) -> u32 {
        self.prime
    }

    /// The lowest populated position, or `Infinite` for zero.
    pub fn valuation(&self) -> Valuation {
        match self.digits.keys().next() {
            Some(&k) => Valuation::Finite(k),
            None => Valuation::Infinite,
        }
    }

    /// True if this element has valuation 0.
    pub fn is_unit(&self) -> bool {
        self.valuation() == Valuation::Finite(0)
    }

    /// Non-zero digits as `(absolute position, digit)` in ascending order.
    pub fn digits(&self) -> impl Iterator<Item = (i64, u32)> + '_ {
        self.digits.iter().map(|(&k, &d)| (k, d))
    }

    /// Number of non-zero digits.
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Digit at an absolute position.
    pub fn digit_at(&self, position: i64) -> u32 {
        self.digits.get(&position).copied().unwrap_or(0)
    }

    /// Digit at `valuation + offset`, or 0 if absent. Zero reads as all zeros.
    pub fn get_digit(&self, offset: i64) -> u32 {
        match self.valuation() {
            Valuation::Finite(v) => v.checked_add(offset).map_or(0, |pos| self.digit_at(pos)),
            Valuation::Infinite => 0,
        }
    }

    /// The first `n` digits starting at the valuation.
    ///
    /// Recomputed on each call.
    pub fn get_digits_up_to(&self, n: usize) -> Vec<u32> {
        (0..n as i64).map(|i| self.get_digit(i)).collect()
    }

    /// Keep only the first `n` digits from the valuation.
    ///
    /// An `n` reaching past the last position keeps everything.
    pub fn truncate(&self, n: usize) -> Self {
        let digits = match self.valuation() {
            Valuation::Finite(v) => match i64::try_from(n).ok().and_then(|n| v.checked_add(n)) {
                Some(end) => self.digits.range(v..end).map(|(&k, &d)| (k, d)).collect(),
                None => self.digits.clone(),
            },
            Valuation::Infinite => BTreeMap::new(),
        };
        Self {
            prime: self.prime,
            digits,
        }
    }

    /// The 0/1 view over the first `n` digits from the valuation.
    pub fn binary_digits(&self, n: usize) -> BinaryDigits {
        BinaryDigits::from_element(self, n)
    }

    /// Compare p-adic absolute values: lower valuation is larger.
    pub fn cmp_abs(&self, other: &Self) -> Ordering {
        other.valuation().cmp(&self.valuation())
    }

    /// Raise to an integer power.
    ///
    /// Fails with [`PAdicError::NotSupported`] for negative exponents, since
    /// that needs p-adic inversion. `a.pow(0)` is one for every `a`.
    ///
    /// # Example
    ///
    /// ```
    /// use padic_ideals::PAdicElement;
    ///
    /// let two = PAdicElement::new(5, [(0, 2)], 0).unwrap();
    /// // 2^5 = 32 = 2 + 1·5 + 1·25
    /// assert_eq!(two.pow(5).unwrap().get_digits_up_to(3), vec![2, 1, 1]);
    /// assert!(two.pow(-1).is_err());
    /// ```
    pub fn pow(&self, exp: i64) -> PAdicResult<Self> {
        if exp < 0 {
            return Err(PAdicError::NotSupported("negative exponents"));
        }
        self.try_pow(exp as u64)
    }

    /// Raise to a rational power `numer / denom`.
    ///
    /// Integral exponents go through [`pow`](Self::pow). Otherwise only a
    /// unit raised to `numer / p` is accepted, and the result is the
    /// approximation `1 + Σ (digit(i) · numer mod p) · p^i` for
    /// `i` in `1..10`.
    pub fn pow_ratio(&self, numer: i64, denom: u64) -> PAdicResult<Self> {
        if denom == 0 {
            return Err(PAdicError::Division("zero exponent denominator"));
        }
        let g = gcd(numer.unsigned_abs(), denom).max(1);
        let numer = numer / g as i64;
        let denom = denom / g;
        if denom == 1 {
            return self.pow(numer);
        }
        if !self.is_unit() {
            return Err(PAdicError::NotSupported("rational powers of non-units"));
        }
        if denom != self.prime as u64 {
            return Err(PAdicError::NotSupported("rational powers other than 1/p roots"));
        }

        let p = self.prime as i64;
        let mut digits = Vec::with_capacity(ROOT_TERMS as usize);
        digits.push((0, 1));
        for i in 1..ROOT_TERMS {
            let d = (self.get_digit(i) as i64 * numer).rem_euclid(p);
            digits.push((i, d as u64));
        }
        Self::new(self.prime, digits, 0)
    }

    fn check_prime(&self, other: &Self) -> PAdicResult<()> {
        if self.prime != other.prime {
            return Err(PAdicError::PrimeMismatch {
                left: self.prime,
                right: other.prime,
            });
        }
        Ok(())
    }

    /// Assert that two elements share the same prime.
    ///
    /// Panics if the primes differ. Used by the operator impls, which
    /// cannot return an error; use [`Ring::try_add`] and [`Ring::try_mul`]
    /// to handle mismatches.
    fn assert_same_prime(&self, other: &Self) {
        assert!(
            self.prime == other.prime,
            "p-adic elements must have the same prime ({} vs {})",
            self.prime,
            other.prime
        );
    }

    /// Reject results whose positions left `±POSITION_LIMIT`.
    fn in_range(self) -> PAdicResult<Self> {
        let low = self.digits.keys().next().copied().unwrap_or(0);
        let high = self.digits.keys().next_back().copied().unwrap_or(0);
        if low < -POSITION_LIMIT || high > POSITION_LIMIT {
            return Err(PAdicError::PositionOutOfRange);
        }
        Ok(self)
    }

    fn add_unchecked(&self, rhs: &Self) -> Self {
        let mut raw: BTreeMap<i64, u128> = BTreeMap::new();
        for (&k, &d) in self.digits.iter().chain(rhs.digits.iter()) {
            *raw.entry(k).or_insert(0) += d as u128;
        }
        Self::from_raw(self.prime, raw)
    }

    /// Convolution of the two digit maps followed by a single carry pass.
    /// Both operands hold positions within `±POSITION_LIMIT`, so `i + j`
    /// cannot overflow.
    fn mul_unchecked(&self, rhs: &Self) -> Self {
        let mut raw: BTreeMap<i64, u128> = BTreeMap::new();
        for (&i, &a) in &self.digits {
            for (&j, &b) in &rhs.digits {
                *raw.entry(i + j).or_insert(0) += a as u128 * b as u128;
            }
        }
        Self::from_raw(self.prime, raw)
    }
}

pub(crate) fn validate_prime(prime: u32) -> PAdicResult<()> {
    if !is_prime(prime as u64) {
        return Err(PAdicError::Configuration { prime });
    }
    Ok(())
}

/// Carry propagation from the lowest position upward.
///
/// Each position keeps `value mod p` and passes `value / p` to the next
/// position. Zero digits are dropped. Inputs come from positions within
/// `±2·POSITION_LIMIT`, so `pos + 1` cannot overflow.
fn normalize(prime: u32, mut raw: BTreeMap<i64, u128>) -> BTreeMap<i64, u32> {
    let p = prime as u128;
    let mut digits = BTreeMap::new();
    while let Some((pos, value)) = raw.pop_first() {
        let carry = value / p;
        if carry > 0 {
            *raw.entry(pos + 1).or_insert(0) += carry;
        }
        let digit = value % p;
        if digit != 0 {
            digits.insert(pos, digit as u32);
        }
    }
    digits
}

impl Ring for PAdicElement {
    type Error = PAdicError;

    fn zero_like(&self) -> Self {
        Self {
            prime: self.prime,
            digits: BTreeMap::new(),
        }
    }

    fn one_like(&self) -> Self {
        let mut digits = BTreeMap::new();
        digits.insert(0, 1);
        Self {
            prime: self.prime,
            digits,
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    fn try_add(&self, rhs: &Self) -> PAdicResult<Self> {
        self.check_prime(rhs)?;
        self.add_unchecked(rhs).in_range()
    }

    fn try_mul(&self, rhs: &Self) -> PAdicResult<Self> {
        self.check_prime(rhs)?;
        self.mul_unchecked(rhs).in_range()
    }
}

impl Add for &PAdicElement {
    type Output = PAdicElement;

    fn add(self, rhs: Self) -> PAdicElement {
        self.assert_same_prime(rhs);
        self.add_unchecked(rhs)
    }
}

impl Add for PAdicElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl Mul for &PAdicElement {
    type Output = PAdicElement;

    fn mul(self, rhs: Self) -> PAdicElement {
        self.assert_same_prime(rhs);
        self.mul_unchecked(rhs)
    }
}

impl Mul for PAdicElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl fmt::Debug for PAdicElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PAdicElement")
            .field("prime", &self.prime)
            .field("digits", &self.digits)
            .finish()
    }
}

/// Terms in ascending order, e.g. `2 + 3·5^1` for 17 in `Q_5`.
impl fmt::Display for PAdicElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.digits.is_empty() {
            return write!(f, "0");
        }
        for (i, (&k, &d)) in self.digits.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if k == 0 {
                write!(f, "{}", d)?;
            } else {
                write!(f, "{}·{}^{}", d, self.prime, k)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PAdicRepr {
    prime: u32,
    digits: Vec<(i64, u64)>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for PAdicElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        PAdicRepr {
            prime: self.prime,
            digits: self.digits().map(|(k, d)| (k, d as u64)).collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PAdicElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Re-normalize and re-validate: the input may be hand-written
        let repr = PAdicRepr::deserialize(deserializer)?;
        Self::new(repr.prime, repr.digits, 0).map_err(serde::de::Error::custom)
    }
}
