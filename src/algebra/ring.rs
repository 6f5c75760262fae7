/// A commutative ring whose elements carry their parameters at runtime.
///
/// Unlike a ring fixed by a const generic, constants such as zero and one are
/// built from an existing element, and combining elements from different
/// rings is an error rather than a type error.
///
/// Laws (you should test these for concrete types):
/// - (R, +) is an abelian group with identity `zero_like`
/// - (R, ·) is a commutative monoid with identity `one_like`
/// - multiplication distributes over addition.
pub trait Ring: Sized + Clone + Eq {
    type Error;

    /// The additive identity of the ring `self` lives in.
    fn zero_like(&self) -> Self;

    /// The multiplicative identity of the ring `self` lives in.
    fn one_like(&self) -> Self;

    fn is_zero(&self) -> bool;

    /// Addition; fails when the operands live in different rings.
    fn try_add(&self, rhs: &Self) -> Result<Self, Self::Error>;

    /// Multiplication; fails when the operands live in different rings.
    fn try_mul(&self, rhs: &Self) -> Result<Self, Self::Error>;

    /// Exponentiation by a non-negative integer using square-and-multiply.
    ///
    /// `a.try_pow(0)` is `one_like` for every `a`, zero included.
    fn try_pow(&self, exp: u64) -> Result<Self, Self::Error> {
        let mut base = self.clone();
        let mut result = self.one_like();

        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.try_mul(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.try_mul(&base)?;
            }
        }
        Ok(result)
    }
}
