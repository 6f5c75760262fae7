/// Check if `n` is a prime number.
///
/// Uses trial division up to sqrt(n). Suitable for validating
/// primes when an element is constructed, not for high-performance
/// primality testing.
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Greatest common divisor by the Euclidean algorithm. `gcd(0, 0) == 0`.
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Split `n` into `(v, u)` with `n = p^v · u` and `p ∤ u`.
///
/// `n` must be non-zero; zero has no finite valuation.
pub fn split_prime_power(mut n: i128, p: u32) -> (u32, i128) {
    debug_assert!(n != 0, "zero has infinite valuation");
    let p = p as i128;
    let mut v = 0;
    while n % p == 0 {
        n /= p;
        v += 1;
    }
    (v, n)
}

/// Inverse of `a` modulo `m` via the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: i128, m: u32) -> Option<u32> {
    let m = m as i128;
    let (mut old_r, mut r) = (a.rem_euclid(m), m);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(m) as u32)
}
