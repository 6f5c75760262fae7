use std::collections::BTreeMap;

use crate::error::{PAdicError, PAdicResult};
use crate::ideal::predicate::BinaryPredicate;
use crate::structures::padic::{validate_prime, PAdicElement};

/// A registry of named formulations of binary predicates over one prime.
///
/// The registry is an ordinary owned value; callers hold and pass it
/// explicitly.
#[derive(Debug)]
pub struct FormulationClassifier {
    prime: u32,
    formulations: BTreeMap<String, BinaryPredicate>,
}

impl FormulationClassifier {
    pub fn new(prime: u32) -> PAdicResult<Self> {
        validate_prime(prime)?;
        Ok(Self {
            prime,
            formulations: BTreeMap::new(),
        })
    }

    pub const fn prime(&self) -> u32 {
        self.prime
    }

    /// Register `predicate` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: BinaryPredicate,
    ) -> PAdicResult<()> {
        if predicate.prime() != self.prime {
            return Err(PAdicError::PrimeMismatch {
                left: self.prime,
                right: predicate.prime(),
            });
        }
        self.formulations.insert(name.into(), predicate);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BinaryPredicate> {
        self.formulations.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formulations.keys().map(String::as_str)
    }

    /// Whether two registered formulations agree on every probe up to `precision`.
    pub fn are_equivalent(&self, first: &str, second: &str, precision: u64) -> PAdicResult<bool> {
        let a = self.lookup(first)?;
        let b = self.lookup(second)?;
        let equivalent = self.agree(a, b, precision)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(first, second, precision, equivalent, "compared formulations");

        Ok(equivalent)
    }

    /// Names of all registered formulations that agree with `predicate`.
    pub fn find_equivalent(
        &self,
        predicate: &BinaryPredicate,
        precision: u64,
    ) -> PAdicResult<Vec<&str>> {
        let mut names = Vec::new();
        for (name, candidate) in &self.formulations {
            if self.agree(candidate, predicate, precision)? {
                names.push(name.as_str());
            }
        }
        Ok(names)
    }

    fn lookup(&self, name: &str) -> PAdicResult<&BinaryPredicate> {
        self.formulations
            .get(name)
            .ok_or_else(|| PAdicError::UnknownFormulation(name.to_owned()))
    }

    /// Compare on the single-digit probes `d · p^v`, `v < precision`,
    /// `d < min(5, p)`, for every `t` in `1..precision`.
    fn agree(&self, a: &BinaryPredicate, b: &BinaryPredicate, precision: u64) -> PAdicResult<bool> {
        let digit_bound = (self.prime as u64).min(5);
        for v in 0..precision {
            for d in 0..digit_bound {
                let probe = PAdicElement::new(self.prime, [(v as i64, d)], 0)?;
                for t in 1..precision {
                    if a.evaluate(&probe, t)? != b.evaluate(&probe, t)? {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::valuation::Valuation;

    fn by_valuation(prime: u32) -> BinaryPredicate {
        BinaryPredicate::new(prime, |a: &PAdicElement, t| {
            a.valuation() >= Valuation::Finite(t as i64)
        })
        .unwrap()
    }

    /// The same condition phrased through digits.
    fn by_digits(prime: u32) -> BinaryPredicate {
        BinaryPredicate::new(prime, |a: &PAdicElement, t| {
            (0..t as i64).all(|k| a.digit_at(k) == 0)
        })
        .unwrap()
    }

    fn classifier() -> FormulationClassifier {
        let mut c = FormulationClassifier::new(5).unwrap();
        c.register("valuation", by_valuation(5)).unwrap();
        c.register("digits", by_digits(5)).unwrap();
        c.register("always", BinaryPredicate::new(5, |_: &PAdicElement, _| true).unwrap())
            .unwrap();
        c
    }

    #[test]
    fn equivalent_formulations() {
        let c = classifier();
        assert!(c.are_equivalent("valuation", "digits", 8).unwrap());
        assert!(!c.are_equivalent("valuation", "always", 8).unwrap());
    }

    #[test]
    fn unknown_name() {
        let c = classifier();
        assert_eq!(
            c.are_equivalent("valuation", "missing", 4),
            Err(PAdicError::UnknownFormulation("missing".into()))
        );
    }

    #[test]
    fn find_equivalent_lists_matches() {
        let c = classifier();
        assert_eq!(c.find_equivalent(&by_valuation(5), 6).unwrap(), vec!["digits", "valuation"]);
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["always", "digits", "valuation"]);
    }

    #[test]
    fn register_rejects_foreign_prime() {
        let mut c = FormulationClassifier::new(5).unwrap();
        assert_eq!(
            c.register("seven", by_valuation(7)),
            Err(PAdicError::PrimeMismatch { left: 5, right: 7 })
        );
        assert!(c.get("seven").is_none());
        assert_eq!(
            FormulationClassifier::new(1).unwrap_err(),
            PAdicError::Configuration { prime: 1 }
        );
    }

    #[test]
    fn registries_are_independent() {
        let a = classifier();
        let b = FormulationClassifier::new(5).unwrap();
        assert!(a.get("digits").is_some());
        assert!(b.get("digits").is_none());
        assert_eq!(b.prime(), 5);
    }
}
