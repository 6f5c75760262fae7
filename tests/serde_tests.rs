//! Serde serialization/deserialization tests
//!
//! Run with: cargo test --features serde --test serde_tests

#![cfg(feature = "serde")]

use padic_ideals::ideal::{Coefficient, QDivisor};
use padic_ideals::{PAdicElement, Ring, Valuation};

#[test]
fn element_roundtrip() {
    // 2 + 3·5
    let a = PAdicElement::new(5, [(0, 2), (1, 3)], 0).unwrap();
    let json = serde_json::to_string(&a).unwrap();
    assert_eq!(json, r#"{"prime":5,"digits":[[0,2],[1,3]]}"#);
    let b: PAdicElement = serde_json::from_str(&json).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_roundtrip() {
    let z = PAdicElement::zero(7).unwrap();
    let json = serde_json::to_string(&z).unwrap();
    assert_eq!(json, r#"{"prime":7,"digits":[]}"#);
    let back: PAdicElement = serde_json::from_str(&json).unwrap();
    assert!(back.is_zero());
    assert_eq!(back.valuation(), Valuation::Infinite);
}

#[test]
fn negative_positions_roundtrip() {
    let a = PAdicElement::new(3, [(0, 1), (2, 2)], -4).unwrap();
    let json = serde_json::to_string(&a).unwrap();
    let b: PAdicElement = serde_json::from_str(&json).unwrap();
    assert_eq!(b.valuation(), Valuation::Finite(-4));
    assert_eq!(a, b);
}

#[test]
fn deserialize_normalizes() {
    // raw digit 7 carries into position 1
    let a: PAdicElement = serde_json::from_str(r#"{"prime":5,"digits":[[0,7]]}"#).unwrap();
    assert_eq!(a.digits().collect::<Vec<_>>(), vec![(0, 2), (1, 1)]);
}

#[test]
fn deserialize_rejects_bad_prime() {
    let result: Result<PAdicElement, _> = serde_json::from_str(r#"{"prime":6,"digits":[[0,1]]}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("invalid prime 6"));
}

#[test]
fn valuation_roundtrip() {
    for v in [Valuation::Finite(-2), Valuation::Infinite] {
        let json = serde_json::to_string(&v).unwrap();
        let back: Valuation = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}

#[test]
fn divisor_roundtrip() {
    let delta = QDivisor::new()
        .with("D1", Coefficient::new(2, 3).unwrap())
        .and_then(|d| d.with("D2", Coefficient::new(3, 5)?))
        .unwrap();
    let json = serde_json::to_string(&delta).unwrap();
    assert_eq!(json, r#"{"components":{"D1":[2,3],"D2":[3,5]}}"#);
    let back: QDivisor = serde_json::from_str(&json).unwrap();
    assert_eq!(delta, back);
}

#[test]
fn coefficient_rejects_zero() {
    let result: Result<Coefficient, _> = serde_json::from_str("[0,3]");
    assert!(result.is_err());
    let reduced: Coefficient = serde_json::from_str("[4,6]").unwrap();
    assert_eq!(reduced, Coefficient::new(2, 3).unwrap());
}
