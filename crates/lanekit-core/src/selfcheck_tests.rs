//! Tests for `selfcheck` module - runtime parity reports.

#![allow(clippy::cast_precision_loss)]

use crate::selfcheck::{check_parity, edge_samples, Mismatch, ParityReport};

fn ordinary_samples<T: crate::element::Element>(count: usize) -> Vec<[T; 4]> {
    (0..count)
        .map(|i| {
            let base = (i as f64 - count as f64 / 2.0) * 0.731;
            [
                T::from_f64(base),
                T::from_f64(base * -1.37 + 0.2),
                T::from_f64(base * base * 0.01),
                T::from_f64(1.0 / (base + 0.5)),
            ]
        })
        .collect()
}

#[test]
fn test_edge_samples_are_clean_f32() {
    let report = check_parity::<f32>(&edge_samples());
    assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    assert_eq!(report.element, "f32");
    assert_eq!(report.samples, edge_samples::<f32>().len());
    assert!(report.checked > report.samples * 50);
}

#[test]
fn test_edge_samples_are_clean_f64() {
    let report = check_parity::<f64>(&edge_samples());
    assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    assert_eq!(report.element, "f64");
}

#[test]
fn test_ordinary_samples_are_clean() {
    let report = check_parity::<f32>(&ordinary_samples(64));
    assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    let report = check_parity::<f64>(&ordinary_samples(64));
    assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
}

#[test]
fn test_single_sample_covers_every_arity() {
    // 38 unary, 36 binary and 5 ternary exact operations per sample.
    let report = check_parity::<f32>(&[[1.5, -2.0, 0.25, 4.0]]);
    assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    assert_eq!(report.samples, 1);
    assert!(report.checked >= 38 + 36 + 5);
}

#[test]
fn test_empty_sample_set() {
    let report = check_parity::<f32>(&[]);
    assert_eq!(report.samples, 0);
    assert_eq!(report.checked, 0);
    assert!(report.is_clean());
}

#[test]
fn test_edge_samples_cover_special_values() {
    let lanes: Vec<f32> = edge_samples::<f32>().into_iter().flatten().collect();
    assert!(lanes.iter().any(|x| x.is_nan()));
    assert!(lanes.iter().any(|x| x.is_infinite() && x.is_sign_negative()));
    assert!(lanes.iter().any(|x| *x == 0.0 && x.is_sign_negative()));
    assert!(lanes.iter().any(|x| x.is_subnormal()));
}

#[test]
fn test_report_serializes_to_json() {
    let report = ParityReport {
        element: "f32",
        capabilities: "sse sse2".to_string(),
        samples: 1,
        checked: 2,
        mismatches: vec![Mismatch {
            operation: "add",
            inputs: vec![[1.0, 2.0, 3.0, 4.0]],
            accelerated: [1.0; 4],
            software: [2.0; 4],
        }],
    };
    assert!(!report.is_clean());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["element"], "f32");
    assert_eq!(json["mismatches"][0]["operation"], "add");
    assert_eq!(json["mismatches"][0]["software"][3], 2.0);
}
