// ==========================================
// 换算性质测试
// ==========================================
// 覆盖: 恒等、往返、确定性、来源分类、并发共享
// ==========================================


use std::sync::Arc;
use std::thread;

use rust_decimal_macros::dec;
use test_helpers::{precision_tolerance, standard_api};
use unit_conversion_engine::{ConversionSource, UnitCategory};

#[test]
fn test_identity_for_every_unit() {
    let api = standard_api();
    let categories = [UnitCategory::Volume, UnitCategory::Weight, UnitCategory::Count];

    for category in categories {
        for unit in api.registry().units_in_category(category) {
            let r = api.convert(&unit.code, &unit.code, dec!(7), None).unwrap();
            assert_eq!(r.converted_quantity, dec!(7), "unit {}", unit.code);
            assert_eq!(r.source, ConversionSource::Direct);
            assert_eq!(r.conversion_path, unit.code);
            assert_eq!(r.hop_count(), 0);
        }
    }
}

#[test]
fn test_round_trip_within_precision() {
    let api = standard_api();
    let cases = [
        ("kg", "g", dec!(2.5)),
        ("L", "瓶", dec!(1.5)),
        ("L", "ml", dec!(0.333)),
        ("箱", "个", dec!(3)),
    ];

    for (a, b, q) in cases {
        let there = api.convert(a, b, q, None).unwrap();
        let back = api
            .convert(b, a, there.converted_quantity, None)
            .unwrap();
        let dp = api.registry().lookup(a).unwrap().decimal_places;
        let drift = (back.converted_quantity - q).abs();
        assert!(
            drift <= precision_tolerance(dp),
            "{} -> {} -> {}: {} vs {}",
            a,
            b,
            a,
            back.converted_quantity,
            q
        );
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let api = standard_api();
    let first = api.convert("瓶", "L", dec!(3), None).unwrap();
    for _ in 0..10 {
        let again = api.convert("瓶", "L", dec!(3), None).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn test_source_follows_hop_count() {
    let api = standard_api();

    let direct = api.convert("L", "ml", dec!(1), None).unwrap();
    assert_eq!(direct.hop_count(), 1);
    assert_eq!(direct.source, ConversionSource::Direct);

    let inverse = api.convert("个", "箱", dec!(48), None).unwrap();
    assert_eq!(inverse.hop_count(), 1);
    assert_eq!(inverse.source, ConversionSource::Direct);
    assert_eq!(inverse.converted_quantity, dec!(2));

    let computed = api.convert("瓶", "L", dec!(1), None).unwrap();
    assert_eq!(computed.hop_count(), 2);
    assert_eq!(computed.source, ConversionSource::ComputedPath);
}

#[test]
fn test_shared_across_threads() {
    let api = Arc::new(standard_api());

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                let q = rust_decimal::Decimal::from(i);
                api.convert("kg", "g", q, None).unwrap().converted_quantity
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let converted = handle.join().unwrap();
        assert_eq!(converted, rust_decimal::Decimal::from((i as i64 + 1) * 1000));
    }
}
