// ==========================================
// 快照加载集成测试
// ==========================================
// 覆盖: JSON 文件 -> 快照 -> 换算 API，配置文件，指纹，规则录入预检
// ==========================================


use std::io::Write;
use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::NamedTempFile;
use test_helpers::{standard_snapshot, standard_snapshot_json};
use unit_conversion_engine::{
    ConversionApi, ConversionConfig, ConversionErrorKind, ConversionRule, ConversionSnapshot,
    ConversionSource, RepositoryError, RuleAuthoringValidator, Unit, UnitCategory,
};

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_snapshot_file_and_convert() {
    let file = write_temp(standard_snapshot_json());
    let snapshot = ConversionSnapshot::from_json_file(file.path()).unwrap();
    let api = ConversionApi::from_snapshot(&snapshot, &ConversionConfig::default()).unwrap();

    let r = api.convert("L", "瓶", dec!(1.5), None).unwrap();
    assert_eq!(r.converted_quantity, dec!(3.0));
    assert_eq!(r.conversion_path, "L -> ml -> 瓶");

    let r = api.convert("瓶", "ml", dec!(2), Some("M1")).unwrap();
    assert_eq!(r.converted_quantity, dec!(660));
    assert_eq!(r.source, ConversionSource::MaterialOverride);
}

#[test]
fn test_file_snapshot_matches_in_memory_fingerprint() {
    let file = write_temp(standard_snapshot_json());
    let loaded = ConversionSnapshot::from_json_file(file.path()).unwrap();
    assert_eq!(loaded.fingerprint(), standard_snapshot().fingerprint());
}

#[test]
fn test_fingerprint_changes_with_rules() {
    let base = standard_snapshot();
    let mut changed = standard_snapshot();
    changed.global_rules[0].rate = dec!(1001);

    assert_ne!(base.fingerprint(), changed.fingerprint());
    assert_eq!(base.fingerprint().len(), 64);
}

#[test]
fn test_missing_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConversionSnapshot::from_json_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, RepositoryError::IoError(_)));
}

#[test]
fn test_invalid_snapshot_surfaces_as_invalid_data() {
    let mut snapshot = standard_snapshot();
    snapshot
        .global_rules
        .push(ConversionRule::new("kg", "磅", dec!(2.2), UnitCategory::Weight));

    let err = ConversionApi::from_snapshot(&snapshot, &ConversionConfig::default())
        .err()
        .unwrap();
    assert_eq!(err.kind(), ConversionErrorKind::InvalidData);
}

#[test]
fn test_padded_unit_code_rejected_at_build() {
    let mut snapshot = standard_snapshot();
    snapshot
        .units
        .push(Unit::new(" 吨", "吨", UnitCategory::Weight, 3, false));
    snapshot
        .global_rules
        .push(ConversionRule::new(" 吨", "kg", dec!(1000), UnitCategory::Weight));

    let err = snapshot.build().err().unwrap();
    assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "code"));

    let err = ConversionApi::from_snapshot(&snapshot, &ConversionConfig::default())
        .err()
        .unwrap();
    assert_eq!(err.kind(), ConversionErrorKind::InvalidData);
}

#[test]
fn test_config_file_disables_consistency_check() {
    let mut snapshot = standard_snapshot();
    snapshot
        .global_rules
        .push(ConversionRule::new("g", "kg", dec!(0.002), UnitCategory::Weight));

    let config_file = write_temp(r#"{"check_rate_consistency": false}"#);
    let config = ConversionConfig::from_json_file(config_file.path()).unwrap();
    assert!(!config.check_rate_consistency);

    // 关闭检查后采用首条最短路径（插入顺序靠前的 kg -> g 1000）
    let api = ConversionApi::from_snapshot(&snapshot, &config).unwrap();
    let r = api.convert("kg", "g", dec!(1), None).unwrap();
    assert_eq!(r.converted_quantity, dec!(1000));

    let strict = ConversionApi::from_snapshot(&snapshot, &ConversionConfig::default()).unwrap();
    assert!(!strict.can_convert("kg", "g", None));
}

#[test]
fn test_invalid_config_file_rejected() {
    let config_file = write_temp(r#"{"consistency_tolerance": "1.5"}"#);
    assert!(ConversionConfig::from_json_file(config_file.path()).is_err());
}

#[test]
fn test_authoring_validator_over_loaded_snapshot() {
    let snapshot = standard_snapshot();
    let (registry, _) = snapshot.build().unwrap();
    let validator = RuleAuthoringValidator::new(Arc::new(registry), &ConversionConfig::default());

    validator
        .check_global_rule_set(&snapshot.global_rules)
        .unwrap();

    // L -> 瓶 已隐含 2；新增 2 一致，新增 3 矛盾
    let consistent = ConversionRule::new("L", "瓶", dec!(2), UnitCategory::Volume);
    validator
        .check_global_rule(&snapshot.global_rules, &consistent)
        .unwrap();

    let conflicting = ConversionRule::new("L", "瓶", dec!(3), UnitCategory::Volume);
    let err = validator
        .check_global_rule(&snapshot.global_rules, &conflicting)
        .unwrap_err();
    assert_eq!(err.kind(), ConversionErrorKind::CircularReferenceConflict);

    for rule in &snapshot.material_rules {
        validator.check_material_rule(rule).unwrap();
    }
}
