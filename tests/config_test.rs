use std::io::Write;

use mapprobe::config::{OutputFormat, ProbeConfig};
use mapprobe::{DuplicatePolicy, IterationOrder, MissPolicy, ProbeError, ValueType};

#[test]
fn test_config_default() {
    let config = ProbeConfig::new();
    assert_eq!(config, ProbeConfig::default());
    assert_eq!(config.miss_policy, MissPolicy::ExplicitSignal);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWins);
    assert_eq!(config.order, IterationOrder::Randomized);
    assert_eq!(config.format, OutputFormat::Text);
    assert!(config.seed.is_none());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "miss_policy": "default-on-miss",
            "duplicate_policy": "reject",
            "order": "sorted",
            "passes": 7,
            "value_type": "string",
            "format": "json",
            "seed": 99
        }}"#
    )
    .unwrap();

    let config = ProbeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.miss_policy, MissPolicy::DefaultOnMiss);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    assert_eq!(config.order, IterationOrder::Sorted);
    assert_eq!(config.passes, 7);
    assert_eq!(config.value_type, ValueType::String);
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(config.seed, Some(99));
}

#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProbeConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ProbeError::Config(_)));
}

#[test]
fn test_config_bad_policy_value() {
    let err = ProbeConfig::from_json_str(r#"{"duplicate_policy": "middle-wins"}"#).unwrap_err();
    assert_eq!(err.code(), "invalid-config");
}

#[test]
fn test_output_format_description() {
    assert_eq!(OutputFormat::Text.to_string(), "Plain text");
    assert_eq!(OutputFormat::Json.to_string(), "JSON");
}
