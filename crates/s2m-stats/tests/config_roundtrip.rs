use std::fs;
use std::path::PathBuf;

use s2m_core::errors::S2mError;
use s2m_stats::config::{DEFAULT_DATA_DIR, DEFAULT_STAT_DIR};
use s2m_stats::serde::{from_yaml_slice, to_yaml_string};
use s2m_stats::{load_config, NamingConvention, RunConfig};
use tempfile::tempdir;

#[test]
fn defaults_match_the_documented_layout() {
    let config = RunConfig::default();
    assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    assert_eq!(config.stat_dir, PathBuf::from(DEFAULT_STAT_DIR));
    assert_eq!(config.naming, NamingConvention::Hyphenated);
    assert!(config.chatty);
    assert_eq!(config.log_level, "info");
}

#[test]
fn partial_yaml_fills_in_defaults() {
    let dir = tempdir().expect("tmp dir");
    let path = dir.path().join("run.yaml");
    fs::write(
        &path,
        "data_dir: /data/reports\nnaming: underscored\nchatty: false\n",
    )
    .expect("write config");
    let config = load_config(&path).expect("load");
    assert_eq!(config.data_dir, PathBuf::from("/data/reports"));
    assert_eq!(config.naming, NamingConvention::Underscored);
    assert!(!config.chatty);
    assert_eq!(config.stat_dir, PathBuf::from(DEFAULT_STAT_DIR));
    assert_eq!(config.log_level, "info");
}

#[test]
fn yaml_round_trips() {
    let config = RunConfig {
        log_level: "s2m_stats=debug".to_string(),
        ..RunConfig::for_dirs("/srv/reports", "/srv/stats")
    };
    let yaml = to_yaml_string(&config).expect("serialize");
    assert!(yaml.contains("naming: hyphenated"));
    let back: RunConfig = from_yaml_slice(yaml.as_bytes()).expect("deserialize");
    assert_eq!(back, config);
}

#[test]
fn unknown_convention_is_a_config_error() {
    let err = from_yaml_slice::<RunConfig>(b"naming: dotted\n").expect_err("bad naming");
    assert!(matches!(err, S2mError::Config(_)));
    let err = "dotted".parse::<NamingConvention>().expect_err("bad label");
    assert!(matches!(err, S2mError::Config(_)));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempdir().expect("tmp dir");
    let err = load_config(dir.path().join("absent.yaml")).expect_err("missing");
    assert_eq!(err.info().code, "config_read");
}
