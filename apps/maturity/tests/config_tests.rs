//! Tests for loading configuration files from disk.

#![allow(clippy::unwrap_used, clippy::panic)]

use maturity::{AppConfig, AppError};
use std::io::Write;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_from_file_reads_every_section() {
    let file = write_config(
        r#"
[server]
host = "0.0.0.0"
port = 9100
rate_limit = 0
cors_origins = ["https://escuela.example"]

[report]
top_critical_limit = 3

[report.level_thresholds]
consolidated = 90.0
advanced = 70.0
developing = 40.0
emerging = 10.0
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server.addr(), "0.0.0.0:9100");
    assert_eq!(config.server.rate_limit, 0);
    assert_eq!(config.server.cors_origins, ["https://escuela.example"]);
    assert_eq!(config.report.school_options().top_critical_limit, Some(3));
    assert_eq!(config.report.level_thresholds.advanced, 70.0);
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppConfig::from_file(&dir.path().join("maturity.toml"));
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_from_file_too_large() {
    let padding = format!("# {}\n", "x".repeat(1024));
    let file = write_config(&padding.repeat(1100));

    match AppConfig::from_file(file.path()) {
        Err(AppError::Config(message)) => assert!(message.contains("exceeds")),
        other => panic!("expected size error, got {:?}", other),
    }
}

#[test]
fn test_from_file_rejects_zero_body_limit() {
    let file = write_config("[server]\nbody_limit_bytes = 0\n");
    assert!(matches!(
        AppConfig::from_file(file.path()),
        Err(AppError::Config(_))
    ));
}

#[test]
fn test_load_prefers_explicit_path() {
    let file = write_config("[server]\nport = 9200\n");

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 9200);
}
