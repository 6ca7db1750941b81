//! Tests for configuration file loading and graceful degradation
//!
//! - Missing TOML file SHALL NOT cause termination
//! - Missing config → defaults, reported through ConfigSource
//! - Present but malformed config → error

use blog_common::config::{BlogConfig, ConfigSource};
use blog_common::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let (config, source) = BlogConfig::load_or_default(Some(&path)).unwrap();

    assert!(source.is_defaults());
    assert!(source.to_string().contains("not found"));
    assert_eq!(config.port, 5000);
    assert_eq!(config.chat.intents_path, PathBuf::from("data/intents.json"));
}

#[test]
fn test_loads_full_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
host = "0.0.0.0"
port = 7070
database_path = "/var/lib/blog/blog.db"

[chat]
intents_path = "/etc/blog/intents.json"
artifacts_dir = "/var/lib/blog/artifacts"

[posts]
strict_update_version = true

[logging]
level = "debug"
"#
    )
    .unwrap();

    let (config, source) = BlogConfig::load_or_default(Some(&path)).unwrap();

    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 7070);
    assert_eq!(config.database_path, PathBuf::from("/var/lib/blog/blog.db"));
    assert_eq!(config.chat.intents_path, PathBuf::from("/etc/blog/intents.json"));
    assert_eq!(config.chat.artifacts_dir, PathBuf::from("/var/lib/blog/artifacts"));
    assert!(config.posts.strict_update_version);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = [1, 2").unwrap();

    let result = BlogConfig::load_or_default(Some(&path));

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_empty_file_is_all_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let (config, _) = BlogConfig::load_or_default(Some(&path)).unwrap();

    assert_eq!(config.bind_address(), "127.0.0.1:5000");
}

#[test]
fn test_sample_config_matches_defaults() {
    let sample = include_str!("../../config/blog.toml");
    let config = BlogConfig::from_toml_str(sample).unwrap();
    let defaults = BlogConfig::default();

    assert_eq!(config.bind_address(), defaults.bind_address());
    assert_eq!(config.database_path, defaults.database_path);
    assert_eq!(config.chat.artifacts_dir, defaults.chat.artifacts_dir);
    assert_eq!(config.posts.strict_update_version, defaults.posts.strict_update_version);
    assert_eq!(config.logging.level, defaults.logging.level);
}
