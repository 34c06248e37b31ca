//! Config file load and update through `YamlConfigStore`.
//!
//! Every test points `STUDIOCTL_CONFIG` at a temp file and runs serially
//! because the variable is process-wide.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use serial_test::serial;
use studioctl::application::ports::ConfigStore;
use studioctl::application::services::config_service::{load_config, set_value};
use studioctl::domain::{ConfigError, StudioConfig};
use studioctl::infra::config::{CONFIG_ENV, YamlConfigStore};
use tempfile::TempDir;

fn temp_config() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("config.yaml");
    // SAFETY: every caller is #[serial], so no other thread reads the env.
    // set_var is needed because YamlConfigStore::path() reads STUDIOCTL_CONFIG.
    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    (dir, path)
}

#[test]
#[serial]
fn test_missing_file_loads_defaults() {
    let (_dir, _path) = temp_config();
    assert_eq!(load_config(&YamlConfigStore).unwrap(), StudioConfig::default());
}

#[test]
#[serial]
fn test_path_follows_env_override() {
    let (_dir, path) = temp_config();
    assert_eq!(YamlConfigStore.path().unwrap(), path);
}

#[test]
#[serial]
fn test_set_value_persists_and_reloads() {
    let (_dir, path) = temp_config();

    let updated = set_value(&YamlConfigStore, "regions", "eu-west-1, us-east-1").unwrap();
    assert_eq!(updated.regions, ["eu-west-1", "us-east-1"]);
    assert!(path.exists());

    set_value(&YamlConfigStore, "poll.max_attempts", "20").unwrap();
    let reloaded = load_config(&YamlConfigStore).unwrap();
    assert_eq!(reloaded.regions, ["eu-west-1", "us-east-1"]);
    assert_eq!(reloaded.poll.max_attempts, 20);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config();
    set_value(&YamlConfigStore, "cache.enabled", "false").unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn test_unknown_key_is_rejected_without_writing() {
    let (_dir, path) = temp_config();
    let err = set_value(&YamlConfigStore, "security.level", "strict").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownKey { .. })
    ));
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_bad_value_keeps_previous_config() {
    let (_dir, _path) = temp_config();
    set_value(&YamlConfigStore, "retry.max_attempts", "5").unwrap();
    assert!(set_value(&YamlConfigStore, "retry.max_attempts", "0").is_err());
    assert_eq!(load_config(&YamlConfigStore).unwrap().retry.max_attempts, 5);
}

#[test]
#[serial]
fn test_unparseable_file_is_an_error() {
    let (_dir, path) = temp_config();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "regions: [unterminated").unwrap();
    assert!(load_config(&YamlConfigStore).is_err());
}
