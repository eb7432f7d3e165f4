//! Tests for loading settings from TOML.

use std::io::Write;
use tempfile::NamedTempFile;
use tiktag::{OccupiedPolicy, Settings};

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(text.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    let settings = Settings::from_file(file.path()).expect("Load failed");
    assert_eq!(settings, Settings::default());
    assert_eq!(*settings.port(), 2323);
    assert_eq!(*settings.channel_capacity(), 1);
    assert_eq!(*settings.occupied_policy(), OccupiedPolicy::Toggle);
    assert!(*settings.release_slot_on_disconnect());
}

#[test]
fn test_fields_override_defaults() {
    let file = write_config(
        r#"
host = "0.0.0.0"
port = 4000
channel_capacity = 8
occupied_policy = "reject"
release_slot_on_disconnect = false
name_limit = 12
idle_timeout_secs = 300
"#,
    );
    let settings = Settings::from_file(file.path()).expect("Load failed");
    assert_eq!(settings.host(), "0.0.0.0");
    assert_eq!(*settings.port(), 4000);
    assert_eq!(*settings.channel_capacity(), 8);
    assert_eq!(*settings.occupied_policy(), OccupiedPolicy::Reject);
    assert!(!*settings.release_slot_on_disconnect());
    assert_eq!(*settings.name_limit(), 12);
    assert_eq!(*settings.idle_timeout_secs(), Some(300));
}

#[test]
fn test_zero_capacity_rejected() {
    let err = Settings::from_toml("channel_capacity = 0").unwrap_err();
    assert!(err.message.contains("channel_capacity"));
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(Settings::from_toml("port = \"high\"").is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings =
        Settings::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_cli_overrides() {
    let settings = Settings::default()
        .with_address(Some("10.0.0.1".into()), None)
        .with_channel_capacity(0);
    assert_eq!(settings.host(), "10.0.0.1");
    assert_eq!(*settings.port(), 2323);
    assert_eq!(*settings.channel_capacity(), 1);
}
