//! Tests for the settings store
//!
//! These tests verify:
//! - Save/load of the last-used config
//! - Missing file handling
//! - Corruption and truncation detection

use std::fs;

use linktcp::config::{ConnectionConfig, Role};
use linktcp::settings::{SettingsStore, HEADER_SIZE};
use linktcp::LinkError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, SettingsStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("settings.bin"));
    (temp_dir, store)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_load_missing_file_returns_none() {
    let (_temp, store) = setup_temp_store();

    assert!(store.load().unwrap().is_none());
    assert_eq!(store.load_or_default(), ConnectionConfig::default());
}

#[test]
fn test_save_then_load() {
    let (_temp, store) = setup_temp_store();
    let config = ConnectionConfig::client("192.168.1.40", 9000);

    store.save(&config).unwrap();

    assert_eq!(store.load().unwrap(), Some(config));
}

#[test]
fn test_save_overwrites_previous_config() {
    let (_temp, store) = setup_temp_store();

    store.save(&ConnectionConfig::client("first", 1)).unwrap();
    store.save(&ConnectionConfig::server(7000)).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.role, Role::Server);
    assert_eq!(loaded.port, 7000);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::new(temp_dir.path().join("nested/deeper/settings.bin"));

    store.save(&ConnectionConfig::default()).unwrap();

    assert!(store.path().exists());
}

#[test]
fn test_save_leaves_no_temp_file() {
    let (temp, store) = setup_temp_store();

    store.save(&ConnectionConfig::default()).unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_clear_is_idempotent() {
    let (_temp, store) = setup_temp_store();
    store.save(&ConnectionConfig::default()).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();

    assert!(store.load().unwrap().is_none());
}

// =============================================================================
// Corruption Detection Tests
// =============================================================================

#[test]
fn test_flipped_payload_byte_detected() {
    let (_temp, store) = setup_temp_store();
    store.save(&ConnectionConfig::client("10.0.0.1", 8080)).unwrap();

    let mut bytes = fs::read(store.path()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(store.path(), &bytes).unwrap();

    assert!(matches!(store.load(), Err(LinkError::Settings(_))));
    assert_eq!(store.load_or_default(), ConnectionConfig::default());
}

#[test]
fn test_truncated_file_detected() {
    let (_temp, store) = setup_temp_store();
    store.save(&ConnectionConfig::client("10.0.0.1", 8080)).unwrap();

    let bytes = fs::read(store.path()).unwrap();
    fs::write(store.path(), &bytes[..bytes.len() - 2]).unwrap();

    assert!(matches!(store.load(), Err(LinkError::Settings(_))));
}

#[test]
fn test_short_header_detected() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), vec![0u8; HEADER_SIZE - 1]).unwrap();

    assert!(matches!(store.load(), Err(LinkError::Settings(_))));
}
