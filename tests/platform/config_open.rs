//! Opening an engine from a config directory

use crate::common::*;
use std::time::Duration;

#[test]
fn open_writes_default_config() {
    let (canopy, dir) = opened();
    assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    assert_eq!(canopy.config(), &EngineConfig::default());
}

#[test]
fn open_respects_existing_config() {
    init_tracing();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "request_timeout_ms = 750\n",
    )
    .unwrap();

    let canopy = Canopy::open(Store::in_memory(), dir.path()).unwrap();
    assert_eq!(canopy.config().request_timeout(), Duration::from_millis(750));
}

#[test]
fn open_rejects_invalid_config() {
    init_tracing();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "request_timeout_ms = 0\n").unwrap();

    let err = Canopy::open(Store::in_memory(), dir.path()).unwrap_err();
    assert!(matches!(err, canopy::CanopyError::InvalidInput(_)));
}

#[test]
fn closed_store_fails_operations() {
    let canopy = ephemeral();
    canopy.close().unwrap();
    let err = canopy
        .catalog()
        .create_instance(&Instance::new("late"))
        .unwrap_err();
    assert!(err.is_storage());
    assert!(err.to_string().contains("instance.create"));
}
