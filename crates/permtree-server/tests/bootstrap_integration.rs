//! Bootstrap Integration Tests.
//!
//! Load configuration and an inventory snapshot from disk, then query
//! through the handler the same way the `permtree` binary does.

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use permtree_server::{build_handler, AppConfig, BootstrapError};

const INVENTORY: &str = r#"{
    "nodes": [
        {"id": "root", "key": "1", "value": "Default"},
        {"id": "db", "key": "1:1", "value": "Databases"}
    ],
    "assets": [{"id": "pg-01", "hostname": "pg-01", "nodes": ["1:1"]}],
    "groups": ["dba"],
    "users": [{"id": "dana", "groups": ["dba"]}],
    "permissions": [
        {"id": "p1", "user_groups": ["dba"], "nodes": ["db"], "system_users": {"postgres": "CONNECT"}}
    ]
}"#;

fn snapshot_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(INVENTORY.as_bytes()).unwrap();
    file
}

#[tokio::test]
#[serial]
async fn test_snapshot_path_from_config_file() {
    let snapshot = snapshot_file();
    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        "storage:\n  snapshot_path: \"{}\"\ncache:\n  enabled: true\n",
        snapshot.path().display()
    )
    .unwrap();

    let config = AppConfig::load(config_file.path()).unwrap();
    let handler = build_handler(&config, None).unwrap();

    let assets = handler.granted_assets("user:dana").await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].hostname, "pg-01");

    // Second call goes through the enabled cache and agrees.
    let again = handler.granted_assets("user:dana").await.unwrap();
    assert_eq!(assets, again);
}

#[tokio::test]
#[serial]
async fn test_cli_snapshot_overrides_config() {
    let snapshot = snapshot_file();
    let mut config = AppConfig::default();
    config.storage.snapshot_path = Some("/nonexistent/inventory.json".to_string());

    let handler = build_handler(&config, Some(snapshot.path())).unwrap();
    let users = handler
        .asset_system_users("group:dba", "pg-01")
        .await
        .unwrap();
    assert_eq!(users[0].actions, vec!["connect"]);
}

#[test]
#[serial]
fn test_missing_snapshot_is_reported() {
    let config = AppConfig::default();
    let err = build_handler(&config, None).err().unwrap();
    assert!(matches!(err, BootstrapError::MissingSnapshot));

    let mut config = AppConfig::default();
    config.storage.snapshot_path = Some("/nonexistent/inventory.json".to_string());
    let err = build_handler(&config, None).err().unwrap();
    assert!(matches!(err, BootstrapError::Storage(_)));
}
