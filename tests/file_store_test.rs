//! File Store Integration Tests
//!
//! Persistence behavior of the JSON-file backend:
//! - Data written through one store instance is visible to the next
//! - One document per view and hive
//! - Corrupted and foreign documents

mod common;

use common::{TEST_KEY_PATH, TEST_KEY_URI, TestFixture};
use regcfg::{
    ConfigProvider, Error, FileStore, FileStoreConfig, Hive, KeyPath, RegistryConfigProvider,
    RegistrySettings, RegistryStore, View,
};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn reopen(dir: &std::path::Path) -> Arc<dyn RegistryStore> {
    Arc::new(FileStore::open(dir))
}

#[test]
fn test_values_survive_reopen() {
    let fixture = TestFixture::file();
    let dir = fixture.dir().unwrap();
    fixture.provider().set_value("Saved/Port", 8080u32).unwrap();

    let provider = RegistryConfigProvider::parse(reopen(dir), TEST_KEY_URI).unwrap();
    assert_eq!(provider.get_value("Saved/Port", 0u32).unwrap(), 8080);
    assert_eq!(provider.get_value("Value1", 0u32).unwrap(), 1);
}

#[test]
fn test_one_document_per_view_and_hive() {
    let fixture = TestFixture::file();
    let dir = fixture.dir().unwrap();

    let provider = fixture.provider();
    provider
        .set_value("registry64://HKEY_LOCAL_MACHINE/Software/App/Flag", true)
        .unwrap();

    assert!(dir.join("registry").join("HKEY_CURRENT_USER.json").is_file());
    assert!(dir.join("registry64").join("HKEY_LOCAL_MACHINE.json").is_file());
    assert!(!dir.join("registry").join("HKEY_LOCAL_MACHINE.json").exists());
}

#[test]
fn test_document_is_readable_json() {
    let fixture = TestFixture::file();
    let path = fixture
        .dir()
        .unwrap()
        .join("registry")
        .join("HKEY_CURRENT_USER.json");

    let content = fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["format_version"], 1);
    assert_eq!(json["hive"], "HKEY_CURRENT_USER");
    assert_eq!(json["view"], "registry");
    assert!(json["modified"].is_string());
    assert_eq!(json["root"]["keys"][0]["name"], "Software");
    // Pretty-printed by default
    assert!(content.contains('\n'));
}

#[test]
fn test_compact_json() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(
        FileStoreConfig::builder("regcfg-test")
            .root_dir(temp_dir.path())
            .compact_json()
            .build(),
    );
    let path = store.document_path(Hive::Users, View::Default);

    let settings =
        RegistrySettings::new(Arc::new(store), Hive::Users, View::Default, "Compact").unwrap();
    settings.set_value("A", 1u32, None).unwrap();

    let content = fs::read_to_string(path).unwrap();
    assert!(!content.trim_end().contains('\n'));
}

#[test]
fn test_restricted_hives() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(
        FileStoreConfig::builder("regcfg-test")
            .root_dir(temp_dir.path())
            .with_hives([Hive::CurrentUser])
            .build(),
    );

    assert!(store.open_root(Hive::CurrentUser, View::Default).is_ok());
    assert!(matches!(
        store.open_root(Hive::LocalMachine, View::Default),
        Err(Error::UnknownRoot(_))
    ));
}

#[test]
fn test_corrupted_document() {
    let fixture = TestFixture::file();
    let path = fixture
        .dir()
        .unwrap()
        .join("registry")
        .join("HKEY_CURRENT_USER.json");
    fs::write(&path, "{ not json").unwrap();

    let settings = fixture.settings();
    assert!(matches!(settings.has_key(""), Err(Error::Parse(_))));
    assert!(matches!(
        settings.get_value("Value1", None, 0u32),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_delete_key_tree_persists() {
    let fixture = TestFixture::file();
    let root = fixture
        .store
        .open_root(Hive::CurrentUser, View::Default)
        .unwrap();
    root.delete_key_tree(&KeyPath::parse(TEST_KEY_PATH).unwrap().join("Key2").unwrap())
        .unwrap();

    let settings = RegistrySettings::new(
        reopen(fixture.dir().unwrap()),
        Hive::CurrentUser,
        View::Default,
        TEST_KEY_PATH,
    )
    .unwrap();
    assert_eq!(settings.subkey_names(None).unwrap(), ["Key1", "Key3"]);
}

#[test]
fn test_concurrent_writers_on_one_store() {
    let fixture = TestFixture::file();
    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let settings = fixture.settings();
            thread::spawn(move || {
                for j in 0..5u32 {
                    settings
                        .set_value(&format!("T{i}V{j}"), i * 10 + j, Some("Threads"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let settings = fixture.settings();
    assert_eq!(settings.value_names(Some("Threads")).unwrap().len(), 20);
    assert_eq!(settings.get_value("T3V4", Some("Threads"), 0u32).unwrap(), 34);
}
