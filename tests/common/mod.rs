//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use regcfg::{
    FileStore, FileStoreConfig, Hive, KeyPath, MemoryStore, RegValue, RegistryConfigProvider,
    RegistrySettings, RegistryStore, View,
};
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Test Constants
// =============================================================================

/// Key every test works below, relative to `HKEY_CURRENT_USER`
pub const TEST_KEY_PATH: &str = r"Software\Regcfg\UnitTest\Config";

/// The same key as an address
pub const TEST_KEY_URI: &str = "registry://HKEY_CURRENT_USER/Software/Regcfg/UnitTest/Config/";

pub const SEEDED_KEYS: [&str; 3] = ["Key1", "Key2", "Key3"];
pub const SEEDED_VALUES: [(&str, u32); 3] = [("Value1", 1), ("Value2", 2), ("Value3", 3)];

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// A store with `Key1..Key3` and `Value1..Value3` seeded at [`TEST_KEY_PATH`]
pub struct TestFixture {
    pub store: Arc<dyn RegistryStore>,
    temp_dir: Option<TempDir>,
}

impl TestFixture {
    /// Seeded in-memory store
    pub fn memory() -> Self {
        init_logging();
        let fixture = Self {
            store: Arc::new(MemoryStore::new()),
            temp_dir: None,
        };
        fixture.seed();
        fixture
    }

    /// Seeded JSON-file store in a fresh temporary directory
    pub fn file() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = FileStoreConfig::builder("regcfg-test")
            .root_dir(temp_dir.path())
            .build();
        let fixture = Self {
            store: Arc::new(FileStore::new(config)),
            temp_dir: Some(temp_dir),
        };
        fixture.seed();
        fixture
    }

    /// One fixture per bundled backend
    pub fn all() -> Vec<Self> {
        vec![Self::memory(), Self::file()]
    }

    /// Directory of the file store, if this fixture has one
    pub fn dir(&self) -> Option<&std::path::Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    fn seed(&self) {
        let base = KeyPath::parse(TEST_KEY_PATH).unwrap();
        let root = self.store.open_root(Hive::CurrentUser, View::Default).unwrap();
        root.delete_key_tree(&base).unwrap();

        for name in SEEDED_KEYS {
            root.create_key(&base.join(name).unwrap()).unwrap();
        }
        let key = root.create_key(&base).unwrap();
        for (name, value) in SEEDED_VALUES {
            key.set_value(name, RegValue::Dword(value)).unwrap();
        }
    }

    /// Raw value at `TEST_KEY_PATH\sub_path`, bypassing the accessors
    pub fn raw_value(&self, sub_path: &str, name: &str) -> Option<RegValue> {
        let path = KeyPath::parse(TEST_KEY_PATH).unwrap().join(sub_path).unwrap();
        let root = self.store.open_root(Hive::CurrentUser, View::Default).unwrap();
        let key = root.open_key(&path).unwrap()?;
        key.get_value(name).unwrap()
    }

    pub fn provider(&self) -> RegistryConfigProvider {
        RegistryConfigProvider::parse(Arc::clone(&self.store), TEST_KEY_URI).unwrap()
    }

    pub fn settings(&self) -> RegistrySettings {
        RegistrySettings::new(
            Arc::clone(&self.store),
            Hive::CurrentUser,
            View::Default,
            TEST_KEY_PATH,
        )
        .unwrap()
    }
}
