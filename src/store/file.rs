//! File-backed store: one JSON document per root
//!
//! Layout below the configured directory:
//!
//! ```text
//! <root_dir>/registry/HKEY_CURRENT_USER.json
//! <root_dir>/registry32/HKEY_LOCAL_MACHINE.json
//! ```
//!
//! Documents are read on every handle operation and rewritten atomically on
//! every mutation; nothing is cached between calls.

use super::node::KeyNode;
use super::{Key, KeyPath, RegistryStore, RootKey};
use crate::config::FileStoreConfig;
use crate::error::{Error, Result};
use crate::selector::{Hive, View};
use crate::storage::{JsonStorage, StorageBackend};
use crate::value::RegValue;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct HiveDocument {
    format_version: u32,
    hive: Hive,
    view: View,
    #[serde(default, with = "time::serde::rfc3339::option")]
    modified: Option<OffsetDateTime>,
    #[serde(default)]
    root: KeyNode,
}

impl HiveDocument {
    fn empty(hive: Hive, view: View) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            hive,
            view,
            modified: None,
            root: KeyNode::default(),
        }
    }
}

/// Hierarchical store persisted as JSON documents
pub struct FileStore {
    root_dir: PathBuf,
    storage: JsonStorage,
    hives: HashSet<Hive>,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store from a full configuration
    #[must_use]
    pub fn new(config: FileStoreConfig) -> Self {
        debug!("Opening file store at {}", config.root_dir.display());
        Self {
            root_dir: config.root_dir,
            storage: config.storage,
            hives: config.hives.into_iter().collect(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store rooted at `dir` with default settings
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStoreConfig::builder("regcfg").root_dir(dir).build())
    }

    /// Directory holding the hive documents
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path of the document backing `hive` under `view`
    #[must_use]
    pub fn document_path(&self, hive: Hive, view: View) -> PathBuf {
        self.root_dir
            .join(view.as_token())
            .join(format!("{}.{}", hive.as_token(), self.storage.extension()))
    }

    fn load(&self, hive: Hive, view: View) -> Result<HiveDocument> {
        let path = self.document_path(hive, view);
        let Some(doc) = self.storage.read::<HiveDocument>(&path)? else {
            return Ok(HiveDocument::empty(hive, view));
        };

        if doc.format_version > FORMAT_VERSION {
            return Err(Error::Parse(format!(
                "{}: unsupported format version {}",
                path.display(),
                doc.format_version
            )));
        }
        if doc.hive != hive || doc.view != view {
            warn!(
                "{} declares {}://{}, expected {}://{}",
                path.display(),
                doc.view,
                doc.hive,
                view,
                hive
            );
        }
        Ok(doc)
    }

    fn save(&self, mut doc: HiveDocument) -> Result<()> {
        doc.modified = Some(OffsetDateTime::now_utc());
        doc.format_version = FORMAT_VERSION;
        self.storage.write(&self.document_path(doc.hive, doc.view), &doc)
    }

    /// Load, mutate and save one document while holding the write lock
    fn update<T>(
        &self,
        hive: Hive,
        view: View,
        f: impl FnOnce(&mut KeyNode) -> Result<(T, bool)>,
    ) -> Result<T> {
        let _guard = self.lock()?;
        let mut doc = self.load(hive, view)?;
        let (result, dirty) = f(&mut doc.root)?;
        if dirty {
            self.save(doc)?;
        }
        Ok(result)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        match self.write_lock.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                // The guarded data is `()`; documents on disk are replaced atomically
                warn!("File store lock was poisoned, recovering");
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl RegistryStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn open_root(&self, hive: Hive, view: View) -> Result<Box<dyn RootKey + '_>> {
        if !self.hives.contains(&hive) {
            return Err(Error::UnknownRoot(hive.to_string()));
        }
        Ok(Box::new(FileRoot {
            store: self,
            hive,
            view,
        }))
    }
}

struct FileRoot<'a> {
    store: &'a FileStore,
    hive: Hive,
    view: View,
}

impl FileRoot<'_> {
    fn key(&self, path: &KeyPath) -> Box<dyn Key + '_> {
        Box::new(FileKey {
            store: self.store,
            hive: self.hive,
            view: self.view,
            path: path.clone(),
        })
    }
}

impl RootKey for FileRoot<'_> {
    fn open_key(&self, path: &KeyPath) -> Result<Option<Box<dyn Key + '_>>> {
        let doc = self.store.load(self.hive, self.view)?;
        Ok(doc
            .root
            .find(path.segments())
            .is_some()
            .then(|| self.key(path)))
    }

    fn create_key(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>> {
        self.store.update(self.hive, self.view, |root| {
            let (_, created) = root.find_or_create(path.segments());
            Ok(((), created))
        })?;
        Ok(self.key(path))
    }

    fn delete_key_tree(&self, path: &KeyPath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidKeyName {
                name: String::new(),
                reason: "cannot delete a root key".into(),
            });
        }
        self.store.update(self.hive, self.view, |root| {
            let removed = root.remove(path.segments());
            Ok(((), removed))
        })
    }
}

struct FileKey<'a> {
    store: &'a FileStore,
    hive: Hive,
    view: View,
    path: KeyPath,
}

impl FileKey<'_> {
    fn with_node<T>(&self, f: impl FnOnce(&KeyNode) -> T) -> Result<T> {
        let doc = self.store.load(self.hive, self.view)?;
        doc.root
            .find(self.path.segments())
            .map(f)
            .ok_or_else(|| Error::ContainerNotFound(self.path.to_string()))
    }
}

impl Key for FileKey<'_> {
    fn subkey_names(&self) -> Result<Vec<String>> {
        self.with_node(KeyNode::subkey_names)
    }

    fn value_names(&self) -> Result<Vec<String>> {
        self.with_node(KeyNode::value_names)
    }

    fn get_value(&self, name: &str) -> Result<Option<RegValue>> {
        self.with_node(|node| node.value(name).cloned())
    }

    fn set_value(&self, name: &str, value: RegValue) -> Result<()> {
        self.store.update(self.hive, self.view, |root| {
            let node = root
                .find_mut(self.path.segments())
                .ok_or_else(|| Error::ContainerNotFound(self.path.to_string()))?;
            node.set_value(name, value);
            Ok(((), true))
        })
    }
}
