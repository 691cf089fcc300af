//! In-memory store backend (not persisted)

use super::node::KeyNode;
use super::{Key, KeyPath, RegistryStore, RootKey};
use crate::error::{Error, Result};
use crate::selector::{Hive, View};
use crate::value::RegValue;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Partitions = HashMap<(Hive, View), KeyNode>;

/// Process-local hierarchical store
///
/// Every `(Hive, View)` pair is an independent tree. Handles hold no lock
/// between calls; each handle operation takes the store lock once.
pub struct MemoryStore {
    hives: HashSet<Hive>,
    partitions: RwLock<Partitions>,
}

impl MemoryStore {
    /// A store providing every hive
    #[must_use]
    pub fn new() -> Self {
        Self::with_hives(Hive::ALL)
    }

    /// A store providing only the given hives
    #[must_use]
    pub fn with_hives(hives: impl IntoIterator<Item = Hive>) -> Self {
        Self {
            hives: hives.into_iter().collect(),
            partitions: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Partitions>> {
        self.partitions.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Partitions>> {
        self.partitions.write().map_err(|_| Error::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn open_root(&self, hive: Hive, view: View) -> Result<Box<dyn RootKey + '_>> {
        if !self.hives.contains(&hive) {
            return Err(Error::UnknownRoot(hive.to_string()));
        }
        Ok(Box::new(MemoryRoot {
            store: self,
            partition: (hive, view),
        }))
    }
}

struct MemoryRoot<'a> {
    store: &'a MemoryStore,
    partition: (Hive, View),
}

impl RootKey for MemoryRoot<'_> {
    fn open_key(&self, path: &KeyPath) -> Result<Option<Box<dyn Key + '_>>> {
        let partitions = self.store.read()?;
        let exists = match partitions.get(&self.partition) {
            Some(root) => root.find(path.segments()).is_some(),
            // An untouched partition still has its root key
            None => path.is_root(),
        };

        Ok(exists.then(|| {
            Box::new(MemoryKey {
                store: self.store,
                partition: self.partition,
                path: path.clone(),
            }) as Box<dyn Key + '_>
        }))
    }

    fn create_key(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>> {
        let mut partitions = self.store.write()?;
        let (_, created) = partitions
            .entry(self.partition)
            .or_default()
            .find_or_create(path.segments());
        if created {
            log::trace!("Created key {}\\{}", self.partition.0, path);
        }

        Ok(Box::new(MemoryKey {
            store: self.store,
            partition: self.partition,
            path: path.clone(),
        }))
    }

    fn delete_key_tree(&self, path: &KeyPath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidKeyName {
                name: String::new(),
                reason: "cannot delete a root key".into(),
            });
        }

        let mut partitions = self.store.write()?;
        if let Some(root) = partitions.get_mut(&self.partition) {
            root.remove(path.segments());
        }
        Ok(())
    }
}

struct MemoryKey<'a> {
    store: &'a MemoryStore,
    partition: (Hive, View),
    path: KeyPath,
}

impl MemoryKey<'_> {
    fn with_node<T>(&self, f: impl FnOnce(&KeyNode) -> T) -> Result<T> {
        let partitions = self.store.read()?;
        let empty = KeyNode::default();
        let root = partitions.get(&self.partition).unwrap_or(&empty);
        root.find(self.path.segments())
            .map(f)
            .ok_or_else(|| Error::ContainerNotFound(self.path.to_string()))
    }
}

impl Key for MemoryKey<'_> {
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
        let mut partitions = self.store.write()?;
        let node = partitions
            .get_mut(&self.partition)
            .and_then(|root| root.find_mut(self.path.segments()));

        match node {
            Some(node) => {
                node.set_value(name, value);
                Ok(())
            }
            // A missing partition only happens for the root key
            None if self.path.is_root() => {
                partitions
                    .entry(self.partition)
                    .or_default()
                    .set_value(name, value);
                Ok(())
            }
            None => Err(Error::ContainerNotFound(self.path.to_string())),
        }
    }
}
