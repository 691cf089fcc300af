//! Config provider backed by a hierarchical registry store

use super::ConfigProvider;
use crate::address::{Address, is_dot_segment};
use crate::error::{Error, Result};
use crate::selector::{Hive, View};
use crate::store::{KeyPath, RegistryStore};
use crate::value::{FromRegValue, IntoRegValue, coerce};
use log::{debug, trace, warn};
use std::fmt;
use std::sync::Arc;

/// Resolves addresses against a base key and drives a [`RegistryStore`]
///
/// The provider holds no handles between calls: every operation opens the
/// root and key it needs and drops them before returning.
#[derive(Clone)]
pub struct RegistryConfigProvider {
    store: Arc<dyn RegistryStore>,
    base: Address,
}

impl RegistryConfigProvider {
    /// Create a provider rooted at `base`, which must address a key
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseAddress`] if `base` addresses a value.
    pub fn new(store: Arc<dyn RegistryStore>, base: Address) -> Result<Self> {
        if !base.is_container() {
            return Err(Error::InvalidBaseAddress {
                address: base.to_string(),
                reason: "the base address must point to a key (end with '/')".into(),
            });
        }

        debug!("Config provider over '{}' store at {base}", store.name());
        Ok(Self { store, base })
    }

    /// Create a provider from a base address string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseAddress`] if `base` does not parse or
    /// addresses a value.
    pub fn parse(store: Arc<dyn RegistryStore>, base: &str) -> Result<Self> {
        let address = Address::parse(base).map_err(|e| Error::InvalidBaseAddress {
            address: base.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(store, address)
    }

    /// Create a provider rooted at the plain key path `base_path`
    ///
    /// # Example
    ///
    /// ```rust
    /// use regcfg::{ConfigProvider, Hive, MemoryStore, RegistryConfigProvider, View};
    /// use std::sync::Arc;
    ///
    /// let config = RegistryConfigProvider::for_key(
    ///     Arc::new(MemoryStore::new()),
    ///     Hive::CurrentUser,
    ///     View::Default,
    ///     r"Software\Vendor\App",
    /// )?;
    /// assert_eq!(
    ///     config.base_address().as_str(),
    ///     "registry://HKEY_CURRENT_USER/Software/Vendor/App/"
    /// );
    /// # Ok::<(), regcfg::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if `base_path` has an invalid segment.
    pub fn for_key(
        store: Arc<dyn RegistryStore>,
        hive: Hive,
        view: View,
        base_path: &str,
    ) -> Result<Self> {
        let path = KeyPath::parse(base_path)?;
        Self::new(store, Address::for_key(hive, view, &path)?)
    }

    /// The backing store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    /// Split a value address into its containing key and the value name
    fn split_value(address: &Address) -> Result<(KeyPath, String)> {
        if address.is_container() {
            return Err(Error::invalid_path(address, "the path must point to a value"));
        }
        let name = address.leaf_name();
        if name.is_empty() {
            return Err(Error::invalid_path(address, "the value name is empty"));
        }
        Ok((address.key_path()?, name))
    }
}

impl ConfigProvider for RegistryConfigProvider {
    fn base_address(&self) -> &Address {
        &self.base
    }

    fn children_of(&self, address: &Address) -> Result<Vec<Address>> {
        if !address.is_container() {
            return Err(Error::invalid_path(address, "the path must point to a key"));
        }
        let (hive, view) = address.coordinate()?;
        let path = address.key_path()?;
        trace!("Listing children of {address}");

        let root = self.store.open_root(hive, view)?;
        let key = root
            .open_key(&path)?
            .ok_or_else(|| Error::ContainerNotFound(address.to_string()))?;

        let subkeys = key.subkey_names()?;
        let values = key.value_names()?;

        // The unnamed default value has no leaf address of its own
        subkeys
            .iter()
            .filter(|name| addressable(address, name))
            .map(|name| address.child(name, true))
            .chain(
                values
                    .iter()
                    .filter(|name| !name.is_empty() && addressable(address, name))
                    .map(|name| address.child(name, false)),
            )
            .collect()
    }

    fn value_at<T: FromRegValue>(&self, address: &Address, default: T) -> Result<T> {
        let (path, name) = Self::split_value(address)?;
        let (hive, view) = address.coordinate()?;
        trace!("Reading {address}");

        let root = self.store.open_root(hive, view)?;
        let Some(key) = root.open_key(&path)? else {
            return Ok(default);
        };

        match key.get_value(&name)? {
            Some(value) if !value.is_none() => coerce(address.as_str(), value),
            _ => Ok(default),
        }
    }

    fn set_value_at<T: IntoRegValue>(&self, address: &Address, value: T) -> Result<()> {
        let (path, name) = Self::split_value(address)?;
        let (hive, view) = address.coordinate()?;
        let value = value.into_reg_value();
        debug!("Writing {address} ({})", value.kind());

        let root = self.store.open_root(hive, view)?;
        let key = root.create_key(&path)?;
        key.set_value(&name, value)
    }
}

fn addressable(parent: &Address, name: &str) -> bool {
    if is_dot_segment(name) {
        warn!("Skipping '{name}' below {parent}: not addressable");
        return false;
    }
    true
}

impl fmt::Debug for RegistryConfigProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfigProvider")
            .field("store", &self.store.name())
            .field("base", &self.base.as_str())
            .finish()
    }
}
