//! Plain-path settings accessor
//!
//! [`RegistrySettings`] is the low-level sibling of the config provider: it
//! is bound to one hive and view and navigates with plain key paths such as
//! `Software\Vendor\App`, without any URI encoding. Absence is never an
//! error here; missing keys list as empty and missing values read as the
//! supplied default.

use crate::error::Result;
use crate::selector::{Hive, View};
use crate::store::{KeyPath, RegistryStore};
use crate::value::{FromRegValue, IntoRegValue, coerce};
use log::{debug, trace};
use std::fmt;
use std::sync::Arc;

/// Scoped accessor for one key of a store
#[derive(Clone)]
pub struct RegistrySettings {
    store: Arc<dyn RegistryStore>,
    hive: Hive,
    view: View,
    base_path: KeyPath,
}

impl RegistrySettings {
    /// Create an accessor rooted at `base_path` under `hive`/`view`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyName` if `base_path` has an invalid segment.
    pub fn new(
        store: Arc<dyn RegistryStore>,
        hive: Hive,
        view: View,
        base_path: &str,
    ) -> Result<Self> {
        let base_path = KeyPath::parse(base_path)?;
        debug!("Settings over '{}' store at {hive}\\{base_path} ({view})", store.name());
        Ok(Self {
            store,
            hive,
            view,
            base_path,
        })
    }

    /// Create an accessor for application settings
    ///
    /// `per_user` selects `HKEY_CURRENT_USER` instead of `HKEY_LOCAL_MACHINE`;
    /// `force_32bit` selects the 32-bit view instead of the default one.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyName` if `base_path` has an invalid segment.
    pub fn for_app(
        store: Arc<dyn RegistryStore>,
        base_path: &str,
        per_user: bool,
        force_32bit: bool,
    ) -> Result<Self> {
        let hive = if per_user {
            Hive::CurrentUser
        } else {
            Hive::LocalMachine
        };
        let view = if force_32bit {
            View::Registry32
        } else {
            View::Default
        };
        Self::new(store, hive, view, base_path)
    }

    #[must_use]
    pub fn hive(&self) -> Hive {
        self.hive
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn base_path(&self) -> &KeyPath {
        &self.base_path
    }

    /// A new accessor scoped to the sub-key `name`; touches nothing
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyName` if `name` has an invalid segment.
    pub fn open_key(&self, name: &str) -> Result<Self> {
        Ok(Self {
            store: Arc::clone(&self.store),
            hive: self.hive,
            view: self.view,
            base_path: self.base_path.join(name)?,
        })
    }

    /// Whether the key at `path` (relative to the base) exists
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails.
    pub fn has_key(&self, path: &str) -> Result<bool> {
        let path = self.base_path.join(path)?;
        let root = self.store.open_root(self.hive, self.view)?;
        let exists = root.open_key(&path)?.is_some();
        Ok(exists)
    }

    /// Names of the sub-keys of the base key (or of `sub_path` below it)
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails.
    pub fn subkey_names(&self, sub_path: Option<&str>) -> Result<Vec<String>> {
        let path = self.base_path.join_opt(sub_path)?;
        let root = self.store.open_root(self.hive, self.view)?;
        let Some(key) = root.open_key(&path)? else {
            return Ok(Vec::new());
        };
        key.subkey_names()
    }

    /// Names of the values of the base key (or of `sub_path` below it)
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails.
    pub fn value_names(&self, sub_path: Option<&str>) -> Result<Vec<String>> {
        let path = self.base_path.join_opt(sub_path)?;
        let root = self.store.open_root(self.hive, self.view)?;
        let Some(key) = root.open_key(&path)? else {
            return Ok(Vec::new());
        };
        key.value_names()
    }

    /// Read the value `name`, or `default` if the key or value is missing
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the stored value is not a `T`.
    pub fn get_value<T: FromRegValue>(
        &self,
        name: &str,
        sub_path: Option<&str>,
        default: T,
    ) -> Result<T> {
        let path = self.base_path.join_opt(sub_path)?;
        trace!("Reading {}\\{path}\\{name}", self.hive);

        let root = self.store.open_root(self.hive, self.view)?;
        let Some(key) = root.open_key(&path)? else {
            return Ok(default);
        };

        match key.get_value(name)? {
            Some(value) if !value.is_none() => coerce(name, value),
            _ => Ok(default),
        }
    }

    /// Write the value `name`, creating the key if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to create the key or write the value.
    pub fn set_value<T: IntoRegValue>(
        &self,
        name: &str,
        value: T,
        sub_path: Option<&str>,
    ) -> Result<()> {
        let path = self.base_path.join_opt(sub_path)?;
        let value = value.into_reg_value();
        debug!("Writing {}\\{path}\\{name} ({})", self.hive, value.kind());

        let root = self.store.open_root(self.hive, self.view)?;
        let key = root.create_key(&path)?;
        key.set_value(name, value)
    }
}

impl fmt::Debug for RegistrySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrySettings")
            .field("store", &self.store.name())
            .field("hive", &self.hive)
            .field("view", &self.view)
            .field("base_path", &self.base_path.to_string())
            .finish()
    }
}
