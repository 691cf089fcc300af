//! Config provider contract
//!
//! A [`ConfigProvider`] exposes a tree of keys and values through
//! [`Address`]es that are resolved against a fixed base key. The required
//! methods work on already-resolved addresses; the provided methods accept
//! relative references as plain strings and are what most callers use:
//!
//! ```rust
//! use regcfg::{ConfigProvider, MemoryStore, RegistryConfigProvider};
//! use std::sync::Arc;
//!
//! # fn main() -> regcfg::Result<()> {
//! let config = RegistryConfigProvider::parse(
//!     Arc::new(MemoryStore::new()),
//!     "registry://HKEY_CURRENT_USER/Software/Vendor/App/",
//! )?;
//!
//! config.set_value("Window/Width", 1280u32)?;
//! assert_eq!(config.get_value("Window/Width", 0u32)?, 1280);
//! assert_eq!(config.get_value("Window/Height", 720u32)?, 720);
//! # Ok(())
//! # }
//! ```

mod registry;

pub use registry::RegistryConfigProvider;

use crate::address::Address;
use crate::error::Result;
use crate::value::{FromRegValue, IntoRegValue};

/// Read/write access to a tree of keys and values addressed by URI
pub trait ConfigProvider {
    /// The key every relative reference is resolved against
    fn base_address(&self) -> &Address;

    /// Addresses of the direct children of the key at `address`
    ///
    /// Sub-keys come first (with a trailing `/`), then values, each group in
    /// store order.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidPath` - `address` denotes a value
    /// * `Error::ContainerNotFound` - the key does not exist
    fn children_of(&self, address: &Address) -> Result<Vec<Address>>;

    /// Read the value at `address`, or `default` when the key or value is absent
    ///
    /// # Errors
    ///
    /// * `Error::InvalidPath` - `address` denotes a key
    /// * `Error::TypeMismatch` - the stored value is not a `T`
    fn value_at<T: FromRegValue>(&self, address: &Address, default: T) -> Result<T>;

    /// Write the value at `address`, creating its key when needed
    ///
    /// # Errors
    ///
    /// * `Error::InvalidPath` - `address` denotes a key
    fn set_value_at<T: IntoRegValue>(&self, address: &Address, value: T) -> Result<()>;

    /// Resolve a relative (or absolute) reference against the base address
    ///
    /// # Errors
    ///
    /// Returns `Error::AddressParse` if `reference` is malformed.
    fn resolve(&self, reference: &str) -> Result<Address> {
        self.base_address().join(reference)
    }

    /// Children of the key at `path` (relative to the base address)
    ///
    /// # Errors
    ///
    /// See [`children_of`](Self::children_of).
    fn children(&self, path: &str) -> Result<Vec<Address>> {
        let address = self.resolve(path)?;
        self.children_of(&address)
    }

    /// Children of the base key itself
    ///
    /// # Errors
    ///
    /// See [`children_of`](Self::children_of).
    fn children_at_base(&self) -> Result<Vec<Address>> {
        self.children(".")
    }

    /// Read the value at `path`, or `default` when absent
    ///
    /// # Errors
    ///
    /// See [`value_at`](Self::value_at).
    fn get_value<T: FromRegValue>(&self, path: &str, default: T) -> Result<T> {
        let address = self.resolve(path)?;
        self.value_at(&address, default)
    }

    /// Read the value at `path`, or `T::default()` when absent
    ///
    /// # Errors
    ///
    /// See [`value_at`](Self::value_at).
    fn get_value_or_default<T: FromRegValue + Default>(&self, path: &str) -> Result<T> {
        self.get_value(path, T::default())
    }

    /// Write the value at `path`
    ///
    /// # Errors
    ///
    /// See [`set_value_at`](Self::set_value_at).
    fn set_value<T: IntoRegValue>(&self, path: &str, value: T) -> Result<()> {
        let address = self.resolve(path)?;
        self.set_value_at(&address, value)
    }
}
