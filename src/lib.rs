//! # regcfg - URI-addressed registry configuration
//!
//! A configuration layer over a hierarchical, registry-style key/value
//! store. Keys and values are addressed by URI, relative to a base key:
//!
//! ```text
//! registry://HKEY_CURRENT_USER/Software/Vendor/App/     <- a key (trailing '/')
//! registry://HKEY_CURRENT_USER/Software/Vendor/App/Port <- a value
//! ```
//!
//! The scheme selects the store view (`registry`, `registry32`,
//! `registry64`) and the authority selects the hive (`HKEY_CURRENT_USER`,
//! `HKEY_LOCAL_MACHINE`, ...).
//!
//! ## Features
//!
//! - **Config Provider**: list children, read and write typed values by relative URI
//! - **Settings Accessor**: plain-path navigation (`Software\Vendor\App`) with scoped sub-keys
//! - **Typed Values**: explicit, fallible conversion between stored values and Rust types
//! - **Pluggable Stores**: in-memory and JSON-file backends behind one trait
//!
//! ## Quick Start
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
//! config.set_value("Port", 8080u32)?;
//! config.set_value("Network/Host", "localhost")?;
//!
//! let children: Vec<String> = config
//!     .children(".")?
//!     .iter()
//!     .filter_map(|child| child.relative_to(config.base_address()))
//!     .collect();
//! assert_eq!(children, ["Network/", "Port"]);
//!
//! assert_eq!(config.get_value("Port", 0u32)?, 8080);
//! assert_eq!(config.get_value("Timeout", 30u32)?, 30);
//! # Ok(())
//! # }
//! ```
//!
//! ## Plain-Path Settings
//!
//! ```rust
//! use regcfg::{MemoryStore, RegistrySettings};
//! use std::sync::Arc;
//!
//! # fn main() -> regcfg::Result<()> {
//! let settings = RegistrySettings::for_app(
//!     Arc::new(MemoryStore::new()),
//!     r"Software\Vendor\App",
//!     true,  // per user
//!     false, // default view
//! )?;
//!
//! settings.set_value("Width", 1280u32, Some("Window"))?;
//! let window = settings.open_key("Window")?;
//! assert_eq!(window.get_value("Width", None, 0u32)?, 1280);
//! assert!(settings.subkey_names(Some("Missing"))?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Persistent Store
//!
//! ```rust,no_run
//! use regcfg::{FileStore, FileStoreConfig, RegistryConfigProvider, Hive, View};
//! use std::sync::Arc;
//!
//! # fn main() -> regcfg::Result<()> {
//! let store = FileStore::new(
//!     FileStoreConfig::builder("my-app")
//!         .root_dir("~/.config/my-app/registry")
//!         .build(),
//! );
//! let config = RegistryConfigProvider::for_key(
//!     Arc::new(store),
//!     Hive::CurrentUser,
//!     View::Default,
//!     r"Software\Vendor\App",
//! )?;
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

mod address;
mod error;
mod provider;
mod selector;
mod settings;
mod value;

pub mod config;
pub mod storage;
pub mod store;

pub use address::Address;
pub use config::{FileStoreConfig, FileStoreConfigBuilder};
pub use error::{Error, Result};
pub use provider::{ConfigProvider, RegistryConfigProvider};
pub use selector::{Hive, View};
pub use settings::RegistrySettings;
pub use storage::{JsonStorage, StorageBackend};
pub use store::{FileStore, Key, KeyPath, MemoryStore, RegistryStore, RootKey};
pub use value::{FromRegValue, IntoRegValue, RegValue};
