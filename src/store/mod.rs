//! Hierarchical store abstraction
//!
//! The addressing layer never talks to a concrete store directly. It goes
//! through three handle traits that mirror how a registry is used:
//!
//! - [`RegistryStore`] opens a root for a `(Hive, View)` pair
//! - [`RootKey`] opens, creates or deletes keys below that root
//! - [`Key`] enumerates and reads/writes one key
//!
//! Handles borrow from the store and are released when dropped, so every
//! operation acquires exactly what it needs and lets go on every exit path.
//!
//! Two backends ship with the crate: [`MemoryStore`] and [`FileStore`].

mod file;
mod memory;
mod node;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use crate::selector::{Hive, View};
use crate::value::RegValue;
use std::fmt;

/// Longest key name segment accepted by [`KeyPath`]
pub const MAX_KEY_NAME_LEN: usize = 255;

/// Entry point of a hierarchical store
pub trait RegistryStore: Send + Sync {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Open the root key of `hive` as seen through `view`
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRoot`] if the backend does not provide the hive.
    fn open_root(&self, hive: Hive, view: View) -> Result<Box<dyn RootKey + '_>>;
}

/// An opened root key
pub trait RootKey {
    /// Open an existing key, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn open_key(&self, path: &KeyPath) -> Result<Option<Box<dyn Key + '_>>>;

    /// Open a key, creating it and any missing ancestors
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn create_key(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>>;

    /// Delete a key with all of its descendants; a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write, or if `path` is the root.
    fn delete_key_tree(&self, path: &KeyPath) -> Result<()>;
}

/// An opened key (container)
pub trait Key {
    /// Names of direct sub-keys, in store order
    ///
    /// # Errors
    ///
    /// Returns an error if the key was deleted after it was opened.
    fn subkey_names(&self) -> Result<Vec<String>>;

    /// Names of values held directly by this key, in store order
    ///
    /// # Errors
    ///
    /// Returns an error if the key was deleted after it was opened.
    fn value_names(&self) -> Result<Vec<String>>;

    /// Read a value, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the key was deleted after it was opened.
    fn get_value(&self, name: &str) -> Result<Option<RegValue>>;

    /// Write a value, replacing any previous value and type
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn set_value(&self, name: &str, value: RegValue) -> Result<()>;
}

/// Plain, segment-based key path below a root
///
/// Parsing accepts both `\` and `/` as separators and drops empty segments,
/// so `Software\Vendor`, `Software/Vendor/` and `\Software\\Vendor` are the
/// same path. No percent-decoding or dot-segment handling happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The root key itself
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a plain path
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if a segment is too long.
    pub fn parse(path: &str) -> Result<Self> {
        Self::from_segments(path.split(['\\', '/']).filter(|s| !s.is_empty()))
    }

    /// Build a path from individual segments
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if a segment is empty, contains a
    /// separator, or is too long.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .map(|segment| validate_segment(&segment).map(|()| segment))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// Append a relative plain path; an empty `relative` returns `self` unchanged
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if `relative` has an invalid segment.
    pub fn join(&self, relative: &str) -> Result<Self> {
        let tail = Self::parse(relative)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// Append an optional relative path
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if `relative` has an invalid segment.
    pub fn join_opt(&self, relative: Option<&str>) -> Result<Self> {
        match relative {
            Some(relative) if !relative.is_empty() => self.join(relative),
            _ => Ok(self.clone()),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("\\"))
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    let reason = if segment.is_empty() {
        "key name must not be empty"
    } else if segment.contains(['\\', '/']) {
        "key name must not contain a path separator"
    } else if segment.chars().count() > MAX_KEY_NAME_LEN {
        "key name is longer than 255 characters"
    } else {
        return Ok(());
    };

    Err(Error::InvalidKeyName {
        name: segment.to_string(),
        reason: reason.into(),
    })
}
