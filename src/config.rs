//! Configuration for the file-backed store

use crate::selector::Hive;
use crate::storage::JsonStorage;
use std::path::PathBuf;

/// Configuration for initializing a [`FileStore`](crate::FileStore)
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Directory holding one sub-directory per view
    pub root_dir: PathBuf,

    /// Document format
    pub storage: JsonStorage,

    /// Hives the store will open; others fail with `UnknownRoot`
    pub hives: Vec<Hive>,
}

impl FileStoreConfig {
    /// Create a new builder for `FileStoreConfig`
    ///
    /// # Example
    /// ```rust
    /// use regcfg::FileStoreConfig;
    ///
    /// let config = FileStoreConfig::builder("my-app")
    ///     .root_dir("~/.config/my-app/registry")
    ///     .build();
    /// ```
    pub fn builder(app_name: impl Into<String>) -> FileStoreConfigBuilder {
        FileStoreConfigBuilder::new(app_name)
    }
}

/// Builder for creating `FileStoreConfig` with a fluent API
#[derive(Debug, Clone)]
pub struct FileStoreConfigBuilder {
    app_name: String,
    root_dir: Option<PathBuf>,
    pretty_json: bool,
    hives: Vec<Hive>,
}

impl FileStoreConfigBuilder {
    /// Create a new builder; `app_name` picks the default directory
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            root_dir: None,
            pretty_json: true,
            hives: Hive::ALL.to_vec(),
        }
    }

    /// Set the store directory
    ///
    /// Supports `~` expansion for home directory.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path,
        };
        self.root_dir = Some(expanded);
        self
    }

    /// Use compact JSON (no pretty printing)
    #[must_use]
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    /// Restrict the hives the store provides
    #[must_use]
    pub fn with_hives(mut self, hives: impl IntoIterator<Item = Hive>) -> Self {
        self.hives = hives.into_iter().collect();
        self
    }

    /// Build the `FileStoreConfig`
    ///
    /// Without an explicit `root_dir`, uses `<system config dir>/<app_name>/registry`.
    #[must_use]
    pub fn build(self) -> FileStoreConfig {
        let root_dir = self.root_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("registry")
        });

        let storage = if self.pretty_json {
            JsonStorage::new()
        } else {
            JsonStorage::compact()
        };

        FileStoreConfig {
            root_dir,
            storage,
            hives: self.hives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = FileStoreConfig::builder("test-app").build();

        assert!(config.root_dir.ends_with("registry"));
        assert_eq!(config.hives.len(), Hive::ALL.len());
    }

    #[test]
    fn test_builder_with_options() {
        let config = FileStoreConfig::builder("my-app")
            .root_dir("/tmp/my-app")
            .compact_json()
            .with_hives([Hive::CurrentUser])
            .build();

        assert_eq!(config.root_dir, PathBuf::from("/tmp/my-app"));
        assert_eq!(config.hives, vec![Hive::CurrentUser]);
    }

    #[test]
    fn test_tilde_expansion() {
        let config = FileStoreConfig::builder("my-app").root_dir("~/reg").build();

        match dirs::home_dir() {
            Some(home) => assert_eq!(config.root_dir, home.join("reg")),
            None => assert_eq!(config.root_dir, PathBuf::from("~/reg")),
        }
    }
}
