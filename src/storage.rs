//! Document format used by the file-backed store

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Trait for document format implementations
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this format (e.g., "json")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and deserialize a document, `None` if the file does not exist
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match std::fs::read_to_string(path) {
            Ok(content) => self.deserialize(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Serialize and write a document
    ///
    /// Writes to a sibling temp file and renames it over `path`, so readers
    /// only ever see a complete document. The parent directory is created
    /// when missing.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent() {
            ensure_private_dir(parent)?;
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;
        restrict_file(&temp_path)?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// JSON document format (default)
#[derive(Debug, Clone)]
pub struct JsonStorage {
    pretty: bool,
}

impl JsonStorage {
    /// JSON with pretty printing
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// JSON without pretty printing
    #[must_use]
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(data).map_err(Error::from)
        } else {
            serde_json::to_string(data).map_err(Error::from)
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Create `path` (and parents), owner-only on Unix
fn ensure_private_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    set_mode(path, 0o700)?;

    Ok(())
}

fn restrict_file(path: &Path) -> Result<()> {
    #[cfg(unix)]
    set_mode(path, 0o600)?;

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        name: String,
        value: u32,
    }

    #[test]
    fn test_json_pretty_and_compact() {
        let doc = Doc {
            name: "k".into(),
            value: 1,
        };

        assert!(JsonStorage::new().serialize(&doc).unwrap().contains('\n'));
        assert!(!JsonStorage::compact().serialize(&doc).unwrap().contains('\n'));
    }

    #[test]
    fn test_write_creates_parent_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry/HKEY_USERS.json");
        let doc = Doc {
            name: "hello".into(),
            value: 123,
        };

        JsonStorage::new().write(&path, &doc).unwrap();
        let loaded: Option<Doc> = JsonStorage::new().read(&path).unwrap();

        assert_eq!(loaded, Some(doc));
        assert!(!path.with_file_name("HKEY_USERS.json.tmp").exists());
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded: Option<Doc> = JsonStorage::new().read(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_garbage_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<Doc>> = JsonStorage::new().read(&path);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("private/doc.json");
        JsonStorage::compact()
            .write(&path, &Doc {
                name: "s".into(),
                value: 0,
            })
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
