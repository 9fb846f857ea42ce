//! Atomic JSON/TOML file operations.
//!
//! Provides a thin layer for safe access to a single persisted document:
//! the history array, the account list, or `config.toml`.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use qrtrail_core::QrError;

/// On-disk format of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn name(&self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// The file exists but its content does not parse.
    ParseError { format: FileFormat, message: String },
    /// Serialization failed on save.
    SerializeError { format: FileFormat, message: String },
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageError::ParseError { format, message } => {
                write!(f, "{} parse error: {}", format.name(), message)
            }
            StorageError::SerializeError { format, message } => {
                write!(f, "{} serialization error: {}", format.name(), message)
            }
            StorageError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl StorageError {
    /// Converts into the domain error, naming the persisted source for
    /// parse failures.
    pub fn into_qr_error(self, source_name: &str) -> QrError {
        match self {
            StorageError::IoError(e) => QrError::from(e),
            StorageError::ParseError { message, .. } => {
                QrError::persistence_parse(source_name, message)
            }
            StorageError::SerializeError { format, message } => QrError::Serialization {
                format: format.name().to_string(),
                message,
            },
            StorageError::LockError(message) => QrError::io(message),
        }
    }
}

/// A handle to a single-document file with atomic replacement.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: `update` holds an exclusive lock across read-modify-write
/// - **Durability**: Explicit fsync before rename
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            format: self.format,
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        self.parse(&content).map(Some)
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let serialized = self.serialize(data)?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serialized.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` receives the current document (`None` if the file does not
    /// exist) and returns the document to write.
    pub fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(Option<T>) -> T,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let current = self.load()?;
        let next = f(current);
        self.save(&next)
    }

    /// Deletes the file. Missing files are not an error.
    pub fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn parse(&self, content: &str) -> Result<T, StorageError> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| StorageError::ParseError {
                format: self.format,
                message: e.to_string(),
            }),
            FileFormat::Toml => toml::from_str(content).map_err(|e| StorageError::ParseError {
                format: self.format,
                message: e.to_string(),
            }),
        }
    }

    fn serialize(&self, data: &T) -> Result<String, StorageError> {
        match self.format {
            FileFormat::Json => {
                serde_json::to_string_pretty(data).map_err(|e| StorageError::SerializeError {
                    format: self.format,
                    message: e.to_string(),
                })
            }
            FileFormat::Toml => {
                toml::to_string_pretty(data).map_err(|e| StorageError::SerializeError {
                    format: self.format,
                    message: e.to_string(),
                })
            }
        }
    }

    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The `.lock` file is left in place. Unlinking it while another handle
/// waits on it would let a third writer lock a fresh inode concurrently.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| StorageError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Vec<Counter>>::json(temp_dir.path().join("counters.json"));

        let data = vec![Counter {
            name: "a".to_string(),
            count: 1,
        }];
        file.save(&data).unwrap();

        assert_eq!(file.load().unwrap(), Some(data));
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::toml(temp_dir.path().join("nested").join("c.toml"));

        let data = Counter {
            name: "a".to_string(),
            count: 42,
        };
        file.save(&data).unwrap();

        assert_eq!(file.load().unwrap(), Some(data));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::json(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let file = AtomicFile::<Vec<Counter>>::json(path);
        let err = file.load().unwrap_err();
        assert!(matches!(err, StorageError::ParseError { format: FileFormat::Json, .. }));
        assert!(err.into_qr_error("counters").is_persistence_parse());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::json(temp_dir.path().join("c.json"));

        file.update(|current| {
            assert!(current.is_none());
            Counter {
                name: "c".to_string(),
                count: 10,
            }
        })
        .unwrap();

        file.update(|current| {
            let mut c = current.unwrap();
            c.count += 5;
            c
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(temp_dir.path().join("c.lock").exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.json");
        let file = AtomicFile::<Counter>::json(path.clone());

        file.save(&Counter {
            name: "c".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(!temp_dir.path().join(".c.json.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::json(temp_dir.path().join("c.json"));
        file.remove().unwrap();

        file.save(&Counter {
            name: "c".to_string(),
            count: 1,
        })
        .unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
    }
}
