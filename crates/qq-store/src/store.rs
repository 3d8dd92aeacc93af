//! Dataset file storage with XDG path support.
//!
//! The dataset is stored as JSON at `~/.local/share/qq/dataset.json`.
//!
//! Both synchronous and asynchronous I/O methods are provided:
//! - `save()`, `load()` - Synchronous methods using `std::fs`
//! - `save_async()`, `load_async()` - Asynchronous methods using `tokio::fs`

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::Dataset;

/// Default dataset filename.
const DATASET_FILENAME: &str = "dataset.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "qq";

/// Errors that can occur during dataset storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read dataset file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write dataset file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file delete.
    #[error("failed to delete dataset file '{path}': {source}")]
    DeleteError {
        /// The path that failed to delete.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for dataset store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent storage for a [`Dataset`].
///
/// File operations are not synchronized; concurrent `save()` calls from
/// several processes may interleave. Writes go through a temp file and a
/// rename so a crash never leaves a half-written dataset.
///
/// # Example
///
/// ```no_run
/// use qq_store::{Dataset, DatasetStore};
///
/// let store = DatasetStore::new()?;
/// let dataset = store.load_or_default()?;
/// store.save(&dataset)?;
/// # Ok::<(), qq_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatasetStore {
    /// Path to the dataset file.
    path: PathBuf,
}

impl DatasetStore {
    /// Creates a new `DatasetStore` with the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a new `DatasetStore` with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG path for the dataset file.
    ///
    /// On Unix: `~/.local/share/qq/dataset.json`
    /// On macOS: `~/Library/Application Support/qq/dataset.json`
    /// On Windows: `C:\Users\<User>\AppData\Roaming\qq\data\dataset.json`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StoreError::NoDataDir)?;

        Ok(project_dirs.data_dir().join(DATASET_FILENAME))
    }

    /// Returns the path to the dataset file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns true if the dataset file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the dataset from disk.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` if the file cannot be read.
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub fn load(&self) -> Result<Dataset> {
        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let dataset: Dataset = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "loaded dataset");
        Ok(dataset)
    }

    /// Loads the dataset from disk, returning an empty dataset if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` for I/O errors other than "file not found".
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub fn load_or_default(&self) -> Result<Dataset> {
        match self.load() {
            Ok(dataset) => Ok(dataset),
            Err(StoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(Dataset::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the dataset to disk atomically.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `StoreError::WriteError` if the file cannot be written.
    /// - Returns `StoreError::Json` if serialization fails.
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(dataset)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "saved dataset");
        Ok(())
    }

    /// Deletes the dataset file from disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DeleteError` if the file cannot be deleted.
    /// Does not return an error if the file doesn't exist.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Loads the dataset from disk asynchronously.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` if the file cannot be read.
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub async fn load_async(&self) -> Result<Dataset> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads the dataset asynchronously, returning an empty dataset if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` for I/O errors other than "file not found".
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub async fn load_or_default_async(&self) -> Result<Dataset> {
        match self.load_async().await {
            Ok(dataset) => Ok(dataset),
            Err(StoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(Dataset::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the dataset to disk asynchronously using atomic write.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `StoreError::WriteError` if the file cannot be written.
    /// - Returns `StoreError::Json` if serialization fails.
    pub async fn save_async(&self, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(dataset)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| StoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_returns_xdg_path() {
        let path = DatasetStore::default_path().expect("should get default path");
        let path_str = path.to_string_lossy();

        assert!(
            path_str.ends_with("dataset.json"),
            "path should end with dataset.json: {}",
            path_str
        );
        assert!(path_str.contains("qq"), "path should contain 'qq': {}", path_str);
        assert!(path.is_absolute(), "path should be absolute: {:?}", path);
    }

    #[test]
    fn test_with_custom_path() {
        let custom_path = PathBuf::from("/tmp/test/dataset.json");
        let store = DatasetStore::with_path(custom_path.clone());
        assert_eq!(store.path(), &custom_path);
    }

    #[test]
    fn test_read_error_includes_file_path() {
        use std::error::Error;

        let store = DatasetStore::with_path(PathBuf::from("/nonexistent/path/dataset.json"));
        let error = store.load().unwrap_err();
        let message = error.to_string();

        assert!(
            message.contains("/nonexistent/path/dataset.json"),
            "error should include file path: {}",
            message
        );
        assert!(message.contains("failed to read dataset file"));
        assert!(error.source().is_some(), "error should have a source io::Error");
    }

    #[test]
    fn test_load_or_default_for_not_found() {
        let store = DatasetStore::with_path(PathBuf::from("/nonexistent/path/dataset.json"));
        let dataset = store.load_or_default().expect("missing file is not an error");
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_write_error_when_parent_is_a_file() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("failed to create temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "blocking").expect("failed to create blocker file");

        let store = DatasetStore::with_path(blocker.join("subdir").join("dataset.json"));
        let error = store.save(&Dataset::new()).unwrap_err();
        assert!(
            matches!(error, StoreError::CreateDirError { .. }),
            "expected CreateDirError, got {error:?}"
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("dataset.json");
        fs::write(&path, "{not json").expect("failed to write file");

        let error = DatasetStore::with_path(path).load().unwrap_err();
        assert!(matches!(error, StoreError::Json(_)));
    }
}
