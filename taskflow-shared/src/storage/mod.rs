/// File storage backend
///
/// Documents reference files held by a storage backend behind the
/// [`FileStorage`] trait. [`LocalStorage`] keeps files under a media root
/// on the local filesystem; a remote backend (e.g. an object store) can
/// implement the same trait and return `None` from [`FileStorage::local_path`]
/// so directory pruning is skipped.
///
/// Stored paths are always relative to the storage root and generated by
/// [`document_path`], which buckets files by upload date and prefixes a
/// timestamp plus a random component so names never collide.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::storage::{document_path, FileStorage, LocalStorage};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = LocalStorage::new("/var/lib/taskflow/media");
///
/// let path = document_path("notes.pdf", Utc::now());
/// storage.store(&path, b"file content").await?;
/// storage.delete(&path).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying filesystem error
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path escapes the storage root or is otherwise malformed
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

/// Storage backend contract
///
/// Paths are relative to the backend's root. Implementations must be safe
/// to share across tasks.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes `content` at `path`, creating parent directories as needed
    async fn store(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Reads the content stored at `path`
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Removes the file stored at `path`
    ///
    /// Local backends also prune directories left empty by the removal,
    /// stopping at the storage root.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Absolute filesystem path for `path`, or None for non-local backends
    fn local_path(&self, path: &str) -> Option<PathBuf>;
}

/// Local-filesystem storage rooted at a media directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates a local storage backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStorage { root: root.into() }
    }

    /// Storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path against the root, rejecting escapes
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);

        if rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        }) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn store(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full, content).await?;

        debug!(path = %full.display(), bytes = content.len(), "Stored file");
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        let content = tokio::fs::read(&full).await?;
        Ok(content)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full).await?;

        debug!(path = %full.display(), "Deleted stored file");

        if let Some(parent) = full.parent() {
            cleanup_empty_dirs(parent, &self.root);
        }

        Ok(())
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        self.resolve(path).ok()
    }
}

/// Generates a unique stored path for an uploaded document
///
/// Format: `documents/YYYY_MM_DD/YYYYMMDD_HHMMSS_<uuid8>_<file-name>`.
/// Files are bucketed by upload date and prefixed so two uploads of the
/// same file name never collide. Any directory components in `file_name`
/// are stripped.
pub fn document_path(file_name: &str, now: DateTime<Utc>) -> String {
    // Keep only the final path component of the client-supplied name
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("unnamed");

    let date_folder = now.format("%Y_%m_%d");
    let stamp = now.format("%Y%m%d_%H%M%S");
    let unique = Uuid::new_v4().simple().to_string();

    format!(
        "documents/{}/{}_{}_{}",
        date_folder,
        stamp,
        &unique[..8],
        base_name
    )
}

/// Removes directories left empty after a file deletion
///
/// Walks upward from `dir` removing each empty directory, stopping at the
/// first non-empty directory or at `root`. The storage root itself is
/// never removed. All errors are swallowed; pruning is best-effort.
fn cleanup_empty_dirs(dir: &Path, root: &Path) {
    let mut current = dir.to_path_buf();

    while current != root && current.starts_with(root) && current.exists() {
        let is_empty = match std::fs::read_dir(&current) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => break,
        };

        if !is_empty {
            break;
        }

        if std::fs::remove_dir(&current).is_err() {
            break;
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_document_path_format() {
        let path = document_path("notes.pdf", fixed_now());

        assert!(path.starts_with("documents/2025_06_01/20250601_123045_"));
        assert!(path.ends_with("_notes.pdf"));
    }

    #[test]
    fn test_document_path_unique() {
        let a = document_path("notes.pdf", fixed_now());
        let b = document_path("notes.pdf", fixed_now());

        // Same name, same second, different random component
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_path_strips_directories() {
        let path = document_path("../../etc/passwd", fixed_now());
        assert!(path.ends_with("_passwd"));
        assert!(!path.contains(".."));

        let windows = document_path("C:\\Users\\me\\notes.pdf", fixed_now());
        assert!(windows.ends_with("_notes.pdf"));
    }

    #[test]
    fn test_document_path_empty_name() {
        let path = document_path("", fixed_now());
        assert!(path.ends_with("_unnamed"));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let storage = LocalStorage::new("/tmp/media");

        assert!(storage.resolve("documents/a.txt").is_ok());
        assert!(storage.resolve("../outside.txt").is_err());
        assert!(storage.resolve("/etc/passwd").is_err());
    }

    #[tokio::test]
    async fn test_store_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .store("documents/2025_06_01/a.txt", b"hello")
            .await
            .unwrap();

        let content = storage.read("documents/2025_06_01/a.txt").await.unwrap();
        assert_eq!(content, b"hello");

        storage.delete("documents/2025_06_01/a.txt").await.unwrap();
        assert!(storage.read("documents/2025_06_01/a.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_prunes_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .store("documents/2025_06_01/only.txt", b"x")
            .await
            .unwrap();
        storage.delete("documents/2025_06_01/only.txt").await.unwrap();

        // Both the date bucket and the documents folder were left empty
        assert!(!dir.path().join("documents/2025_06_01").exists());
        assert!(!dir.path().join("documents").exists());

        // The storage root itself survives
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn test_delete_stops_at_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .store("documents/2025_06_01/a.txt", b"a")
            .await
            .unwrap();
        storage
            .store("documents/2025_06_02/b.txt", b"b")
            .await
            .unwrap();

        storage.delete("documents/2025_06_01/a.txt").await.unwrap();

        // The emptied date bucket goes away, but documents/ still holds
        // the other bucket
        assert!(!dir.path().join("documents/2025_06_01").exists());
        assert!(dir.path().join("documents/2025_06_02/b.txt").exists());
        assert!(dir.path().join("documents").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let result = storage.delete("documents/nope.txt").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_local_path() {
        let storage = LocalStorage::new("/srv/media");

        let full = storage.local_path("documents/a.txt").unwrap();
        assert_eq!(full, PathBuf::from("/srv/media/documents/a.txt"));

        assert!(storage.local_path("../escape.txt").is_none());
    }
}
