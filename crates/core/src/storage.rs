//! Image file storage.
//!
//! Uploaded images are written under one directory with a generated unique
//! name and referenced from records by their public URL
//! (`{base}/uploads/{name}`). [`FileStore`] is the seam the HTTP layer
//! talks to; [`LocalFileStore`] is the filesystem implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Extensions accepted for uploaded images (lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// URL path segment under which stored files are served.
pub const UPLOADS_PATH: &str = "uploads";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unsupported image format '.{0}'. Supported: .jpg, .jpeg, .png, .gif, .webp")]
    UnsupportedExtension(String),

    #[error("Invalid stored file name '{0}'")]
    InvalidName(String),

    #[error("File storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent storage for uploaded image files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Create the storage location if it does not exist.
    async fn ensure_dir(&self) -> Result<(), StorageError>;

    /// Store `data` under a newly generated unique name and return that name.
    ///
    /// The extension is taken from `original_name` and must be one of
    /// [`ALLOWED_IMAGE_EXTENSIONS`].
    async fn store(&self, data: &[u8], original_name: &str) -> Result<String, StorageError>;

    /// Delete a stored file. Deleting a file that does not exist succeeds.
    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}

/// Stores files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn store(&self, data: &[u8], original_name: &str) -> Result<String, StorageError> {
        if data.is_empty() {
            return Err(StorageError::Empty);
        }
        let ext = image_extension(original_name)?;
        let name = format!("{}.{ext}", uuid::Uuid::new_v4().simple());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&name), data).await?;
        Ok(name)
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lowercase extension of `original_name`, if it is an allowed image type.
pub fn image_extension(original_name: &str) -> Result<String, StorageError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::UnsupportedExtension(ext))
    }
}

/// Reject names that could escape the storage directory.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Public URL of a stored file.
///
/// # Examples
///
/// ```
/// use yarnstash_core::storage::public_url;
/// assert_eq!(
///     public_url("http://localhost:3000/", "abc.png"),
///     "http://localhost:3000/uploads/abc.png"
/// );
/// ```
pub fn public_url(base_url: &str, name: &str) -> String {
    format!("{}/{UPLOADS_PATH}/{name}", base_url.trim_end_matches('/'))
}

/// Stored file name referenced by an image URL: its last path segment,
/// ignoring any query string or fragment. `None` for URLs without one.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let name = path.rsplit('/').next().unwrap_or("");
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

/// Outcome of a best-effort image deletion.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The referenced file was removed (or was already gone).
    Deleted(String),
    /// The URL did not name a file.
    Skipped,
    /// Removing the file failed; the caller decides whether to log it.
    Failed { file: String, error: String },
}

/// Delete the file an image URL points to, never failing the caller.
pub async fn remove_image(store: &dyn FileStore, url: &str) -> CleanupOutcome {
    let Some(name) = file_name_from_url(url) else {
        return CleanupOutcome::Skipped;
    };
    match store.delete(name).await {
        Ok(()) => CleanupOutcome::Deleted(name.to_string()),
        Err(e) => CleanupOutcome::Failed {
            file: name.to_string(),
            error: e.to_string(),
        },
    }
}
