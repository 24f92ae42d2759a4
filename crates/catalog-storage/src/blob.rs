//! Content-addressable blob storage
//!
//! Layout:
//! ```text
//! {root}/
//! ├── default.jpg                 # placeholder served on read misses
//! ├── 2cf24dba…9824.jpg           # sha256(content) + ".jpg"
//! └── .staging-<uuid>             # in-flight uploads, renamed when sealed
//! ```

use std::path::{Component, Path, PathBuf};

use catalog_core::ImageRef;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::{Result, StorageError};

/// Read size used while hashing uploads.
const CHUNK_SIZE: usize = 64 * 1024;

/// Default name of the placeholder image inside the blob root.
pub const DEFAULT_PLACEHOLDER: &str = "default.jpg";

/// Outcome of resolving an image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlob {
    pub exists: bool,
    pub path: PathBuf,
}

/// Blob store for uploaded photos
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
    placeholder: String,
}

impl BlobStore {
    /// Open a blob store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let root = std::fs::canonicalize(&root)?;

        Ok(Self {
            root,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        })
    }

    /// Use a different placeholder file name (relative to the root).
    pub fn with_placeholder(mut self, name: impl Into<String>) -> Self {
        self.placeholder = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store content and return its image reference
    pub async fn put(&self, content: &[u8]) -> Result<ImageRef> {
        self.put_reader(content).await
    }

    /// Stream content into the store, hashing as it is written.
    ///
    /// Identical content always yields the same reference and a single file.
    pub async fn put_reader<R>(&self, reader: R) -> Result<ImageRef>
    where
        R: AsyncRead + Unpin,
    {
        let staging = self
            .root
            .join(format!(".staging-{}", uuid::Uuid::new_v4().simple()));

        let (digest, size) = match stage(reader, &staging).await {
            Ok(staged) => staged,
            Err(e) => {
                let _ = fs::remove_file(&staging).await;
                return Err(e);
            }
        };

        if size == 0 {
            fs::remove_file(&staging).await?;
            return Err(StorageError::EmptyInput);
        }

        let image = ImageRef::from_hex_digest(&digest)
            .map_err(|e| StorageError::Other(anyhow::anyhow!("bad digest {digest}: {e}")))?;
        let target = self.root.join(image.as_str());

        if fs::try_exists(&target).await? {
            debug!(image = %image, "blob already stored");
            fs::remove_file(&staging).await?;
        } else {
            // Concurrent writers of the same bytes race here; either rename wins
            // and the file content is identical.
            fs::rename(&staging, &target).await?;
            debug!(image = %image, size, "stored blob");
        }

        Ok(image)
    }

    /// Check whether the blob exists and where it lives.
    pub async fn resolve(&self, image: &ImageRef) -> Result<ResolvedBlob> {
        let path = self.root.join(image.as_str());
        let exists = fs::try_exists(&path).await?;
        if exists {
            self.ensure_contained(&fs::canonicalize(&path).await?)?;
        }
        Ok(ResolvedBlob { exists, path })
    }

    /// Validate a raw identifier (as stored in the items table) and resolve it.
    ///
    /// Only identifiers this store generates are accepted; anything else,
    /// including names that would leave the root, is `InvalidPath`.
    pub async fn locate(&self, name: &str) -> Result<(ImageRef, ResolvedBlob)> {
        let image = ImageRef::parse(name)
            .map_err(|e| StorageError::InvalidPath(format!("{name}: {e}")))?;
        self.ensure_contained(&self.root.join(image.as_str()))?;
        let resolved = self.resolve(&image).await?;
        Ok((image, resolved))
    }

    /// Retrieve content by reference
    pub async fn read(&self, image: &ImageRef) -> Result<Vec<u8>> {
        match fs::read(self.root.join(image.as_str())).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::BlobNotFound(image.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn placeholder_path(&self) -> PathBuf {
        self.root.join(&self.placeholder)
    }

    /// Bytes of the placeholder image served when a blob cannot be resolved.
    pub async fn placeholder(&self) -> Result<Vec<u8>> {
        Ok(fs::read(self.placeholder_path()).await?)
    }

    fn ensure_contained(&self, path: &Path) -> Result<()> {
        let inside = path
            .strip_prefix(&self.root)
            .map(|rel| {
                let mut parts = rel.components();
                matches!(parts.next(), Some(Component::Normal(_))) && parts.next().is_none()
            })
            .unwrap_or(false);

        if inside {
            Ok(())
        } else {
            Err(StorageError::InvalidPath(path.display().to_string()))
        }
    }
}

/// Copy `reader` into a new file at `path`, returning the hex digest and size.
async fn stage<R>(mut reader: R, path: &Path) -> Result<(String, u64)>
where
    R: AsyncRead + Unpin,
{
    let mut file = fs::File::create(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut size = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n]).await?;
        size += n as u64;
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok((hex::encode(hasher.finalize()), size))
}
