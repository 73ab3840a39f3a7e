use super::{BlobStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A blob store backed by a local directory: `{root}/{bucket}/{key}`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves an object to its path, refusing anything that would escape the
    /// bucket directory.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        for part in [bucket, key] {
            let relative = Path::new(part);
            let is_plain = !part.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !is_plain {
                return Err(StoreError::InvalidKey(part.to_string()));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<PathBuf, StoreError> {
        let source = self.object_path(bucket, key)?;
        debug!("Copying '{}' to '{}'", source.display(), dest.display());
        match tokio::fs::copy(&source, dest).await {
            Ok(_) => Ok(dest.to_path_buf()),
            Err(e) if e.kind() == ErrorKind::NotFound && !source.exists() => {
                Err(StoreError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let target = self.object_path(bucket, key)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        debug!("Writing {} bytes to '{}'", body.len(), target.display());
        tokio::fs::write(&target, body).await?;
        Ok(())
    }
}
