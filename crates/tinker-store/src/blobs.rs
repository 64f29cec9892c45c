//! Local attachment store.
//!
//! Keys follow the `{epoch_millis}-{sanitized_name}` shape so a listing
//! sorts chronologically and the original filename stays recognizable.
//! The declared content type is recorded in a `.mime` sidecar next to the
//! blob.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use tinker_core::utils::{epoch_millis, safe_filename};
use tinker_core::{Result, TinkerError};

use crate::traits::BlobStore;

/// A `BlobStore` writing files under a local directory.
#[derive(Debug)]
pub struct LocalBlobStore {
    dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at `dir`, creating it if needed.
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(LocalBlobStore { dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(safe_filename(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String> {
        let key = format!("{}-{}", epoch_millis(), safe_filename(name));
        let path = self.blob_path(&key);

        tokio::fs::write(&path, bytes).await?;
        tokio::fs::write(path.with_extension("mime"), content_type).await?;

        debug!(key = %key, size = bytes.len(), content_type = content_type, "stored attachment");
        Ok(key)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TinkerError::NotFound(format!("attachment {key}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_and_fetch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();

        let key = store
            .upload("voice memo.ogg", "audio/ogg", b"fake audio bytes")
            .await
            .unwrap();
        assert!(key.ends_with("voice_memo.ogg"));

        let bytes = store.fetch(&key).await.unwrap();
        assert_eq!(bytes, b"fake audio bytes");
    }

    #[tokio::test]
    async fn sidecar_records_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();

        let key = store.upload("a.wav", "audio/wav", b"riff").await.unwrap();
        let sidecar = dir
            .path()
            .join(std::path::Path::new(&key).with_extension("mime"));
        let mime = std::fs::read_to_string(sidecar).unwrap();
        assert_eq!(mime, "audio/wav");
    }

    #[tokio::test]
    async fn fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();

        let err = store.fetch("123-missing.ogg").await.unwrap_err();
        assert!(matches!(err, TinkerError::NotFound(_)));
    }
}
