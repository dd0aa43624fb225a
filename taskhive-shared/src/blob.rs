/// External blob-store collaborator
///
/// Document bytes never touch the database; they are handed to an external
/// object-storage service through this trait. The core treats the store as
/// opaque: `put` returns a handle and a public URL, `delete` releases a
/// handle. Any I/O failure surfaces as `CoreError::Dependency`; retries
/// and timeouts belong to the outer I/O layer.
///
/// `HttpBlobStore` talks to the real service; `MemoryBlobStore` is the
/// in-process double the tests use.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Category of stored blob, used by the remote service to pick a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    /// Project document uploads
    Document,
}

impl BlobKind {
    /// Converts kind to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobKind::Document => "document",
        }
    }
}

/// Result of storing a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Opaque handle used for later deletion
    pub id: String,

    /// Public URL of the stored bytes
    pub url: String,
}

/// Object-storage collaborator
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores bytes under a folder, returning a handle and public URL
    async fn put(&self, bytes: Bytes, folder: &str) -> CoreResult<StoredBlob>;

    /// Releases a previously stored blob
    async fn delete(&self, blob_id: &str, kind: BlobKind) -> CoreResult<()>;
}

/// HTTP implementation against the external object-storage service
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpBlobStore {
    /// Creates a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Service response for a successful upload
#[derive(Debug, serde::Deserialize)]
struct PutResponse {
    id: String,
    url: String,
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, bytes: Bytes, folder: &str) -> CoreResult<StoredBlob> {
        let response = self
            .client
            .post(format!("{}/objects", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("folder", folder)])
            .body(bytes)
            .send()
            .await
            .map_err(|e| CoreError::Dependency(format!("blob store unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoreError::Dependency(format!(
                "blob store rejected upload: {}",
                response.status()
            )));
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Dependency(format!("blob store response malformed: {}", e)))?;

        Ok(StoredBlob {
            id: body.id,
            url: body.url,
        })
    }

    async fn delete(&self, blob_id: &str, kind: BlobKind) -> CoreResult<()> {
        let response = self
            .client
            .delete(format!("{}/objects/{}", self.base_url, blob_id))
            .bearer_auth(&self.api_key)
            .query(&[("kind", kind.as_str())])
            .send()
            .await
            .map_err(|e| CoreError::Dependency(format!("blob store unreachable: {}", e)))?;

        // 404 means the blob is already gone; deletion is idempotent.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::Dependency(format!(
                "blob store rejected delete: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// In-memory blob store used by tests and local development
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bytes>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the store holds no blobs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: Bytes, folder: &str) -> CoreResult<StoredBlob> {
        let id = format!("{}/{}", folder, Uuid::new_v4());
        let url = format!("memory://{}", id);
        self.lock().insert(id.clone(), bytes);
        Ok(StoredBlob { id, url })
    }

    async fn delete(&self, blob_id: &str, _kind: BlobKind) -> CoreResult<()> {
        self.lock().remove(blob_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_put_and_delete() {
        let store = MemoryBlobStore::new();

        let stored = store
            .put(Bytes::from_static(b"hello"), "documents")
            .await
            .unwrap();
        assert!(stored.id.starts_with("documents/"));
        assert!(stored.url.starts_with("memory://"));
        assert_eq!(store.len(), 1);

        store.delete(&stored.id, BlobKind::Document).await.unwrap();
        assert!(store.is_empty());

        // Idempotent
        store.delete(&stored.id, BlobKind::Document).await.unwrap();
    }

    #[test]
    fn test_blob_kind_as_str() {
        assert_eq!(BlobKind::Document.as_str(), "document");
    }
}
