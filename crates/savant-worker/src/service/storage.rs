//! Object storage contract for document downloads.

use async_trait::async_trait;
use savant_opendal::StorageBackend;

use crate::Result;

/// Read access to uploaded document bytes.
///
/// The pipeline only ever downloads; writes happen on the upload path,
/// outside this crate.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Downloads the bytes stored at the given path.
    async fn download(&self, path: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl ObjectStorage for StorageBackend {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.read(path).await?)
    }
}
