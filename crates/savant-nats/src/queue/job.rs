//! Ingest job payload definition.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document ingest job.
///
/// The wire shape is fixed: all fields are required, and this is the exact
/// payload the upload path publishes when a document is stored. The queue
/// message identity (for lease/ack accounting) lives at the transport layer,
/// not in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestJob {
    /// Database document ID to process.
    pub document_id: Uuid,
    /// Account that owns the document.
    pub account_id: Uuid,
    /// Knowledge base (savant) the document belongs to.
    pub savant_id: Uuid,
    /// Storage path of the uploaded bytes.
    pub storage_path: String,
    /// Declared media type of the upload.
    pub mime_type: String,
}

impl IngestJob {
    /// Creates a new ingest job.
    pub fn new(
        document_id: Uuid,
        account_id: Uuid,
        savant_id: Uuid,
        storage_path: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            document_id,
            account_id,
            savant_id,
            storage_path: storage_path.into(),
            mime_type: mime_type.into(),
        }
    }
}
