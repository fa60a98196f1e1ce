//! Document model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::documents;
use crate::types::DocumentStatus;

/// Document model representing one uploaded source file.
///
/// A document's chunk set is written atomically as a single batch; the
/// `completed` status is only set after the batch insert commits, so
/// retrieval never observes a partial chunk set.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Account that owns this document.
    pub account_id: Uuid,
    /// Knowledge base (savant) this document belongs to.
    pub savant_id: Uuid,
    /// Human-readable document name.
    pub display_name: String,
    /// Storage path of the uploaded bytes.
    pub storage_path: String,
    /// Declared media type of the upload.
    pub mime_type: String,
    /// Current ingestion status.
    pub status: DocumentStatus,
    /// Number of chunks created by the last successful ingestion.
    pub chunk_count: i32,
    /// Error message from the last failed ingestion attempt.
    pub processing_error: Option<String>,
    /// When the current/last ingestion attempt started.
    pub processing_started_at: Option<Timestamp>,
    /// When the last ingestion attempt completed successfully.
    pub processing_completed_at: Option<Timestamp>,
    /// Timestamp when the document was created.
    pub created_at: Timestamp,
    /// Timestamp when the document was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new document.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocument {
    /// Account ID.
    pub account_id: Uuid,
    /// Savant (knowledge base) ID.
    pub savant_id: Uuid,
    /// Display name.
    pub display_name: Option<String>,
    /// Storage path.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: String,
}

/// Data for updating a document.
///
/// Double options distinguish "leave unchanged" (`None`) from
/// "set to NULL" (`Some(None)`).
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDocument {
    /// Ingestion status.
    pub status: Option<DocumentStatus>,
    /// Chunk count.
    pub chunk_count: Option<i32>,
    /// Processing error message.
    pub processing_error: Option<Option<String>>,
    /// Processing start timestamp.
    pub processing_started_at: Option<Option<Timestamp>>,
    /// Processing completion timestamp.
    pub processing_completed_at: Option<Option<Timestamp>>,
}

impl UpdateDocument {
    /// Changeset for a document entering processing.
    pub fn processing_started() -> Self {
        Self {
            status: Some(DocumentStatus::Processing),
            processing_started_at: Some(Some(jiff::Timestamp::now().into())),
            ..Default::default()
        }
    }

    /// Changeset for a successfully ingested document.
    ///
    /// Clears any error recorded by a previous attempt.
    pub fn completed(chunk_count: usize) -> Self {
        Self {
            status: Some(DocumentStatus::Completed),
            chunk_count: Some(chunk_count as i32),
            processing_error: Some(None),
            processing_completed_at: Some(Some(jiff::Timestamp::now().into())),
            ..Default::default()
        }
    }

    /// Changeset for a failed ingestion attempt.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(DocumentStatus::Failed),
            processing_error: Some(Some(error.into())),
            ..Default::default()
        }
    }
}

impl Document {
    /// Returns whether the document is searchable.
    pub fn is_searchable(&self) -> bool {
        self.status.is_completed() && self.chunk_count > 0
    }

    /// Returns whether an ingestion attempt is in flight.
    pub fn is_processing(&self) -> bool {
        self.status.is_processing()
    }

    /// Returns whether the last ingestion attempt failed.
    pub fn has_failed(&self) -> bool {
        self.status.is_failed()
    }

    /// Returns the document's display name or a default.
    pub fn display_name_or_default(&self) -> &str {
        if self.display_name.is_empty() {
            "Untitled Document"
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_started_changeset() {
        let update = UpdateDocument::processing_started();
        assert_eq!(update.status, Some(DocumentStatus::Processing));
        assert!(matches!(update.processing_started_at, Some(Some(_))));
        assert!(update.processing_error.is_none());
    }

    #[test]
    fn test_completed_changeset_clears_error() {
        let update = UpdateDocument::completed(7);
        assert_eq!(update.status, Some(DocumentStatus::Completed));
        assert_eq!(update.chunk_count, Some(7));
        assert_eq!(update.processing_error, Some(None));
        assert!(matches!(update.processing_completed_at, Some(Some(_))));
    }

    #[test]
    fn test_failed_changeset_records_message() {
        let update = UpdateDocument::failed("no meaningful text extracted");
        assert_eq!(update.status, Some(DocumentStatus::Failed));
        assert_eq!(
            update.processing_error,
            Some(Some("no meaningful text extracted".to_string()))
        );
        assert!(update.processing_completed_at.is_none());
    }
}
