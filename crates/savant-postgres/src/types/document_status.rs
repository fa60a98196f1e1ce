//! Document ingestion status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a document in the ingestion pipeline.
///
/// This enumeration corresponds to the `DOCUMENT_STATUS` PostgreSQL enum.
/// A document is created as `pending`, claimed by exactly one ingestion
/// attempt at a time (enforced by the queue lease, not by row locking), and
/// ends in `completed` or `failed`. The status is the single source of truth
/// for ingestion outcome, observable by polling the document row.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::DocumentStatus"]
pub enum DocumentStatus {
    /// Document is uploaded and waiting to be picked up.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// Document is currently being processed.
    #[db_rename = "processing"]
    #[serde(rename = "processing")]
    #[strum(serialize = "processing")]
    Processing,

    /// All chunks are embedded and stored; the document is searchable.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Processing failed; see the document's `processing_error`.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,
}

impl DocumentStatus {
    /// Returns whether the document is waiting to be processed.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, DocumentStatus::Pending)
    }

    /// Returns whether the document is currently being processed.
    #[inline]
    pub fn is_processing(self) -> bool {
        matches!(self, DocumentStatus::Processing)
    }

    /// Returns whether the document finished successfully.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, DocumentStatus::Completed)
    }

    /// Returns whether the document failed to process.
    #[inline]
    pub fn is_failed(self) -> bool {
        matches!(self, DocumentStatus::Failed)
    }

    /// Returns whether the status is final.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Processing).unwrap(),
            "\"processing\""
        );
        let parsed: DocumentStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, DocumentStatus::Failed);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(!DocumentStatus::Processing.is_terminal());
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(DocumentStatus::Pending.to_string(), "pending");
        assert_eq!(DocumentStatus::Completed.to_string(), "completed");
    }
}
