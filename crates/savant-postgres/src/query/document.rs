//! Document repository for managing uploaded source files.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Document, NewDocument, UpdateDocument};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for document database operations.
///
/// Handles document lifecycle bookkeeping for the ingestion pipeline:
/// creation on upload, status transitions while processing, and lookups
/// for operator-facing polling.
pub trait DocumentRepository {
    /// Creates a new document.
    fn create_document(
        &mut self,
        new_document: NewDocument,
    ) -> impl Future<Output = PgResult<Document>> + Send;

    /// Finds a document by its unique identifier.
    fn find_document_by_id(
        &mut self,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Document>>> + Send;

    /// Updates a document with new data.
    fn update_document(
        &mut self,
        document_id: Uuid,
        updates: UpdateDocument,
    ) -> impl Future<Output = PgResult<Document>> + Send;

    /// Lists all documents for a savant (knowledge base), newest first.
    fn list_savant_documents(
        &mut self,
        savant_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Document>>> + Send;
}

impl DocumentRepository for PgConnection {
    async fn create_document(&mut self, new_document: NewDocument) -> PgResult<Document> {
        use schema::documents;

        let document = diesel::insert_into(documents::table)
            .values(&new_document)
            .returning(Document::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(document)
    }

    async fn find_document_by_id(&mut self, document_id: Uuid) -> PgResult<Option<Document>> {
        use schema::documents::{self, dsl};

        let document = documents::table
            .filter(dsl::id.eq(document_id))
            .select(Document::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(document)
    }

    async fn update_document(
        &mut self,
        document_id: Uuid,
        updates: UpdateDocument,
    ) -> PgResult<Document> {
        use schema::documents::{self, dsl};

        let document = diesel::update(documents::table.filter(dsl::id.eq(document_id)))
            .set(&updates)
            .returning(Document::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(document)
    }

    async fn list_savant_documents(&mut self, savant_id: Uuid) -> PgResult<Vec<Document>> {
        use schema::documents::{self, dsl};

        let documents = documents::table
            .filter(dsl::savant_id.eq(savant_id))
            .order(dsl::created_at.desc())
            .select(Document::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(documents)
    }
}
