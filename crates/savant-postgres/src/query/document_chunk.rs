//! Document chunks repository for managing text segments and embeddings.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pgvector::Vector;
use uuid::Uuid;

use crate::model::{DocumentChunk, NewDocumentChunk, ScoredDocumentChunk};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for document chunk database operations.
///
/// Handles chunk lifecycle management including batch creation, wholesale
/// replacement on re-ingestion, and semantic similarity search via pgvector.
pub trait DocumentChunkRepository {
    /// Creates multiple document chunks in a single batch insert.
    fn create_document_chunks(
        &mut self,
        new_chunks: Vec<NewDocumentChunk>,
    ) -> impl Future<Output = PgResult<Vec<DocumentChunk>>> + Send;

    /// Atomically replaces a document's chunk set.
    ///
    /// Deletes any chunks left by a previous ingestion attempt and inserts
    /// the new batch inside one transaction, so a redelivered job cannot
    /// duplicate chunks and retrieval never observes a partial set.
    fn replace_document_chunks(
        &mut self,
        document_id: Uuid,
        new_chunks: Vec<NewDocumentChunk>,
    ) -> impl Future<Output = PgResult<Vec<DocumentChunk>>> + Send;

    /// Lists all chunks for a document ordered by chunk index.
    fn list_document_chunks_ordered(
        &mut self,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<DocumentChunk>>> + Send;

    /// Deletes all chunks for a document.
    fn delete_document_chunks(
        &mut self,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Gets the total chunk count for a document.
    fn count_document_chunks(
        &mut self,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Searches for similar chunks within a savant's knowledge base.
    ///
    /// Returns chunks with similarity score >= `min_score`, ordered by
    /// similarity descending, truncated to `limit`.
    fn search_scored_chunks_in_savant(
        &mut self,
        query_embedding: Vector,
        savant_id: Uuid,
        min_score: f64,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<ScoredDocumentChunk>>> + Send;
}

impl DocumentChunkRepository for PgConnection {
    async fn create_document_chunks(
        &mut self,
        new_chunks: Vec<NewDocumentChunk>,
    ) -> PgResult<Vec<DocumentChunk>> {
        use schema::document_chunks;

        if new_chunks.is_empty() {
            return Ok(vec![]);
        }

        let chunks = diesel::insert_into(document_chunks::table)
            .values(&new_chunks)
            .returning(DocumentChunk::as_returning())
            .get_results(self)
            .await
            .map_err(PgError::from)?;

        Ok(chunks)
    }

    async fn replace_document_chunks(
        &mut self,
        document_id: Uuid,
        new_chunks: Vec<NewDocumentChunk>,
    ) -> PgResult<Vec<DocumentChunk>> {
        use schema::document_chunks::{self, dsl};

        self.transaction::<_, PgError, _>(|conn| {
            async move {
                diesel::delete(document_chunks::table.filter(dsl::document_id.eq(document_id)))
                    .execute(conn)
                    .await?;

                if new_chunks.is_empty() {
                    return Ok(vec![]);
                }

                let chunks = diesel::insert_into(document_chunks::table)
                    .values(&new_chunks)
                    .returning(DocumentChunk::as_returning())
                    .get_results(conn)
                    .await?;

                Ok(chunks)
            }
            .scope_boxed()
        })
        .await
    }

    async fn list_document_chunks_ordered(
        &mut self,
        document_id: Uuid,
    ) -> PgResult<Vec<DocumentChunk>> {
        use schema::document_chunks::{self, dsl};

        let chunks = document_chunks::table
            .filter(dsl::document_id.eq(document_id))
            .order(dsl::chunk_index.asc())
            .select(DocumentChunk::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(chunks)
    }

    async fn delete_document_chunks(&mut self, document_id: Uuid) -> PgResult<usize> {
        use schema::document_chunks::{self, dsl};

        let affected =
            diesel::delete(document_chunks::table.filter(dsl::document_id.eq(document_id)))
                .execute(self)
                .await
                .map_err(PgError::from)?;

        Ok(affected)
    }

    async fn count_document_chunks(&mut self, document_id: Uuid) -> PgResult<i64> {
        use schema::document_chunks::{self, dsl};

        let count: i64 = document_chunks::table
            .filter(dsl::document_id.eq(document_id))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }

    async fn search_scored_chunks_in_savant(
        &mut self,
        query_embedding: Vector,
        savant_id: Uuid,
        min_score: f64,
        limit: i64,
    ) -> PgResult<Vec<ScoredDocumentChunk>> {
        use pgvector::VectorExpressionMethods;
        use schema::document_chunks::{self, dsl};

        // Cosine distance ranges from 0 (identical) to 2 (opposite)
        // Score = 1 - distance, so min_score threshold means max_distance = 1 - min_score
        let max_distance = 1.0 - min_score;

        let chunks: Vec<(DocumentChunk, f64)> = document_chunks::table
            .filter(dsl::savant_id.eq(savant_id))
            .filter(
                dsl::embedding
                    .cosine_distance(&query_embedding)
                    .le(max_distance),
            )
            .order(dsl::embedding.cosine_distance(&query_embedding))
            .limit(limit)
            .select((
                DocumentChunk::as_select(),
                (1.0.into_sql::<diesel::sql_types::Double>()
                    - dsl::embedding.cosine_distance(&query_embedding)),
            ))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(chunks
            .into_iter()
            .map(|(chunk, score)| ScoredDocumentChunk { chunk, score })
            .collect())
    }
}
