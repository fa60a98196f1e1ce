//! Per-document ingestion pipeline.

use savant_core::emb::EmbeddingService;
use savant_nats::queue::IngestJob;
use uuid::Uuid;

use crate::service::{ChunkRecord, DocumentStore, ObjectStorage, TextExtractor, TextSplitterService};
use crate::{Result, WorkerError};

/// Tracing target for the ingestion pipeline.
const TRACING_TARGET: &str = "savant_worker::pipeline";

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// The processed document.
    pub document_id: Uuid,
    /// Number of chunk records written.
    pub chunk_count: usize,
}

/// The per-document ingestion state machine.
///
/// Drives one document through `processing → {completed | failed}`:
/// download, extract, clean, chunk, batch-embed, and atomically replace the
/// chunk set. Collaborators are injected so the pipeline can run against
/// production services or in-memory doubles alike.
///
/// Every failure between "mark processing" and "mark completed" is caught
/// here, recorded on the document's status/error fields, and re-raised to
/// the caller so queue-level retry accounting can react.
pub struct IngestPipeline<D, S, E> {
    store: D,
    storage: S,
    embeddings: E,
    extractor: TextExtractor,
    splitter: TextSplitterService,
}

impl<D, S, E> IngestPipeline<D, S, E>
where
    D: DocumentStore,
    S: ObjectStorage,
    E: EmbeddingService,
{
    /// Creates a new pipeline over the given collaborators.
    pub fn new(store: D, storage: S, embeddings: E, splitter: TextSplitterService) -> Self {
        Self {
            store,
            storage,
            embeddings,
            extractor: TextExtractor::new(),
            splitter,
        }
    }

    /// Processes one ingest job to completion.
    ///
    /// Safe to re-run on an already-completed document: the chunk set is
    /// replaced wholesale, so a redelivered job cannot duplicate chunks.
    #[tracing::instrument(
        skip(self, job),
        fields(document_id = %job.document_id, savant_id = %job.savant_id),
        target = TRACING_TARGET
    )]
    pub async fn process(&self, job: &IngestJob) -> Result<ProcessedDocument> {
        tracing::info!(
            target: TRACING_TARGET,
            storage_path = %job.storage_path,
            mime_type = %job.mime_type,
            "Starting document processing"
        );

        self.store.mark_processing(job.document_id).await?;

        match self.run(job).await {
            Ok(outcome) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    chunk_count = outcome.chunk_count,
                    "Document processed"
                );
                Ok(outcome)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Document processing failed"
                );

                // Record the failure for operator polling, then re-raise so
                // the consumer leaves the job for redelivery.
                if let Err(store_error) = self
                    .store
                    .mark_failed(job.document_id, &error.to_string())
                    .await
                {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %store_error,
                        "Failed to record processing error"
                    );
                }

                Err(error)
            }
        }
    }

    /// Runs the fallible stages between `processing` and `completed`.
    async fn run(&self, job: &IngestJob) -> Result<ProcessedDocument> {
        let data = self.storage.download(&job.storage_path).await?;
        tracing::debug!(target: TRACING_TARGET, bytes = data.len(), "Downloaded document");

        let text = self.extractor.extract(&data, &job.mime_type)?;
        tracing::debug!(target: TRACING_TARGET, chars = text.len(), "Extracted text");

        let cleaned = clean_text(&text);

        let chunks = self.splitter.split(&cleaned)?;
        tracing::debug!(target: TRACING_TARGET, chunks = chunks.len(), "Split into chunks");

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embeddings.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(WorkerError::embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<ChunkRecord> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (chunk, embedding))| ChunkRecord {
                content: chunk.content.clone(),
                embedding,
                chunk_index: index as i32,
                token_count: chunk.token_count as i32,
            })
            .collect();

        let inserted = self.store.replace_chunks(job, records).await?;

        // Only after the batch write succeeds does the document become
        // searchable; a partial chunk set is never observable.
        self.store.mark_completed(job.document_id, inserted).await?;

        Ok(ProcessedDocument {
            document_id: job.document_id,
            chunk_count: inserted,
        })
    }
}

/// Cleans extracted text for embedding: newlines become single spaces.
///
/// Embedding quality improves when newlines are not treated as semantic
/// breaks; retrieval cleans queries the same way so vectors stay comparable.
pub(crate) fn clean_text(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_replaces_newlines_with_spaces() {
        assert_eq!(clean_text("line one\nline two\nline three"), "line one line two line three");
    }

    #[test]
    fn test_clean_text_trims() {
        assert_eq!(clean_text("\ncontent\n"), "content");
        assert_eq!(clean_text("  spaced  "), "spaced");
    }

    #[test]
    fn test_clean_text_preserves_inner_spacing() {
        assert_eq!(clean_text("a\n\nb"), "a  b");
    }
}
