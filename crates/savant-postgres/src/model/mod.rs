//! Database models.

mod document;
mod document_chunk;

pub use document::{Document, NewDocument, UpdateDocument};
pub use document_chunk::{DocumentChunk, NewDocumentChunk, ScoredDocumentChunk};
