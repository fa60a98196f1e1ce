//! Repository traits implemented on [`PgConnection`](crate::PgConnection).

mod document;
mod document_chunk;

pub use document::DocumentRepository;
pub use document_chunk::DocumentChunkRepository;
