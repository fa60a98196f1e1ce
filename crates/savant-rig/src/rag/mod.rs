//! Knowledge-base retrieval (the RAG tool surface).
//!
//! The searcher turns a user query into ranked, grounded context for the
//! answering model: embed the cleaned query, run a cosine similarity search
//! scoped to one savant's chunks, keep results at or above the relevance
//! threshold, and format the top matches as tool output.

mod config;
mod searcher;

pub use config::RagConfig;
pub use searcher::{KnowledgeSearcher, NO_RELEVANT_INFORMATION, RetrievedChunk};
