//! Database enum and helper types.

mod document_status;

pub use document_status::DocumentStatus;
