//! scorefill-core
//!
//! Pure domain types: the rich-text document model, score records and the
//! placeholder lookup map. No file-format dependency; this is the shared
//! vocabulary of the scorefill system.

pub mod document;
pub mod error;
pub mod models;
