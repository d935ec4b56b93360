//! scorefill-export
//!
//! Template filling: placeholder resolution, ordinal superscripting,
//! row pruning and highlighting, plus DOCX reading and writing.

pub mod docx;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod resolve;
pub mod sanitize;
pub mod superscript;
