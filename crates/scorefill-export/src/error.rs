use thiserror::Error;

use scorefill_instruments::error::InstrumentError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("no templates configured")]
    NoTemplates,

    #[error("DOCX read failed for {name}: {reason}")]
    DocxRead { name: String, reason: String },

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
