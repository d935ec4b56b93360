use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown score field: {0}")]
    UnknownField(String),

    #[error("unknown template gender: {0}")]
    UnknownGender(String),

    #[error("unknown highlight color: {0}")]
    UnknownHighlight(String),
}
