use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("instrument '{0}' has no table layout; its scores are entered manually")]
    NoTableSchema(String),

    #[error("invalid score entry '{0}': expected instrument:Name=percentile")]
    InvalidEntry(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
