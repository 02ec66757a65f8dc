use thiserror::Error;

/// Rejected text typed into one of the six bound fields.
///
/// These never reach a [`FilterSpec`](crate::data::filter::FilterSpec): the
/// caller keeps the previous bound and shows the message instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterInputError {
    #[error("'{0}' is not a whole number")]
    NotNumeric(String),

    #[error("bounds cannot be negative")]
    Negative,

    #[error("'{0}' is too large")]
    OutOfRange(String),
}

/// Failure to obtain the record list from the upstream provider.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("could not decode records: {0}")]
    Decode(String),

    #[error("{0:#}")]
    Load(anyhow::Error),

    #[error("retrieval worker stopped before answering")]
    Disconnected,
}

/// Invalid values in the environment or `.env` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}
