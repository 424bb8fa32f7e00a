#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    #[error("Bad uint128 marker {0}, was the dataset re-encoded with floats?")]
    SentinelMismatch(String),

    #[error("Invalid probe domain {name:?} for CDN {cdn}: {reason}")]
    InvalidProbeDomain {
        cdn: String,
        name: String,
        reason: String,
    },

    #[error("Invalid address or range {0}")]
    InvalidRange(String),
}
