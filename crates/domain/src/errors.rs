use thiserror::Error;

/// Failures local to one query's trip through the answer filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid generic record: {0}")]
    InvalidGenericRecord(String),

    #[error("Malformed {rr_type} record at {owner}: {reason}")]
    MalformedRecord {
        owner: String,
        rr_type: String,
        reason: String,
    },

    #[error("Mixture of unwanted record sizes in one answer: {0:?}")]
    MixedSubstitutionSizes(Vec<usize>),

    #[error("Too many sub-queries for CDN {cdn}: {attempts} attempts")]
    SubqueryLimitExceeded { cdn: String, attempts: u8 },

    #[error("No probe domains known for CDN {0}")]
    NoProbeDomains(String),

    #[error("Sub-query could not be attached: {0}")]
    SubqueryFailed(String),

    #[error("Return message replacement failed: {0}")]
    ReplaceFailed(String),

    #[error("Cache store failed: {0}")]
    CacheStoreFailed(String),

    #[error("Provenance lost for rrset {0}")]
    ProvenanceMissing(String),

    #[error("No return message to rebuild")]
    MissingReply,

    #[error("Unexpected module event: {0}")]
    UnexpectedEvent(String),
}
