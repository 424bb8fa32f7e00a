//! Validation metadata the resolver attaches to each RR-set.
//!
//! The filter never computes these values. It only carries them across an
//! answer rewrite so that the host cache still sees the same trust and
//! DNSSEC status for records it already judged.

/// Credibility of an RR-set, ordered from least to most trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TrustLevel {
    #[default]
    None,
    AdditionalNoAa,
    AuthorityNoAa,
    AdditionalAa,
    NonAuthAnswerAa,
    AnswerNoAa,
    Glue,
    AuthorityAa,
    AnswerAa,
    SecureNoGlue,
    PrimeNoGlue,
    Validated,
    Ultimate,
}

/// DNSSEC validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SecurityStatus {
    #[default]
    Unchecked,
    Bogus,
    Indeterminate,
    Insecure,
    SecureSentinelFail,
    Secure,
}
