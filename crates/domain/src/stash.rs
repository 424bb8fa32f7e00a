use crate::address_family::AddressFamily;
use crate::dataset::CdnId;
use std::sync::Arc;
use std::time::Instant;

/// A substitute address kept for one CDN, pre-encoded as generic RR text
/// without owner name and TTL (`CLASS1 TYPE1 \# 4 ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    pub expires_at: Instant,
    pub rr_text: Arc<str>,
}

impl StashEntry {
    pub fn new(expires_at: Instant, rr_text: impl Into<Arc<str>>) -> Self {
        Self {
            expires_at,
            rr_text: rr_text.into(),
        }
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at < now
    }

    /// Whole seconds left before expiry, zero once expired.
    pub fn remaining_secs(&self, now: Instant) -> u32 {
        let left = self.expires_at.saturating_duration_since(now).as_secs();
        u32::try_from(left).unwrap_or(u32::MAX)
    }
}

/// A good, CDN-attributed record seen in an answer, ready to be stashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashCandidate {
    pub cdn: CdnId,
    pub family: AddressFamily,
    pub entry: StashEntry,
}
