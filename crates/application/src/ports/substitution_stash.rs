use kabysdoh_domain::{AddressFamily, StashCandidate, StashEntry};
use std::time::Instant;

/// Bounded, expiring per-CDN pool of known-good substitute records.
pub trait SubstitutionStash: Send + Sync {
    /// Live entries for `cdn`, shuffled, private to the caller.
    fn lookup(&self, cdn: &str, family: AddressFamily, now: Instant) -> Vec<StashEntry>;

    /// Appends every candidate, then re-sorts, prunes and truncates the
    /// touched lists.
    fn append_batch(&self, candidates: Vec<StashCandidate>, now: Instant);

    fn append(&self, candidate: StashCandidate, now: Instant) {
        self.append_batch(vec![candidate], now);
    }
}
