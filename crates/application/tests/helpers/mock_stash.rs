use kabysdoh_application::ports::SubstitutionStash;
use kabysdoh_domain::{AddressFamily, StashCandidate, StashEntry};
use std::sync::Mutex;
use std::time::Instant;

/// Unbounded, unshuffled stash that remembers everything appended.
#[derive(Default)]
pub struct MockStash {
    entries: Mutex<Vec<StashCandidate>>,
}

impl MockStash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, candidate: StashCandidate) {
        self.entries.lock().unwrap().push(candidate);
    }

    pub fn appended(&self) -> Vec<StashCandidate> {
        self.entries.lock().unwrap().clone()
    }
}

impl SubstitutionStash for MockStash {
    fn lookup(&self, cdn: &str, family: AddressFamily, now: Instant) -> Vec<StashEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.cdn.as_ref() == cdn && c.family == family && !c.entry.is_expired(now))
            .map(|c| c.entry.clone())
            .collect()
    }

    fn append_batch(&self, candidates: Vec<StashCandidate>, _now: Instant) {
        self.entries.lock().unwrap().extend(candidates);
    }
}
