use kabysdoh_application::ports::SubstitutionStash;
use kabysdoh_domain::{AddressFamily, CdnId, Dataset, StashCandidate, StashEntry};
use rustc_hash::FxHashMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

/// Entries kept per CDN and family.
pub const DEFAULT_STASH_CAPACITY: usize = 42;

type Slots = Mutex<FxHashMap<CdnId, Vec<StashEntry>>>;

/// In-memory substitute pool, one lock per address family.
///
/// Each list is kept sorted by expiry, longest-lived first, so expired
/// entries always sit at the tail and truncation drops the shortest-lived.
#[derive(Debug)]
pub struct StashCache {
    v4: Slots,
    v6: Slots,
    capacity: usize,
}

impl StashCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            v4: Mutex::new(FxHashMap::default()),
            v6: Mutex::new(FxHashMap::default()),
            capacity,
        }
    }

    /// Pre-creates an empty list for every CDN the dataset knows.
    pub fn for_dataset(dataset: &Dataset, capacity: usize) -> Self {
        let empty = || -> FxHashMap<CdnId, Vec<StashEntry>> {
            dataset
                .cdns()
                .iter()
                .map(|cdn| (cdn.clone(), Vec::with_capacity(capacity)))
                .collect()
        };
        Self {
            v4: Mutex::new(empty()),
            v6: Mutex::new(empty()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently held, expired ones included until the next touch.
    pub fn len(&self, cdn: &str, family: AddressFamily) -> usize {
        let slots = self.slots(family).lock().unwrap_or_else(|e| e.into_inner());
        slots.get(cdn).map_or(0, Vec::len)
    }

    fn slots(&self, family: AddressFamily) -> &Slots {
        match family {
            AddressFamily::V4 => &self.v4,
            AddressFamily::V6 => &self.v6,
        }
    }

    fn merge(&self, family: AddressFamily, candidates: Vec<StashCandidate>, now: Instant) {
        if candidates.is_empty() {
            return;
        }

        let mut slots = self.slots(family).lock().unwrap_or_else(|e| e.into_inner());
        let mut touched: Vec<CdnId> = Vec::new();
        for candidate in candidates {
            if !touched.contains(&candidate.cdn) {
                touched.push(candidate.cdn.clone());
            }
            slots.entry(candidate.cdn).or_default().push(candidate.entry);
        }

        for cdn in touched {
            if let Some(list) = slots.get_mut(&cdn) {
                list.sort_by(|a, b| b.expires_at.cmp(&a.expires_at));
                prune_expired(list, now);
                list.truncate(self.capacity);
                debug!(%cdn, %family, entries = list.len(), "Stash list updated");
            }
        }
    }
}

impl Default for StashCache {
    fn default() -> Self {
        Self::new(DEFAULT_STASH_CAPACITY)
    }
}

impl SubstitutionStash for StashCache {
    fn lookup(&self, cdn: &str, family: AddressFamily, now: Instant) -> Vec<StashEntry> {
        let mut entries = {
            let mut slots = self.slots(family).lock().unwrap_or_else(|e| e.into_inner());
            let Some(list) = slots.get_mut(cdn) else {
                return Vec::new();
            };
            prune_expired(list, now);
            list.clone()
        };

        fastrand::shuffle(&mut entries);
        entries
    }

    fn append_batch(&self, candidates: Vec<StashCandidate>, now: Instant) {
        let (v4, v6): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| c.family == AddressFamily::V4);
        self.merge(AddressFamily::V4, v4, now);
        self.merge(AddressFamily::V6, v6, now);
    }
}

/// `list` must be sorted longest-lived first.
fn prune_expired(list: &mut Vec<StashEntry>, now: Instant) {
    let live = list.partition_point(|entry| !entry.is_expired(now));
    list.truncate(live);
}
