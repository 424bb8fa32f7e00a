mod storage;

pub use storage::{StashCache, DEFAULT_STASH_CAPACITY};
