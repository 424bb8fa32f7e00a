pub mod dataset;
pub mod stash;
