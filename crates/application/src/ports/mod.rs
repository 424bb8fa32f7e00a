mod query_host;
mod substitution_stash;

pub use query_host::{ModuleEvent, ModuleState, QueryHost};
pub use substitution_stash::SubstitutionStash;
