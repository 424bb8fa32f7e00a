#![allow(dead_code)]
mod builders;
mod mock_host;
mod mock_stash;

pub use builders::*;
pub use mock_host::MockHost;
pub use mock_stash::MockStash;
