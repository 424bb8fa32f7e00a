use serde::{Deserialize, Serialize};

/// Answer filter tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Substitutes kept per CDN and address family
    #[serde(default = "default_stash_capacity")]
    pub stash_capacity: usize,

    /// Sub-queries a single client query may trigger before giving up
    #[serde(default = "default_max_subqueries")]
    pub max_subqueries: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            stash_capacity: default_stash_capacity(),
            max_subqueries: default_max_subqueries(),
        }
    }
}

fn default_stash_capacity() -> usize {
    42
}

fn default_max_subqueries() -> u8 {
    3
}
