use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Blocklist/CDN dump produced by the dataset exporter
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> String {
    "/srv/kabysdoh/kabydump.pyjson".to_string()
}
