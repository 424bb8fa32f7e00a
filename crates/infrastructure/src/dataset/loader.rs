use kabysdoh_domain::{Dataset, DatasetError, DatasetFile};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Parses a dataset document. The `uint128` marker is read as an exact
/// 128-bit integer, so a file whose large numbers went through floats fails
/// here rather than producing a silently wrong matcher.
pub fn parse_dataset(raw: &[u8]) -> Result<Dataset, DatasetError> {
    let file: DatasetFile =
        serde_json::from_slice(raw).map_err(|e| DatasetError::Parse(e.to_string()))?;
    Dataset::from_schema(file)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let started = Instant::now();

    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| DatasetError::FileRead(path.display().to_string(), e.to_string()))?;
    let bytes = raw.len();
    debug!(bytes, "Dataset file read");

    let dataset = tokio::task::spawn_blocking(move || parse_dataset(&raw))
        .await
        .map_err(|e| DatasetError::Parse(format!("parser task failed: {e}")))??;

    let summary = dataset.summary();
    info!(
        bytes,
        blocked_v4 = summary.blocked_v4,
        blocked_v6 = summary.blocked_v6,
        blocked_subnets_v4 = summary.blocked_subnets_v4,
        blocked_subnets_v6 = summary.blocked_subnets_v6,
        cdn_subnets_v4 = summary.cdn_subnets_v4,
        cdn_subnets_v6 = summary.cdn_subnets_v6,
        cdns = summary.cdns,
        probe_domains = summary.probe_domains,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dataset loaded"
    );

    Ok(dataset)
}
