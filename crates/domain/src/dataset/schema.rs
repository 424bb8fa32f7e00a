use super::errors::DatasetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value the `uint128` marker must carry: 2^128 - 1.
pub const UINT128_SENTINEL: u128 = u128::MAX;

/// On-disk dataset document. Addresses and masks are unsigned integers in
/// network bit order; IPv6 ones need the full 128 bits, hence the marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetFile {
    pub uint128: u128,

    #[serde(default)]
    pub ip: Vec<u32>,

    #[serde(default)]
    pub ipv6: Vec<u128>,

    #[serde(default)]
    pub ip_subnet: Vec<(u32, u32)>,

    #[serde(default)]
    pub ipv6_subnet: Vec<(u128, u128)>,

    #[serde(default)]
    pub cdn_subnet: Vec<(u32, u32, String)>,

    #[serde(default, rename = "cdnv6Subnet")]
    pub cdn_v6_subnet: Vec<(u128, u128, String)>,

    #[serde(default)]
    pub cdn_domains: BTreeMap<String, Vec<String>>,
}

impl DatasetFile {
    pub fn verify_sentinel(&self) -> Result<(), DatasetError> {
        if self.uint128 != UINT128_SENTINEL {
            return Err(DatasetError::SentinelMismatch(self.uint128.to_string()));
        }
        Ok(())
    }
}
