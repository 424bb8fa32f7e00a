mod builder;
mod errors;
mod schema;

pub use builder::DatasetBuilder;
pub use errors::DatasetError;
pub use schema::{DatasetFile, UINT128_SENTINEL};

use crate::dname::DomainName;
use crate::subnet_matcher::{NetRange, SubnetMatcher};
use rustc_hash::{FxHashMap, FxHashSet};
use std::net::IpAddr;
use std::sync::Arc;

/// Opaque CDN identifier, shared between matchers, stash and probe lists.
pub type CdnId = Arc<str>;

/// Immutable blocklist and CDN snapshot. Built once, then read concurrently
/// without synchronization.
#[derive(Debug, Default)]
pub struct Dataset {
    blocked_v4: FxHashSet<u32>,
    blocked_v6: FxHashSet<u128>,
    blocked_subnets_v4: SubnetMatcher<u32>,
    blocked_subnets_v6: SubnetMatcher<u128>,
    cdn_subnets_v4: SubnetMatcher<u32, CdnId>,
    cdn_subnets_v6: SubnetMatcher<u128, CdnId>,
    cdn_domains: FxHashMap<CdnId, Vec<DomainName>>,
    cdns: Vec<CdnId>,
}

/// Counts reported after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub blocked_v4: usize,
    pub blocked_v6: usize,
    pub blocked_subnets_v4: usize,
    pub blocked_subnets_v6: usize,
    pub cdn_subnets_v4: usize,
    pub cdn_subnets_v6: usize,
    pub cdns: usize,
    pub probe_domains: usize,
}

impl Dataset {
    pub fn from_schema(file: DatasetFile) -> Result<Self, DatasetError> {
        file.verify_sentinel()?;

        let mut interned: FxHashMap<String, CdnId> = FxHashMap::default();
        let mut intern = |name: String| -> CdnId {
            interned
                .entry(name)
                .or_insert_with_key(|key| Arc::from(key.as_str()))
                .clone()
        };

        let cdn_v4: Vec<(NetRange<u32>, CdnId)> = file
            .cdn_subnet
            .into_iter()
            .map(|(net, mask, cdn)| (NetRange::new(net, mask), intern(cdn)))
            .collect();
        let cdn_v6: Vec<(NetRange<u128>, CdnId)> = file
            .cdn_v6_subnet
            .into_iter()
            .map(|(net, mask, cdn)| (NetRange::new(net, mask), intern(cdn)))
            .collect();

        let mut cdn_domains: FxHashMap<CdnId, Vec<DomainName>> = FxHashMap::default();
        for (cdn, names) in file.cdn_domains {
            let encoded = names
                .iter()
                .map(|name| {
                    DomainName::from_ascii(name).map_err(|e| DatasetError::InvalidProbeDomain {
                        cdn: cdn.clone(),
                        name: name.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            cdn_domains.insert(intern(cdn), encoded);
        }

        let mut cdns: Vec<CdnId> = interned.into_values().collect();
        cdns.sort();

        Ok(Self {
            blocked_v4: file.ip.into_iter().collect(),
            blocked_v6: file.ipv6.into_iter().collect(),
            blocked_subnets_v4: SubnetMatcher::new(
                file.ip_subnet
                    .into_iter()
                    .map(|(net, mask)| (NetRange::new(net, mask), ())),
            ),
            blocked_subnets_v6: SubnetMatcher::new(
                file.ipv6_subnet
                    .into_iter()
                    .map(|(net, mask)| (NetRange::new(net, mask), ())),
            ),
            cdn_subnets_v4: SubnetMatcher::new(cdn_v4),
            cdn_subnets_v6: SubnetMatcher::new(cdn_v6),
            cdn_domains,
            cdns,
        })
    }

    /// Exact-address hit or subnet hit on the blocklist.
    #[inline]
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                self.blocked_v4.contains(&bits) || self.blocked_subnets_v4.contains(bits)
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                self.blocked_v6.contains(&bits) || self.blocked_subnets_v6.contains(bits)
            }
        }
    }

    /// CDN owning the address, if any.
    #[inline]
    pub fn cdn_for(&self, ip: IpAddr) -> Option<&CdnId> {
        match ip {
            IpAddr::V4(v4) => self.cdn_subnets_v4.lookup(u32::from(v4)),
            IpAddr::V6(v6) => self.cdn_subnets_v6.lookup(u128::from(v6)),
        }
    }

    /// Wire-format names usable as sub-query targets for `cdn`.
    pub fn probe_domains(&self, cdn: &str) -> &[DomainName] {
        self.cdn_domains
            .get(cdn)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every CDN named by a subnet or a probe-domain list, sorted.
    pub fn cdns(&self) -> &[CdnId] {
        &self.cdns
    }

    pub fn blocked_subnets_v4(&self) -> &SubnetMatcher<u32> {
        &self.blocked_subnets_v4
    }

    pub fn blocked_subnets_v6(&self) -> &SubnetMatcher<u128> {
        &self.blocked_subnets_v6
    }

    pub fn cdn_subnets_v4(&self) -> &SubnetMatcher<u32, CdnId> {
        &self.cdn_subnets_v4
    }

    pub fn cdn_subnets_v6(&self) -> &SubnetMatcher<u128, CdnId> {
        &self.cdn_subnets_v6
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            blocked_v4: self.blocked_v4.len(),
            blocked_v6: self.blocked_v6.len(),
            blocked_subnets_v4: self.blocked_subnets_v4.len(),
            blocked_subnets_v6: self.blocked_subnets_v6.len(),
            cdn_subnets_v4: self.cdn_subnets_v4.len(),
            cdn_subnets_v6: self.cdn_subnets_v6.len(),
            cdns: self.cdns.len(),
            probe_domains: self.cdn_domains.values().map(Vec::len).sum(),
        }
    }
}
