use super::errors::DatasetError;
use super::schema::{DatasetFile, UINT128_SENTINEL};
use super::Dataset;
use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// Assembles a dataset from presentation-format addresses and CIDRs.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    file: DatasetFile,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            file: DatasetFile {
                uint128: UINT128_SENTINEL,
                ..DatasetFile::default()
            },
        }
    }

    pub fn block_address(mut self, addr: &str) -> Result<Self, DatasetError> {
        match parse_addr(addr)? {
            IpAddr::V4(v4) => self.file.ip.push(u32::from(v4)),
            IpAddr::V6(v6) => self.file.ipv6.push(u128::from(v6)),
        }
        Ok(self)
    }

    pub fn block_subnet(mut self, cidr: &str) -> Result<Self, DatasetError> {
        match parse_cidr(cidr)? {
            IpNetwork::V4(net) => self
                .file
                .ip_subnet
                .push((u32::from(net.network()), u32::from(net.mask()))),
            IpNetwork::V6(net) => self
                .file
                .ipv6_subnet
                .push((u128::from(net.network()), u128::from(net.mask()))),
        }
        Ok(self)
    }

    pub fn cdn_subnet(mut self, cidr: &str, cdn: &str) -> Result<Self, DatasetError> {
        match parse_cidr(cidr)? {
            IpNetwork::V4(net) => self.file.cdn_subnet.push((
                u32::from(net.network()),
                u32::from(net.mask()),
                cdn.to_string(),
            )),
            IpNetwork::V6(net) => self.file.cdn_v6_subnet.push((
                u128::from(net.network()),
                u128::from(net.mask()),
                cdn.to_string(),
            )),
        }
        Ok(self)
    }

    pub fn cdn_domain(mut self, cdn: &str, name: &str) -> Self {
        self.file
            .cdn_domains
            .entry(cdn.to_string())
            .or_default()
            .push(name.to_string());
        self
    }

    pub fn into_schema(self) -> DatasetFile {
        self.file
    }

    pub fn build(self) -> Result<Dataset, DatasetError> {
        Dataset::from_schema(self.file)
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_addr(addr: &str) -> Result<IpAddr, DatasetError> {
    addr.parse()
        .map_err(|e| DatasetError::InvalidRange(format!("{addr}: {e}")))
}

fn parse_cidr(cidr: &str) -> Result<IpNetwork, DatasetError> {
    cidr.parse()
        .map_err(|e| DatasetError::InvalidRange(format!("{cidr}: {e}")))
}
