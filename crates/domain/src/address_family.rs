use crate::dns_record::RecordType;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of an A or AAAA record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

    /// RDATA length in octets.
    pub const fn rdata_len(self) -> usize {
        match self {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 16,
        }
    }

    /// Stored record length: 2-octet length prefix plus RDATA.
    pub const fn wire_len(self) -> usize {
        self.rdata_len() + 2
    }

    pub const fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::AAAA,
        }
    }

    pub fn from_record_type(rr_type: RecordType) -> Option<Self> {
        match rr_type {
            RecordType::A => Some(AddressFamily::V4),
            RecordType::AAAA => Some(AddressFamily::V6),
            _ => None,
        }
    }

    pub fn from_wire_len(len: usize) -> Option<Self> {
        match len {
            6 => Some(AddressFamily::V4),
            18 => Some(AddressFamily::V6),
            _ => None,
        }
    }

    /// Decodes big-endian RDATA of exactly `rdata_len()` octets.
    pub fn decode(self, rdata: &[u8]) -> Option<IpAddr> {
        match self {
            AddressFamily::V4 => <[u8; 4]>::try_from(rdata)
                .ok()
                .map(|octets| IpAddr::V4(Ipv4Addr::from(octets))),
            AddressFamily::V6 => <[u8; 16]>::try_from(rdata)
                .ok()
                .map(|octets| IpAddr::V6(Ipv6Addr::from(octets))),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("ipv4"),
            AddressFamily::V6 => f.write_str("ipv6"),
        }
    }
}
