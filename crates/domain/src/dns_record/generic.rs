//! RFC 3597 generic presentation of resource records.
//!
//! Every record the filter re-emits goes through this form
//! (`CLASS1 TYPE1 \# 4 0A000001`), which any zone-file parser accepts
//! regardless of whether it knows the record type.

use super::{RecordClass, RecordType};
use crate::dname::DomainName;
use crate::errors::DomainError;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// Class, type and RDATA without owner name or TTL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericRdata {
    pub rr_class: RecordClass,
    pub rr_type: RecordType,
    pub rdata: Bytes,
}

impl GenericRdata {
    pub fn new(rr_class: RecordClass, rr_type: RecordType, rdata: impl Into<Bytes>) -> Self {
        Self {
            rr_class,
            rr_type,
            rdata: rdata.into(),
        }
    }

    fn parse_tokens<'a>(
        tokens: &mut impl Iterator<Item = &'a str>,
        line: &str,
    ) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidGenericRecord(format!("{reason}: {line}"));

        let rr_class = tokens
            .next()
            .and_then(|t| t.strip_prefix("CLASS"))
            .and_then(|n| n.parse::<u16>().ok())
            .map(RecordClass::from)
            .ok_or_else(|| invalid("expected CLASSn"))?;
        let rr_type = tokens
            .next()
            .and_then(|t| t.strip_prefix("TYPE"))
            .and_then(|n| n.parse::<u16>().ok())
            .map(RecordType::from)
            .ok_or_else(|| invalid("expected TYPEn"))?;
        if tokens.next() != Some("\\#") {
            return Err(invalid("expected \\# marker"));
        }
        let declared: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| invalid("expected RDATA length"))?;

        let hex: String = tokens.collect();
        let rdata = decode_hex(&hex).ok_or_else(|| invalid("bad hex RDATA"))?;
        if rdata.len() != declared {
            return Err(invalid("RDATA length mismatch"));
        }

        Ok(Self {
            rr_class,
            rr_type,
            rdata: Bytes::from(rdata),
        })
    }
}

impl fmt::Display for GenericRdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLASS{} TYPE{} \\# {}",
            self.rr_class.to_u16(),
            self.rr_type.to_u16(),
            self.rdata.len()
        )?;
        if !self.rdata.is_empty() {
            f.write_str(" ")?;
            for byte in self.rdata.iter() {
                write!(f, "{:02X}", byte)?;
            }
        }
        Ok(())
    }
}

impl FromStr for GenericRdata {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_tokens(&mut s.split_whitespace(), s)
    }
}

/// A full generic record line: `owner ttl CLASSn TYPEn \# len HEX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRecord {
    pub owner: DomainName,
    pub ttl: u32,
    pub rdata: GenericRdata,
}

impl fmt::Display for GenericRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.owner, self.ttl, self.rdata)
    }
}

impl FromStr for GenericRecord {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let owner = tokens
            .next()
            .ok_or_else(|| DomainError::InvalidGenericRecord(format!("empty line: {s}")))?
            .parse::<DomainName>()?;
        let ttl = tokens
            .next()
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| DomainError::InvalidGenericRecord(format!("expected TTL: {s}")))?;
        let rdata = GenericRdata::parse_tokens(&mut tokens, s)?;
        Ok(Self { owner, ttl, rdata })
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}
