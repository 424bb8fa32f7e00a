use crate::address_family::AddressFamily;
use crate::dname::DomainName;
use crate::dns_record::{GenericRdata, GenericRecord, RecordClass, RecordType, SecurityStatus, TrustLevel};
use crate::errors::DomainError;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::ops::BitOr;

/// DNS header flag bits, wire positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MessageFlags(u16);

impl MessageFlags {
    pub const QR: Self = Self(0x8000);
    pub const AA: Self = Self(0x0400);
    pub const TC: Self = Self(0x0200);
    pub const RD: Self = Self(0x0100);
    pub const RA: Self = Self(0x0080);
    pub const AD: Self = Self(0x0020);
    pub const CD: Self = Self(0x0010);

    const HEADER: u16 = 0x8000 | 0x0400 | 0x0200 | 0x0100 | 0x0080 | 0x0020 | 0x0010;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Keeps QR, AA, TC, RD, CD, RA and AD; drops opcode, rcode and Z bits.
    pub const fn header_bits(self) -> Self {
        Self(self.0 & Self::HEADER)
    }
}

impl BitOr for MessageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for MessageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::QR, "qr"),
            (Self::AA, "aa"),
            (Self::TC, "tc"),
            (Self::RD, "rd"),
            (Self::RA, "ra"),
            (Self::AD, "ad"),
            (Self::CD, "cd"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "MessageFlags({:#06x} {})", self.0, set.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rcode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl From<u16> for Rcode {
    fn from(code: u16) -> Self {
        match code {
            0 => Rcode::NoError,
            1 => Rcode::FormErr,
            2 => Rcode::ServFail,
            3 => Rcode::NxDomain,
            4 => Rcode::NotImp,
            5 => Rcode::Refused,
            other => Rcode::Other(other),
        }
    }
}

/// The question a query context is resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInfo {
    pub qname: DomainName,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl QueryInfo {
    pub fn new(qname: DomainName, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Address family asked for by an IN A or IN AAAA question.
    pub fn address_family(&self) -> Option<AddressFamily> {
        if self.qclass != RecordClass::IN {
            return None;
        }
        AddressFamily::from_record_type(self.qtype)
    }
}

/// One stored record: TTL plus the RDATA with its 2-octet length prefix.
///
/// `rr_len` is the length the host recorded next to the blob; the two can
/// disagree on corrupted entries, which is why both are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRecord {
    pub ttl: u32,
    pub rr_len: usize,
    pub blob: Bytes,
}

impl PackedRecord {
    pub fn new(ttl: u32, rdata: &[u8]) -> Self {
        let mut blob = BytesMut::with_capacity(rdata.len() + 2);
        blob.put_u16(rdata.len() as u16);
        blob.put_slice(rdata);
        Self {
            ttl,
            rr_len: rdata.len() + 2,
            blob: blob.freeze(),
        }
    }

    pub fn rdata(&self) -> &[u8] {
        self.blob.get(2..).unwrap_or_default()
    }
}

/// Identity of an RR-set inside one answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RrSetKey {
    pub owner: DomainName,
    pub rr_type: RecordType,
    pub rr_class: RecordClass,
}

impl fmt::Display for RrSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.owner, self.rr_class, self.rr_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRrSet {
    pub owner: DomainName,
    pub rr_type: RecordType,
    pub rr_class: RecordClass,
    pub trust: TrustLevel,
    pub security: SecurityStatus,
    pub records: Vec<PackedRecord>,
}

impl PackedRrSet {
    pub fn new(owner: DomainName, rr_type: RecordType, rr_class: RecordClass) -> Self {
        Self {
            owner,
            rr_type,
            rr_class,
            trust: TrustLevel::default(),
            security: SecurityStatus::default(),
            records: Vec::new(),
        }
    }

    pub fn key(&self) -> RrSetKey {
        RrSetKey {
            owner: self.owner.clone(),
            rr_type: self.rr_type,
            rr_class: self.rr_class,
        }
    }

    /// Family of an IN A / IN AAAA set; `None` for everything else.
    pub fn address_family(&self) -> Option<AddressFamily> {
        if self.rr_class != RecordClass::IN {
            return None;
        }
        AddressFamily::from_record_type(self.rr_type)
    }

    pub fn to_generic(&self, record: &PackedRecord) -> GenericRecord {
        GenericRecord {
            owner: self.owner.clone(),
            ttl: record.ttl,
            rdata: GenericRdata::new(
                self.rr_class,
                self.rr_type,
                Bytes::copy_from_slice(record.rdata()),
            ),
        }
    }
}

/// The answer section of a reply as the host keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyInfo {
    pub flags: MessageFlags,
    pub security: SecurityStatus,
    pub answer: Vec<PackedRrSet>,
}

impl ReplyInfo {
    pub fn record_count(&self) -> usize {
        self.answer.iter().map(|rrset| rrset.records.len()).sum()
    }

    /// Builds a reply from crafted answer lines the way a host would:
    /// consecutive records sharing owner, type and class form one RR-set,
    /// with fresh (default) trust and security.
    pub fn from_crafted(msg: &CraftedMessage) -> Result<Self, DomainError> {
        let mut answer: Vec<PackedRrSet> = Vec::new();
        for line in &msg.answer {
            let record: GenericRecord = line.parse()?;
            let packed = PackedRecord::new(record.ttl, &record.rdata.rdata);
            match answer.last_mut() {
                Some(rrset)
                    if rrset.owner == record.owner
                        && rrset.rr_type == record.rdata.rr_type
                        && rrset.rr_class == record.rdata.rr_class =>
                {
                    rrset.records.push(packed);
                }
                _ => {
                    let mut rrset = PackedRrSet::new(
                        record.owner,
                        record.rdata.rr_type,
                        record.rdata.rr_class,
                    );
                    rrset.records.push(packed);
                    answer.push(rrset);
                }
            }
        }

        Ok(Self {
            flags: msg.flags,
            security: SecurityStatus::default(),
            answer,
        })
    }
}

/// A replacement answer handed to the host, one RFC 3597 line per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftedMessage {
    pub qinfo: QueryInfo,
    pub flags: MessageFlags,
    pub answer: Vec<String>,
}
