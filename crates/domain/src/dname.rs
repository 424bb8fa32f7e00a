use crate::errors::DomainError;
use bytes::Bytes;
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::BinEncodable;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const MAX_NAME_LEN: usize = 255;

/// A fully qualified domain name, kept both as a parsed `Name` for
/// presentation and as uncompressed wire octets for identity.
///
/// Equality and hashing use the wire octets, so names differing only in
/// letter case are distinct, as they are in the host's RR-set keys.
#[derive(Clone)]
pub struct DomainName {
    name: Name,
    wire: Bytes,
}

impl DomainName {
    /// Parses presentation text such as `www.example.com`, `example.com.` or
    /// `a\ b.example`; RFC 1035 escapes are honored.
    pub fn from_ascii(text: &str) -> Result<Self, DomainError> {
        if !text.is_ascii() {
            return Err(DomainError::InvalidDomainName(format!(
                "{text}: non-ASCII characters"
            )));
        }

        let name = Name::from_ascii(text)
            .map_err(|e| DomainError::InvalidDomainName(format!("{text}: {e}")))?;
        Self::from_name(name)
    }

    fn from_name(mut name: Name) -> Result<Self, DomainError> {
        name.set_fqdn(true);
        let wire = name
            .to_bytes()
            .map_err(|e| DomainError::InvalidDomainName(format!("{name}: {e}")))?;
        if wire.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "{name}: longer than {MAX_NAME_LEN} octets"
            )));
        }

        Ok(Self {
            name,
            wire: Bytes::from(wire),
        })
    }

    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.wire == other.wire
    }
}

impl Eq for DomainName {}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wire.hash(state);
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}

/// Escaped presentation form with a trailing dot; `from_ascii` reads it back
/// to the same wire octets.
impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name.to_ascii())
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainName({self})")
    }
}
