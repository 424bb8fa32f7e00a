//! Kabysdoh domain layer: addresses, subnet matching, the blocklist/CDN
//! dataset and the reply model the answer filter works on.
pub mod address_family;
pub mod config;
pub mod dataset;
pub mod dname;
pub mod dns_record;
pub mod errors;
pub mod reply;
pub mod stash;
pub mod subnet_matcher;

pub use address_family::AddressFamily;
pub use config::{CliOverrides, Config, ConfigError, LogFormat};
pub use dataset::{CdnId, Dataset, DatasetBuilder, DatasetError, DatasetFile, DatasetSummary};
pub use dname::DomainName;
pub use dns_record::{
    GenericRdata, GenericRecord, RecordClass, RecordType, SecurityStatus, TrustLevel,
};
pub use errors::DomainError;
pub use reply::{
    CraftedMessage, MessageFlags, PackedRecord, PackedRrSet, QueryInfo, Rcode, ReplyInfo,
    RrSetKey,
};
pub use stash::{StashCandidate, StashEntry};
pub use subnet_matcher::{AddressBits, BucketKind, NetRange, SubnetMatcher};
