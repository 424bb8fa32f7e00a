use kabysdoh_domain::{
    Dataset, DatasetBuilder, DomainName, MessageFlags, PackedRecord, PackedRrSet, QueryInfo,
    RecordClass, RecordType, ReplyInfo, SecurityStatus, TrustLevel,
};
use std::net::IpAddr;
use std::sync::Arc;

pub fn name(text: &str) -> DomainName {
    DomainName::from_ascii(text).unwrap()
}

pub fn a_query(qname: &str) -> QueryInfo {
    QueryInfo::new(name(qname), RecordType::A, RecordClass::IN)
}

pub fn aaaa_query(qname: &str) -> QueryInfo {
    QueryInfo::new(name(qname), RecordType::AAAA, RecordClass::IN)
}

/// Address RR-set; each entry is `(address, ttl)`, all of one family.
pub fn address_rrset(owner: &str, records: &[(&str, u32)]) -> PackedRrSet {
    let first: IpAddr = records[0].0.parse().unwrap();
    let rr_type = match first {
        IpAddr::V4(_) => RecordType::A,
        IpAddr::V6(_) => RecordType::AAAA,
    };
    let mut rrset = PackedRrSet::new(name(owner), rr_type, RecordClass::IN);
    rrset.trust = TrustLevel::AnswerAa;
    rrset.security = SecurityStatus::Secure;
    rrset.records = records
        .iter()
        .map(|(addr, ttl)| match addr.parse::<IpAddr>().unwrap() {
            IpAddr::V4(v4) => PackedRecord::new(*ttl, &v4.octets()),
            IpAddr::V6(v6) => PackedRecord::new(*ttl, &v6.octets()),
        })
        .collect();
    rrset
}

pub fn cname_rrset(owner: &str, target: &str, ttl: u32) -> PackedRrSet {
    let mut rrset = PackedRrSet::new(name(owner), RecordType::CNAME, RecordClass::IN);
    rrset.trust = TrustLevel::AnswerNoAa;
    rrset.security = SecurityStatus::Insecure;
    rrset.records = vec![PackedRecord::new(ttl, name(target).as_wire())];
    rrset
}

pub fn reply(rrsets: Vec<PackedRrSet>) -> ReplyInfo {
    ReplyInfo {
        flags: MessageFlags::QR | MessageFlags::RD | MessageFlags::RA | MessageFlags::AD,
        security: SecurityStatus::Secure,
        answer: rrsets,
    }
}

/// Blocks 10.0.0.0/8, 1.2.3.4 and 2001:db8:bad::/48; `acme` owns
/// 10.0.0.0/16 and 2001:db8::/32, `other` owns 10.1.0.0/16.
pub fn scenario_dataset() -> Arc<Dataset> {
    let dataset = DatasetBuilder::new()
        .block_address("1.2.3.4")
        .unwrap()
        .block_subnet("10.0.0.0/8")
        .unwrap()
        .block_subnet("2001:db8:bad::/48")
        .unwrap()
        .cdn_subnet("10.0.0.0/16", "acme")
        .unwrap()
        .cdn_subnet("9.9.9.0/24", "acme")
        .unwrap()
        .cdn_subnet("2001:db8::/32", "acme")
        .unwrap()
        .cdn_subnet("10.1.0.0/16", "other")
        .unwrap()
        .cdn_domain("acme", "www.acme.example")
        .cdn_domain("acme", "static.acme.example")
        .build()
        .unwrap();
    Arc::new(dataset)
}
