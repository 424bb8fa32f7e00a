use kabysdoh_application::ports::{ModuleEvent, QueryHost};
use kabysdoh_application::use_cases::{FilterAnswerUseCase, QueryData};
use kabysdoh_domain::{
    AddressFamily, CdnId, Config, CraftedMessage, Dataset, DomainError, DomainName, MessageFlags,
    PackedRecord, PackedRrSet, QueryInfo, Rcode, RecordClass, RecordType, ReplyInfo,
};
use kabysdoh_infrastructure::stash::StashCache;
use std::net::IpAddr;
use std::sync::Arc;

/// Query context with no resolver behind it: sub-queries are recorded,
/// never sent.
struct DryRunHost {
    qinfo: QueryInfo,
    reply: Option<ReplyInfo>,
    subqueries: Vec<(DomainName, RecordType)>,
}

impl QueryHost for DryRunHost {
    fn query_info(&self) -> &QueryInfo {
        &self.qinfo
    }

    fn query_flags(&self) -> MessageFlags {
        MessageFlags::RD
    }

    fn is_external(&self) -> bool {
        true
    }

    fn return_rcode(&self) -> Rcode {
        Rcode::NoError
    }

    fn return_msg(&self) -> Option<&ReplyInfo> {
        self.reply.as_ref()
    }

    fn return_msg_mut(&mut self) -> Option<&mut ReplyInfo> {
        self.reply.as_mut()
    }

    fn attach_subquery(
        &mut self,
        qname: &DomainName,
        qtype: RecordType,
        _qclass: RecordClass,
        _flags: MessageFlags,
    ) -> Result<(), DomainError> {
        self.subqueries.push((qname.clone(), qtype));
        Ok(())
    }

    fn invalidate_cached(&mut self) {}

    fn replace_return_msg(&mut self, msg: &CraftedMessage) -> Result<ReplyInfo, DomainError> {
        let crafted = ReplyInfo::from_crafted(msg)?;
        self.reply
            .replace(crafted)
            .ok_or(DomainError::MissingReply)
    }

    fn reinstate_return_msg(&mut self, previous: ReplyInfo) {
        self.reply = Some(previous);
    }

    fn store_in_cache(&mut self, _is_referral: bool) -> Result<(), DomainError> {
        Ok(())
    }
}

fn synthetic_reply(qname: &DomainName, addrs: &[IpAddr], ttl: u32) -> ReplyInfo {
    let mut v4 = PackedRrSet::new(qname.clone(), RecordType::A, RecordClass::IN);
    let mut v6 = PackedRrSet::new(qname.clone(), RecordType::AAAA, RecordClass::IN);
    for addr in addrs {
        match addr {
            IpAddr::V4(ip) => v4.records.push(PackedRecord::new(ttl, &ip.octets())),
            IpAddr::V6(ip) => v6.records.push(PackedRecord::new(ttl, &ip.octets())),
        }
    }

    ReplyInfo {
        flags: MessageFlags::QR | MessageFlags::RD | MessageFlags::RA,
        answer: [v4, v6]
            .into_iter()
            .filter(|rrset| !rrset.records.is_empty())
            .collect(),
        ..ReplyInfo::default()
    }
}

fn print_answer(reply: Option<&ReplyInfo>) {
    let Some(reply) = reply else {
        return;
    };
    for rrset in &reply.answer {
        for record in &rrset.records {
            println!("{}", rrset.to_generic(record));
        }
    }
}

pub fn run(
    config: &Config,
    dataset: Arc<Dataset>,
    qname: &str,
    addrs: &[IpAddr],
    ttl: u32,
) -> anyhow::Result<()> {
    let stash = Arc::new(StashCache::for_dataset(&dataset, config.filter.stash_capacity));
    let filter = FilterAnswerUseCase::new(Arc::clone(&dataset), stash.clone())
        .with_max_subqueries(config.filter.max_subqueries);

    let mut cdns: Vec<&CdnId> = addrs.iter().filter_map(|addr| dataset.cdn_for(*addr)).collect();
    cdns.sort();
    cdns.dedup();

    let qname = DomainName::from_ascii(qname)?;
    let qtype = match addrs.first() {
        Some(IpAddr::V6(_)) => RecordType::AAAA,
        _ => RecordType::A,
    };
    let mut host = DryRunHost {
        qinfo: QueryInfo::new(qname.clone(), qtype, RecordClass::IN),
        reply: Some(synthetic_reply(&qname, addrs, ttl)),
        subqueries: Vec::new(),
    };

    println!(";; original");
    print_answer(host.reply.as_ref());

    let mut qdata = QueryData::default();
    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata);

    println!(";; module state {state:?}");
    if !state.is_terminal() {
        for (target, target_type) in &host.subqueries {
            println!(";; sub-query {target} {target_type}");
        }
    }
    for cdn in cdns {
        println!(
            ";; stash {cdn} ipv4 {} ipv6 {}",
            stash.len(cdn, AddressFamily::V4),
            stash.len(cdn, AddressFamily::V6)
        );
    }
    println!(";; answer");
    print_answer(host.reply.as_ref());

    Ok(())
}
