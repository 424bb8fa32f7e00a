use crate::ports::QueryHost;
use bytes::Bytes;
use kabysdoh_domain::{
    CraftedMessage, DomainError, QueryInfo, ReplyInfo, RrSetKey, SecurityStatus, StashEntry,
    TrustLevel,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Trust and DNSSEC status of the answer being replaced.
///
/// The host assigns fresh metadata to a crafted message; without copying
/// these back the cache rejects the stored reply as a secure entry that
/// changed status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub security: SecurityStatus,
    pub rrsets: FxHashMap<RrSetKey, (TrustLevel, SecurityStatus)>,
}

impl Provenance {
    pub fn capture(reply: &ReplyInfo) -> Self {
        Self {
            security: reply.security,
            rrsets: reply
                .answer
                .iter()
                .map(|rrset| (rrset.key(), (rrset.trust, rrset.security)))
                .collect(),
        }
    }

    /// Every RR-set of `reply` must come from the captured answer.
    pub fn apply(&self, reply: &mut ReplyInfo) -> Result<(), DomainError> {
        for rrset in &mut reply.answer {
            let key = rrset.key();
            let (trust, security) = self
                .rrsets
                .get(&key)
                .ok_or_else(|| DomainError::ProvenanceMissing(key.to_string()))?;
            rrset.trust = *trust;
            rrset.security = *security;
        }
        reply.security = self.security;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub kept: usize,
    pub removed: usize,
    pub substituted: usize,
}

#[derive(Debug, Clone)]
pub struct CraftedAnswer {
    pub message: CraftedMessage,
    pub provenance: Provenance,
    pub outcome: RebuildOutcome,
}

/// Rewrites an answer without its unwanted address records and commits the
/// result to the host cache.
pub struct AnswerRebuilder;

impl AnswerRebuilder {
    /// Builds the replacement answer. Unwanted records are replaced by
    /// entries popped from the tail of `stash` while it lasts, then dropped.
    pub fn craft(
        qinfo: &QueryInfo,
        reply: &ReplyInfo,
        unwanted: &FxHashSet<Bytes>,
        mut stash: Vec<StashEntry>,
        now: Instant,
    ) -> CraftedAnswer {
        let mut outcome = RebuildOutcome::default();
        let mut answer = Vec::with_capacity(reply.record_count());

        for rrset in &reply.answer {
            let is_address = rrset.address_family().is_some();
            for record in &rrset.records {
                if !is_address || !unwanted.contains(&record.blob) {
                    answer.push(rrset.to_generic(record).to_string());
                    outcome.kept += 1;
                } else if let Some(entry) = stash.pop() {
                    let ttl = record.ttl.min(entry.remaining_secs(now));
                    let line = format!("{} {} {}", rrset.owner, ttl, entry.rr_text);
                    debug!(record = %line, "Substituted unwanted record");
                    answer.push(line);
                    outcome.substituted += 1;
                } else {
                    outcome.removed += 1;
                }
            }
        }

        CraftedAnswer {
            message: CraftedMessage {
                qinfo: qinfo.clone(),
                flags: reply.flags.header_bits(),
                answer,
            },
            provenance: Provenance::capture(reply),
            outcome,
        }
    }

    /// Crafts the replacement, swaps it in, restores provenance and stores
    /// it in the cache. On any failure the previous message is put back.
    #[instrument(skip_all, fields(qname = %host.query_info().qname, unwanted = unwanted.len()))]
    pub fn rebuild(
        host: &mut dyn QueryHost,
        unwanted: &FxHashSet<Bytes>,
        stash: Vec<StashEntry>,
        now: Instant,
    ) -> Result<RebuildOutcome, DomainError> {
        let crafted = {
            let reply = host.return_msg().ok_or(DomainError::MissingReply)?;
            Self::craft(host.query_info(), reply, unwanted, stash, now)
        };

        host.invalidate_cached();
        let previous = host.replace_return_msg(&crafted.message)?;

        let committed = match host.return_msg_mut() {
            Some(reply) => crafted.provenance.apply(reply),
            None => Err(DomainError::MissingReply),
        }
        .and_then(|()| host.store_in_cache(false));

        if let Err(e) = committed {
            host.reinstate_return_msg(previous);
            return Err(e);
        }

        info!(
            kept = crafted.outcome.kept,
            removed = crafted.outcome.removed,
            substituted = crafted.outcome.substituted,
            "Answer rewritten"
        );
        Ok(crafted.outcome)
    }
}
