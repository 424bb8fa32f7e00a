use bytes::Bytes;
use kabysdoh_domain::{
    AddressFamily, CdnId, Dataset, DomainError, GenericRdata, PackedRecord, PackedRrSet,
    ReplyInfo, StashCandidate, StashEntry,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Outcome of sorting one answer's address records.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Address records that survive the blocklist.
    pub good: usize,
    /// Address records hit by the blocklist, duplicates included.
    pub unwanted_count: usize,
    /// Stored blobs (length prefix + RDATA) of the unwanted records.
    pub unwanted: FxHashSet<Bytes>,
    /// CDNs attributed to any address record, good or not.
    pub cdns: BTreeSet<CdnId>,
    /// Good records with a CDN and a non-zero TTL, ready for the stash.
    pub replenish: Vec<StashCandidate>,
}

impl Classification {
    /// The CDN to substitute from: defined only when exactly one was seen.
    pub fn single_cdn(&self) -> Option<&CdnId> {
        match self.cdns.len() {
            1 => self.cdns.first(),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.cdns.len() > 1
    }

    /// Family shared by every unwanted record.
    pub fn unwanted_family(&self) -> Result<Option<AddressFamily>, DomainError> {
        let sizes: BTreeSet<usize> = self.unwanted.iter().map(Bytes::len).collect();
        if sizes.len() > 1 {
            return Err(DomainError::MixedSubstitutionSizes(sizes.into_iter().collect()));
        }
        Ok(sizes.first().copied().and_then(AddressFamily::from_wire_len))
    }
}

/// Sorts A/AAAA records of a reply into good and unwanted using the dataset.
#[derive(Clone)]
pub struct ReplyClassifier {
    dataset: Arc<Dataset>,
}

impl ReplyClassifier {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Malformed address records abort the whole classification.
    #[instrument(level = "debug", skip_all, fields(rrsets = reply.answer.len()))]
    pub fn classify(&self, reply: &ReplyInfo, now: Instant) -> Result<Classification, DomainError> {
        let mut verdict = Classification::default();

        for rrset in &reply.answer {
            let Some(family) = rrset.address_family() else {
                continue;
            };

            for record in &rrset.records {
                validate_shape(rrset, record, family)?;
                let Some(ip) = family.decode(record.rdata()) else {
                    return Err(malformed(rrset, "undecodable address"));
                };

                let blocked = self.dataset.is_blocked(ip);
                if blocked {
                    verdict.unwanted.insert(record.blob.clone());
                    verdict.unwanted_count += 1;
                } else {
                    verdict.good += 1;
                }

                let Some(cdn) = self.dataset.cdn_for(ip) else {
                    continue;
                };
                verdict.cdns.insert(cdn.clone());

                if !blocked && record.ttl > 0 {
                    let rdata = GenericRdata::new(
                        rrset.rr_class,
                        rrset.rr_type,
                        Bytes::copy_from_slice(record.rdata()),
                    );
                    verdict.replenish.push(StashCandidate {
                        cdn: cdn.clone(),
                        family,
                        entry: StashEntry::new(
                            now + Duration::from_secs(u64::from(record.ttl)),
                            rdata.to_string(),
                        ),
                    });
                }
            }
        }

        Ok(verdict)
    }
}

fn validate_shape(
    rrset: &PackedRrSet,
    record: &PackedRecord,
    family: AddressFamily,
) -> Result<(), DomainError> {
    let expected = family.wire_len();
    let blob = &record.blob;
    if record.rr_len != expected || blob.len() != expected {
        return Err(malformed(
            rrset,
            &format!(
                "rr_len {} / blob {} octets, expected {}",
                record.rr_len,
                blob.len(),
                expected
            ),
        ));
    }
    if blob[0] != 0 || usize::from(blob[1]) + 2 != expected {
        return Err(malformed(
            rrset,
            &format!("length prefix {:02x}{:02x}", blob[0], blob[1]),
        ));
    }
    Ok(())
}

fn malformed(rrset: &PackedRrSet, reason: &str) -> DomainError {
    DomainError::MalformedRecord {
        owner: rrset.owner.to_string(),
        rr_type: rrset.rr_type.to_string(),
        reason: reason.to_string(),
    }
}
