use crate::ports::{ModuleEvent, ModuleState, QueryHost, SubstitutionStash};
use crate::services::{AnswerRebuilder, ReplyClassifier};
use bytes::Bytes;
use kabysdoh_domain::{AddressFamily, CdnId, Dataset, DomainError, Rcode, RecordClass};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const DEFAULT_MAX_SUBQUERIES: u8 = 3;

/// Work in progress for a query whose answer was entirely blocked.
#[derive(Debug, Clone)]
pub struct SubstitutionState {
    /// Sub-queries issued so far for this query.
    pub attempts: u8,
    pub family: AddressFamily,
    pub unwanted: FxHashSet<Bytes>,
    pub cdn: CdnId,
}

/// Per-query module data, owned by the host alongside the query.
#[derive(Debug, Clone, Default)]
pub enum QueryData {
    #[default]
    Pending,
    Substituting(SubstitutionState),
}

/// The module entry points: filters blocked addresses out of client
/// answers and refills emptied answers from the CDN stash.
pub struct FilterAnswerUseCase {
    dataset: Arc<Dataset>,
    classifier: ReplyClassifier,
    stash: Arc<dyn SubstitutionStash>,
    max_subqueries: u8,
}

impl FilterAnswerUseCase {
    pub fn new(dataset: Arc<Dataset>, stash: Arc<dyn SubstitutionStash>) -> Self {
        Self {
            classifier: ReplyClassifier::new(Arc::clone(&dataset)),
            dataset,
            stash,
            max_subqueries: DEFAULT_MAX_SUBQUERIES,
        }
    }

    pub fn with_max_subqueries(mut self, max_subqueries: u8) -> Self {
        self.max_subqueries = max_subqueries;
        self
    }

    /// Handles one event for one query. Failures are logged and reported
    /// to the host as `ModuleState::Error`.
    pub fn operate(
        &self,
        event: ModuleEvent,
        host: &mut dyn QueryHost,
        qdata: &mut QueryData,
    ) -> ModuleState {
        match self.drive(event, host, qdata) {
            Ok(state) => state,
            Err(e) => {
                error!(qname = %host.query_info().qname, error = %e, "Answer filter failed");
                ModuleState::Error
            }
        }
    }

    /// Called by the host when a sub-query finishes, with the sub-query's
    /// own context. Feeds its good CDN records to the stash; the waiting
    /// query is then woken with `ModuleEvent::Pass`.
    pub fn inform_super(&self, subquery: &dyn QueryHost) -> usize {
        let qname = &subquery.query_info().qname;
        let Some(reply) = subquery.return_msg() else {
            debug!(%qname, "Sub-query finished without a reply");
            return 0;
        };

        let now = Instant::now();
        let verdict = match self.classifier.classify(reply, now) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(%qname, error = %e, "Ignoring sub-query answer");
                return 0;
            }
        };

        if verdict.replenish.is_empty() {
            warn!(%qname, good = verdict.good, "Sub-query answer has no good CDN records");
            return 0;
        }

        let appended = verdict.replenish.len();
        self.stash.append_batch(verdict.replenish, now);
        info!(%qname, appended, "Stash replenished");
        appended
    }

    fn drive(
        &self,
        event: ModuleEvent,
        host: &mut dyn QueryHost,
        qdata: &mut QueryData,
    ) -> Result<ModuleState, DomainError> {
        match (event, &mut *qdata) {
            (ModuleEvent::New | ModuleEvent::Pass, QueryData::Pending) => {
                return Ok(ModuleState::WaitingDownstream)
            }
            (ModuleEvent::New | ModuleEvent::Pass, QueryData::Substituting(state)) => {
                return self.substitute(host, state)
            }
            (ModuleEvent::ModDone, QueryData::Pending) => {}
            (ModuleEvent::ModDone, QueryData::Substituting(_)) => {
                return Err(DomainError::UnexpectedEvent(
                    "ModDone while waiting for a sub-query".to_string(),
                ))
            }
            (other, _) => return Err(DomainError::UnexpectedEvent(format!("{other:?}"))),
        }

        let qinfo = host.query_info();
        let qname = qinfo.qname.clone();
        let Some(query_family) = qinfo.address_family() else {
            return Ok(ModuleState::Finished);
        };
        if !host.is_external() {
            return Ok(ModuleState::Finished);
        }

        let Some(reply) = host.return_msg() else {
            debug!(%qname, "No reply from downstream, dead NS?");
            return Ok(ModuleState::Finished);
        };
        if host.return_rcode() != Rcode::NoError || reply.answer.is_empty() {
            return Ok(ModuleState::Finished);
        }

        let now = Instant::now();
        let verdict = self.classifier.classify(reply, now)?;
        if verdict.is_ambiguous() {
            info!(%qname, cdns = ?verdict.cdns, "Ambiguous CDN");
        }

        if verdict.unwanted.is_empty() {
            return Ok(ModuleState::Finished);
        }

        if verdict.good > 0 {
            AnswerRebuilder::rebuild(host, &verdict.unwanted, Vec::new(), now)?;
            return Ok(ModuleState::Finished);
        }

        let Some(cdn) = verdict.single_cdn().cloned() else {
            // TODO: answer with a blockpage address once one is configurable
            info!(
                %qname,
                unwanted = verdict.unwanted_count,
                "Every address blocked and no CDN to substitute from"
            );
            return Ok(ModuleState::Finished);
        };

        let family = verdict.unwanted_family()?.unwrap_or(query_family);
        let mut state = SubstitutionState {
            attempts: 0,
            family,
            unwanted: verdict.unwanted,
            cdn,
        };
        let next = self.substitute(host, &mut state);
        *qdata = QueryData::Substituting(state);
        next
    }

    fn substitute(
        &self,
        host: &mut dyn QueryHost,
        state: &mut SubstitutionState,
    ) -> Result<ModuleState, DomainError> {
        let now = Instant::now();
        let stash = self.stash.lookup(&state.cdn, state.family, now);
        if !stash.is_empty() {
            AnswerRebuilder::rebuild(host, &state.unwanted, stash, now)?;
            return Ok(ModuleState::Finished);
        }

        if state.attempts >= self.max_subqueries {
            return Err(DomainError::SubqueryLimitExceeded {
                cdn: state.cdn.to_string(),
                attempts: state.attempts,
            });
        }

        let probes = self.dataset.probe_domains(&state.cdn);
        if probes.is_empty() {
            return Err(DomainError::NoProbeDomains(state.cdn.to_string()));
        }
        let target = &probes[fastrand::usize(..probes.len())];

        let flags = host.query_flags();
        host.attach_subquery(target, state.family.record_type(), RecordClass::IN, flags)?;
        state.attempts += 1;
        debug!(
            cdn = %state.cdn,
            probe = %target,
            attempt = state.attempts,
            "Sub-query attached"
        );
        Ok(ModuleState::WaitingSubquery)
    }
}
