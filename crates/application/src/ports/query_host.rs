use kabysdoh_domain::{
    CraftedMessage, DomainError, DomainName, MessageFlags, QueryInfo, Rcode, RecordClass,
    RecordType, ReplyInfo,
};

/// Events the resolver delivers to a module for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleEvent {
    /// Brand new query.
    New,
    /// Query passed by another module, or woken up after a sub-query.
    Pass,
    /// The next module finished and its reply is waiting.
    ModDone,
    Reply,
    NoReply,
    CapsFail,
    Error,
}

/// What the module tells the resolver after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Let the modules downstream (validator, iterator) resolve the query.
    WaitingDownstream,
    /// A sub-query was attached; wake me when it completes.
    WaitingSubquery,
    Finished,
    Error,
}

impl ModuleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ModuleState::Finished | ModuleState::Error)
    }
}

/// One query context of the host resolver.
///
/// Implementations do whatever marshaling the host needs; the filter only
/// relies on the operations below.
pub trait QueryHost {
    fn query_info(&self) -> &QueryInfo;

    /// Header flags the query was received with.
    fn query_flags(&self) -> MessageFlags;

    /// True when a client is waiting on this query, false for resolver
    /// internal lookups (NS addresses, sub-queries).
    fn is_external(&self) -> bool;

    fn return_rcode(&self) -> Rcode;

    fn return_msg(&self) -> Option<&ReplyInfo>;

    fn return_msg_mut(&mut self) -> Option<&mut ReplyInfo>;

    /// Starts a resolver-internal sub-query. Completion arrives later as an
    /// `inform_super` callback followed by a `Pass` event on this query.
    fn attach_subquery(
        &mut self,
        qname: &DomainName,
        qtype: RecordType,
        qclass: RecordClass,
        flags: MessageFlags,
    ) -> Result<(), DomainError>;

    /// Drops any cached message for this query's question.
    fn invalidate_cached(&mut self);

    /// Replaces the return message with `msg` and hands back the previous one.
    fn replace_return_msg(&mut self, msg: &CraftedMessage) -> Result<ReplyInfo, DomainError>;

    /// Puts back a message previously returned by `replace_return_msg`.
    fn reinstate_return_msg(&mut self, previous: ReplyInfo);

    /// Stores the current return message in the message and RR-set caches.
    fn store_in_cache(&mut self, is_referral: bool) -> Result<(), DomainError>;
}
