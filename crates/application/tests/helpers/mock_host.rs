use kabysdoh_application::ports::QueryHost;
use kabysdoh_domain::{
    CraftedMessage, DomainError, DomainName, MessageFlags, QueryInfo, Rcode, RecordClass,
    RecordType, ReplyInfo,
};

pub struct MockHost {
    pub qinfo: QueryInfo,
    pub query_flags: MessageFlags,
    pub external: bool,
    pub rcode: Rcode,
    pub reply: Option<ReplyInfo>,
    pub subqueries: Vec<(DomainName, RecordType, RecordClass, MessageFlags)>,
    pub crafted: Vec<CraftedMessage>,
    pub stored: Vec<ReplyInfo>,
    pub invalidations: usize,
    pub fail_subquery: bool,
    pub fail_replace: bool,
    pub fail_store: bool,
}

impl MockHost {
    pub fn new(qinfo: QueryInfo, reply: Option<ReplyInfo>) -> Self {
        Self {
            qinfo,
            query_flags: MessageFlags::RD,
            external: true,
            rcode: Rcode::NoError,
            reply,
            subqueries: Vec::new(),
            crafted: Vec::new(),
            stored: Vec::new(),
            invalidations: 0,
            fail_subquery: false,
            fail_replace: false,
            fail_store: false,
        }
    }

    pub fn answer_lines(&self) -> Vec<String> {
        self.crafted
            .last()
            .map(|msg| msg.answer.clone())
            .unwrap_or_default()
    }
}

impl QueryHost for MockHost {
    fn query_info(&self) -> &QueryInfo {
        &self.qinfo
    }

    fn query_flags(&self) -> MessageFlags {
        self.query_flags
    }

    fn is_external(&self) -> bool {
        self.external
    }

    fn return_rcode(&self) -> Rcode {
        self.rcode
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
        qclass: RecordClass,
        flags: MessageFlags,
    ) -> Result<(), DomainError> {
        if self.fail_subquery {
            return Err(DomainError::SubqueryFailed("attach_sub failed".to_string()));
        }
        self.subqueries.push((qname.clone(), qtype, qclass, flags));
        Ok(())
    }

    fn invalidate_cached(&mut self) {
        self.invalidations += 1;
    }

    fn replace_return_msg(&mut self, msg: &CraftedMessage) -> Result<ReplyInfo, DomainError> {
        if self.fail_replace {
            return Err(DomainError::ReplaceFailed("set_return_msg failed".to_string()));
        }
        let new_reply = ReplyInfo::from_crafted(msg)?;
        let previous = self.reply.take().ok_or(DomainError::MissingReply)?;
        self.reply = Some(new_reply);
        self.crafted.push(msg.clone());
        Ok(previous)
    }

    fn reinstate_return_msg(&mut self, previous: ReplyInfo) {
        self.reply = Some(previous);
    }

    fn store_in_cache(&mut self, _is_referral: bool) -> Result<(), DomainError> {
        if self.fail_store {
            return Err(DomainError::CacheStoreFailed("storeQueryInCache failed".to_string()));
        }
        if let Some(reply) = &self.reply {
            self.stored.push(reply.clone());
        }
        Ok(())
    }
}
