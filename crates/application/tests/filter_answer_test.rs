mod helpers;

use helpers::*;
use kabysdoh_application::ports::{ModuleEvent, ModuleState};
use kabysdoh_application::use_cases::{FilterAnswerUseCase, QueryData};
use kabysdoh_domain::{
    AddressFamily, MessageFlags, Rcode, RecordClass, RecordType, StashCandidate, StashEntry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn use_case(stash: &Arc<MockStash>) -> FilterAnswerUseCase {
    FilterAnswerUseCase::new(scenario_dataset(), stash.clone())
}

fn acme_entry(secs: u64, hex: &str) -> StashCandidate {
    StashCandidate {
        cdn: Arc::from("acme"),
        family: AddressFamily::V4,
        entry: StashEntry::new(
            Instant::now() + Duration::from_secs(secs),
            format!("CLASS1 TYPE1 \\# 4 {hex}"),
        ),
    }
}

fn blocked_acme_host() -> MockHost {
    MockHost::new(
        a_query("www.acme.example"),
        Some(reply(vec![address_rrset("www.acme.example", &[("10.0.0.1", 300)])])),
    )
}

#[test]
fn test_new_and_pass_go_downstream() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    assert_eq!(
        filter.operate(ModuleEvent::New, &mut host, &mut qdata),
        ModuleState::WaitingDownstream
    );
    assert_eq!(
        filter.operate(ModuleEvent::Pass, &mut host, &mut qdata),
        ModuleState::WaitingDownstream
    );
    assert!(host.crafted.is_empty());
}

#[test]
fn test_unexpected_event_is_an_error() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    assert_eq!(
        filter.operate(ModuleEvent::Reply, &mut host, &mut qdata),
        ModuleState::Error
    );
}

#[test]
fn test_internal_query_is_left_alone() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    host.external = false;

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert!(host.crafted.is_empty());
}

#[test]
fn test_non_address_question_is_left_alone() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    host.qinfo.qtype = RecordType::MX;

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert!(host.crafted.is_empty());
}

#[test]
fn test_error_rcode_and_missing_reply_pass_through() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);

    let mut host = blocked_acme_host();
    host.rcode = Rcode::ServFail;
    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());
    assert_eq!(state, ModuleState::Finished);
    assert!(host.crafted.is_empty());

    let mut host = MockHost::new(a_query("www.acme.example"), None);
    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());
    assert_eq!(state, ModuleState::Finished);
}

#[test]
fn test_clean_answer_is_not_rewritten() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = MockHost::new(
        a_query("dns.example"),
        Some(reply(vec![address_rrset("dns.example", &[("8.8.8.8", 300)])])),
    );

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert!(host.crafted.is_empty());
    assert_eq!(host.invalidations, 0);
}

#[test]
fn test_mixed_answer_drops_unwanted_without_substitution() {
    let stash = Arc::new(MockStash::new());
    stash.seed(acme_entry(600, "09090909"));
    let filter = use_case(&stash);
    let mut host = MockHost::new(
        a_query("www.acme.example"),
        Some(reply(vec![address_rrset(
            "www.acme.example",
            &[("10.0.0.1", 300), ("8.8.8.8", 300)],
        )])),
    );
    let mut qdata = QueryData::default();

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata);

    assert_eq!(state, ModuleState::Finished);
    assert_eq!(
        host.answer_lines(),
        vec!["www.acme.example. 300 CLASS1 TYPE1 \\# 4 08080808"]
    );
    assert!(host.subqueries.is_empty());
    assert!(matches!(qdata, QueryData::Pending));
}

#[test]
fn test_blocked_answer_is_filled_from_stash() {
    let stash = Arc::new(MockStash::new());
    stash.seed(acme_entry(120, "09090909"));
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    let lines = host.answer_lines();
    assert_eq!(lines.len(), 1);
    // TTL is capped by the remaining stash lifetime, which is at most 120.
    let ttl: u32 = lines[0].split_whitespace().nth(1).unwrap().parse().unwrap();
    assert!(ttl <= 120 && ttl >= 118, "ttl {ttl}");
    assert!(lines[0].ends_with("CLASS1 TYPE1 \\# 4 09090909"));
    assert_eq!(host.stored.len(), 1);
}

#[test]
fn test_empty_stash_attaches_probe_subquery() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata);

    assert_eq!(state, ModuleState::WaitingSubquery);
    assert_eq!(host.subqueries.len(), 1);
    let (target, qtype, qclass, flags) = &host.subqueries[0];
    let target = target.to_string();
    assert!(target == "www.acme.example." || target == "static.acme.example.");
    assert_eq!(*qtype, RecordType::A);
    assert_eq!(*qclass, RecordClass::IN);
    assert_eq!(*flags, MessageFlags::RD);

    let QueryData::Substituting(pending) = &qdata else {
        panic!("expected substitution state, got {qdata:?}");
    };
    assert_eq!(pending.attempts, 1);
    assert_eq!(pending.cdn.as_ref(), "acme");
    assert_eq!(pending.family, AddressFamily::V4);
    assert!(host.crafted.is_empty());
}

#[test]
fn test_subquery_answer_replenishes_and_wakes_substitution() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    assert_eq!(
        filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata),
        ModuleState::WaitingSubquery
    );

    let subquery = MockHost::new(
        a_query("static.acme.example"),
        Some(reply(vec![address_rrset(
            "static.acme.example",
            &[("9.9.9.9", 60), ("9.9.9.10", 60), ("8.8.8.8", 60)],
        )])),
    );
    assert_eq!(filter.inform_super(&subquery), 2);
    assert_eq!(stash.appended().len(), 2);

    let state = filter.operate(ModuleEvent::Pass, &mut host, &mut qdata);

    assert_eq!(state, ModuleState::Finished);
    let lines = host.answer_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("www.acme.example. "));
    assert!(lines[0].contains("CLASS1 TYPE1 \\# 4 0909090"));
}

#[test]
fn test_subquery_limit_ends_in_error() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    assert_eq!(
        filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata),
        ModuleState::WaitingSubquery
    );
    for _ in 0..2 {
        assert_eq!(
            filter.operate(ModuleEvent::Pass, &mut host, &mut qdata),
            ModuleState::WaitingSubquery
        );
    }
    assert_eq!(host.subqueries.len(), 3);

    let state = filter.operate(ModuleEvent::Pass, &mut host, &mut qdata);

    assert_eq!(state, ModuleState::Error);
    assert_eq!(host.subqueries.len(), 3);
    assert!(host.crafted.is_empty());
}

#[test]
fn test_custom_subquery_limit() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash).with_max_subqueries(1);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    assert_eq!(
        filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata),
        ModuleState::WaitingSubquery
    );
    assert_eq!(
        filter.operate(ModuleEvent::Pass, &mut host, &mut qdata),
        ModuleState::Error
    );
}

#[test]
fn test_failed_subquery_attach_is_an_error() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    host.fail_subquery = true;

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Error);
}

#[test]
fn test_moddone_while_substituting_is_an_error() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    let mut qdata = QueryData::default();

    filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata);

    assert_eq!(
        filter.operate(ModuleEvent::ModDone, &mut host, &mut qdata),
        ModuleState::Error
    );
}

#[test]
fn test_blocked_answer_without_cdn_passes_through() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let original = reply(vec![address_rrset("bad.example", &[("1.2.3.4", 300)])]);
    let mut host = MockHost::new(a_query("bad.example"), Some(original.clone()));

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert_eq!(host.reply.as_ref(), Some(&original));
    assert!(host.subqueries.is_empty());
}

#[test]
fn test_ambiguous_cdn_passes_through() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let original = reply(vec![address_rrset(
        "edge.example",
        &[("10.0.0.1", 300), ("10.1.0.1", 300)],
    )]);
    let mut host = MockHost::new(a_query("edge.example"), Some(original.clone()));

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert_eq!(host.reply.as_ref(), Some(&original));
}

#[test]
fn test_cdn_without_probe_domains_is_an_error() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = MockHost::new(
        a_query("edge.other.example"),
        Some(reply(vec![address_rrset("edge.other.example", &[("10.1.0.1", 300)])])),
    );

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Error);
}

#[test]
fn test_rebuild_failure_reports_error_and_keeps_reply() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let original = reply(vec![address_rrset(
        "www.acme.example",
        &[("10.0.0.1", 300), ("8.8.8.8", 300)],
    )]);
    let mut host = MockHost::new(a_query("www.acme.example"), Some(original.clone()));
    host.fail_store = true;

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Error);
    assert_eq!(host.reply.as_ref(), Some(&original));
}

#[test]
fn test_inform_super_ignores_blocked_and_foreign_records() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let subquery = MockHost::new(
        a_query("www.acme.example"),
        Some(reply(vec![address_rrset(
            "www.acme.example",
            &[("10.0.0.1", 60), ("8.8.8.8", 60)],
        )])),
    );

    assert_eq!(filter.inform_super(&subquery), 0);
    assert!(stash.appended().is_empty());

    let empty = MockHost::new(a_query("www.acme.example"), None);
    assert_eq!(filter.inform_super(&empty), 0);
}

#[test]
fn test_aaaa_query_substitutes_ipv6() {
    let stash = Arc::new(MockStash::new());
    stash.seed(StashCandidate {
        cdn: Arc::from("acme"),
        family: AddressFamily::V6,
        entry: StashEntry::new(
            Instant::now() + Duration::from_secs(600),
            "CLASS1 TYPE28 \\# 16 20010DB8000000000000000000000001",
        ),
    });
    let filter = use_case(&stash);
    let mut host = MockHost::new(
        aaaa_query("www.acme.example"),
        Some(reply(vec![address_rrset(
            "www.acme.example",
            &[("2001:db8:bad::1", 300)],
        )])),
    );

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::Finished);
    assert_eq!(
        host.answer_lines(),
        vec!["www.acme.example. 300 CLASS1 TYPE28 \\# 16 20010DB8000000000000000000000001"]
    );
}

#[test]
fn test_subquery_inherits_client_query_flags() {
    let stash = Arc::new(MockStash::new());
    let filter = use_case(&stash);
    let mut host = blocked_acme_host();
    host.query_flags = MessageFlags::RD | MessageFlags::CD;

    let state = filter.operate(ModuleEvent::ModDone, &mut host, &mut QueryData::default());

    assert_eq!(state, ModuleState::WaitingSubquery);
    assert_eq!(host.subqueries[0].3, MessageFlags::RD | MessageFlags::CD);
}

#[test]
fn test_waiting_states_are_not_terminal() {
    assert!(!ModuleState::WaitingDownstream.is_terminal());
    assert!(!ModuleState::WaitingSubquery.is_terminal());
    assert!(ModuleState::Finished.is_terminal());
    assert!(ModuleState::Error.is_terminal());
}
