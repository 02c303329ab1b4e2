// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use chatsum_app::{
    NavPhase, NoticeLevel, Orchestrator, Route, SelectedEntity, SettingKey, SettingsStore, View,
};
use chatsum_testkit::{ALICE_BACKUP, FakeGateway, MemoryStore, party};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

type Session = Orchestrator<FakeGateway, MemoryStore>;

fn start_with(gateway: &Arc<FakeGateway>, store: MemoryStore, href: &str) -> Session {
    Orchestrator::start(
        Arc::clone(gateway),
        SettingsStore::load(store),
        Route::parse(href),
    )
}

fn start(gateway: &Arc<FakeGateway>, href: &str) -> Session {
    start_with(gateway, MemoryStore::default(), href)
}

fn settle(session: &mut Session) {
    assert!(session.wait_idle(WAIT), "workers should finish");
}

fn hrefs(session: &Session) -> Vec<String> {
    session.history().iter().map(Route::href).collect()
}

#[test]
fn alice_scenario_end_to_end() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);
    assert!(session.is_hydrated());
    assert!(!session.loading());

    session.select_character("Alice");
    assert!(session.loading());
    settle(&mut session);
    assert_eq!(session.route().href(), "/characters/Alice");
    assert_eq!(session.state().chats(), ["2024-01-01.jsonl", "2024-02-01.jsonl"]);

    session.select_item("2024-01-01.jsonl");
    settle(&mut session);
    assert_eq!(session.route().href(), "/characters/Alice/2024-01-01.jsonl");
    assert_eq!(
        session.state().chat_content.as_deref(),
        Some("# Alice\nhello there")
    );

    session.back();
    assert_eq!(session.route().href(), "/characters/Alice");
    assert_eq!(session.state().chat_content, None);
    assert_eq!(
        hrefs(&session),
        [
            "/characters",
            "/characters/Alice",
            "/characters/Alice/2024-01-01.jsonl",
            "/characters/Alice",
        ]
    );
}

#[test]
fn requests_carry_the_configured_user() {
    let gateway = Arc::new(FakeGateway::fixture());
    let store = MemoryStore::with_values([("chat-username", "alice")]);
    let mut session = start_with(&gateway, store, "/characters");
    settle(&mut session);
    assert_eq!(session.settings().username, "alice");

    session
        .update_setting(SettingKey::Username, "bob")
        .expect("memory store accepts writes");
    session.select_character("Alice");
    settle(&mut session);

    let calls = gateway.calls();
    let characters = calls
        .iter()
        .find(|call| call.key == "characters")
        .expect("characters were listed");
    assert_eq!(characters.user.as_deref(), Some("alice"));
    let chats = calls
        .iter()
        .find(|call| call.key == "chats/Alice")
        .expect("chats were listed");
    assert_eq!(chats.user.as_deref(), Some("bob"));
}

#[test]
fn failed_setting_write_is_reported() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start_with(&gateway, MemoryStore::failing_writes(), "/characters");
    settle(&mut session);

    assert!(session.update_setting(SettingKey::WordLimit, "250").is_err());
    assert_eq!(session.settings().word_limit, "400");
}

#[test]
fn character_deep_link_resolves_without_extra_route_push() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters/Alice/2024-02-01.jsonl");
    assert_eq!(session.state().phase(), NavPhase::Browsing);
    settle(&mut session);

    assert_eq!(session.state().phase(), NavPhase::ItemSelected);
    assert_eq!(
        session.state().chat_content.as_deref(),
        Some("# Alice\nsecond visit")
    );
    assert_eq!(hrefs(&session), ["/characters/Alice/2024-02-01.jsonl"]);
}

#[test]
fn group_deep_link_loads_chat() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/groupChats?group=Party&chat=log2");
    settle(&mut session);

    assert_eq!(session.state().entity, SelectedEntity::Group(party()));
    assert_eq!(
        session.state().chat_content.as_deref(),
        Some("# Party\nsecond log")
    );
    assert_eq!(session.history().len(), 1);
}

#[test]
fn missing_group_deep_link_falls_back_to_group_list() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/groupChats?group=Ghosts&chat=log1");
    settle(&mut session);

    assert_eq!(session.route().href(), "/groupChats");
    assert_eq!(session.state().view, View::GroupChats);
    assert_eq!(session.state().phase(), NavPhase::Browsing);
    assert!(session.error().is_none());
    assert!(session.notice().is_none());
}

#[test]
fn malformed_route_starts_on_character_list() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/nowhere/at/all");
    settle(&mut session);

    assert_eq!(session.state().view, View::Characters);
    assert_eq!(session.route().href(), "/characters");
}

#[test]
fn reference_load_failure_is_fatal() {
    let gateway = Arc::new(FakeGateway::fixture());
    gateway.fail("groups", "server error (500): archive offline");
    let mut session = start(&gateway, "/characters/Alice");
    settle(&mut session);

    let error = session.error().expect("load failure should be fatal");
    assert!(error.contains("load groups"), "{error}");
    assert!(error.contains("archive offline"), "{error}");
    assert!(!session.loading());
    assert!(!session.is_hydrated());

    session.select_character("Alice");
    assert_eq!(session.outstanding(), 0);
    assert_eq!(gateway.call_count("chats/Alice"), 0);
    assert!(session.open_backups().is_err());
}

#[test]
fn commands_before_reference_data_are_ignored() {
    let gateway = Arc::new(FakeGateway::fixture());
    let release = gateway.gate("characters");
    let mut session = start(&gateway, "/characters");

    session.select_character("Alice");
    drop(release);
    settle(&mut session);

    assert_eq!(session.state().entity, SelectedEntity::None);
    assert_eq!(gateway.call_count("chats/Alice"), 0);
    assert_eq!(gateway.call_count("characters"), 1);
}

#[test]
fn slower_earlier_chat_does_not_overwrite_newer_one() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);
    session.select_character("Alice");
    settle(&mut session);

    let release = gateway.gate("chat/Alice/2024-01-01.jsonl");
    session.select_item("2024-01-01.jsonl");
    session.select_item("2024-02-01.jsonl");
    assert!(session.wait_next(WAIT), "newer chat should arrive first");
    assert_eq!(session.route().href(), "/characters/Alice/2024-02-01.jsonl");

    drop(release);
    settle(&mut session);
    assert_eq!(
        session.state().chat_content.as_deref(),
        Some("# Alice\nsecond visit")
    );
    assert_eq!(session.state().item.as_deref(), Some("2024-02-01.jsonl"));
    assert_eq!(session.route().href(), "/characters/Alice/2024-02-01.jsonl");
}

#[test]
fn group_selection_supersedes_pending_character() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);

    let release = gateway.gate("chats/Bob");
    session.select_character("Bob");
    session.select_group(party());
    drop(release);
    settle(&mut session);

    assert_eq!(session.state().entity, SelectedEntity::Group(party()));
    assert_eq!(session.route().href(), "/groupChats?group=Party");
}

#[test]
fn back_cancels_pending_selection() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);

    let release = gateway.gate("chats/Alice");
    session.select_character("Alice");
    session.back();
    assert!(!session.state().entity.is_some());
    drop(release);
    settle(&mut session);

    assert_eq!(session.state().entity, SelectedEntity::None);
    assert_eq!(hrefs(&session), ["/characters"]);
}

#[test]
fn summary_lists_final_segment_first() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters/Alice/2024-01-01.jsonl");
    settle(&mut session);
    let before = session.state().clone();

    session.summarize();
    settle(&mut session);

    let summary = session.summary().expect("summary should be ready");
    assert_eq!(summary.segments(), ["final", "part1", "part2"]);
    assert_eq!(session.state().entity, before.entity);
    assert_eq!(session.state().item, before.item);
    assert_eq!(session.route(), &Route::parse("/characters/Alice/2024-01-01.jsonl"));

    session.select_summary_segment(1);
    assert_eq!(session.summary().and_then(|s| s.current()), Some("part1"));
    session.close_summary();
    assert!(session.summary().is_none());
}

#[test]
fn action_failure_is_local() {
    let gateway = Arc::new(FakeGateway::fixture());
    gateway.fail("chat/Alice/2024-01-01.jsonl", "server error (500): boom");
    let mut session = start(&gateway, "/characters");
    settle(&mut session);
    session.select_character("Alice");
    settle(&mut session);

    session.select_item("2024-01-01.jsonl");
    settle(&mut session);

    let notice = session.notice().expect("failure should be surfaced");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("select_item failed"));
    assert!(notice.message.contains("boom"));
    assert!(session.error().is_none());
    assert_eq!(session.state().phase(), NavPhase::EntitySelected);
    assert_eq!(session.route().href(), "/characters/Alice");

    session.clear_notice();
    session.select_item("2024-02-01.jsonl");
    settle(&mut session);
    assert_eq!(session.state().phase(), NavPhase::ItemSelected);
    assert!(session.notice().is_none());
}

#[test]
fn backups_browse_and_restore() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);
    assert!(session.open_backups().is_err());

    session.select_character("Alice");
    settle(&mut session);
    session.open_backups().expect("character is selected");
    settle(&mut session);
    assert_eq!(session.backups().backups(), [ALICE_BACKUP]);

    session.select_backup(ALICE_BACKUP);
    settle(&mut session);
    assert_eq!(session.backups().content(), Some("# Alice\nolder copy"));

    session.restore_backup();
    settle(&mut session);
    let notice = session.notice().expect("restore should be reported");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.message.contains(&format!("restored_{ALICE_BACKUP}")));
    assert!(!session.backups().is_open());
    assert_eq!(
        gateway.call_count(&format!("restore/characters/Alice/{ALICE_BACKUP}")),
        1
    );
}

#[test]
fn switching_views_updates_route() {
    let gateway = Arc::new(FakeGateway::fixture());
    let mut session = start(&gateway, "/characters");
    settle(&mut session);

    session.switch_view(View::GroupChats);
    assert_eq!(session.route().href(), "/groupChats");
    session.select_group(party());
    session.select_item("log1");
    settle(&mut session);
    assert_eq!(session.route().href(), "/groupChats?group=Party&chat=log1");

    session.summarize();
    settle(&mut session);
    assert_eq!(
        session.summary().map(|summary| summary.segments().to_vec()),
        Some(vec!["group final".to_owned(), "group part".to_owned()])
    );
}
