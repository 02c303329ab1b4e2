// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{RestoreReceipt, SelectedEntity};
use crate::navigation::ActionFailure;
use time::macros::format_description;
use time::{Date, Month, PrimitiveDateTime, Time};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupTarget {
    Character(String),
    Group(String),
}

impl BackupTarget {
    pub fn from_entity(entity: &SelectedEntity) -> Option<Self> {
        match entity {
            SelectedEntity::None => None,
            SelectedEntity::Character(name) => Some(Self::Character(name.clone())),
            SelectedEntity::Group(group) => Some(Self::Group(group.name.clone())),
        }
    }

    /// Collection the backups endpoints hang off.
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Character(_) => "characters",
            Self::Group(_) => "groupChats",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(name) | Self::Group(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupRequest {
    List,
    Content { backup: String },
    Restore { backup: String },
}

impl BackupRequest {
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::List => "list_backups",
            Self::Content { .. } => "load_backup",
            Self::Restore { .. } => "restore_backup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTicket {
    pub token: u64,
    pub target: BackupTarget,
    pub request: BackupRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupPayload {
    List(Vec<String>),
    Content(String),
    Restored(RestoreReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub token: u64,
    pub result: Result<BackupPayload, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupEvent {
    Restored(RestoreReceipt),
    Failed(ActionFailure),
}

/// Backups dialog for one character or group. Only the latest request is
/// live: each new request, and closing, invalidates older tokens.
#[derive(Debug, Clone, Default)]
pub struct BackupBrowser {
    target: Option<BackupTarget>,
    backups: Vec<String>,
    selected: Option<String>,
    content: Option<String>,
    token: u64,
    pending: Option<BackupRequest>,
}

impl BackupBrowser {
    pub fn target(&self) -> Option<&BackupTarget> {
        self.target.as_ref()
    }

    pub fn backups(&self) -> &[String] {
        &self.backups
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn open(&mut self, target: BackupTarget) -> BackupTicket {
        self.target = Some(target.clone());
        self.backups.clear();
        self.selected = None;
        self.content = None;
        self.issue(target, BackupRequest::List)
    }

    pub fn select(&mut self, backup: &str) -> Option<BackupTicket> {
        let target = self.target.clone()?;
        Some(self.issue(
            target,
            BackupRequest::Content {
                backup: backup.to_owned(),
            },
        ))
    }

    pub fn restore(&mut self) -> Option<BackupTicket> {
        let target = self.target.clone()?;
        let backup = self.selected.clone()?;
        Some(self.issue(target, BackupRequest::Restore { backup }))
    }

    pub fn close(&mut self) {
        self.token += 1;
        self.target = None;
        self.backups.clear();
        self.selected = None;
        self.content = None;
        self.pending = None;
    }

    pub fn resolve(&mut self, outcome: BackupOutcome) -> Option<BackupEvent> {
        if outcome.token != self.token {
            debug!(
                token = outcome.token,
                current = self.token,
                "discarding superseded backup result"
            );
            return None;
        }
        let request = self.pending.take()?;

        let payload = match outcome.result {
            Ok(payload) => payload,
            Err(message) => {
                let operation = request.operation();
                warn!(operation, error = %message, "backup action failed");
                return Some(BackupEvent::Failed(ActionFailure { operation, message }));
            }
        };

        match (request, payload) {
            (BackupRequest::List, BackupPayload::List(backups)) => {
                self.backups = backups;
                None
            }
            (BackupRequest::Content { backup }, BackupPayload::Content(content)) => {
                self.selected = Some(backup);
                self.content = Some(content);
                None
            }
            (BackupRequest::Restore { .. }, BackupPayload::Restored(receipt)) => {
                self.close();
                Some(BackupEvent::Restored(receipt))
            }
            (request, _) => Some(BackupEvent::Failed(ActionFailure {
                operation: request.operation(),
                message: "unexpected backup response".to_owned(),
            })),
        }
    }

    fn issue(&mut self, target: BackupTarget, request: BackupRequest) -> BackupTicket {
        self.token += 1;
        self.pending = Some(request.clone());
        BackupTicket {
            token: self.token,
            target,
            request,
        }
    }
}

/// Renders `chat_<name>_yyyyMMdd-HHmmss.jsonl` as `Jan 02, 2024 13:45:10`.
/// Names without a parseable timestamp are returned as-is.
pub fn backup_label(name: &str) -> String {
    parse_backup_timestamp(name)
        .and_then(|stamp| {
            stamp
                .format(format_description!(
                    "[month repr:short] [day], [year] [hour]:[minute]:[second]"
                ))
                .ok()
        })
        .unwrap_or_else(|| name.to_owned())
}

fn parse_backup_timestamp(name: &str) -> Option<PrimitiveDateTime> {
    let stem = name.strip_suffix(".jsonl")?;
    let start = stem.len().checked_sub(15)?;
    let stamp = stem.get(start..)?;
    let (date, clock) = stamp.split_once('-')?;
    if date.len() != 8 || clock.len() != 6 {
        return None;
    }
    if !stamp
        .bytes()
        .enumerate()
        .all(|(index, byte)| if index == 8 { byte == b'-' } else { byte.is_ascii_digit() })
    {
        return None;
    }

    let number = |range: std::ops::Range<usize>| stamp[range].parse::<u8>().ok();
    let year = stamp[0..4].parse::<i32>().ok()?;
    let month = Month::try_from(number(4..6)?).ok()?;
    let date = Date::from_calendar_date(year, month, number(6..8)?).ok()?;
    let time = Time::from_hms(number(9..11)?, number(11..13)?, number(13..15)?).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::{
        BackupBrowser, BackupEvent, BackupOutcome, BackupPayload, BackupRequest, BackupTarget,
        backup_label,
    };
    use crate::model::{Group, RestoreReceipt, SelectedEntity};

    fn alice() -> BackupTarget {
        BackupTarget::Character("Alice".to_owned())
    }

    fn ok(token: u64, payload: BackupPayload) -> BackupOutcome {
        BackupOutcome {
            token,
            result: Ok(payload),
        }
    }

    #[test]
    fn labels_render_backup_timestamps() {
        assert_eq!(
            backup_label("chat_Alice_20240102-134510.jsonl"),
            "Jan 02, 2024 13:45:10"
        );
        assert_eq!(
            backup_label("chat_Bob Smith_20231231-000001.jsonl"),
            "Dec 31, 2023 00:00:01"
        );
    }

    #[test]
    fn labels_fall_back_to_raw_name() {
        for name in [
            "notes.jsonl",
            "chat_Alice_20241301-000000.jsonl",
            "chat_Alice_20240102-134510.json",
            "chat_Alice_2024010x-134510.jsonl",
            "",
        ] {
            assert_eq!(backup_label(name), name);
        }
    }

    #[test]
    fn target_follows_selected_entity() {
        assert_eq!(BackupTarget::from_entity(&SelectedEntity::None), None);
        let group = SelectedEntity::Group(Group {
            name: "Party".to_owned(),
            members: Vec::new(),
            chats: Vec::new(),
        });
        let target = BackupTarget::from_entity(&group).expect("group target");
        assert_eq!(target.collection(), "groupChats");
        assert_eq!(target.name(), "Party");
        assert_eq!(alice().collection(), "characters");
    }

    #[test]
    fn list_select_and_restore_flow() {
        let mut browser = BackupBrowser::default();
        let list = browser.open(alice());
        assert_eq!(list.request, BackupRequest::List);
        assert!(browser.is_loading());
        assert!(browser.restore().is_none());

        browser.resolve(ok(
            list.token,
            BackupPayload::List(vec!["b1.jsonl".to_owned(), "b2.jsonl".to_owned()]),
        ));
        assert_eq!(browser.backups().len(), 2);

        let content = browser.select("b2.jsonl").expect("open browser accepts selection");
        browser.resolve(ok(content.token, BackupPayload::Content("old".to_owned())));
        assert_eq!(browser.selected(), Some("b2.jsonl"));
        assert_eq!(browser.content(), Some("old"));

        let restore = browser.restore().expect("selected backup can be restored");
        assert_eq!(
            restore.request,
            BackupRequest::Restore {
                backup: "b2.jsonl".to_owned()
            }
        );
        let receipt = RestoreReceipt {
            message: "Backup restored successfully".to_owned(),
            new_file_name: "restored.jsonl".to_owned(),
        };
        let event = browser.resolve(ok(restore.token, BackupPayload::Restored(receipt.clone())));
        assert_eq!(event, Some(BackupEvent::Restored(receipt)));
        assert!(!browser.is_open());
    }

    #[test]
    fn stale_backup_content_is_dropped() {
        let mut browser = BackupBrowser::default();
        browser.open(alice());
        let first = browser.select("b1.jsonl").expect("selection");
        let second = browser.select("b2.jsonl").expect("selection");

        browser.resolve(ok(second.token, BackupPayload::Content("two".to_owned())));
        assert_eq!(
            browser.resolve(ok(first.token, BackupPayload::Content("one".to_owned()))),
            None
        );
        assert_eq!(browser.selected(), Some("b2.jsonl"));
        assert_eq!(browser.content(), Some("two"));
    }

    #[test]
    fn closing_invalidates_in_flight_requests() {
        let mut browser = BackupBrowser::default();
        let list = browser.open(alice());
        browser.close();
        assert_eq!(
            browser.resolve(ok(list.token, BackupPayload::List(vec!["x".to_owned()]))),
            None
        );
        assert!(browser.backups().is_empty());
        assert!(browser.select("x").is_none());
    }

    #[test]
    fn failures_are_reported_with_operation() {
        let mut browser = BackupBrowser::default();
        let list = browser.open(alice());
        let event = browser.resolve(BackupOutcome {
            token: list.token,
            result: Err("server error (404): not found".to_owned()),
        });
        assert!(matches!(
            event,
            Some(BackupEvent::Failed(failure)) if failure.operation == "list_backups"
        ));
        assert!(browser.is_open());
        assert!(!browser.is_loading());
    }
}
