// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use chatsum_app::{
    ApiGateway, BackupTarget, Group, KeyValueStore, ModelInfo, RestoreReceipt, SummaryOptions,
};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

pub const ALICE_CHATS: [&str; 2] = ["2024-01-01.jsonl", "2024-02-01.jsonl"];
pub const ALICE_BACKUP: &str = "chat_Alice_20240102-134510.jsonl";

/// Key-value store kept in memory. Writes can be made to fail to exercise
/// persistence errors.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
            fail_writes: false,
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("write rejected for {key}");
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub key: String,
    pub user: Option<String>,
}

#[derive(Default)]
struct Script {
    characters: Vec<String>,
    groups: Vec<Group>,
    models: Vec<ModelInfo>,
    users: Vec<String>,
    chats: HashMap<String, Vec<String>>,
    contents: HashMap<String, String>,
    summaries: HashMap<String, Vec<String>>,
    backups: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    gates: HashMap<String, Receiver<()>>,
    calls: Vec<Call>,
}

/// Scripted [`ApiGateway`].
///
/// Every call maps to a key such as `chats/Alice` or `chat/Alice/a.jsonl`.
/// A key can be made to fail with [`FakeGateway::fail`], or held with
/// [`FakeGateway::gate`] until the returned sender fires or is dropped,
/// which lets tests finish requests in any order.
#[derive(Default)]
pub struct FakeGateway {
    script: Mutex<Script>,
}

impl FakeGateway {
    /// Alice and Bob, the group Party, one model and two users.
    pub fn fixture() -> Self {
        let gateway = Self::default();
        {
            let mut script = gateway.script();
            script.characters = vec!["Alice".to_owned(), "Bob".to_owned()];
            script.groups = vec![party()];
            script.models = vec![ModelInfo {
                name: "Llama 3".to_owned(),
                model: "llama3:8b".to_owned(),
                default: true,
            }];
            script.users = vec!["default-user".to_owned(), "alice".to_owned()];
            script.chats.insert(
                "Alice".to_owned(),
                ALICE_CHATS.iter().map(|chat| (*chat).to_owned()).collect(),
            );
            script
                .chats
                .insert("Bob".to_owned(), vec!["bob.jsonl".to_owned()]);
            for (key, content) in [
                ("chat/Alice/2024-01-01.jsonl", "# Alice\nhello there"),
                ("chat/Alice/2024-02-01.jsonl", "# Alice\nsecond visit"),
                ("chat/Bob/bob.jsonl", "# Bob\nhi"),
                ("groupChat/log1", "# Party\nfirst log"),
                ("groupChat/log2", "# Party\nsecond log"),
            ] {
                script.contents.insert(key.to_owned(), content.to_owned());
            }
            script.summaries.insert(
                "2024-01-01.jsonl".to_owned(),
                vec!["part1".to_owned(), "part2".to_owned(), "final".to_owned()],
            );
            script.summaries.insert(
                "log1".to_owned(),
                vec!["group part".to_owned(), "group final".to_owned()],
            );
            script.backups.insert(
                "characters/Alice".to_owned(),
                vec![ALICE_BACKUP.to_owned()],
            );
            script.contents.insert(
                format!("backup/characters/Alice/{ALICE_BACKUP}"),
                "# Alice\nolder copy".to_owned(),
            );
        }
        gateway
    }

    pub fn with_characters(self, characters: &[&str]) -> Self {
        self.script().characters = characters.iter().map(|name| (*name).to_owned()).collect();
        self
    }

    pub fn with_chats(self, character: &str, chats: &[&str]) -> Self {
        self.script().chats.insert(
            character.to_owned(),
            chats.iter().map(|chat| (*chat).to_owned()).collect(),
        );
        self
    }

    pub fn with_content(self, key: &str, content: &str) -> Self {
        self.script()
            .contents
            .insert(key.to_owned(), content.to_owned());
        self
    }

    /// Makes every later call for `key` fail with `message`.
    pub fn fail(&self, key: &str, message: &str) {
        self.script()
            .failures
            .insert(key.to_owned(), message.to_owned());
    }

    /// Holds the next call for `key` until the sender fires or is dropped.
    pub fn gate(&self, key: &str) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.script().gates.insert(key.to_owned(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.script()
            .calls
            .iter()
            .filter(|call| call.key == key)
            .count()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, key: &str, user: Option<&str>) -> Result<()> {
        let gate = {
            let mut script = self.script();
            script.calls.push(Call {
                key: key.to_owned(),
                user: user.map(str::to_owned),
            });
            script.gates.remove(key)
        };
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        if let Some(message) = self.script().failures.get(key) {
            bail!("{message}");
        }
        Ok(())
    }

    fn content(&self, key: &str) -> Result<String> {
        self.script()
            .contents
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("server error (404): {key} not found"))
    }

    fn summary(&self, chat: &str) -> Result<Vec<String>> {
        self.script()
            .summaries
            .get(chat)
            .cloned()
            .ok_or_else(|| anyhow!("server error (404): no summary for {chat}"))
    }
}

impl ApiGateway for FakeGateway {
    fn list_characters(&self, user: &str) -> Result<Vec<String>> {
        self.enter("characters", Some(user))?;
        Ok(self.script().characters.clone())
    }

    fn list_groups(&self, user: &str) -> Result<Vec<Group>> {
        self.enter("groups", Some(user))?;
        Ok(self.script().groups.clone())
    }

    fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.enter("models", None)?;
        Ok(self.script().models.clone())
    }

    fn list_users(&self) -> Result<Vec<String>> {
        self.enter("users", None)?;
        Ok(self.script().users.clone())
    }

    fn list_chats(&self, user: &str, character: &str) -> Result<Vec<String>> {
        let key = format!("chats/{character}");
        self.enter(&key, Some(user))?;
        self.script()
            .chats
            .get(character)
            .cloned()
            .ok_or_else(|| anyhow!("server error (404): character {character} not found"))
    }

    fn chat_content(&self, user: &str, character: &str, chat: &str) -> Result<String> {
        let key = format!("chat/{character}/{chat}");
        self.enter(&key, Some(user))?;
        self.content(&key)
    }

    fn group_chat_content(&self, user: &str, chat: &str) -> Result<String> {
        let key = format!("groupChat/{chat}");
        self.enter(&key, Some(user))?;
        self.content(&key)
    }

    fn summarize_chat(
        &self,
        user: &str,
        _character: &str,
        chat: &str,
        _options: &SummaryOptions,
    ) -> Result<Vec<String>> {
        self.enter(&format!("summary/{chat}"), Some(user))?;
        self.summary(chat)
    }

    fn summarize_group_chat(
        &self,
        user: &str,
        chat: &str,
        _options: &SummaryOptions,
    ) -> Result<Vec<String>> {
        self.enter(&format!("summary/{chat}"), Some(user))?;
        self.summary(chat)
    }

    fn list_backups(&self, user: &str, target: &BackupTarget) -> Result<Vec<String>> {
        let key = format!("backups/{}/{}", target.collection(), target.name());
        self.enter(&key, Some(user))?;
        Ok(self
            .script()
            .backups
            .get(&format!("{}/{}", target.collection(), target.name()))
            .cloned()
            .unwrap_or_default())
    }

    fn backup_content(&self, user: &str, target: &BackupTarget, backup: &str) -> Result<String> {
        let key = format!("backup/{}/{}/{backup}", target.collection(), target.name());
        self.enter(&key, Some(user))?;
        self.content(&key)
    }

    fn restore_backup(
        &self,
        user: &str,
        target: &BackupTarget,
        backup: &str,
    ) -> Result<RestoreReceipt> {
        let key = format!("restore/{}/{}/{backup}", target.collection(), target.name());
        self.enter(&key, Some(user))?;
        Ok(RestoreReceipt {
            message: "Backup restored successfully".to_owned(),
            new_file_name: format!("restored_{backup}"),
        })
    }
}

pub fn party() -> Group {
    Group {
        name: "Party".to_owned(),
        members: vec!["Alice".to_owned(), "Bob".to_owned()],
        chats: vec!["log1".to_owned(), "log2".to_owned()],
    }
}
