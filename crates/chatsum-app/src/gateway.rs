// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::backups::{BackupPayload, BackupRequest, BackupTarget};
use crate::model::{Group, ModelInfo, ReferenceData, RestoreReceipt};
use crate::navigation::{FetchPayload, FetchRequest};
use crate::summary::SummaryOptions;
use anyhow::{Context, Result, anyhow};
use std::thread;

/// Remote chat archive. Every call is blocking and may fail; callers run
/// them off the owner thread.
pub trait ApiGateway: Send + Sync {
    fn list_characters(&self, user: &str) -> Result<Vec<String>>;
    fn list_groups(&self, user: &str) -> Result<Vec<Group>>;
    fn list_models(&self) -> Result<Vec<ModelInfo>>;
    fn list_users(&self) -> Result<Vec<String>>;

    fn list_chats(&self, user: &str, character: &str) -> Result<Vec<String>>;
    fn chat_content(&self, user: &str, character: &str, chat: &str) -> Result<String>;
    fn group_chat_content(&self, user: &str, chat: &str) -> Result<String>;

    fn summarize_chat(
        &self,
        user: &str,
        character: &str,
        chat: &str,
        options: &SummaryOptions,
    ) -> Result<Vec<String>>;
    fn summarize_group_chat(
        &self,
        user: &str,
        chat: &str,
        options: &SummaryOptions,
    ) -> Result<Vec<String>>;

    fn list_backups(&self, user: &str, target: &BackupTarget) -> Result<Vec<String>>;
    fn backup_content(&self, user: &str, target: &BackupTarget, backup: &str) -> Result<String>;
    fn restore_backup(
        &self,
        user: &str,
        target: &BackupTarget,
        backup: &str,
    ) -> Result<RestoreReceipt>;
}

pub fn execute_fetch<G: ApiGateway + ?Sized>(
    gateway: &G,
    user: &str,
    request: &FetchRequest,
) -> Result<FetchPayload> {
    match request {
        FetchRequest::CharacterChats { character } => gateway
            .list_chats(user, character)
            .map(FetchPayload::Chats),
        FetchRequest::CharacterChat { character, chat } => gateway
            .chat_content(user, character, chat)
            .map(FetchPayload::Content),
        // group chat files are addressed by chat name alone
        FetchRequest::GroupChat { chat, .. } => gateway
            .group_chat_content(user, chat)
            .map(FetchPayload::Content),
        FetchRequest::CharacterSummary {
            character,
            chat,
            options,
        } => gateway
            .summarize_chat(user, character, chat, options)
            .map(FetchPayload::Summary),
        FetchRequest::GroupSummary { chat, options, .. } => gateway
            .summarize_group_chat(user, chat, options)
            .map(FetchPayload::Summary),
    }
}

pub fn execute_backup<G: ApiGateway + ?Sized>(
    gateway: &G,
    user: &str,
    target: &BackupTarget,
    request: &BackupRequest,
) -> Result<BackupPayload> {
    match request {
        BackupRequest::List => gateway.list_backups(user, target).map(BackupPayload::List),
        BackupRequest::Content { backup } => gateway
            .backup_content(user, target, backup)
            .map(BackupPayload::Content),
        BackupRequest::Restore { backup } => gateway
            .restore_backup(user, target, backup)
            .map(BackupPayload::Restored),
    }
}

/// Fetches the four reference lists concurrently. Any failure fails the
/// whole load.
pub fn load_reference_data<G: ApiGateway + ?Sized>(
    gateway: &G,
    user: &str,
) -> Result<ReferenceData> {
    thread::scope(|scope| {
        let characters = scope.spawn(|| gateway.list_characters(user));
        let groups = scope.spawn(|| gateway.list_groups(user));
        let models = scope.spawn(|| gateway.list_models());
        let users = scope.spawn(|| gateway.list_users());

        Ok(ReferenceData {
            characters: join(characters, "characters")?.into_iter().collect(),
            groups: join(groups, "groups")?,
            models: join(models, "models")?,
            users: join(users, "users")?,
        })
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>, what: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("{what} loader panicked"))?
        .with_context(|| format!("load {what}"))
}
