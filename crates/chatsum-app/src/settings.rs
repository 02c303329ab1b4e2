// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::summary::SummaryOptions;
use anyhow::{Context, Result};
use tracing::warn;

pub const DEFAULT_USERNAME: &str = "default-user";
pub const DEFAULT_MODEL: &str = "";
// 4k context minus room for the summarizer's own instructions.
pub const DEFAULT_MAX_TOKENS: &str = "3996";
pub const DEFAULT_WORD_LIMIT: &str = "400";

/// Persisted key-value medium behind [`SettingsStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Username,
    Model,
    MaxTokens,
    WordLimit,
}

impl SettingKey {
    pub const ALL: [Self; 4] = [Self::Username, Self::Model, Self::MaxTokens, Self::WordLimit];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "chat-username",
            Self::Model => "chat-selected-model",
            Self::MaxTokens => "chat-max-tokens",
            Self::WordLimit => "chat-word-limit",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "user",
            Self::Model => "model",
            Self::MaxTokens => "context window (tokens)",
            Self::WordLimit => "summary words",
        }
    }

    pub const fn default_value(self) -> &'static str {
        match self {
            Self::Username => DEFAULT_USERNAME,
            Self::Model => DEFAULT_MODEL,
            Self::MaxTokens => DEFAULT_MAX_TOKENS,
            Self::WordLimit => DEFAULT_WORD_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub model: String,
    pub max_tokens: String,
    pub word_limit: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS.to_owned(),
            word_limit: DEFAULT_WORD_LIMIT.to_owned(),
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> &str {
        match key {
            SettingKey::Username => &self.username,
            SettingKey::Model => &self.model,
            SettingKey::MaxTokens => &self.max_tokens,
            SettingKey::WordLimit => &self.word_limit,
        }
    }

    fn slot_mut(&mut self, key: SettingKey) -> &mut String {
        match key {
            SettingKey::Username => &mut self.username,
            SettingKey::Model => &mut self.model,
            SettingKey::MaxTokens => &mut self.max_tokens,
            SettingKey::WordLimit => &mut self.word_limit,
        }
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens.clone(),
            word_limit: self.word_limit.clone(),
        }
    }
}

/// User settings with write-through persistence. Values are kept verbatim;
/// the token and word limits are not validated here.
pub struct SettingsStore<S> {
    backend: S,
    settings: Settings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Seeds each field on its own: a missing, empty or unreadable key falls
    /// back to that field's default without affecting the others.
    pub fn load(backend: S) -> Self {
        let mut settings = Settings::default();
        for key in SettingKey::ALL {
            match backend.get(key.as_str()) {
                Ok(Some(value)) if !value.is_empty() => *settings.slot_mut(key) = value,
                Ok(_) => {}
                Err(error) => {
                    warn!(setting = key.as_str(), error = %format!("{error:#}"), "read setting failed; using default");
                }
            }
        }
        Self { backend, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        self.backend
            .put(key.as_str(), value)
            .with_context(|| format!("persist setting {}", key.as_str()))?;
        *self.settings.slot_mut(key) = value.to_owned();
        Ok(())
    }

    pub fn set_username(&mut self, value: &str) -> Result<()> {
        self.set(SettingKey::Username, value)
    }

    pub fn set_model(&mut self, value: &str) -> Result<()> {
        self.set(SettingKey::Model, value)
    }

    pub fn set_max_tokens(&mut self, value: &str) -> Result<()> {
        self.set(SettingKey::MaxTokens, value)
    }

    pub fn set_word_limit(&mut self, value: &str) -> Result<()> {
        self.set(SettingKey::WordLimit, value)
    }
}
