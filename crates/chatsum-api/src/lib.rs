// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chatsum_app::{
    ApiGateway, BackupTarget, Group, ModelInfo, RestoreReceipt, SummaryOptions,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Blocking client for the chat archive HTTP API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse api.base_url {trimmed:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("api.base_url {trimmed:?} cannot be used as a base URL");
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Joins percent-encoded path segments onto the base URL and appends the
    /// query pairs.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn get<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!(url = %url, "GET");
        self.send(self.http.get(url), what)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().with_context(|| format!("decode {what}"))
    }

    fn list<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<Vec<T>> {
        // the server encodes an empty list as null
        let items: Option<Vec<T>> = self.get(url, what)?;
        Ok(items.unwrap_or_default())
    }

    fn summary_query<'a>(user: &'a str, options: &'a SummaryOptions) -> [(&'a str, &'a str); 4] {
        [
            ("user", user),
            ("model", &options.model),
            ("max_tokens", &options.max_tokens),
            ("summary_words", &options.word_limit),
        ]
    }
}

impl ApiGateway for Client {
    fn list_characters(&self, user: &str) -> Result<Vec<String>> {
        self.list(
            self.endpoint(&["characters"], &[("user", user)]),
            "character list",
        )
    }

    fn list_groups(&self, user: &str) -> Result<Vec<Group>> {
        self.list(
            self.endpoint(&["groupChats"], &[("user", user)]),
            "group list",
        )
    }

    fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.list(self.endpoint(&["models"], &[]), "model list")
    }

    fn list_users(&self) -> Result<Vec<String>> {
        self.list(self.endpoint(&["users"], &[]), "user list")
    }

    fn list_chats(&self, user: &str, character: &str) -> Result<Vec<String>> {
        self.list(
            self.endpoint(&["chats", character], &[("user", user)]),
            "chat list",
        )
    }

    fn chat_content(&self, user: &str, character: &str, chat: &str) -> Result<String> {
        self.get(
            self.endpoint(&["chats", character, chat], &[("user", user)]),
            "chat content",
        )
    }

    fn group_chat_content(&self, user: &str, chat: &str) -> Result<String> {
        self.get(
            self.endpoint(&["groupChats", chat], &[("user", user)]),
            "group chat content",
        )
    }

    fn summarize_chat(
        &self,
        user: &str,
        character: &str,
        chat: &str,
        options: &SummaryOptions,
    ) -> Result<Vec<String>> {
        self.list(
            self.endpoint(
                &["chats", character, chat, "summary"],
                &Self::summary_query(user, options),
            ),
            "chat summary",
        )
    }

    fn summarize_group_chat(
        &self,
        user: &str,
        chat: &str,
        options: &SummaryOptions,
    ) -> Result<Vec<String>> {
        self.list(
            self.endpoint(
                &["groupChats", chat, "summary"],
                &Self::summary_query(user, options),
            ),
            "group chat summary",
        )
    }

    fn list_backups(&self, user: &str, target: &BackupTarget) -> Result<Vec<String>> {
        self.list(
            self.endpoint(
                &[target.collection(), target.name(), "backups"],
                &[("user", user)],
            ),
            "backup list",
        )
    }

    fn backup_content(&self, user: &str, target: &BackupTarget, backup: &str) -> Result<String> {
        self.get(
            self.endpoint(
                &[target.collection(), target.name(), "backups", backup],
                &[("user", user)],
            ),
            "backup content",
        )
    }

    fn restore_backup(
        &self,
        user: &str,
        target: &BackupTarget,
        backup: &str,
    ) -> Result<RestoreReceipt> {
        let url = self.endpoint(
            &[target.collection(), target.name(), "backups", backup, "restore"],
            &[("user", user)],
        );
        debug!(url = %url, "POST");
        self.send(self.http.post(url), "restore receipt")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {base_url} timed out");
    }
    anyhow!(
        "cannot reach {} -- is the chat archive server running? ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}
