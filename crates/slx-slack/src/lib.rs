//! Slack Web API adapter.
//!
//! Thin HTTP wrapper over the handful of Web API methods the exporter
//! consumes. Response shapes and pagination envelopes are typed in
//! `slx_core::api::types`; this crate owns transport, query construction,
//! and mapping of platform error codes into the core taxonomy.

use std::time::Duration;

use async_trait::async_trait;

use slx_core::{
    api::{
        port::SlackApi,
        types::{
            ApiEnvelope, ConversationsPage, EmojiResponse, FilesPage, MembersPage, MessagesPage,
            UsersPage,
        },
    },
    domain::{ChannelId, ConversationKind, MessageTs},
    errors::Error,
    Result,
};

pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Page size requested from cursor-paginated endpoints.
const PAGE_LIMIT: &str = "200";

#[derive(Clone, Debug)]
pub struct SlackWebClient {
    token: String,
    base_url: String,
    http: reqwest::Client,
}

impl SlackWebClient {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL, timeout)
    }

    /// Base URL override for tests and API proxies.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            token: token.into(),
            base_url: base_url.into(),
            http,
        }
    }

    async fn call<T>(&self, method: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned + ApiEnvelope,
    {
        let url = format!("{}/{}", self.base_url, method);
        tracing::debug!("GET {method} {params:?}");

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Network(format!("{method}: {e}")))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            return Err(Error::RateLimited { retry_after });
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "{method}: http {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: T = resp
            .json()
            .await
            .map_err(|e| Error::Network(format!("{method}: invalid response body: {e}")))?;

        if !parsed.is_ok() {
            let code = parsed.error_code().unwrap_or("unknown_error").to_string();
            return Err(map_error_code(method, code));
        }
        Ok(parsed)
    }
}

fn map_error_code(method: &str, code: String) -> Error {
    match code.as_str() {
        "not_authed" | "invalid_auth" | "account_inactive" | "token_revoked" | "token_expired"
        | "missing_scope" => Error::Auth(code),
        "ratelimited" => Error::RateLimited { retry_after: None },
        _ => Error::Api {
            method: method.to_string(),
            code,
        },
    }
}

fn push_cursor(params: &mut Vec<(&str, String)>, cursor: Option<&str>) {
    if let Some(c) = cursor {
        params.push(("cursor", c.to_string()));
    }
}

#[async_trait]
impl SlackApi for SlackWebClient {
    async fn list_conversations(&self, cursor: Option<&str>) -> Result<ConversationsPage> {
        let mut params = vec![
            ("types", ConversationKind::all_api_types()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        push_cursor(&mut params, cursor);
        self.call("conversations.list", &params).await
    }

    async fn conversation_history(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MessagesPage> {
        let mut params = vec![
            ("channel", channel.0.clone()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        push_cursor(&mut params, cursor);
        self.call("conversations.history", &params).await
    }

    async fn conversation_replies(
        &self,
        channel: &ChannelId,
        thread_ts: &MessageTs,
        cursor: Option<&str>,
    ) -> Result<MessagesPage> {
        let mut params = vec![
            ("channel", channel.0.clone()),
            ("ts", thread_ts.0.clone()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        push_cursor(&mut params, cursor);
        self.call("conversations.replies", &params).await
    }

    async fn conversation_members(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MembersPage> {
        let mut params = vec![
            ("channel", channel.0.clone()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        push_cursor(&mut params, cursor);
        self.call("conversations.members", &params).await
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<UsersPage> {
        let mut params = vec![("limit", PAGE_LIMIT.to_string())];
        push_cursor(&mut params, cursor);
        self.call("users.list", &params).await
    }

    async fn list_emoji(&self) -> Result<EmojiResponse> {
        self.call("emoji.list", &[]).await
    }

    async fn list_files(&self, channel: &ChannelId, page: u32) -> Result<FilesPage> {
        let params = vec![("channel", channel.0.clone()), ("page", page.to_string())];
        self.call("files.list", &params).await
    }
}
