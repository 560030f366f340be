//! Typed records for the Web API responses the exporter consumes.
//!
//! Known fields are typed with optionals; everything else is captured via
//! `#[serde(flatten)]` so written documents stay a field-for-field
//! passthrough of what the API returned. Message and file-metadata payloads
//! stay opaque `serde_json::Value`s end to end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ChannelId, ConversationKind, UserId};

/// Envelope status shared by every Web API response.
pub trait ApiEnvelope {
    fn is_ok(&self) -> bool;
    fn error_code(&self) -> Option<&str>;
}

macro_rules! impl_api_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(impl ApiEnvelope for $ty {
            fn is_ok(&self) -> bool {
                self.ok
            }

            fn error_code(&self) -> Option<&str> {
                self.error.as_deref()
            }
        })+
    };
}

/// Cursor carrier attached to paginated responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    /// The API signals the final page with an empty `next_cursor`.
    pub fn cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

fn page_cursor(meta: &Option<ResponseMetadata>) -> Option<String> {
    meta.as_ref().and_then(|m| m.cursor()).map(str::to_string)
}

/// A conversation as returned by `conversations.list`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ChannelId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_channel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_im: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mpim: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_members: Option<u64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Conversation {
    pub fn kind(&self) -> ConversationKind {
        if self.is_im.unwrap_or(false) {
            return ConversationKind::DirectMessage;
        }
        if self.is_mpim.unwrap_or(false) {
            return ConversationKind::GroupDirectMessage;
        }
        if self.is_group.unwrap_or(false) || self.is_private.unwrap_or(false) {
            return ConversationKind::PrivateChannel;
        }
        ConversationKind::PublicChannel
    }

    /// File stem for this conversation's export documents: the channel name,
    /// or the id for nameless conversations (DMs, group DMs).
    pub fn export_name(&self) -> String {
        let base = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id.0);
        base.replace(['/', '\\'], "_")
    }
}

/// A workspace member as returned by `users.list`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One page of `conversations.list`.
#[derive(Clone, Debug, Deserialize)]
pub struct ConversationsPage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Vec<Conversation>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ConversationsPage {
    pub fn next_cursor(&self) -> Option<String> {
        page_cursor(&self.response_metadata)
    }
}

/// One page of `conversations.history` or `conversations.replies`.
#[derive(Clone, Debug, Deserialize)]
pub struct MessagesPage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl MessagesPage {
    pub fn next_cursor(&self) -> Option<String> {
        page_cursor(&self.response_metadata)
    }
}

/// One page of `conversations.members`.
#[derive(Clone, Debug, Deserialize)]
pub struct MembersPage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl MembersPage {
    pub fn next_cursor(&self) -> Option<String> {
        page_cursor(&self.response_metadata)
    }
}

/// One page of `users.list`.
#[derive(Clone, Debug, Deserialize)]
pub struct UsersPage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl UsersPage {
    pub fn next_cursor(&self) -> Option<String> {
        page_cursor(&self.response_metadata)
    }
}

/// The `emoji.list` response: name → image URL or `alias:<name>`.
#[derive(Clone, Debug, Deserialize)]
pub struct EmojiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub emoji: BTreeMap<String, String>,
}

/// Page-number pagination used by `files.list` (not cursor-based).
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Paging {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page")]
    pub pages: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for Paging {
    fn default() -> Self {
        Self { page: 1, pages: 1 }
    }
}

/// One page of `files.list`, file metadata kept opaque.
#[derive(Clone, Debug, Deserialize)]
pub struct FilesPage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub files: Vec<Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl_api_envelope!(
    ConversationsPage,
    MessagesPage,
    MembersPage,
    UsersPage,
    EmojiResponse,
    FilesPage,
);
