use async_trait::async_trait;

use crate::{
    domain::{ChannelId, MessageTs},
    Result,
};

use super::types::*;

/// Port over the Web API endpoints the exporter consumes.
///
/// One call corresponds to one request (one page); pagination loops live in
/// the pipeline so fakes can count requests per page.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `conversations.list`, covering all four conversation classes.
    async fn list_conversations(&self, cursor: Option<&str>) -> Result<ConversationsPage>;

    /// `conversations.history`.
    async fn conversation_history(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MessagesPage>;

    /// `conversations.replies` for one thread.
    async fn conversation_replies(
        &self,
        channel: &ChannelId,
        thread_ts: &MessageTs,
        cursor: Option<&str>,
    ) -> Result<MessagesPage>;

    /// `conversations.members`.
    async fn conversation_members(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MembersPage>;

    /// `users.list`.
    async fn list_users(&self, cursor: Option<&str>) -> Result<UsersPage>;

    /// `emoji.list` (single call, not paginated).
    async fn list_emoji(&self) -> Result<EmojiResponse>;

    /// `files.list` for one conversation, page-number based.
    async fn list_files(&self, channel: &ChannelId, page: u32) -> Result<FilesPage>;
}
