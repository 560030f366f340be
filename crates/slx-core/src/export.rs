use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    api::{port::SlackApi, types::*},
    archive::Archive,
    config::Config,
    domain::{ChannelId, MessageTs, UserId},
    Result,
};

/// Counts for one completed run.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub root: PathBuf,
    pub conversations: usize,
    pub messages: usize,
    pub threads: usize,
    pub users: usize,
    pub emoji: usize,
    pub files: usize,
}

impl ExportSummary {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            conversations: 0,
            messages: 0,
            threads: 0,
            users: 0,
            emoji: 0,
            files: 0,
        }
    }
}

/// The export pipeline: list conversations, drain each one's history and
/// ancillary resources, then the user list and emoji mapping, writing
/// everything into one date/time-stamped run directory.
///
/// Strictly sequential; the first error aborts the run, keeping whatever was
/// already written.
pub struct Exporter {
    api: Arc<dyn SlackApi>,
    cfg: Arc<Config>,
}

impl Exporter {
    pub fn new(api: Arc<dyn SlackApi>, cfg: Arc<Config>) -> Self {
        Self { api, cfg }
    }

    /// Full export run.
    ///
    /// The run directory is created only after the listing succeeds, so a
    /// rejected credential leaves no output behind.
    pub async fn run(&self) -> Result<ExportSummary> {
        let conversations = self.list_conversations().await?;
        info!("listed {} conversations", conversations.len());

        let archive = Archive::create_under(&self.cfg.archive_root)?;
        archive.write_json("channels", &conversations, false)?;

        let mut summary = ExportSummary::new(archive.root().to_path_buf());
        summary.conversations = conversations.len();

        for conversation in &conversations {
            self.export_conversation(&archive, conversation, &mut summary)
                .await?;
        }

        let users = self.fetch_users().await?;
        archive.write_json("users", &users, true)?;
        summary.users = users.len();

        let emoji = self.fetch_emoji().await?;
        archive.write_json("emoji", &emoji, true)?;
        summary.emoji = emoji.len();

        info!("export complete: {}", summary.root.display());
        Ok(summary)
    }

    /// Export only the custom emoji mapping.
    pub async fn run_emoji_only(&self) -> Result<ExportSummary> {
        let emoji = self.fetch_emoji().await?;

        let archive = Archive::create_under(&self.cfg.archive_root)?;
        archive.write_json("emoji", &emoji, true)?;

        let mut summary = ExportSummary::new(archive.root().to_path_buf());
        summary.emoji = emoji.len();
        info!("emoji export complete: {}", summary.root.display());
        Ok(summary)
    }

    /// Drain `conversations.list` across all conversation classes.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!("conversations.list cursor={cursor:?}");
            let page = self.api.list_conversations(cursor.as_deref()).await?;
            let next = page.next_cursor();
            out.extend(page.channels);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(out)
    }

    async fn export_conversation(
        &self,
        archive: &Archive,
        conversation: &Conversation,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let name = conversation.export_name();
        debug!(
            "exporting {} ({}, {:?})",
            name,
            conversation.id,
            conversation.kind()
        );

        let messages = self.fetch_history(&conversation.id).await?;
        archive.write_json(&format!("conversations/{name}"), &messages, false)?;
        summary.messages += messages.len();

        for ts in thread_parents(&messages) {
            let replies = self.fetch_replies(&conversation.id, &ts).await?;
            archive.write_json(&format!("threads/{name}/{ts}"), &replies, false)?;
            summary.threads += 1;
        }

        if conversation.num_members != Some(0) {
            let mut members = self.fetch_members(&conversation.id).await?;
            members.sort();
            archive.write_json(&format!("members/{}", conversation.id), &members, true)?;
        }

        let files = self.fetch_files(&conversation.id).await?;
        if !files.is_empty() {
            summary.files += files.len();
            archive.write_json(&format!("files/{}", conversation.id), &files, false)?;
        }

        Ok(())
    }

    /// Drain one conversation's history, keeping messages in arrival order.
    async fn fetch_history(&self, channel: &ChannelId) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!("conversations.history {channel} cursor={cursor:?}");
            let page = self
                .api
                .conversation_history(channel, cursor.as_deref())
                .await?;
            let next = page.next_cursor();
            out.extend(page.messages);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(out)
    }

    async fn fetch_replies(&self, channel: &ChannelId, thread_ts: &MessageTs) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!("conversations.replies {channel} ts={thread_ts} cursor={cursor:?}");
            let page = self
                .api
                .conversation_replies(channel, thread_ts, cursor.as_deref())
                .await?;
            let next = page.next_cursor();
            out.extend(page.messages);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(out)
    }

    async fn fetch_members(&self, channel: &ChannelId) -> Result<Vec<UserId>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!("conversations.members {channel} cursor={cursor:?}");
            let page = self
                .api
                .conversation_members(channel, cursor.as_deref())
                .await?;
            let next = page.next_cursor();
            out.extend(page.members);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(out)
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!("users.list cursor={cursor:?}");
            let page = self.api.list_users(cursor.as_deref()).await?;
            let next = page.next_cursor();
            out.extend(page.members);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(out)
    }

    async fn fetch_emoji(&self) -> Result<BTreeMap<String, String>> {
        debug!("emoji.list");
        Ok(self.api.list_emoji().await?.emoji)
    }

    /// Drain one conversation's file metadata (page-number pagination).
    async fn fetch_files(&self, channel: &ChannelId) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        let mut page_no = 1u32;
        loop {
            debug!("files.list {channel} page={page_no}");
            let page = self.api.list_files(channel, page_no).await?;
            let paging = page.paging.unwrap_or_default();
            out.extend(page.files);
            if paging.page >= paging.pages {
                break;
            }
            page_no = paging.page + 1;
        }
        Ok(out)
    }
}

/// Thread parents: messages carrying replies, where `ts == thread_ts`.
/// Replies broadcast back into the channel repeat their parent's `thread_ts`
/// and must not trigger a second fetch.
fn thread_parents(messages: &[Value]) -> Vec<MessageTs> {
    let mut out = Vec::new();
    for message in messages {
        let reply_count = message
            .get("reply_count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if reply_count == 0 {
            continue;
        }
        let (Some(ts), Some(thread_ts)) = (
            message.get("ts").and_then(Value::as_str),
            message.get("thread_ts").and_then(Value::as_str),
        ) else {
            continue;
        };
        if ts == thread_ts {
            out.push(MessageTs(ts.to_string()));
        }
    }
    out
}
