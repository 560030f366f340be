use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::{
    domain::{ChannelId, MessageTs},
    Result,
};

use super::{port::SlackApi, types::*};

#[derive(Clone, Copy, Debug)]
pub struct PaceConfig {
    /// Maximum calls allowed inside one sliding window.
    pub max_calls: usize,
    /// Window length.
    pub window: Duration,
}

impl Default for PaceConfig {
    fn default() -> Self {
        // 95 calls per 55 s, just under the Tier 3 method budget.
        Self {
            max_calls: 95,
            window: Duration::from_secs(55),
        }
    }
}

/// Sliding window over recent call start times.
#[derive(Debug)]
struct CallWindow {
    max_calls: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl CallWindow {
    fn new(cfg: PaceConfig) -> Self {
        Self {
            max_calls: cfg.max_calls.max(1),
            window: cfg.window,
            calls: VecDeque::with_capacity(cfg.max_calls.max(1)),
        }
    }

    /// Reserve a call slot and return how long to wait before issuing it.
    fn reserve(&mut self, now: Instant) -> Duration {
        if self.calls.len() < self.max_calls {
            self.calls.push_back(now);
            return Duration::ZERO;
        }

        let oldest = self.calls.pop_front().expect("window is non-empty");
        let earliest = oldest + self.window;
        let start = if now >= earliest { now } else { earliest };
        self.calls.push_back(start);
        start.saturating_duration_since(now)
    }
}

/// `SlackApi` decorator that spaces outbound calls.
///
/// This only paces requests; a throttling response from the API is still
/// surfaced as a fatal `Error::RateLimited`.
pub struct PacedApi {
    inner: Arc<dyn SlackApi>,
    window: Mutex<CallWindow>,
}

impl PacedApi {
    pub fn new(inner: Arc<dyn SlackApi>, cfg: PaceConfig) -> Self {
        Self {
            inner,
            window: Mutex::new(CallWindow::new(cfg)),
        }
    }

    async fn pace(&self) {
        let wait = { self.window.lock().await.reserve(Instant::now()) };
        if wait > Duration::ZERO {
            tracing::debug!("call budget exhausted, sleeping {}ms", wait.as_millis());
            sleep(wait).await;
        }
    }
}

#[async_trait]
impl SlackApi for PacedApi {
    async fn list_conversations(&self, cursor: Option<&str>) -> Result<ConversationsPage> {
        self.pace().await;
        self.inner.list_conversations(cursor).await
    }

    async fn conversation_history(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MessagesPage> {
        self.pace().await;
        self.inner.conversation_history(channel, cursor).await
    }

    async fn conversation_replies(
        &self,
        channel: &ChannelId,
        thread_ts: &MessageTs,
        cursor: Option<&str>,
    ) -> Result<MessagesPage> {
        self.pace().await;
        self.inner
            .conversation_replies(channel, thread_ts, cursor)
            .await
    }

    async fn conversation_members(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<MembersPage> {
        self.pace().await;
        self.inner.conversation_members(channel, cursor).await
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<UsersPage> {
        self.pace().await;
        self.inner.list_users(cursor).await
    }

    async fn list_emoji(&self) -> Result<EmojiResponse> {
        self.pace().await;
        self.inner.list_emoji().await
    }

    async fn list_files(&self, channel: &ChannelId, page: u32) -> Result<FilesPage> {
        self.pace().await;
        self.inner.list_files(channel, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(max_calls: usize, window_ms: u64) -> CallWindow {
        CallWindow::new(PaceConfig {
            max_calls,
            window: Duration::from_millis(window_ms),
        })
    }

    #[test]
    fn calls_under_the_limit_are_not_delayed() {
        let mut w = window(3, 1000);
        let now = Instant::now();
        assert_eq!(w.reserve(now), Duration::ZERO);
        assert_eq!(w.reserve(now), Duration::ZERO);
        assert_eq!(w.reserve(now), Duration::ZERO);
    }

    #[test]
    fn exceeding_the_limit_waits_out_the_window() {
        let mut w = window(2, 1000);
        let now = Instant::now();
        assert_eq!(w.reserve(now), Duration::ZERO);
        assert_eq!(w.reserve(now), Duration::ZERO);

        // Third call inside the same window must wait until the oldest slot
        // ages out.
        let wait = w.reserve(now + Duration::from_millis(100));
        assert_eq!(wait, Duration::from_millis(900));
    }

    #[test]
    fn old_calls_age_out_of_the_window() {
        let mut w = window(2, 1000);
        let now = Instant::now();
        assert_eq!(w.reserve(now), Duration::ZERO);
        assert_eq!(w.reserve(now), Duration::ZERO);

        let later = now + Duration::from_millis(1500);
        assert_eq!(w.reserve(later), Duration::ZERO);
    }
}
