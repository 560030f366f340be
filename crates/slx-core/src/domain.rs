use serde::{Deserialize, Serialize};

/// Slack conversation id (`C…` public, `G…` private, `D…` direct).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slack user id (`U…` / `W…`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slack message timestamp (`1712345678.000123`), unique within a conversation
/// and used as the thread key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTs(pub String);

impl std::fmt::Display for MessageTs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four conversation classes the listing endpoint can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    PublicChannel,
    PrivateChannel,
    DirectMessage,
    GroupDirectMessage,
}

impl ConversationKind {
    /// Wire-format type string as used by `conversations.list`.
    pub fn as_api_type(self) -> &'static str {
        match self {
            ConversationKind::PublicChannel => "public_channel",
            ConversationKind::PrivateChannel => "private_channel",
            ConversationKind::DirectMessage => "im",
            ConversationKind::GroupDirectMessage => "mpim",
        }
    }

    /// All classes, in the order they are requested from the listing endpoint.
    pub fn all() -> [ConversationKind; 4] {
        [
            ConversationKind::PublicChannel,
            ConversationKind::PrivateChannel,
            ConversationKind::GroupDirectMessage,
            ConversationKind::DirectMessage,
        ]
    }

    /// Comma-separated `types` parameter covering every class.
    pub fn all_api_types() -> String {
        Self::all()
            .iter()
            .map(|k| k.as_api_type())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_types_cover_all_conversation_classes() {
        let types = ConversationKind::all_api_types();
        assert_eq!(types, "public_channel,private_channel,mpim,im");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ChannelId("C012AB3CD".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"C012AB3CD\"");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
