use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A chat group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatGroup {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
