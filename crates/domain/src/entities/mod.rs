pub mod account;
pub mod robot;
pub mod social;
pub mod user;

pub use account::TradingAccount;
pub use robot::{Disclosure, FallbackArtifact, Robot};
pub use social::{ChatGroup, ChatMessage, Post};
pub use user::{Session, SessionCookies, UserProfile};

use serde::{Deserialize, Deserializer};

/// Accepts a primary key sent either as a JSON number or a string.
pub(crate) fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}
