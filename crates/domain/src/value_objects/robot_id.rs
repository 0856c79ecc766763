use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Prefix marking identifiers fabricated on this side of the wire.
pub const LOCAL_ID_PREFIX: &str = "LOCAL-";

/// Identity of a robot record.
///
/// Server identities come from the backend. Local identities belong to
/// fallback artifacts and are always rendered with [`LOCAL_ID_PREFIX`], so
/// they can never be mistaken for something the backend registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RobotId {
    Server(String),
    Local(String),
}

impl RobotId {
    /// Creates a fresh local identity.
    #[must_use]
    pub fn new_local() -> Self {
        Self::Local(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an identity issued by the backend.
    pub fn server(id: impl Into<String>) -> Self {
        Self::Server(id.into())
    }

    /// Parses an identity, recognising the local prefix.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(LOCAL_ID_PREFIX) {
            Some(local) => Self::Local(local.to_string()),
            None => Self::Server(raw.to_string()),
        }
    }

    /// Whether the backend knows this robot.
    #[must_use]
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server(_))
    }

    /// First `len` characters of the rendered id, used in file names.
    #[must_use]
    pub fn short(&self, len: usize) -> String {
        self.to_string().chars().take(len).collect()
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => f.write_str(id),
            Self::Local(id) => write!(f, "{LOCAL_ID_PREFIX}{id}"),
        }
    }
}

impl Serialize for RobotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RobotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The backend issues both integer and uuid primary keys.
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(Self::parse(&s)),
            serde_json::Value::Number(n) => Ok(Self::Server(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "invalid robot id: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ids_are_prefixed() {
        let id = RobotId::new_local();
        assert!(!id.is_server());
        assert!(id.to_string().starts_with(LOCAL_ID_PREFIX));
    }

    #[test]
    fn test_parse_round_trips_prefix() {
        let id = RobotId::new_local();
        assert_eq!(RobotId::parse(&id.to_string()), id);
        assert_eq!(RobotId::parse("42"), RobotId::server("42"));
    }

    #[test]
    fn test_numeric_ids_deserialize_as_server() {
        let id: RobotId = serde_json::from_str("17").unwrap();
        assert_eq!(id, RobotId::server("17"));
    }

    #[test]
    fn test_short() {
        let id = RobotId::server("0123456789abcdef");
        assert_eq!(id.short(8), "01234567");
    }
}
