use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "super::id_as_string", alias = "user_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// API token, when the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Server-side session cookies captured at sign-in.
    #[serde(default, skip_serializing_if = "SessionCookies::is_empty")]
    pub cookies: SessionCookies,
}

impl UserProfile {
    /// Whether the user may reach admin features.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Cookies that carry a server-side login between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCookies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

impl SessionCookies {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session_id.is_none() && self.csrf_token.is_none()
    }
}

impl Zeroize for SessionCookies {
    fn zeroize(&mut self) {
        self.session_id.zeroize();
        self.csrf_token.zeroize();
    }
}

/// Explicit session context handed to components at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(UserProfile),
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Bearer token to attach to requests, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.user().and_then(|user| user.token.as_deref())
    }

    /// Session cookies to replay, if any were captured.
    #[must_use]
    pub fn cookies(&self) -> Option<&SessionCookies> {
        self.user()
            .map(|user| &user.cookies)
            .filter(|cookies| !cookies.is_empty())
    }

    /// Tears the session down, wiping credentials from memory.
    pub fn clear(&mut self) {
        if let Self::Authenticated(user) = self {
            user.token.zeroize();
            user.cookies.zeroize();
        }
        *self = Self::Anonymous;
    }
}
