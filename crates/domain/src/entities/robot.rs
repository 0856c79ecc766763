use crate::enums::{IndicatorKind, RobotMethod, RobotSymbol};
use crate::value_objects::{RiskSettings, RobotId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A robot record as the backend stores it.
///
/// `symbol`, `indicators` and `risk_settings` are free-form columns on the
/// backend; values this client does not recognise never fail the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    #[serde(default)]
    pub name: Option<String>,
    pub symbol: RobotSymbol,
    #[serde(default)]
    pub method: RobotMethod,
    #[serde(default, deserialize_with = "known_indicators")]
    pub indicators: Vec<IndicatorKind>,
    #[serde(default, deserialize_with = "complete_risk")]
    pub risk_settings: Option<RiskSettings>,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub mql5_code: Option<String>,
    #[serde(default)]
    pub python_code: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Robot {
    /// Whether the backend registered this robot.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.id.is_server()
    }

    /// Generated MQL5 source, if any and non-empty.
    #[must_use]
    pub fn mql5(&self) -> Option<&str> {
        self.mql5_code.as_deref().filter(|code| !code.is_empty())
    }

    /// Generated Python source, if any and non-empty.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.python_code.as_deref().filter(|code| !code.is_empty())
    }
}

/// Keeps the indicator names this client understands and drops the rest.
fn known_indicators<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<IndicatorKind>, D::Error> {
    let kinds = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|name| name.parse().ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(kinds)
}

/// Empty or partial risk objects read as absent.
fn complete_risk<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RiskSettings>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A titled message shown to the user in a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    pub title: String,
    pub message: String,
}

impl Disclosure {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// A robot fabricated locally because the synthesis engine was unreachable.
///
/// Carries a [`RobotId::Local`] identity and the notice that must be shown
/// alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackArtifact {
    pub robot: Robot,
    pub disclosure: Disclosure,
}
