use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A MetaTrader 5 account linked to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingAccount {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    #[serde(default)]
    pub broker: String,
    #[serde(default)]
    pub mt5_login: String,
    #[serde(default)]
    pub mt5_server: String,
    #[serde(default = "default_demo")]
    pub is_demo: bool,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub equity: Option<Decimal>,
}

fn default_demo() -> bool {
    true
}

impl TradingAccount {
    /// Short label for listings.
    #[must_use]
    pub fn label(&self) -> String {
        let mode = if self.is_demo { "demo" } else { "live" };
        format!("#{} @ {} ({mode})", self.mt5_login, self.mt5_server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_numeric_id() {
        let account: TradingAccount = serde_json::from_str(
            r#"{"id": 3, "broker": "ICM", "mt5_login": "5100", "mt5_server": "ICM-Demo", "is_demo": true}"#,
        )
        .unwrap();
        assert_eq!(account.id, "3");
        assert_eq!(account.label(), "#5100 @ ICM-Demo (demo)");
        assert!(account.balance.is_none());
    }
}
