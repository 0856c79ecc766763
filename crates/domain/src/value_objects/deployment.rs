use super::risk::RiskSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of a deploy call binding a robot to a trading account.
///
/// Only built by the deployment handoff, after a robot identity is in hand.
/// Lives for the duration of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub account_id: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub lot: Decimal,
    pub sl: u32,
    pub tp: u32,
}

impl DeploymentRequest {
    pub fn new(account_id: impl Into<String>, risk: RiskSettings) -> Self {
        Self {
            account_id: account_id.into(),
            lot: risk.lot,
            sl: risk.sl,
            tp: risk.tp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let request = DeploymentRequest::new("7", RiskSettings::deployment_default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["account_id"], "7");
        assert_eq!(json["lot"], 0.1);
        assert_eq!(json["sl"], 300);
        assert_eq!(json["tp"], 600);
    }
}
