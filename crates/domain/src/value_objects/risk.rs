use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest lot size the builder accepts.
pub const MAX_LOT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Position sizing and exit distances.
///
/// Stop-loss and take-profit are expressed in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSettings {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub lot: Decimal,
    pub sl: u32,
    pub tp: u32,
}

impl RiskSettings {
    pub fn new(lot: Decimal, sl: u32, tp: u32) -> Self {
        Self { lot, sl, tp }
    }

    /// Risk used by the dashboard's deploy dialog.
    #[must_use]
    pub fn deployment_default() -> Self {
        Self {
            lot: Decimal::new(1, 1),
            sl: 300,
            tp: 600,
        }
    }

    /// Checks the lot size is tradable.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidRisk`] for a non-positive or oversized lot.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lot <= Decimal::ZERO {
            return Err(DomainError::InvalidRisk("lot must be positive".to_string()));
        }
        if self.lot > MAX_LOT {
            return Err(DomainError::InvalidRisk(format!(
                "lot must not exceed {MAX_LOT}"
            )));
        }
        Ok(())
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            lot: Decimal::new(1, 2),
            sl: 30,
            tp: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let risk = RiskSettings::default();
        assert_eq!(risk.lot, dec!(0.01));
        assert_eq!((risk.sl, risk.tp), (30, 60));

        let deploy = RiskSettings::deployment_default();
        assert_eq!(deploy.lot, dec!(0.1));
        assert_eq!((deploy.sl, deploy.tp), (300, 600));
    }

    #[test]
    fn test_lot_bounds() {
        assert!(RiskSettings::new(dec!(0), 30, 60).validate().is_err());
        assert!(RiskSettings::new(dec!(-0.5), 30, 60).validate().is_err());
        assert!(RiskSettings::new(dec!(100.01), 30, 60).validate().is_err());
        assert!(RiskSettings::new(dec!(100), 30, 60).validate().is_ok());
    }

    #[test]
    fn test_lot_serializes_as_number() {
        let json = serde_json::to_value(RiskSettings::default()).unwrap();
        assert_eq!(json["lot"], 0.01);
        assert_eq!(json["sl"], 30);
    }

    #[test]
    fn test_lot_accepts_string_form() {
        let risk: RiskSettings =
            serde_json::from_str(r#"{"lot": "0.05", "sl": 20, "tp": 40}"#).unwrap();
        assert_eq!(risk.lot, dec!(0.05));
    }
}
