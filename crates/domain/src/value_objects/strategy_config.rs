use super::indicators::IndicatorSet;
use super::risk::RiskSettings;
use crate::enums::{IndicatorKind, Symbol, Timeframe};
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The user's choices in the robot builder.
///
/// Created when the builder opens, edited in place, and discarded on
/// navigation away or once synthesis succeeds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub indicators: IndicatorSet,
    pub risk: RiskSettings,
}

impl StrategyConfig {
    /// Creates a configuration for the given market with default indicators and risk.
    #[must_use]
    pub fn new(symbol: Symbol, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            ..Self::default()
        }
    }

    /// Sets the instrument.
    #[must_use]
    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }

    /// Sets the timeframe.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Replaces the indicator set.
    #[must_use]
    pub fn with_indicators(mut self, indicators: IndicatorSet) -> Self {
        self.indicators = indicators;
        self
    }

    /// Replaces the risk settings.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskSettings) -> Self {
        self.risk = risk;
        self
    }

    /// Switches an indicator on or off.
    pub fn toggle_indicator(&mut self, kind: IndicatorKind, active: bool) {
        self.indicators.set_active(kind, active);
    }

    pub fn set_lot(&mut self, lot: Decimal) {
        self.risk.lot = lot;
    }

    pub fn set_stop_loss(&mut self, points: u32) {
        self.risk.sl = points;
    }

    pub fn set_take_profit(&mut self, points: u32) {
        self.risk.tp = points;
    }

    /// Whether at least one indicator provides a signal source.
    #[must_use]
    pub fn has_active_indicator(&self) -> bool {
        !self.indicators.active_kinds().is_empty()
    }

    /// Validates indicator parameters and risk settings.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.indicators.validate()?;
        self.risk.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_matches_builder_initial_state() {
        let config = StrategyConfig::default();
        assert_eq!(config.symbol, Symbol::Eurusd);
        assert_eq!(config.timeframe, Timeframe::H1);
        assert!(config.indicators.rsi.active);
        assert!(config.has_active_indicator());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_in_place_edits() {
        let mut config = StrategyConfig::new(Symbol::Xauusd, Timeframe::M15);
        config.toggle_indicator(IndicatorKind::Rsi, false);
        assert!(!config.has_active_indicator());

        config.toggle_indicator(IndicatorKind::Bands, true);
        config.set_lot(dec!(0.5));
        config.set_stop_loss(120);
        config.set_take_profit(240);

        assert!(config.has_active_indicator());
        assert_eq!(config.risk, RiskSettings::new(dec!(0.5), 120, 240));
    }

    #[test]
    fn test_invalid_risk_fails_validation() {
        let mut config = StrategyConfig::default();
        config.set_lot(dec!(0));
        assert!(matches!(config.validate(), Err(DomainError::InvalidRisk(_))));
    }
}
