//! Strongly typed indicator configuration.
//!
//! Each indicator the builder offers has its own record with an `active`
//! flag and its numeric parameters. Parameters are checked once, at the
//! boundary, by [`IndicatorSet::validate`]; inactive indicators are never
//! validated since they are not sent.

use crate::enums::{IndicatorKind, MaType};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Relative Strength Index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiConfig {
    pub active: bool,
    pub period: u32,
    /// Oversold level that triggers a buy.
    #[serde(rename = "buy")]
    pub buy_level: f64,
    /// Overbought level that triggers a sell.
    #[serde(rename = "sell")]
    pub sell_level: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            active: true,
            period: 14,
            buy_level: 30.0,
            sell_level: 70.0,
        }
    }
}

/// Moving average settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageConfig {
    pub active: bool,
    pub period: u32,
    #[serde(rename = "type")]
    pub ma_type: MaType,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            active: false,
            period: 50,
            ma_type: MaType::Sma,
        }
    }
}

/// MACD settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdConfig {
    pub active: bool,
    pub fast_period: u32,
    pub slow_period: u32,
    pub signal_period: u32,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            active: false,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Bollinger bands settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerConfig {
    pub active: bool,
    pub period: u32,
    /// Band width in standard deviations.
    #[serde(rename = "dev")]
    pub deviation: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            active: false,
            period: 20,
            deviation: 2.0,
        }
    }
}

/// Stochastic oscillator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticConfig {
    pub active: bool,
    pub k_period: u32,
    pub d_period: u32,
    pub slowing: u32,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            active: false,
            k_period: 5,
            d_period: 3,
            slowing: 3,
        }
    }
}

/// One configuration record per indicator the builder offers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: RsiConfig,
    pub ma: MovingAverageConfig,
    pub macd: MacdConfig,
    pub bands: BollingerConfig,
    pub stoch: StochasticConfig,
}

impl IndicatorSet {
    /// Returns an indicator set with every indicator switched off.
    #[must_use]
    pub fn none_active() -> Self {
        let mut set = Self::default();
        for kind in IndicatorKind::ALL {
            set.set_active(kind, false);
        }
        set
    }

    /// Whether the given indicator is switched on.
    #[must_use]
    pub fn is_active(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Rsi => self.rsi.active,
            IndicatorKind::Ma => self.ma.active,
            IndicatorKind::Macd => self.macd.active,
            IndicatorKind::Bands => self.bands.active,
            IndicatorKind::Stoch => self.stoch.active,
        }
    }

    /// Switches an indicator on or off.
    pub fn set_active(&mut self, kind: IndicatorKind, active: bool) {
        match kind {
            IndicatorKind::Rsi => self.rsi.active = active,
            IndicatorKind::Ma => self.ma.active = active,
            IndicatorKind::Macd => self.macd.active = active,
            IndicatorKind::Bands => self.bands.active = active,
            IndicatorKind::Stoch => self.stoch.active = active,
        }
    }

    /// Active indicators in backend order.
    #[must_use]
    pub fn active_kinds(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// Validates the parameters of every active indicator.
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |indicator: IndicatorKind, reason: &str| DomainError::InvalidIndicator {
            indicator,
            reason: reason.to_string(),
        };

        if self.rsi.active {
            let rsi = &self.rsi;
            if rsi.period == 0 {
                return Err(invalid(IndicatorKind::Rsi, "period must be positive"));
            }
            let in_bounds = |level: f64| (0.0..=100.0).contains(&level);
            if !in_bounds(rsi.buy_level) || !in_bounds(rsi.sell_level) {
                return Err(invalid(IndicatorKind::Rsi, "levels must lie within 0..=100"));
            }
            if rsi.buy_level >= rsi.sell_level {
                return Err(invalid(
                    IndicatorKind::Rsi,
                    "buy level must be below sell level",
                ));
            }
        }

        if self.ma.active && self.ma.period == 0 {
            return Err(invalid(IndicatorKind::Ma, "period must be positive"));
        }

        if self.macd.active {
            let macd = &self.macd;
            if macd.fast_period == 0 || macd.slow_period == 0 || macd.signal_period == 0 {
                return Err(invalid(IndicatorKind::Macd, "periods must be positive"));
            }
            if macd.fast_period >= macd.slow_period {
                return Err(invalid(
                    IndicatorKind::Macd,
                    "fast period must be shorter than slow period",
                ));
            }
        }

        if self.bands.active {
            if self.bands.period == 0 {
                return Err(invalid(IndicatorKind::Bands, "period must be positive"));
            }
            if !(self.bands.deviation > 0.0) {
                return Err(invalid(IndicatorKind::Bands, "deviation must be positive"));
            }
        }

        if self.stoch.active {
            let stoch = &self.stoch;
            if stoch.k_period == 0 || stoch.d_period == 0 || stoch.slowing == 0 {
                return Err(invalid(IndicatorKind::Stoch, "periods must be positive"));
            }
        }

        Ok(())
    }
}
