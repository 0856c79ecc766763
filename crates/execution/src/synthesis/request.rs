//! Maps a strategy configuration onto the synthesis endpoint's payload.

use traderobots_data::api::{IndicatorSettings, SynthesisRequest};
use traderobots_domain::entities::Disclosure;
use traderobots_domain::value_objects::StrategyConfig;

/// Dialog title shown when no indicator is selected.
pub const NO_INDICATOR_TITLE: &str = "Strategic Input Required";
/// Dialog message shown when no indicator is selected.
pub const NO_INDICATOR_MESSAGE: &str =
    "Select at least one indicator before generating a strategy.";

/// Why a synthesis attempt needs the user to correct something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// No indicator is active, so there is no signal source.
    NoIndicator,
    /// An active indicator or the risk settings are unusable.
    InvalidConfig,
    /// The backend refused the request and said why.
    Rejected,
    /// The backend requires a signed-in session.
    Unauthorized,
}

/// A failure the user has to fix before resubmitting.
///
/// Never triggers the fallback generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub kind: ValidationKind,
    pub reason: String,
}

impl ValidationFailure {
    pub fn new(kind: ValidationKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn no_indicator() -> Self {
        Self::new(ValidationKind::NoIndicator, NO_INDICATOR_MESSAGE)
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            ValidationKind::NoIndicator => NO_INDICATOR_TITLE,
            ValidationKind::InvalidConfig => "Invalid Strategy Settings",
            ValidationKind::Rejected => "Synthesis Rejected",
            ValidationKind::Unauthorized => "Authentication Required",
        }
    }

    /// The dialog to show for this failure.
    #[must_use]
    pub fn dialog(&self) -> Disclosure {
        Disclosure::new(self.title(), self.reason.clone())
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.reason)
    }
}

/// Builds the synthesis payload.
///
/// Only active indicators and their settings are included. Fails without
/// touching the network when no indicator is active or the configuration
/// does not validate.
///
/// # Errors
/// Returns a [`ValidationFailure`] describing what to fix.
pub fn build_request(config: &StrategyConfig) -> Result<SynthesisRequest, ValidationFailure> {
    let indicators = config.indicators.active_kinds();
    if indicators.is_empty() {
        return Err(ValidationFailure::no_indicator());
    }

    config
        .validate()
        .map_err(|e| ValidationFailure::new(ValidationKind::InvalidConfig, e.to_string()))?;

    let set = &config.indicators;
    let settings = IndicatorSettings {
        rsi_settings: set.rsi.active.then(|| set.rsi.clone()),
        ma_settings: set.ma.active.then(|| set.ma.clone()),
        macd_settings: set.macd.active.then(|| set.macd.clone()),
        bands_settings: set.bands.active.then(|| set.bands.clone()),
        stoch_settings: set.stoch.active.then(|| set.stoch.clone()),
    };

    Ok(SynthesisRequest {
        symbol: config.symbol,
        timeframe: config.timeframe,
        indicators,
        risk: config.risk,
        settings,
    })
}
