//! Domain validation errors.

use crate::enums::IndicatorKind;

/// Errors raised while parsing or validating domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Instrument code not offered by the builder.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    /// Timeframe code not offered by the builder.
    #[error("Unknown timeframe: {0}")]
    UnknownTimeframe(String),
    /// Indicator name not understood by the synthesizer.
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),
    /// Robot method not understood by the backend.
    #[error("Unknown robot method: {0}")]
    UnknownMethod(String),
    /// An active indicator carries an unusable parameter.
    #[error("Invalid {indicator} setting: {reason}")]
    InvalidIndicator {
        /// Indicator the parameter belongs to.
        indicator: IndicatorKind,
        /// What is wrong with it.
        reason: String,
    },
    /// Lot size or stop distances are unusable.
    #[error("Invalid risk settings: {0}")]
    InvalidRisk(String),
}
