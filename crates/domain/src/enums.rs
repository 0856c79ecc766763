use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tradable instrument codes offered by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    #[default]
    Eurusd,
    Gbpusd,
    Usdjpy,
    Audusd,
    Usdcad,
    Usdchf,
    Nzdusd,
    Btcusd,
    Xauusd,
    Xagusd,
}

impl Symbol {
    /// All instruments in display order.
    pub const ALL: [Symbol; 10] = [
        Symbol::Eurusd,
        Symbol::Gbpusd,
        Symbol::Usdjpy,
        Symbol::Audusd,
        Symbol::Usdcad,
        Symbol::Usdchf,
        Symbol::Nzdusd,
        Symbol::Btcusd,
        Symbol::Xauusd,
        Symbol::Xagusd,
    ];

    /// Instrument code as the backend expects it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eurusd => "EURUSD",
            Self::Gbpusd => "GBPUSD",
            Self::Usdjpy => "USDJPY",
            Self::Audusd => "AUDUSD",
            Self::Usdcad => "USDCAD",
            Self::Usdchf => "USDCHF",
            Self::Nzdusd => "NZDUSD",
            Self::Btcusd => "BTCUSD",
            Self::Xauusd => "XAUUSD",
            Self::Xagusd => "XAGUSD",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == upper)
            .ok_or_else(|| DomainError::UnknownSymbol(s.to_string()))
    }
}

/// Instrument stored on a robot record.
///
/// The backend keeps the symbol as free text, so codes outside the builder's
/// list are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RobotSymbol {
    Known(Symbol),
    Other(String),
}

impl RobotSymbol {
    /// The builder instrument, when the code is one.
    #[must_use]
    pub fn known(&self) -> Option<Symbol> {
        match self {
            Self::Known(symbol) => Some(*symbol),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(symbol) => symbol.as_str(),
            Self::Other(code) => code,
        }
    }
}

impl Default for RobotSymbol {
    fn default() -> Self {
        Self::Known(Symbol::default())
    }
}

impl From<Symbol> for RobotSymbol {
    fn from(symbol: Symbol) -> Self {
        Self::Known(symbol)
    }
}

impl From<String> for RobotSymbol {
    fn from(code: String) -> Self {
        code.parse().map_or(Self::Other(code), Self::Known)
    }
}

impl From<RobotSymbol> for String {
    fn from(symbol: RobotSymbol) -> Self {
        match symbol {
            RobotSymbol::Known(symbol) => symbol.as_str().to_string(),
            RobotSymbol::Other(code) => code,
        }
    }
}

impl PartialEq<Symbol> for RobotSymbol {
    fn eq(&self, other: &Symbol) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for RobotSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart timeframe the strategy is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    M5,
    M15,
    #[default]
    H1,
    D1,
}

impl Timeframe {
    /// Timeframe code as the backend expects it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::H1 => "H1",
            Self::D1 => "D1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M5" => Ok(Self::M5),
            "M15" => Ok(Self::M15),
            "H1" => Ok(Self::H1),
            "D1" => Ok(Self::D1),
            _ => Err(DomainError::UnknownTimeframe(s.to_string())),
        }
    }
}

/// Indicator families the synthesizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Rsi,
    Ma,
    Macd,
    Bands,
    Stoch,
}

impl IndicatorKind {
    /// All indicator kinds, in the order they are sent to the backend.
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Rsi,
        IndicatorKind::Ma,
        IndicatorKind::Macd,
        IndicatorKind::Bands,
        IndicatorKind::Stoch,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Ma => "ma",
            Self::Macd => "macd",
            Self::Bands => "bands",
            Self::Stoch => "stoch",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rsi" => Ok(Self::Rsi),
            "ma" => Ok(Self::Ma),
            "macd" => Ok(Self::Macd),
            "bands" | "bollinger" => Ok(Self::Bands),
            "stoch" | "stochastic" => Ok(Self::Stoch),
            _ => Err(DomainError::UnknownIndicator(s.to_string())),
        }
    }
}

/// Moving average smoothing method, using the MQL5 constant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaType {
    #[default]
    #[serde(rename = "MODE_SMA")]
    Sma,
    #[serde(rename = "MODE_EMA")]
    Ema,
    #[serde(rename = "MODE_SMMA")]
    Smma,
    #[serde(rename = "MODE_LWMA")]
    Lwma,
}

/// How a robot's strategy was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMethod {
    /// Indicator win-rate backtest.
    #[default]
    Winrate,
    /// RNN machine learning.
    Ml,
}

impl RobotMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winrate => "winrate",
            Self::Ml => "ml",
        }
    }
}

impl fmt::Display for RobotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winrate" => Ok(Self::Winrate),
            "ml" => Ok(Self::Ml),
            _ => Err(DomainError::UnknownMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parsing_is_case_insensitive() {
        assert_eq!("eurusd".parse::<Symbol>().unwrap(), Symbol::Eurusd);
        assert_eq!(" XAUUSD ".parse::<Symbol>().unwrap(), Symbol::Xauusd);
        assert!("EURXXX".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_every_builder_symbol_parses() {
        for code in ["USDCHF", "nzdusd", "XAGUSD"] {
            let symbol: Symbol = code.parse().unwrap();
            assert_eq!(symbol.as_str(), code.to_uppercase());
        }
        assert_eq!(Symbol::ALL.len(), 10);
        assert_eq!(serde_json::to_string(&Symbol::Xagusd).unwrap(), "\"XAGUSD\"");
    }

    #[test]
    fn test_symbol_serializes_as_code() {
        let json = serde_json::to_string(&Symbol::Gbpusd).unwrap();
        assert_eq!(json, "\"GBPUSD\"");
    }

    #[test]
    fn test_robot_symbol_keeps_unlisted_codes() {
        let known: RobotSymbol = serde_json::from_str("\"eurusd\"").unwrap();
        assert_eq!(known, Symbol::Eurusd);

        let other: RobotSymbol = serde_json::from_str("\"US30\"").unwrap();
        assert_eq!(other, RobotSymbol::Other("US30".to_string()));
        assert_eq!(other.known(), None);
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"US30\"");
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("m15".parse::<Timeframe>().unwrap(), Timeframe::M15);
        assert!("H4".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_indicator_aliases() {
        assert_eq!("bollinger".parse::<IndicatorKind>().unwrap(), IndicatorKind::Bands);
        assert_eq!("Stochastic".parse::<IndicatorKind>().unwrap(), IndicatorKind::Stoch);
    }

    #[test]
    fn test_ma_type_uses_mql5_names() {
        let json = serde_json::to_string(&MaType::Ema).unwrap();
        assert_eq!(json, "\"MODE_EMA\"");
    }
}
