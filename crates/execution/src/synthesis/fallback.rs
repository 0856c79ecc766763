//! Local fallback generator.
//!
//! When the synthesis engine cannot be reached the workflow still hands the
//! user a robot so the wizard is not left stuck. The artifact is clearly
//! marked: a local identity, and a disclosure that must be shown with it.

use rand::Rng;
use traderobots_domain::entities::{Disclosure, FallbackArtifact, Robot};
use traderobots_domain::enums::{IndicatorKind, RobotMethod};
use traderobots_domain::value_objects::{RobotId, StrategyConfig};

/// Dialog title shown alongside a fallback artifact.
pub const FALLBACK_TITLE: &str = "Strategic Engine Offline";
/// Dialog message shown alongside a fallback artifact.
pub const FALLBACK_MESSAGE: &str = "The strategy engine could not be reached. A local synthetic \
     engine produced this robot from your settings; it is a preview only and cannot be deployed.";

/// Lower bound of the fabricated win rate, in percent.
pub const FALLBACK_WIN_RATE_MIN: f64 = 55.0;
/// Upper bound of the fabricated win rate, in percent. Never reached.
pub const FALLBACK_WIN_RATE_MAX: f64 = 75.0;

/// One decimal place, rounded down so the upper bound stays exclusive.
fn truncate_rate(raw: f64) -> f64 {
    (raw * 10.0).floor() / 10.0
}

/// Fabricates a placeholder robot for the given configuration.
///
/// Pure apart from the random source, so it can be exercised with a seeded
/// generator.
pub fn generate_fallback<R: Rng>(config: &StrategyConfig, rng: &mut R) -> FallbackArtifact {
    let win_rate = truncate_rate(rng.random_range(FALLBACK_WIN_RATE_MIN..FALLBACK_WIN_RATE_MAX));
    let indicators = config.indicators.active_kinds();

    let robot = Robot {
        id: RobotId::new_local(),
        name: Some(format!("Bot_{}_{}", config.symbol, config.timeframe)),
        symbol: config.symbol.into(),
        method: RobotMethod::Winrate,
        mql5_code: Some(placeholder_mql5(config, &indicators)),
        indicators,
        risk_settings: Some(config.risk),
        win_rate,
        python_code: None,
        is_active: false,
        user_name: None,
        created_at: Some(chrono::Utc::now()),
    };

    FallbackArtifact {
        robot,
        disclosure: Disclosure::new(FALLBACK_TITLE, FALLBACK_MESSAGE),
    }
}

fn placeholder_mql5(config: &StrategyConfig, indicators: &[IndicatorKind]) -> String {
    let names: Vec<&str> = indicators.iter().map(IndicatorKind::as_str).collect();
    let signals = if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    };

    format!(
        "//+------------------------------------------------------------------+\n\
         //| Bot_{symbol}_{timeframe} (local synthetic preview)               |\n\
         //| Generated offline; not registered with the strategy engine.      |\n\
         //+------------------------------------------------------------------+\n\
         #property strict\n\
         \n\
         input double InpLot        = {lot};\n\
         input int    InpStopLoss   = {sl};\n\
         input int    InpTakeProfit = {tp};\n\
         \n\
         // Signals: {signals}\n\
         \n\
         int OnInit()\n\
         {{\n\
         \x20  return(INIT_SUCCEEDED);\n\
         }}\n\
         \n\
         void OnTick()\n\
         {{\n\
         \x20  // Placeholder: regenerate once the strategy engine is online.\n\
         }}\n",
        symbol = config.symbol,
        timeframe = config.timeframe,
        lot = config.risk.lot,
        sl = config.risk.sl,
        tp = config.risk.tp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use traderobots_domain::enums::{Symbol, Timeframe};
    use traderobots_domain::value_objects::LOCAL_ID_PREFIX;

    #[test]
    fn test_fallback_is_locally_scoped() {
        let mut rng = StdRng::seed_from_u64(7);
        let artifact = generate_fallback(&StrategyConfig::default(), &mut rng);

        assert!(!artifact.robot.is_registered());
        assert!(artifact.robot.id.to_string().starts_with(LOCAL_ID_PREFIX));
        assert_eq!(artifact.disclosure.title, FALLBACK_TITLE);
        assert!(artifact.disclosure.message.contains("local synthetic engine"));
    }

    #[test]
    fn test_win_rate_is_plausible() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let artifact = generate_fallback(&StrategyConfig::default(), &mut rng);
            let rate = artifact.robot.win_rate;
            assert!((FALLBACK_WIN_RATE_MIN..FALLBACK_WIN_RATE_MAX).contains(&rate));
            assert_eq!((rate * 10.0).round() / 10.0, rate);
        }
    }

    #[test]
    fn test_top_of_range_stays_below_max() {
        assert_eq!(truncate_rate(74.99), 74.9);
        assert!(truncate_rate(74.999_999) < FALLBACK_WIN_RATE_MAX);
        assert_eq!(truncate_rate(55.0), 55.0);
    }

    #[test]
    fn test_placeholder_code_reflects_config() {
        let config = StrategyConfig::new(Symbol::Xauusd, Timeframe::M15);
        let mut rng = StdRng::seed_from_u64(1);
        let artifact = generate_fallback(&config, &mut rng);

        let code = artifact.robot.mql5().unwrap();
        assert!(code.contains("Bot_XAUUSD_M15"));
        assert!(code.contains("InpStopLoss   = 30"));
        assert!(code.contains("Signals: rsi"));
        assert_eq!(artifact.robot.indicators, config.indicators.active_kinds());
    }

    #[test]
    fn test_each_fallback_gets_a_fresh_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = generate_fallback(&StrategyConfig::default(), &mut rng);
        let b = generate_fallback(&StrategyConfig::default(), &mut rng);
        assert_ne!(a.robot.id, b.robot.id);
    }
}
