pub mod deployment;
pub mod indicators;
pub mod risk;
pub mod robot_id;
pub mod strategy_config;

pub use deployment::DeploymentRequest;
pub use indicators::{
    BollingerConfig, IndicatorSet, MacdConfig, MovingAverageConfig, RsiConfig, StochasticConfig,
};
pub use risk::RiskSettings;
pub use robot_id::{LOCAL_ID_PREFIX, RobotId};
pub use strategy_config::StrategyConfig;
