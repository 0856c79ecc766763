//! The backend contract.
//!
//! [`RobotApi`] lists every call the client issues. The workflow is written
//! against the trait so it can run over [`crate::BackendClient`] or any
//! other implementation.

use crate::error::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use traderobots_domain::entities::{
    ChatGroup, ChatMessage, Post, Robot, TradingAccount, UserProfile,
};
use traderobots_domain::enums::{IndicatorKind, Symbol, Timeframe};
use traderobots_domain::value_objects::{
    BollingerConfig, DeploymentRequest, MacdConfig, MovingAverageConfig, RiskSettings, RobotId,
    RsiConfig, StochasticConfig,
};
use zeroize::Zeroize;

/// Payload of the strategy-synthesis endpoint.
///
/// Only active indicators are listed, and only their settings are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub indicators: Vec<IndicatorKind>,
    pub risk: RiskSettings,
    #[serde(flatten)]
    pub settings: IndicatorSettings,
}

/// Per-indicator settings attached to a synthesis request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_settings: Option<RsiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_settings: Option<MovingAverageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_settings: Option<MacdConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands_settings: Option<BollingerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stoch_settings: Option<StochasticConfig>,
}

/// What the deploy endpoint sends back.
///
/// The backend may answer with the full robot record or with just the
/// regenerated sources; every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeploymentResponse {
    #[serde(default)]
    pub mql5_code: Option<String>,
    #[serde(default)]
    pub python_code: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, alias = "status")]
    pub message: Option<String>,
}

/// Credentials for the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Drop for LoginRequest {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Every backend call the client makes.
#[async_trait]
pub trait RobotApi: Send + Sync {
    /// Submits a strategy for synthesis and returns the registered robot.
    async fn create_strategy(&self, request: &SynthesisRequest) -> ApiResult<Robot>;

    /// Binds a robot to a trading account.
    async fn deploy_robot(
        &self,
        robot_id: &RobotId,
        request: &DeploymentRequest,
    ) -> ApiResult<DeploymentResponse>;

    /// Lists marketplace robots.
    async fn list_robots(&self) -> ApiResult<Vec<Robot>>;

    /// Lists the user's trading accounts.
    async fn list_accounts(&self) -> ApiResult<Vec<TradingAccount>>;

    /// Asks the backend to refresh the account from the terminal.
    async fn sync_account(&self) -> ApiResult<TradingAccount>;

    /// Signs in.
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<UserProfile>;

    /// Signs out on the server side.
    async fn logout(&self) -> ApiResult<()>;

    /// Lists feed posts.
    async fn list_posts(&self) -> ApiResult<Vec<Post>>;

    /// Lists chat groups.
    async fn list_groups(&self) -> ApiResult<Vec<ChatGroup>>;

    /// Lists chat messages.
    async fn list_messages(&self) -> ApiResult<Vec<ChatMessage>>;
}
