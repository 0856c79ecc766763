//! Hands a synthesized robot over to a trading account.

use tracing::{info, warn};
use traderobots_data::api::{DeploymentResponse, RobotApi};
use traderobots_data::error::ApiError;
use traderobots_domain::entities::{Disclosure, Robot};
use traderobots_domain::value_objects::{DeploymentRequest, RiskSettings, RobotId};

/// Dialog title for a failed deployment.
pub const DEPLOY_FAILED_TITLE: &str = "MT5 Execution Failed";
/// Message used when the backend gives no reason.
pub const DEPLOY_FAILED_MESSAGE: &str = "Failed to execute trade on MT5.";

/// Why a deployment did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeploymentError {
    /// There is no robot to deploy yet.
    #[error("Generate a robot before deploying.")]
    NoRobot,
    /// No trading account was chosen.
    #[error("Select a trading account before deploying.")]
    NoAccountSelected,
    /// The robot was produced locally and the backend does not know it.
    #[error("Robot {0} was generated locally and cannot be deployed.")]
    FallbackNotDeployable(RobotId),
    /// The deploy-time risk settings are unusable.
    #[error("{0}")]
    InvalidRisk(String),
    /// The backend refused or failed the deployment.
    #[error("{message}")]
    Failed { message: String },
}

impl DeploymentError {
    /// The dialog to show for this error.
    #[must_use]
    pub fn dialog(&self) -> Disclosure {
        let title = match self {
            Self::NoRobot => "Nothing to Deploy",
            Self::NoAccountSelected => "Trading Account Required",
            Self::FallbackNotDeployable(_) => "Deployment Unavailable",
            Self::InvalidRisk(_) => "Invalid Risk Settings",
            Self::Failed { .. } => DEPLOY_FAILED_TITLE,
        };
        Disclosure::new(title, self.to_string())
    }

    /// Only an explicit `error` message from the backend is shown; anything
    /// else gets the generic message.
    fn from_api(error: &ApiError) -> Self {
        let message = error
            .error_field()
            .unwrap_or(DEPLOY_FAILED_MESSAGE)
            .to_string();
        Self::Failed { message }
    }
}

/// Deploys robots through a backend.
pub struct DeploymentHandoff<'a, A: RobotApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: RobotApi + ?Sized> DeploymentHandoff<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Deploys `robot` to `account` with the given risk.
    ///
    /// Preconditions are checked before any call is made. On success the
    /// code the backend returns replaces the robot's stored code. Failures
    /// are reported once and never retried.
    ///
    /// # Errors
    /// Returns a [`DeploymentError`] describing why nothing was deployed.
    pub async fn deploy(
        &self,
        robot: &mut Robot,
        account: Option<&str>,
        risk: RiskSettings,
    ) -> Result<DeploymentResponse, DeploymentError> {
        let account = account
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(DeploymentError::NoAccountSelected)?;

        if !robot.is_registered() {
            return Err(DeploymentError::FallbackNotDeployable(robot.id.clone()));
        }

        risk.validate()
            .map_err(|e| DeploymentError::InvalidRisk(e.to_string()))?;

        let request = DeploymentRequest::new(account, risk);
        let response = match self.api.deploy_robot(&robot.id, &request).await {
            Ok(response) => response,
            Err(error) => {
                let failure = DeploymentError::from_api(&error);
                warn!(robot = %robot.id, account, error = %error, "Deployment failed");
                return Err(failure);
            }
        };

        if let Some(code) = &response.mql5_code {
            robot.mql5_code = Some(code.clone());
        }
        if let Some(code) = &response.python_code {
            robot.python_code = Some(code.clone());
        }
        robot.is_active = response.is_active.unwrap_or(true);

        info!(robot = %robot.id, account, lot = %risk.lot, "Robot deployed");
        Ok(response)
    }
}
