//! Lifecycle events for builder runs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use traderobots_domain::enums::{IndicatorKind, Symbol, Timeframe};
use traderobots_domain::value_objects::RobotId;
use uuid::Uuid;

/// Identity of one wizard run, from first configuration to reset.
pub type RunId = Uuid;

/// Type of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEventType {
    /// Configuration passed pre-flight checks.
    ConfigValidated,
    /// A synthesis request was sent.
    SynthesisSubmitted,
    /// The backend returned a robot.
    SynthesisSucceeded,
    /// The user has to correct the configuration.
    ValidationFailed,
    /// A local artifact replaced an unreachable engine.
    FallbackActivated,
    /// The robot was deployed to a trading account.
    DeploymentSucceeded,
    /// Deployment was refused or failed.
    DeploymentFailed,
}

/// A lifecycle event for a wizard run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Event ID.
    pub id: String,
    pub event_type: LifecycleEventType,
    pub run: RunId,
    /// Robot the event concerns, once one exists.
    pub robot: Option<RobotId>,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl LifecycleEvent {
    /// Creates a new lifecycle event.
    pub fn new(event_type: LifecycleEventType, run: RunId, data: EventData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            run,
            robot: None,
            timestamp: Utc::now(),
            data,
        }
    }

    /// Attaches the robot the event concerns.
    #[must_use]
    pub fn with_robot(mut self, robot: RobotId) -> Self {
        self.robot = Some(robot);
        self
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventData {
    Config(ConfigData),
    Submitted,
    Synthesis(SynthesisData),
    Validation(ValidationData),
    Deployment(DeploymentData),
}

/// What the user asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub indicators: Vec<IndicatorKind>,
}

/// A robot produced by synthesis, genuine or local.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisData {
    pub win_rate: f64,
    pub has_code: bool,
}

/// Why the user was sent back to the configuration step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationData {
    pub title: String,
    pub reason: String,
}

/// A deployment attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentData {
    pub account_id: Option<String>,
    pub lot: Decimal,
    pub sl: u32,
    pub tp: u32,
    /// Failure message shown to the user.
    pub error: Option<String>,
}
