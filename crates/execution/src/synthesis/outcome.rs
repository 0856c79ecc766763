//! Synthesis outcome classification and the synthesis state machine.

use super::fallback::generate_fallback;
use super::request::{ValidationFailure, ValidationKind};
use crate::error::WorkflowError;
use rand::Rng;
use std::fmt;
use tracing::{info, warn};
use traderobots_data::error::{ApiError, ApiResult};
use traderobots_domain::entities::{Disclosure, FallbackArtifact, Robot};
use traderobots_domain::value_objects::{RobotId, StrategyConfig};

/// Result of one synthesis attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    /// The backend registered a robot and generated its code.
    Success(Robot),
    /// The user must correct something; nothing was fabricated.
    ValidationFailure(ValidationFailure),
    /// The engine was unreachable; a local artifact stands in.
    ServerFailure(FallbackArtifact),
}

impl SynthesisOutcome {
    /// The robot produced by this attempt, genuine or fabricated.
    #[must_use]
    pub fn robot(&self) -> Option<&Robot> {
        match self {
            Self::Success(robot) => Some(robot),
            Self::ServerFailure(artifact) => Some(&artifact.robot),
            Self::ValidationFailure(_) => None,
        }
    }

    /// Identity of the produced robot.
    #[must_use]
    pub fn robot_id(&self) -> Option<&RobotId> {
        self.robot().map(|robot| &robot.id)
    }

    /// Generated MQL5 source of the produced robot.
    #[must_use]
    pub fn generated_code(&self) -> Option<&str> {
        self.robot().and_then(Robot::mql5)
    }

    /// Dialog to show for this outcome, if any.
    #[must_use]
    pub fn dialog(&self) -> Option<Disclosure> {
        match self {
            Self::Success(_) => None,
            Self::ValidationFailure(failure) => Some(failure.dialog()),
            Self::ServerFailure(artifact) => Some(artifact.disclosure.clone()),
        }
    }

    /// The state this outcome settles the machine into.
    #[must_use]
    pub fn settled_state(&self) -> SynthesisState {
        match self {
            Self::Success(_) => SynthesisState::Succeeded,
            Self::ValidationFailure(_) => SynthesisState::ValidationFailed,
            Self::ServerFailure(_) => SynthesisState::FallbackActivated,
        }
    }
}

/// Classifies the backend's answer to a synthesis request.
///
/// Rejections carrying a message and authentication failures become
/// validation failures with the message verbatim. Transport failures,
/// 5xx responses and undecodable bodies activate the fallback generator.
pub fn classify<R: Rng>(
    result: ApiResult<Robot>,
    config: &StrategyConfig,
    rng: &mut R,
) -> SynthesisOutcome {
    match result {
        Ok(robot) => {
            info!(robot = %robot.id, win_rate = robot.win_rate, "Strategy synthesized");
            SynthesisOutcome::Success(robot)
        }
        Err(error) if error.is_transport_class() => {
            let artifact = generate_fallback(config, rng);
            warn!(
                error = %error,
                robot = %artifact.robot.id,
                "Strategy engine unreachable, using local synthetic robot"
            );
            SynthesisOutcome::ServerFailure(artifact)
        }
        Err(ApiError::Unauthorized { status }) => {
            SynthesisOutcome::ValidationFailure(ValidationFailure::new(
                ValidationKind::Unauthorized,
                format!("Sign in to generate robots (HTTP {status})."),
            ))
        }
        Err(error) => {
            let message = error
                .server_message()
                .map_or_else(|| error.to_string(), str::to_string);
            info!(reason = %message, "Synthesis rejected by backend");
            SynthesisOutcome::ValidationFailure(ValidationFailure::new(
                ValidationKind::Rejected,
                message,
            ))
        }
    }
}

/// Where a synthesis cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    ValidationFailed,
    FallbackActivated,
}

/// Inputs driving the synthesis state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    Submit,
    Succeed,
    Reject,
    Fallback,
}

impl SynthesisState {
    /// Applies an event.
    ///
    /// A new submission may start from `Idle`, or after a validation failure
    /// or a fallback. A successful cycle is final until the wizard is reset.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidTransition`] for any other pair.
    pub fn next(self, event: SynthesisEvent) -> Result<Self, WorkflowError> {
        use SynthesisEvent as E;
        use SynthesisState as S;

        match (self, event) {
            (S::Idle | S::ValidationFailed | S::FallbackActivated, E::Submit) => Ok(S::Submitting),
            (S::Submitting, E::Succeed) => Ok(S::Succeeded),
            (S::Submitting, E::Reject) => Ok(S::ValidationFailed),
            (S::Submitting, E::Fallback) => Ok(S::FallbackActivated),
            (state, event) => Err(WorkflowError::InvalidTransition { state, event }),
        }
    }

    /// Whether a cycle has settled.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::ValidationFailed | Self::FallbackActivated
        )
    }
}

impl fmt::Display for SynthesisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::ValidationFailed => "validation-failed",
            Self::FallbackActivated => "fallback-activated",
        };
        f.write_str(name)
    }
}

impl SynthesisEvent {
    /// Event that settles a submission with the given outcome.
    #[must_use]
    pub fn for_outcome(outcome: &SynthesisOutcome) -> Self {
        match outcome {
            SynthesisOutcome::Success(_) => Self::Succeed,
            SynthesisOutcome::ValidationFailure(_) => Self::Reject,
            SynthesisOutcome::ServerFailure(_) => Self::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::FALLBACK_TITLE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use traderobots_domain::enums::Symbol;

    fn server_robot() -> Robot {
        serde_json::from_str(r#"{"id": 9, "symbol": "EURUSD", "win_rate": 63.0, "mql5_code": "// EA"}"#)
            .unwrap()
    }

    fn classify_err(error: ApiError) -> SynthesisOutcome {
        let mut rng = StdRng::seed_from_u64(11);
        classify(Err(error), &StrategyConfig::default(), &mut rng)
    }

    #[test]
    fn test_success() {
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = classify(Ok(server_robot()), &StrategyConfig::default(), &mut rng);

        assert_eq!(outcome.robot_id(), Some(&RobotId::server("9")));
        assert_eq!(outcome.generated_code(), Some("// EA"));
        assert_eq!(outcome.settled_state(), SynthesisState::Succeeded);
        assert!(outcome.dialog().is_none());
    }

    #[test]
    fn test_transport_failure_falls_back() {
        let outcome = classify_err(ApiError::Transport("connection refused".to_string()));

        let SynthesisOutcome::ServerFailure(artifact) = &outcome else {
            panic!("expected fallback, got {outcome:?}");
        };
        assert!(!artifact.robot.is_registered());
        assert_eq!(artifact.robot.symbol, Symbol::Eurusd);
        assert_eq!(outcome.dialog().unwrap().title, FALLBACK_TITLE);
    }

    #[test]
    fn test_server_error_falls_back() {
        let outcome = classify_err(ApiError::server(503, "Service Unavailable"));
        assert_eq!(outcome.settled_state(), SynthesisState::FallbackActivated);
    }

    #[test]
    fn test_rejection_is_verbatim_without_fallback() {
        let outcome = classify_err(ApiError::rejected(400, "Unsupported symbol for this account"));

        assert_eq!(
            outcome,
            SynthesisOutcome::ValidationFailure(ValidationFailure::new(
                ValidationKind::Rejected,
                "Unsupported symbol for this account"
            ))
        );
        assert!(outcome.robot().is_none());
    }

    #[test]
    fn test_unauthorized_is_validation_failure() {
        let outcome = classify_err(ApiError::Unauthorized { status: 401 });
        let dialog = outcome.dialog().unwrap();
        assert_eq!(dialog.title, "Authentication Required");
    }

    #[test]
    fn test_state_machine_paths() {
        let submitting = SynthesisState::Idle.next(SynthesisEvent::Submit).unwrap();
        assert_eq!(submitting, SynthesisState::Submitting);

        let failed = submitting.next(SynthesisEvent::Reject).unwrap();
        assert!(failed.is_terminal());

        let retry = failed.next(SynthesisEvent::Submit).unwrap();
        let done = retry.next(SynthesisEvent::Succeed).unwrap();
        assert_eq!(done, SynthesisState::Succeeded);

        assert!(done.next(SynthesisEvent::Submit).is_err());
        assert!(SynthesisState::Idle.next(SynthesisEvent::Succeed).is_err());
        assert!(
            SynthesisState::Submitting
                .next(SynthesisEvent::Submit)
                .is_err()
        );
    }
}
