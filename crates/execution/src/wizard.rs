//! The robot builder workflow.
//!
//! A wizard walks one strategy through three steps: configuration,
//! synthesis and deployment. It owns everything a run needs, so a second
//! submission cannot start while one is pending: every mutating call takes
//! `&mut self`.

use crate::deployment::{DeploymentError, DeploymentHandoff};
use crate::error::{WorkflowError, WorkflowResult};
use crate::export::{self, Clipboard, CodeKind};
use crate::lifecycle::{
    ConfigData, DeploymentData, LifecycleTracker, RunId, SynthesisData, ValidationData,
};
use crate::progress::{ProgressConfig, ProgressSimulator};
use crate::synthesis::{
    SynthesisEvent, SynthesisOutcome, SynthesisState, ValidationFailure, build_request, classify,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};
use traderobots_data::api::{DeploymentResponse, RobotApi};
use traderobots_domain::entities::{Disclosure, Robot};
use traderobots_domain::value_objects::{RiskSettings, StrategyConfig};
use uuid::Uuid;

/// Step of the builder the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Configure,
    Synthesize,
    Deploy,
}

impl WizardStep {
    /// One-based step number as displayed.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Self::Configure => 1,
            Self::Synthesize => 2,
            Self::Deploy => 3,
        }
    }
}

/// Drives one strategy from configuration to deployment.
pub struct RobotWizard<A: RobotApi> {
    api: Arc<A>,
    config: StrategyConfig,
    step: WizardStep,
    state: SynthesisState,
    outcome: Option<SynthesisOutcome>,
    dialog: Option<Disclosure>,
    account: Option<String>,
    deploy_modal_open: bool,
    progress: ProgressSimulator,
    tracker: Arc<LifecycleTracker>,
    run: RunId,
}

impl<A: RobotApi> RobotWizard<A> {
    pub fn new(api: Arc<A>, progress: ProgressConfig) -> Self {
        Self {
            api,
            config: StrategyConfig::default(),
            step: WizardStep::Configure,
            state: SynthesisState::Idle,
            outcome: None,
            dialog: None,
            account: None,
            deploy_modal_open: false,
            progress: ProgressSimulator::new(progress),
            tracker: Arc::new(LifecycleTracker::new()),
            run: Uuid::new_v4(),
        }
    }

    /// Starts from the given configuration.
    #[must_use]
    pub fn with_config(mut self, config: StrategyConfig) -> Self {
        self.config = config;
        self
    }

    /// Records events into a shared tracker.
    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<LifecycleTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StrategyConfig {
        &mut self.config
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn state(&self) -> SynthesisState {
        self.state
    }

    pub fn outcome(&self) -> Option<&SynthesisOutcome> {
        self.outcome.as_ref()
    }

    /// Robot produced by the last synthesis, genuine or local.
    pub fn robot(&self) -> Option<&Robot> {
        self.outcome.as_ref().and_then(SynthesisOutcome::robot)
    }

    /// Dialog waiting to be shown.
    pub fn dialog(&self) -> Option<&Disclosure> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn progress_receiver(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn tracker(&self) -> &Arc<LifecycleTracker> {
        &self.tracker
    }

    pub fn run_id(&self) -> RunId {
        self.run
    }

    /// Chooses the trading account to deploy to.
    pub fn select_account(&mut self, account: Option<String>) {
        self.account = account;
    }

    pub fn selected_account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn open_deploy_modal(&mut self) {
        self.deploy_modal_open = true;
    }

    pub fn deploy_modal_open(&self) -> bool {
        self.deploy_modal_open
    }

    /// Submits the current configuration for synthesis.
    ///
    /// A configuration that fails pre-flight checks settles immediately
    /// without contacting the backend. Otherwise the request runs under the
    /// progress ticker and its result is classified: a robot (genuine or
    /// local) advances the wizard to deployment, a rejection sends it back
    /// to configuration with a dialog.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidTransition`] after a successful
    /// synthesis; call [`reset`](Self::reset) to start over.
    pub async fn handle_create_robot(&mut self) -> WorkflowResult<&SynthesisOutcome> {
        let submitting = self.state.next(SynthesisEvent::Submit)?;

        let request = match build_request(&self.config) {
            Ok(request) => request,
            Err(failure) => {
                self.state = submitting.next(SynthesisEvent::Reject)?;
                return Ok(self.settle_validation(failure).await);
            }
        };

        self.tracker
            .record_config_validated(
                self.run,
                ConfigData {
                    symbol: request.symbol,
                    timeframe: request.timeframe,
                    indicators: request.indicators.clone(),
                },
            )
            .await;

        self.state = submitting;
        self.step = WizardStep::Synthesize;
        self.tracker.record_submitted(self.run).await;
        info!(run = %self.run, symbol = %request.symbol, "Synthesis submitted");

        let result = self.progress.track(self.api.create_strategy(&request)).await;
        let outcome = {
            let mut rng = rand::rng();
            classify(result, &self.config, &mut rng)
        };
        self.state = self.state.next(SynthesisEvent::for_outcome(&outcome))?;

        match outcome {
            SynthesisOutcome::ValidationFailure(failure) => {
                Ok(self.settle_validation(failure).await)
            }
            outcome => {
                let fallback = matches!(outcome, SynthesisOutcome::ServerFailure(_));
                if let Some(robot) = outcome.robot() {
                    self.tracker
                        .record_synthesized(
                            self.run,
                            robot.id.clone(),
                            SynthesisData {
                                win_rate: robot.win_rate,
                                has_code: robot.mql5().is_some(),
                            },
                            fallback,
                        )
                        .await;
                }
                // Success clears any dialog left by an earlier rejection.
                self.dialog = outcome.dialog();
                self.step = WizardStep::Deploy;
                Ok(&*self.outcome.insert(outcome))
            }
        }
    }

    async fn settle_validation(&mut self, failure: ValidationFailure) -> &SynthesisOutcome {
        self.tracker
            .record_validation_failed(
                self.run,
                ValidationData {
                    title: failure.title().to_string(),
                    reason: failure.reason.clone(),
                },
            )
            .await;

        self.dialog = Some(failure.dialog());
        self.step = WizardStep::Configure;
        self.outcome.insert(SynthesisOutcome::ValidationFailure(failure))
    }

    /// Whether the deploy action is available.
    ///
    /// Requires a robot the backend registered and a selected account.
    pub fn can_deploy(&self) -> bool {
        let has_account = self
            .account
            .as_deref()
            .is_some_and(|account| !account.trim().is_empty());
        has_account && self.robot().is_some_and(Robot::is_registered)
    }

    /// Deploys the current robot to the selected account.
    ///
    /// On success the deploy modal closes and the robot carries the code the
    /// backend returned. On failure the modal stays open and the failure
    /// dialog is set.
    ///
    /// # Errors
    /// Returns [`WorkflowError::Deployment`] when nothing was deployed.
    pub async fn deploy(&mut self, risk: RiskSettings) -> WorkflowResult<DeploymentResponse> {
        let robot = match self.outcome.as_mut() {
            Some(SynthesisOutcome::Success(robot)) => Some(robot),
            Some(SynthesisOutcome::ServerFailure(artifact)) => Some(&mut artifact.robot),
            _ => None,
        };

        let (robot_id, result) = match robot {
            Some(robot) => {
                let result = DeploymentHandoff::new(self.api.as_ref())
                    .deploy(robot, self.account.as_deref(), risk)
                    .await;
                (Some(robot.id.clone()), result)
            }
            None => (None, Err(DeploymentError::NoRobot)),
        };

        let mut data = DeploymentData {
            account_id: self.account.clone(),
            lot: risk.lot,
            sl: risk.sl,
            tp: risk.tp,
            error: None,
        };

        match result {
            Ok(response) => {
                self.tracker.record_deployment(self.run, robot_id, data).await;
                self.deploy_modal_open = false;
                self.dialog = None;
                Ok(response)
            }
            Err(error) => {
                data.error = Some(error.to_string());
                self.tracker.record_deployment(self.run, robot_id, data).await;
                self.dialog = Some(error.dialog());
                Err(error.into())
            }
        }
    }

    /// Copies the current robot's MQL5 code.
    ///
    /// # Errors
    /// Returns [`WorkflowError::CodeNotGenerated`] when there is no code yet.
    pub fn copy_code(&self, clipboard: &mut dyn Clipboard) -> WorkflowResult<()> {
        let robot = self
            .robot()
            .filter(|robot| robot.mql5().is_some())
            .ok_or(WorkflowError::CodeNotGenerated)?;
        export::copy_code(robot, CodeKind::Mql5, clipboard)?;
        Ok(())
    }

    /// Discards the configuration and any outcome, starting a new run.
    pub fn reset(&mut self) {
        debug!(run = %self.run, "Wizard reset");
        self.config = StrategyConfig::default();
        self.step = WizardStep::Configure;
        self.state = SynthesisState::Idle;
        self.outcome = None;
        self.dialog = None;
        self.account = None;
        self.deploy_modal_open = false;
        self.progress.reset();
        self.run = Uuid::new_v4();
    }
}
