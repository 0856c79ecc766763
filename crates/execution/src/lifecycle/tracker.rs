//! Lifecycle tracker for wizard run history.

use super::{
    ConfigData, DeploymentData, EventData, LifecycleEvent, LifecycleEventType, RunId,
    SynthesisData, ValidationData,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use traderobots_domain::enums::Symbol;
use traderobots_domain::value_objects::RobotId;

/// Summary of one wizard run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run: RunId,
    pub started_at: DateTime<Utc>,
    pub symbol: Option<Symbol>,
    /// Last robot produced in this run.
    pub robot: Option<RobotId>,
    pub submissions: u32,
    pub validation_failures: u32,
    pub fallbacks: u32,
    pub deployment_failures: u32,
    pub deployed: bool,
}

impl RunSummary {
    fn new(run: RunId, started_at: DateTime<Utc>) -> Self {
        Self {
            run,
            started_at,
            symbol: None,
            robot: None,
            submissions: 0,
            validation_failures: 0,
            fallbacks: 0,
            deployment_failures: 0,
            deployed: false,
        }
    }
}

/// Tracks lifecycle events for all wizard runs.
pub struct LifecycleTracker {
    events: Arc<RwLock<HashMap<RunId, Vec<LifecycleEvent>>>>,
    summaries: Arc<RwLock<HashMap<RunId, RunSummary>>>,
}

impl LifecycleTracker {
    /// Creates a new lifecycle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            summaries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records a configuration that passed pre-flight checks.
    pub async fn record_config_validated(&self, run: RunId, data: ConfigData) {
        debug!(
            run = %run,
            symbol = %data.symbol,
            timeframe = %data.timeframe,
            indicators = data.indicators.len(),
            "Configuration validated"
        );
        let symbol = data.symbol;
        let event = LifecycleEvent::new(
            LifecycleEventType::ConfigValidated,
            run,
            EventData::Config(data),
        );
        self.add_event(event).await;
        self.update(run, |summary| summary.symbol = Some(symbol)).await;
    }

    /// Records a synthesis request leaving for the backend.
    pub async fn record_submitted(&self, run: RunId) {
        let event = LifecycleEvent::new(
            LifecycleEventType::SynthesisSubmitted,
            run,
            EventData::Submitted,
        );
        self.add_event(event).await;
        self.update(run, |summary| summary.submissions += 1).await;
    }

    /// Records a robot returned by the backend or produced locally.
    pub async fn record_synthesized(
        &self,
        run: RunId,
        robot: RobotId,
        data: SynthesisData,
        fallback: bool,
    ) {
        let event_type = if fallback {
            warn!(run = %run, robot = %robot, "Fallback artifact recorded");
            LifecycleEventType::FallbackActivated
        } else {
            info!(run = %run, robot = %robot, win_rate = data.win_rate, "Robot synthesized");
            LifecycleEventType::SynthesisSucceeded
        };

        let event =
            LifecycleEvent::new(event_type, run, EventData::Synthesis(data)).with_robot(robot.clone());
        self.add_event(event).await;
        self.update(run, |summary| {
            summary.robot = Some(robot);
            if fallback {
                summary.fallbacks += 1;
            }
        })
        .await;
    }

    /// Records a configuration the user must correct.
    pub async fn record_validation_failed(&self, run: RunId, data: ValidationData) {
        info!(run = %run, title = %data.title, reason = %data.reason, "Validation failed");
        let event = LifecycleEvent::new(
            LifecycleEventType::ValidationFailed,
            run,
            EventData::Validation(data),
        );
        self.add_event(event).await;
        self.update(run, |summary| summary.validation_failures += 1)
            .await;
    }

    /// Records a deployment attempt.
    pub async fn record_deployment(&self, run: RunId, robot: Option<RobotId>, data: DeploymentData) {
        let succeeded = data.error.is_none();
        let event_type = if succeeded {
            info!(run = %run, account = ?data.account_id, "Deployment recorded");
            LifecycleEventType::DeploymentSucceeded
        } else {
            LifecycleEventType::DeploymentFailed
        };

        let mut event = LifecycleEvent::new(event_type, run, EventData::Deployment(data));
        if let Some(robot) = robot {
            event = event.with_robot(robot);
        }
        self.add_event(event).await;
        self.update(run, |summary| {
            if succeeded {
                summary.deployed = true;
            } else {
                summary.deployment_failures += 1;
            }
        })
        .await;
    }

    async fn add_event(&self, event: LifecycleEvent) {
        let mut events = self.events.write().await;
        events.entry(event.run).or_default().push(event);
    }

    async fn update(&self, run: RunId, apply: impl FnOnce(&mut RunSummary)) {
        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(run)
            .or_insert_with(|| RunSummary::new(run, Utc::now()));
        apply(summary);
    }

    /// Gets all events for a run.
    pub async fn get_events(&self, run: &RunId) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .await
            .get(run)
            .cloned()
            .unwrap_or_default()
    }

    /// Gets the summary for a run.
    pub async fn get_summary(&self, run: &RunId) -> Option<RunSummary> {
        self.summaries.read().await.get(run).cloned()
    }

    /// Gets all events that concern a robot, across runs.
    pub async fn get_robot_events(&self, robot: &RobotId) -> Vec<LifecycleEvent> {
        let events = self.events.read().await;
        let mut matching: Vec<LifecycleEvent> = events
            .values()
            .flatten()
            .filter(|event| event.robot.as_ref() == Some(robot))
            .cloned()
            .collect();
        matching.sort_by_key(|event| event.timestamp);
        matching
    }

    /// Gets aggregate statistics.
    pub async fn get_aggregate_stats(&self) -> AggregateStats {
        let summaries = self.summaries.read().await;

        let mut stats = AggregateStats::default();
        for summary in summaries.values() {
            stats.total_runs += 1;
            stats.submissions += summary.submissions;
            stats.validation_failures += summary.validation_failures;
            stats.fallbacks += summary.fallbacks;
            stats.deployment_failures += summary.deployment_failures;
            if summary.deployed {
                stats.deployed_runs += 1;
            }
        }
        stats
    }
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics across all runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total_runs: u32,
    pub submissions: u32,
    pub validation_failures: u32,
    pub fallbacks: u32,
    pub deployment_failures: u32,
    /// Runs that ended with a deployed robot.
    pub deployed_runs: u32,
}
