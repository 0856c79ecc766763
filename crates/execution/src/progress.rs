//! Cosmetic progress for synthesis requests.
//!
//! The counter the user watches is not tied to real backend progress. A
//! ticker task advances it towards a ceiling while the request is in
//! flight; settling the request stops the ticker and publishes 100. The
//! two streams only meet through a `watch` channel, and the ticker is
//! aborted whenever its [`ProgressHandle`] goes away.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use traderobots_data::config::ClientConfig;

/// Value published once the tracked request has settled.
pub const PROGRESS_DONE: u8 = 100;

/// Ticker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Interval between ticks.
    pub tick: Duration,
    /// Amount added per tick.
    pub step: u8,
    /// Highest value reachable before the request settles.
    pub ceiling: u8,
    /// Pause after reaching 100 before the result is revealed.
    pub settle_delay: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            step: 2,
            ceiling: 95,
            settle_delay: Duration::from_millis(500),
        }
    }
}

impl ProgressConfig {
    /// Default ticker with the configured tick interval.
    #[must_use]
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            tick: config.progress_tick,
            ..Self::default()
        }
    }

    /// Ticker that reveals results immediately.
    #[must_use]
    pub fn without_settle_delay(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self
    }
}

/// Publishes simulated progress for one request at a time.
pub struct ProgressSimulator {
    config: ProgressConfig,
    sender: Arc<watch::Sender<u8>>,
}

impl ProgressSimulator {
    #[must_use]
    pub fn new(config: ProgressConfig) -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            config,
            sender: Arc::new(sender),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Receiver observing the published value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.sender.subscribe()
    }

    /// Last published value.
    #[must_use]
    pub fn current(&self) -> u8 {
        *self.sender.borrow()
    }

    /// Resets the counter to zero.
    pub fn reset(&self) {
        self.sender.send_replace(0);
    }

    /// Resets the counter and starts ticking.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> ProgressHandle {
        self.sender.send_replace(0);

        let sender = Arc::clone(&self.sender);
        let ProgressConfig {
            tick,
            step,
            ceiling,
            ..
        } = self.config;

        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick.max(Duration::from_millis(1)));
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                // Never overwrite a value at or past the ceiling, so a late
                // tick cannot undo completion.
                sender.send_if_modified(|value| {
                    if *value >= ceiling {
                        return false;
                    }
                    *value = value.saturating_add(step).min(ceiling);
                    true
                });
            }
        });

        ProgressHandle {
            sender: Arc::clone(&self.sender),
            ticker: Some(ticker),
        }
    }

    /// Runs `future` under a ticker.
    ///
    /// The ticker stops as soon as the future settles, whatever its output,
    /// and 100 is published. The output is returned after the settle delay.
    pub async fn track<F: Future>(&self, future: F) -> F::Output {
        let handle = self.start();
        let output = future.await;
        handle.complete();

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        output
    }
}

/// Guard owning a running ticker.
///
/// Dropping it stops the ticker and leaves the last value in place.
pub struct ProgressHandle {
    sender: Arc<watch::Sender<u8>>,
    ticker: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    /// Stops the ticker and publishes 100.
    pub fn complete(mut self) {
        self.stop();
        self.sender.send_replace(PROGRESS_DONE);
        debug!("Progress settled");
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
