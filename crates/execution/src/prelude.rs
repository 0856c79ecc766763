//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use traderobots_execution::prelude::*;
//! ```

// Deployment
pub use crate::deployment::{
    DEPLOY_FAILED_MESSAGE, DEPLOY_FAILED_TITLE, DeploymentError, DeploymentHandoff,
};

// Errors
pub use crate::error::{WorkflowError, WorkflowResult};

// Export
pub use crate::export::{
    Clipboard, CodeKind, ExportError, MemoryClipboard, copy_code, download_file_name, export_code,
};

// Lifecycle
pub use crate::lifecycle::{
    AggregateStats, ConfigData, DeploymentData, EventData, LifecycleEvent, LifecycleEventType,
    LifecycleTracker, RunId, RunSummary, SynthesisData, ValidationData,
};

// Progress
pub use crate::progress::{PROGRESS_DONE, ProgressConfig, ProgressHandle, ProgressSimulator};

// Synthesis
pub use crate::synthesis::{
    FALLBACK_MESSAGE, FALLBACK_TITLE, SynthesisEvent, SynthesisOutcome, SynthesisState,
    ValidationFailure, ValidationKind, build_request, classify, generate_fallback,
};

// Wizard
pub use crate::wizard::{RobotWizard, WizardStep};
