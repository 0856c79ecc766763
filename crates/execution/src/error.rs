//! Workflow errors.

use crate::deployment::DeploymentError;
use crate::export::ExportError;
use crate::synthesis::{SynthesisEvent, SynthesisState};

/// Errors raised by the builder workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The synthesis state machine refused an event.
    #[error("Cannot apply {event:?} while synthesis is {state}")]
    InvalidTransition {
        state: SynthesisState,
        event: SynthesisEvent,
    },
    /// No robot or no code exists yet.
    #[error("Code not generated yet. Deploy robot first.")]
    CodeNotGenerated,
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result alias for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
