//! Robot builder workflow.
//!
//! This crate provides the client-side workflow around strategy synthesis:
//! - Request building with pre-flight validation
//! - Cosmetic progress for in-flight requests
//! - Outcome classification with a disclosed local fallback
//! - Deployment handoff to trading accounts
//! - Code export to the clipboard and to files
//! - Lifecycle tracking of every wizard run

/// Prelude module for convenient imports.
pub mod prelude;

/// Deployment handoff.
pub mod deployment;
/// Workflow errors.
pub mod error;
/// Clipboard and file export.
pub mod export;
/// Wizard run lifecycle tracking.
pub mod lifecycle;
/// Simulated progress.
pub mod progress;
/// Request building, fallback and outcome classification.
pub mod synthesis;
/// The builder wizard.
pub mod wizard;

#[cfg(test)]
mod testing;
