//! Workflow lifecycle tracking.
//!
//! Records what happened during each wizard run: configuration checks,
//! synthesis attempts and their outcome, and deployment attempts.

mod events;
mod tracker;

pub use events::*;
pub use tracker::*;
