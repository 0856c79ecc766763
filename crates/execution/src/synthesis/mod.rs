//! Strategy synthesis.
//!
//! Turns a [`StrategyConfig`](traderobots_domain::value_objects::StrategyConfig)
//! into a backend request and the backend's answer into a
//! [`SynthesisOutcome`]:
//! - Request building with the client-side "at least one indicator" rule
//! - Outcome classification into success, validation failure, or fallback
//! - The local fallback generator used when the engine is unreachable

mod fallback;
mod outcome;
mod request;

pub use fallback::*;
pub use outcome::*;
pub use request::*;
