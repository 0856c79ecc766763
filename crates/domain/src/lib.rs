//! Domain model for the TradeRobots client.
//!
//! This crate holds the typed data the strategy builder works with:
//! - Tradable instruments, timeframes and indicator kinds
//! - Per-indicator configuration records and risk settings
//! - Robot, trading account and session records returned by the backend
//! - Deployment requests and locally fabricated fallback artifacts
//!
//! Everything here is plain data plus boundary validation; no I/O.

/// Domain entities returned by the backend.
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Domain error type.
pub mod error;
/// Value objects making up a strategy configuration.
pub mod value_objects;

pub use error::DomainError;
