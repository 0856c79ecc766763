//! Backend access for the TradeRobots client.
//!
//! This crate provides:
//! - The [`RobotApi`] trait describing every backend call the client makes
//! - [`BackendClient`], its `reqwest` implementation
//! - The [`ApiError`] taxonomy separating rejections from transport failures
//! - Session persistence and client configuration
//! - Marketplace filtering and sorting helpers

/// Prelude module for convenient imports.
pub mod prelude;

/// Backend trait and wire types.
pub mod api;
/// HTTP implementation of the backend trait.
pub mod client;
/// Client configuration.
pub mod config;
/// Error types.
pub mod error;
/// Marketplace listing helpers.
pub mod marketplace;
/// Session persistence.
pub mod session;

pub use api::{DeploymentResponse, LoginRequest, RobotApi, SynthesisRequest};
pub use client::BackendClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use session::{SessionError, SessionStore};
