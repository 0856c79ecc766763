//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use traderobots_data::prelude::*;
//! ```

// Backend
pub use crate::api::{
    DeploymentResponse, IndicatorSettings, LoginRequest, RobotApi, SynthesisRequest,
};
pub use crate::client::BackendClient;

// Configuration
pub use crate::config::ClientConfig;

// Errors
pub use crate::error::{ApiError, ApiResult};

// Marketplace
pub use crate::marketplace::{RobotFilter, RobotSort, marketplace_view};

// Session
pub use crate::session::{SessionError, SessionStore};
