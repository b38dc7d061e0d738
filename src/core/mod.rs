//! # Core Module
//!
//! Configuration, error taxonomy, and Discord payload limits shared by the
//! registry, the dispatcher and the gateway bridge.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add typed reconcile/dispatch errors
//! - 1.0.0: Initial creation with config and response limits

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{DispatchError, ReconcileError, RemoteCallFailure, RemoteOperation};
pub use response::{truncate_for_embed, truncate_for_message, EMBED_LIMIT, MESSAGE_LIMIT};
