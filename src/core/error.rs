//! Error taxonomy for reconciliation and dispatch
//!
//! Listing failures abort a reconcile pass. Per-command remote call failures are
//! collected into the pass report instead. A routing key that resolves to a
//! command lacking the capability the event needs is a wiring bug and is
//! returned loudly from the dispatcher.

use std::fmt;
use thiserror::Error;

use crate::commands::Capability;

/// Fatal reconcile errors
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to list remote commands: {0:#}")]
    Listing(#[source] anyhow::Error),
}

/// Dispatch errors surfaced to the caller of `on_event`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("command '{routing_key}' is registered but has no {capability} capability")]
    MissingCapability {
        routing_key: String,
        capability: Capability,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    Create,
    Update,
    Delete,
    /// Rejected locally before any remote call
    Validate,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RemoteOperation::Create => "create",
            RemoteOperation::Update => "update",
            RemoteOperation::Delete => "delete",
            RemoteOperation::Validate => "validate",
        };
        f.write_str(label)
    }
}

/// One isolated failure within a reconcile pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCallFailure {
    pub operation: RemoteOperation,
    pub command: String,
    pub reason: String,
}

impl fmt::Display for RemoteCallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' failed: {}", self.operation, self.command, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capability_message() {
        let err = DispatchError::MissingCapability {
            routing_key: "about".to_string(),
            capability: Capability::Button,
        };
        assert_eq!(
            err.to_string(),
            "command 'about' is registered but has no button capability"
        );
    }

    #[test]
    fn test_remote_failure_display() {
        let failure = RemoteCallFailure {
            operation: RemoteOperation::Delete,
            command: "ping".to_string(),
            reason: "404".to_string(),
        };
        assert_eq!(failure.to_string(), "delete 'ping' failed: 404");
    }

    #[test]
    fn test_listing_error_keeps_source() {
        let err = ReconcileError::Listing(anyhow::anyhow!("gateway down"));
        assert!(err.to_string().contains("gateway down"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
