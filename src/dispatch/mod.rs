//! # Interaction Dispatch
//!
//! Routes slash invocations, button clicks and modal submissions to their
//! registered command and runs the handler on the worker pool.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Bounded worker pool and per-task panic isolation
//! - 1.0.0: Initial name/prefix routing

pub mod event;
pub mod pool;

use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::{BotCommand, Capability, CommandRegistry, CommandResponse};
use crate::core::DispatchError;

pub use event::{ButtonClick, InteractionEvent, ModalSubmit, Responder, SlashInvocation};
pub use pool::{isolate, TaskOutcome, WorkerPool};

/// Reply sent when a slash handler fails
pub const SLASH_FAILURE_MESSAGE: &str =
    "❌ Sorry, I encountered an error processing your command. Please try again.";
/// Reply sent when a button or modal handler fails
pub const COMPONENT_FAILURE_MESSAGE: &str =
    "❌ Sorry, I encountered an error processing your interaction. Please try again.";

/// Handle to a submitted handler task
pub type TaskHandle = tokio::task::JoinHandle<TaskOutcome>;

/// What `on_event` did with an event
#[derive(Debug)]
pub enum Dispatch {
    /// A handler task was scheduled
    Submitted(TaskHandle),
    /// Nothing is registered under the routing key
    Dropped,
}

impl Dispatch {
    /// Whether a handler task was scheduled
    pub fn is_submitted(&self) -> bool {
        matches!(self, Dispatch::Submitted(_))
    }

    /// Wait for the handler task, if one was scheduled
    pub async fn outcome(self) -> Option<TaskOutcome> {
        match self {
            Dispatch::Submitted(handle) => Some(
                handle
                    .await
                    .unwrap_or_else(|e| TaskOutcome::Panicked(e.to_string())),
            ),
            Dispatch::Dropped => None,
        }
    }
}

/// Routes inbound events to registered commands
#[derive(Clone)]
pub struct EventDispatcher {
    registry: Arc<CommandRegistry>,
    pool: WorkerPool,
}

impl EventDispatcher {
    /// Create a dispatcher routing against `registry`
    pub fn new(registry: Arc<CommandRegistry>, pool: WorkerPool) -> Self {
        Self { registry, pool }
    }

    /// The registry events are routed against, shared with the reconciler
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Route one inbound event and return without waiting for the handler
    ///
    /// Unknown routing keys are dropped silently. A component event whose key
    /// names a command without the matching capability is a wiring bug and is
    /// returned as `DispatchError::MissingCapability`.
    pub fn on_event(&self, event: InteractionEvent) -> Result<Dispatch, DispatchError> {
        let routing_key = event.routing_key().to_string();
        let Some(command) = self.registry.get(&routing_key) else {
            debug!(
                "No command registered for '{}' (token '{}'), dropping event",
                routing_key,
                event.token()
            );
            return Ok(Dispatch::Dropped);
        };

        let required = match &event {
            InteractionEvent::SlashInvocation(_) => Capability::Slash,
            InteractionEvent::ButtonClick(_) => Capability::Button,
            InteractionEvent::ModalSubmit(_) => Capability::Modal,
        };
        if !command.supports(required) {
            error!(
                "Command '{routing_key}' received a {required} event it cannot handle (token '{}')",
                event.token()
            );
            return Err(DispatchError::MissingCapability {
                routing_key,
                capability: required,
            });
        }

        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] 🎯 Dispatching {required} event '{}' from user {}",
            event.token(),
            event.user_id()
        );

        let failure_message = match required {
            Capability::Slash => SLASH_FAILURE_MESSAGE,
            Capability::Button | Capability::Modal => COMPONENT_FAILURE_MESSAGE,
        };
        let responder = event.responder();

        let handle = self.pool.submit(async move {
            let outcome = isolate(run_handler(command, event)).await;
            match &outcome {
                TaskOutcome::Completed => {
                    debug!("[{request_id}] Handler for '{routing_key}' completed");
                }
                TaskOutcome::Failed(reason) => {
                    error!("[{request_id}] Handler for '{routing_key}' failed: {reason}");
                }
                TaskOutcome::Panicked(reason) => {
                    error!("[{request_id}] Handler for '{routing_key}' panicked: {reason}");
                }
            }
            if outcome.is_failure() {
                if let Err(e) = responder
                    .respond(CommandResponse::failure(failure_message))
                    .await
                {
                    warn!("[{request_id}] Failed to send error reply: {e:#}");
                }
            }
            outcome
        });

        Ok(Dispatch::Submitted(handle))
    }
}

async fn run_handler(command: Arc<dyn BotCommand>, event: InteractionEvent) -> anyhow::Result<()> {
    match event {
        InteractionEvent::SlashInvocation(invocation) => {
            let response = command.run_slash(invocation.user_id, &invocation).await?;
            let ephemeral = command.options().visibility.resolve(&response);
            invocation
                .responder
                .respond(response.ephemeral(ephemeral))
                .await
        }
        InteractionEvent::ButtonClick(click) => {
            let button = command
                .as_button()
                .ok_or_else(|| anyhow::anyhow!("'{}' lost its button capability", command.name()))?;
            button.run_button(&click).await
        }
        InteractionEvent::ModalSubmit(submit) => {
            let modal = command
                .as_modal()
                .ok_or_else(|| anyhow::anyhow!("'{}' lost its modal capability", command.name()))?;
            modal.run_modal(&submit).await
        }
    }
}
