//! Inbound interaction events
//!
//! Platform-neutral views of slash invocations, button clicks and modal
//! submissions. Each event carries the `Responder` used to answer it.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::commands::routing::routing_key;
use crate::commands::CommandResponse;

/// Sends the reply for one interaction
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, response: CommandResponse) -> Result<()>;
}

#[derive(Clone)]
pub struct SlashInvocation {
    pub command_name: String,
    pub user_id: u64,
    /// Top-level option values, stringified
    pub options: HashMap<String, String>,
    pub responder: Arc<dyn Responder>,
}

impl SlashInvocation {
    /// Value of the option `name`, if the user supplied it
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

#[derive(Clone)]
pub struct ButtonClick {
    /// `<command>_<suffix>`
    pub custom_id: String,
    pub user_id: u64,
    pub message_id: Option<u64>,
    pub responder: Arc<dyn Responder>,
}

#[derive(Clone)]
pub struct ModalSubmit {
    /// `<command>_<suffix>`
    pub custom_id: String,
    pub user_id: u64,
    /// Text input values keyed by input id
    pub fields: HashMap<String, String>,
    pub responder: Arc<dyn Responder>,
}

impl ModalSubmit {
    /// Value of the text input `id`
    pub fn field(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }
}

#[derive(Clone)]
pub enum InteractionEvent {
    SlashInvocation(SlashInvocation),
    ButtonClick(ButtonClick),
    ModalSubmit(ModalSubmit),
}

impl InteractionEvent {
    /// Raw routing token: the command name, or the component id
    pub fn token(&self) -> &str {
        match self {
            InteractionEvent::SlashInvocation(e) => &e.command_name,
            InteractionEvent::ButtonClick(e) => &e.custom_id,
            InteractionEvent::ModalSubmit(e) => &e.custom_id,
        }
    }

    /// Registry key this event routes to
    pub fn routing_key(&self) -> &str {
        match self {
            InteractionEvent::SlashInvocation(e) => &e.command_name,
            InteractionEvent::ButtonClick(e) => routing_key(&e.custom_id),
            InteractionEvent::ModalSubmit(e) => routing_key(&e.custom_id),
        }
    }

    pub fn user_id(&self) -> u64 {
        match self {
            InteractionEvent::SlashInvocation(e) => e.user_id,
            InteractionEvent::ButtonClick(e) => e.user_id,
            InteractionEvent::ModalSubmit(e) => e.user_id,
        }
    }

    pub fn responder(&self) -> Arc<dyn Responder> {
        match self {
            InteractionEvent::SlashInvocation(e) => Arc::clone(&e.responder),
            InteractionEvent::ButtonClick(e) => Arc::clone(&e.responder),
            InteractionEvent::ModalSubmit(e) => Arc::clone(&e.responder),
        }
    }
}

impl fmt::Debug for InteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            InteractionEvent::SlashInvocation(_) => "SlashInvocation",
            InteractionEvent::ButtonClick(_) => "ButtonClick",
            InteractionEvent::ModalSubmit(_) => "ModalSubmit",
        };
        f.debug_struct(variant)
            .field("token", &self.token())
            .field("user_id", &self.user_id())
            .finish()
    }
}
