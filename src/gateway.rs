//! Serenity bridge
//!
//! Turns serenity `Interaction`s into `InteractionEvent`s and answers them
//! through the interaction's own response endpoint.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::builder::{
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseData,
    CreateInteractionResponseFollowup,
};
use serenity::http::Http;
use serenity::model::application::component::{ActionRowComponent, ComponentType};
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::commands::{CommandResponse, ResponseBody, ResponseEmbed};
use crate::core::response::{truncate_to, EMBED_TITLE_LIMIT};
use crate::core::{truncate_for_embed, truncate_for_message};
use crate::dispatch::{ButtonClick, InteractionEvent, ModalSubmit, Responder, SlashInvocation};

enum ReplyTarget {
    Command(Box<ApplicationCommandInteraction>),
    Component(Box<MessageComponentInteraction>),
    Modal(Box<ModalSubmitInteraction>),
}

/// Whether an interaction has been acknowledged yet
///
/// Discord accepts one initial response per interaction; anything after it
/// has to go out as a follow-up message.
#[derive(Debug, Default)]
struct ReplyState {
    acknowledged: AtomicBool,
}

impl ReplyState {
    /// Claim the initial response slot, `false` when it is already taken
    fn claim_initial(&self) -> bool {
        !self.acknowledged.swap(true, Ordering::SeqCst)
    }

    /// Give the slot back after a failed initial response
    fn release(&self) {
        self.acknowledged.store(false, Ordering::SeqCst);
    }
}

/// Replies to one Discord interaction
///
/// The first reply is the interaction response, later replies are sent as
/// follow-ups.
pub struct InteractionResponder {
    http: Arc<Http>,
    target: ReplyTarget,
    state: ReplyState,
}

impl InteractionResponder {
    fn new(http: Arc<Http>, target: ReplyTarget) -> Self {
        Self {
            http,
            target,
            state: ReplyState::default(),
        }
    }

    async fn send_initial(&self, reply: &CommandResponse) -> Result<()> {
        match &self.target {
            ReplyTarget::Command(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |r| build_reply(r, reply))
                    .await?
            }
            ReplyTarget::Component(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |r| build_reply(r, reply))
                    .await?
            }
            ReplyTarget::Modal(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |r| build_reply(r, reply))
                    .await?
            }
        }
        Ok(())
    }

    async fn send_follow_up(&self, reply: &CommandResponse) -> Result<()> {
        match &self.target {
            ReplyTarget::Command(interaction) => {
                interaction
                    .create_followup_message(&self.http, |f| build_follow_up(f, reply))
                    .await?;
            }
            ReplyTarget::Component(interaction) => {
                interaction
                    .create_followup_message(&self.http, |f| build_follow_up(f, reply))
                    .await?;
            }
            ReplyTarget::Modal(interaction) => {
                interaction
                    .create_followup_message(&self.http, |f| build_follow_up(f, reply))
                    .await?;
            }
        }
        Ok(())
    }
}

fn fill_embed<'a>(e: &'a mut CreateEmbed, embed: &ResponseEmbed) -> &'a mut CreateEmbed {
    if let Some(title) = &embed.title {
        e.title(truncate_to(title, EMBED_TITLE_LIMIT));
    }
    if let Some(color) = embed.color {
        e.color(color);
    }
    e.description(truncate_for_embed(&embed.description))
}

fn build_reply<'a, 'b>(
    response: &'b mut CreateInteractionResponse<'a>,
    reply: &CommandResponse,
) -> &'b mut CreateInteractionResponse<'a> {
    response
        .kind(InteractionResponseType::ChannelMessageWithSource)
        .interaction_response_data(|data| apply_body(data, reply))
}

fn apply_body<'a, 'b>(
    data: &'b mut CreateInteractionResponseData<'a>,
    reply: &CommandResponse,
) -> &'b mut CreateInteractionResponseData<'a> {
    data.ephemeral(reply.ephemeral);
    match &reply.body {
        ResponseBody::Text(content) => data.content(truncate_for_message(content)),
        ResponseBody::Embed(embed) => data.embed(|e| fill_embed(e, embed)),
    }
}

fn build_follow_up<'a, 'b>(
    follow_up: &'b mut CreateInteractionResponseFollowup<'a>,
    reply: &CommandResponse,
) -> &'b mut CreateInteractionResponseFollowup<'a> {
    follow_up.ephemeral(reply.ephemeral);
    match &reply.body {
        ResponseBody::Text(content) => follow_up.content(truncate_for_message(content)),
        ResponseBody::Embed(embed) => follow_up.embed(|e| fill_embed(e, embed)),
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn respond(&self, reply: CommandResponse) -> Result<()> {
        if !self.state.claim_initial() {
            return self.send_follow_up(&reply).await;
        }
        let result = self.send_initial(&reply).await;
        if result.is_err() {
            self.state.release();
        }
        result
    }
}

fn option_values(options: &[CommandDataOption]) -> HashMap<String, String> {
    options
        .iter()
        .filter_map(|opt| {
            let value = opt.value.as_ref()?;
            let rendered = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            Some((opt.name.clone(), rendered))
        })
        .collect()
}

fn modal_fields(interaction: &ModalSubmitInteraction) -> HashMap<String, String> {
    interaction
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => {
                Some((input.custom_id.clone(), input.value.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Convert a gateway interaction into a dispatchable event
///
/// Returns `None` for interactions this layer does not route (pings,
/// autocomplete, select menus).
pub fn to_event(interaction: Interaction, http: Arc<Http>) -> Option<InteractionEvent> {
    match interaction {
        Interaction::ApplicationCommand(command) => {
            let event = SlashInvocation {
                command_name: command.data.name.clone(),
                user_id: command.user.id.0,
                options: option_values(&command.data.options),
                responder: Arc::new(InteractionResponder::new(
                    http,
                    ReplyTarget::Command(Box::new(command)),
                )),
            };
            Some(InteractionEvent::SlashInvocation(event))
        }
        Interaction::MessageComponent(component) => {
            if component.data.component_type != ComponentType::Button {
                debug!(
                    "Ignoring non-button component interaction '{}'",
                    component.data.custom_id
                );
                return None;
            }
            let event = ButtonClick {
                custom_id: component.data.custom_id.clone(),
                user_id: component.user.id.0,
                message_id: Some(component.message.id.0),
                responder: Arc::new(InteractionResponder::new(
                    http,
                    ReplyTarget::Component(Box::new(component)),
                )),
            };
            Some(InteractionEvent::ButtonClick(event))
        }
        Interaction::ModalSubmit(modal) => {
            let event = ModalSubmit {
                custom_id: modal.data.custom_id.clone(),
                user_id: modal.user.id.0,
                fields: modal_fields(&modal),
                responder: Arc::new(InteractionResponder::new(
                    http,
                    ReplyTarget::Modal(Box::new(modal)),
                )),
            };
            Some(InteractionEvent::ModalSubmit(event))
        }
        Interaction::Autocomplete(autocomplete) => {
            debug!("Ignoring autocomplete for '{}'", autocomplete.data.name);
            None
        }
        _ => None,
    }
}
