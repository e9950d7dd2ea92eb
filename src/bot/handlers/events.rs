//! Gateway event dispatch for everything poise does not handle itself.

use super::{components, messages};
use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;

/// Routes chat messages to running games and component clicks to their handlers.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            messages::handle_message(ctx, new_message, data).await
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            match interaction.as_message_component() {
                Some(component) => components::handle_component(ctx, component, data).await,
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}
