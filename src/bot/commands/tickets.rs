//! Support ticket panel command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::components},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Posts the panel members use to open private support tickets.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn ticket(ctx: Context<'_>) -> Result<()> {
        let embed = serenity::CreateEmbed::default()
            .title("🎫 Support tickets")
            .description(
                "Need help from staff? Pick a ticket type below and a private channel \
                 will be opened for you.",
            )
            .color(0x0034_98DB);
        let reply = poise::CreateReply::default()
            .embed(embed)
            .components(components::ticket_panel());
        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
