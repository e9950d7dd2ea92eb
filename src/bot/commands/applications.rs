//! Role application commands - `application submit` and `application setup`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, access::author_key, handlers::components},
        core::applications::{Application, ApplicationSetup},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use tracing::warn;

    fn review_embed(application: &Application, role_id: u64) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title("📝 Role application")
            .description(application.answer.clone())
            .field("Applicant", format!("<@{}>", application.key.user_id), true)
            .field("Role", format!("<@&{role_id}>"), true)
            .field(
                "Submitted",
                format!("<t:{}:R>", application.submitted_at.timestamp()),
                true,
            )
            .color(0x009B_59B6)
    }

    /// Apply for the server's member role.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands("application_submit", "application_setup")
    )]
    pub async fn application(ctx: Context<'_>) -> Result<()> {
        let help_text = "Application command. Available subcommands:\n\
            `application submit <text>` - Apply for the server's role\n\
            `application setup <channel> <role>` - Choose the review channel and role (admin)";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sends your application to the staff for review.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "submit")]
    pub async fn application_submit(
        ctx: Context<'_>,
        #[description = "Why you should get the role"]
        #[rest]
        answer: String,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        let settings = ctx.data().moderation.settings(key.guild_id).await?;
        let setup = ApplicationSetup::of(&settings)?;
        let application = ctx.data().applications.submit(key, &answer, Utc::now())?;

        let review = serenity::CreateMessage::new()
            .embed(review_embed(&application, setup.role_id))
            .components(components::review_buttons(key.user_id));
        let channel = serenity::ChannelId::new(setup.channel_id);
        if let Err(e) = channel.send_message(ctx.http(), review).await {
            warn!("Failed to post application to {channel}: {e}");
            ctx.data().applications.withdraw(key);
            return Err(e.into());
        }

        ctx.send(
            poise::CreateReply::default()
                .content("✅ Your application was sent to the staff. You'll get a DM once it's reviewed.")
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Sets the channel applications are reviewed in and the role they grant.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "setup"
    )]
    pub async fn application_setup(
        ctx: Context<'_>,
        #[description = "Channel staff review applications in"] channel: serenity::GuildChannel,
        #[description = "Role granted on approval"] role: serenity::Role,
    ) -> Result<()> {
        if channel.kind != serenity::ChannelType::Text {
            ctx.say("❌ Applications need a text channel.").await?;
            return Ok(());
        }
        let guild_id = ctx
            .guild_id()
            .ok_or_else(|| Error::validation("This command only works in a server."))?;
        ctx.data()
            .moderation
            .set_applications(guild_id.get(), channel.id.get(), role.id.get())
            .await?;
        ctx.say(format!(
            "✅ Applications will be reviewed in <#{}> and grant <@&{}>.",
            channel.id, role.id
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
