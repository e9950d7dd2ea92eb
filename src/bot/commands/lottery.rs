//! Lottery Discord commands - `lottery info`, `lottery join` and `lottery draw`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            access::{author_key, command_rng, ensure_elevated, notify},
        },
        core::lottery::{LotteryInfo, TICKET_PRICE},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    fn info_embed(info: &LotteryInfo) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title("🎟️ Lottery")
            .field("Pot", format!("{} coins", info.pot), true)
            .field("Tickets sold", info.tickets.to_string(), true)
            .field("Your tickets", info.own_tickets.to_string(), true)
            .field(
                "Next draw",
                format!("<t:{}:R>", info.next_draw.timestamp()),
                false,
            )
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Tickets cost {TICKET_PRICE} coins each. More tickets, better odds."
            )))
            .color(0x00E6_7E22)
    }

    /// Daily server lottery.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands("lottery_info", "lottery_join", "lottery_draw")
    )]
    pub async fn lottery(ctx: Context<'_>) -> Result<()> {
        let help_text = "Lottery command. Available subcommands:\n\
            `lottery info` - Show the pot and your tickets\n\
            `lottery join [tickets]` - Buy tickets, or `free` to spend a golden ticket\n\
            `lottery draw` - Draw a winner now (premium or admin)";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the pot, ticket counts and next draw time.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "info")]
    pub async fn lottery_info(ctx: Context<'_>) -> Result<()> {
        let key = author_key(ctx)?;
        let info = ctx.data().lottery.info(key, Utc::now()).await?;
        ctx.send(poise::CreateReply::default().embed(info_embed(&info)))
            .await?;
        Ok(())
    }

    /// Buys lottery tickets.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "join")]
    pub async fn lottery_join(
        ctx: Context<'_>,
        #[description = "Number of tickets (default 1), or `free` to use a golden ticket"]
        tickets: Option<String>,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        let now = Utc::now();
        let desk = &ctx.data().lottery;

        let choice = tickets.as_deref().map(str::trim).unwrap_or("1");
        let info = if choice.eq_ignore_ascii_case("free") {
            let info = desk.join_free(key, now).await?;
            ctx.say("🎫 You traded your golden ticket for a free entry.")
                .await?;
            info
        } else {
            let count: i64 = choice
                .parse()
                .map_err(|_| Error::validation(format!("`{choice}` is not a ticket count.")))?;
            let info = desk.join(key, count, now).await?;
            ctx.say(format!(
                "🎟️ Bought **{count}** ticket(s) for **{}** coins.",
                count * TICKET_PRICE
            ))
            .await?;
            info
        };

        ctx.send(poise::CreateReply::default().embed(info_embed(&info)))
            .await?;
        Ok(())
    }

    /// Draws a winner immediately. Requires a premium role or administrator.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "draw")]
    pub async fn lottery_draw(ctx: Context<'_>) -> Result<()> {
        ensure_elevated(ctx).await?;
        let key = author_key(ctx)?;
        let Some(result) = ctx
            .data()
            .lottery
            .draw_manual(key.guild_id, Utc::now(), &mut command_rng())
            .await?
        else {
            ctx.say("❌ Nobody has bought a ticket yet.").await?;
            return Ok(());
        };

        ctx.say(format!(
            "🎉 <@{}> won the lottery pot of **{}** coins from {} ticket(s)!",
            result.winner, result.pot, result.tickets
        ))
        .await?;
        notify(
            ctx,
            serenity::UserId::new(result.winner),
            format!("🎉 You won the lottery and **{}** coins!", result.pot),
        )
        .await;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
