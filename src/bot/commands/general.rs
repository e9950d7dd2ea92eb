//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let prefix = &ctx.data().config.bot.prefix;
        let help_text = format!(
            "**Guild Bot Help**\n\
        Every command works as a slash command or with the `{prefix}` prefix.\n\n\
        **Economy**\n\
        • `balance`, `daily`, `weekly`, `monthly`, `beg`, `work` - Earn and check coins.\n\
        • `jobs`, `apply <job>` - Pick a job to `work` at.\n\
        • `pay <user> <amount>`, `deposit <amount|all>`, `withdraw <amount|all>` - Move coins.\n\
        • `rob <user>` - Risky. Shields protect you.\n\
        • `coinflip <bet> <heads|tails>`, `dice <bet> <1-6>`, `slots <bet>` - Gamble.\n\
        • `shop`, `buy <item> [qty]`, `inventory`, `use <item>` - Items and boosts.\n\
        • `profile`, `setbio <text>`, `leaderboard` - Show off.\n\n\
        **Lottery**\n\
        • `lottery info`, `lottery join [tickets|free]` - Buy tickets for the daily draw.\n\n\
        **Games**\n\
        • `rps <user>`, `tictactoe <user>` - Challenge someone.\n\
        • `guess`, `math`, `trivia`, `type` - Solo challenges.\n\n\
        **Moderation**\n\
        • `warn`, `warnings`, `kick`, `ban`, `mute`, `unmute`, `jail`, `free`, `jailers`\n\
        • `warnlimit`, `premiumrole`, `setjailrole`, `setmuterole`, `setticketcategory`, `ticket`\n\n\
        **Applications**\n\
        • `application submit <text>` - Apply for the server's role.\n\
        • `application setup <channel> <role>` - Where applications go and what they grant (admin).\n\n\
        **Utility**\n\
        • `ping` - Checks if the bot is responsive.\n\
        • `help` - Shows this help message."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
