//! Economy commands - balances, earning, transfers, gambling, shop, profile.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            access::{self, author_key, command_rng, ensure_elevated, key_for},
            handlers::autocomplete,
        },
        core::{
            gambling::{self, CoinSide, SlotsResult, Symbol},
            items::Item,
            jobs::Job,
            ledger::{Amount, Reward, RobOutcome, UseOutcome},
        },
        errors::{Error, Result},
        models::EconomyAccount,
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const LEADERBOARD_DEFAULT: usize = 10;
    const LEADERBOARD_MAX: usize = 25;

    fn balance_embed(user: &serenity::User, account: &EconomyAccount, interest: i64) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::default()
            .title(format!("💰 {}'s balance", user.name))
            .field("Wallet", account.wallet.to_string(), true)
            .field("Bank", account.bank.to_string(), true)
            .field("Net worth", account.net_worth().to_string(), true)
            .color(0x00F1_C40F);
        if interest > 0 {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "🏦 {interest} coins of bank interest were just credited"
            )));
        }
        embed
    }

    /// Shows your wallet and bank, crediting any bank interest that is due.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("bal"))]
    pub async fn balance(
        ctx: Context<'_>,
        #[description = "Whose balance to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let key = key_for(ctx, user.id)?;
        let view = ctx.data().ledger.balance(key, Utc::now()).await?;
        ctx.send(poise::CreateReply::default().embed(balance_embed(user, &view.account, view.interest)))
            .await?;
        Ok(())
    }

    async fn claim(ctx: Context<'_>, reward: Reward, label: &str) -> Result<()> {
        let key = author_key(ctx)?;
        let (payout, wallet) = ctx.data().ledger.claim(key, reward, Utc::now()).await?;
        ctx.say(format!(
            "🎁 You claimed your {label} reward of **{payout}** coins! Wallet: **{wallet}**"
        ))
        .await?;
        Ok(())
    }

    /// Claims your daily reward.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn daily(ctx: Context<'_>) -> Result<()> {
        claim(ctx, Reward::Daily, "daily").await
    }

    /// Claims your weekly reward.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn weekly(ctx: Context<'_>) -> Result<()> {
        claim(ctx, Reward::Weekly, "weekly").await
    }

    /// Claims your monthly reward.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn monthly(ctx: Context<'_>) -> Result<()> {
        claim(ctx, Reward::Monthly, "monthly").await
    }

    /// Gives coins from your wallet to another member.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn pay(
        ctx: Context<'_>,
        #[description = "Who to pay"] user: serenity::User,
        #[description = "How many coins"] amount: i64,
    ) -> Result<()> {
        if user.bot {
            ctx.say("❌ Bots don't need money.").await?;
            return Ok(());
        }
        let key = author_key(ctx)?;
        let outcome = ctx.data().ledger.pay(key, user.id.get(), amount).await?;
        ctx.say(format!(
            "✅ Paid **{amount}** coins to <@{}>. Your wallet: **{}**",
            user.id, outcome.sender_wallet
        ))
        .await?;
        Ok(())
    }

    /// Moves coins from your wallet into the bank.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("dep"))]
    pub async fn deposit(
        ctx: Context<'_>,
        #[description = "Coins to deposit, or `all`"] amount: String,
    ) -> Result<()> {
        let amount: Amount = amount.parse()?;
        let key = author_key(ctx)?;
        let outcome = ctx.data().ledger.deposit(key, amount).await?;
        ctx.say(format!(
            "🏦 Deposited **{}** coins. Wallet: **{}** | Bank: **{}**",
            outcome.moved, outcome.wallet, outcome.bank
        ))
        .await?;
        Ok(())
    }

    /// Moves coins from the bank into your wallet.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("with"))]
    pub async fn withdraw(
        ctx: Context<'_>,
        #[description = "Coins to withdraw, or `all`"] amount: String,
    ) -> Result<()> {
        let amount: Amount = amount.parse()?;
        let key = author_key(ctx)?;
        let outcome = ctx.data().ledger.withdraw(key, amount).await?;
        ctx.say(format!(
            "🏦 Withdrew **{}** coins. Wallet: **{}** | Bank: **{}**",
            outcome.moved, outcome.wallet, outcome.bank
        ))
        .await?;
        Ok(())
    }

    /// Begs strangers for a few coins.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn beg(ctx: Context<'_>) -> Result<()> {
        let key = author_key(ctx)?;
        let (amount, wallet) = ctx
            .data()
            .ledger
            .beg(key, Utc::now(), &mut command_rng())
            .await?;
        ctx.say(format!(
            "🙏 A kind stranger gave you **{amount}** coins. Wallet: **{wallet}**"
        ))
        .await?;
        Ok(())
    }

    /// Works a shift at your job.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn work(ctx: Context<'_>) -> Result<()> {
        let key = author_key(ctx)?;
        let outcome = ctx
            .data()
            .ledger
            .work(key, Utc::now(), &mut command_rng())
            .await?;

        let mut reply = format!(
            "💼 {} and earned **{}** coins.",
            outcome.job.shift_line(),
            outcome.payout
        );
        if outcome.doubled {
            reply.push_str(" 🧪 Your potion doubled it!");
        }
        if outcome.leveled_up {
            write!(reply, "\n⭐ You reached level **{}**!", outcome.level)?;
        }
        write!(reply, "\nWallet: **{}**", outcome.wallet)?;
        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists the jobs you can apply for.
    #[poise::command(slash_command, prefix_command)]
    pub async fn jobs(ctx: Context<'_>) -> Result<()> {
        let mut list = String::from("**Available jobs**\n");
        for job in Job::ALL {
            writeln!(list, "• `{}`", job.id())?;
        }
        list.push_str("\nApply with `apply <job>`.");
        ctx.say(list).await?;
        Ok(())
    }

    /// Takes a job.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn apply(
        ctx: Context<'_>,
        #[description = "Job to take"]
        #[autocomplete = "autocomplete::autocomplete_job"]
        job: String,
    ) -> Result<()> {
        let job: Job = job.parse()?;
        let key = author_key(ctx)?;
        let previous = ctx.data().ledger.apply_job(key, job).await?;
        let reply = match previous {
            Some(old) => format!("👔 You quit being a {old} and now work as a **{job}**."),
            None => format!("👔 You now work as a **{job}**. Use `work` to earn coins."),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the richest members in this server.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("lb", "top"))]
    pub async fn leaderboard(
        ctx: Context<'_>,
        #[description = "How many members to show (max 25)"] limit: Option<u8>,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        let limit = limit
            .map_or(LEADERBOARD_DEFAULT, usize::from)
            .clamp(1, LEADERBOARD_MAX);
        let accounts = ctx.data().ledger.leaderboard(key.guild_id, limit).await?;
        if accounts.is_empty() {
            ctx.say("Nobody has any coins yet.").await?;
            return Ok(());
        }

        let mut body = String::new();
        for (rank, account) in accounts.iter().enumerate() {
            writeln!(
                body,
                "**{}.** <@{}> - {} coins",
                rank + 1,
                account.key.user_id,
                account.net_worth()
            )?;
        }
        let embed = serenity::CreateEmbed::default()
            .title("🏆 Leaderboard")
            .description(body)
            .color(0x00F1_C40F);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Bets on a coin flip.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("cf"))]
    pub async fn coinflip(
        ctx: Context<'_>,
        #[description = "Coins to bet"] bet: i64,
        #[description = "heads or tails"] side: String,
    ) -> Result<()> {
        let call: CoinSide = side.parse()?;
        let key = author_key(ctx)?;
        let outcome = ctx
            .data()
            .ledger
            .coinflip(key, bet, call, Utc::now(), &mut command_rng())
            .await?;
        let verdict = if outcome.delta > 0 {
            format!("You won **{}** coins!", outcome.delta)
        } else {
            format!("You lost **{}** coins.", -outcome.delta)
        };
        ctx.say(format!(
            "🪙 The coin landed on **{}**. {verdict} Wallet: **{}**",
            outcome.draw, outcome.wallet
        ))
        .await?;
        Ok(())
    }

    /// Bets on the roll of a die.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn dice(
        ctx: Context<'_>,
        #[description = "Coins to bet"] bet: i64,
        #[description = "Number to bet on (1-6)"] guess: u8,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        let outcome = ctx
            .data()
            .ledger
            .dice(key, bet, guess, Utc::now(), &mut command_rng())
            .await?;
        let verdict = if outcome.delta > 0 {
            format!("Exact match! You won **{}** coins!", outcome.delta)
        } else {
            format!("You lost **{}** coins.", -outcome.delta)
        };
        ctx.say(format!(
            "🎲 You rolled a **{}**. {verdict} Wallet: **{}**",
            outcome.draw, outcome.wallet
        ))
        .await?;
        Ok(())
    }

    /// Spins the slot machine.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn slots(
        ctx: Context<'_>,
        #[description = "Coins to bet"] bet: i64,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        let outcome = ctx
            .data()
            .ledger
            .slots(key, bet, Utc::now(), &mut command_rng())
            .await?;
        let reels = outcome.draw.map(Symbol::emoji).join(" | ");
        let verdict = match gambling::classify_reels(outcome.draw) {
            SlotsResult::Jackpot => format!("🎉 JACKPOT! You won **{}** coins!", outcome.delta),
            SlotsResult::Pair => "A pair! You get your bet back.".to_string(),
            SlotsResult::Miss => format!("No luck. You lost **{}** coins.", -outcome.delta),
        };
        ctx.say(format!(
            "🎰 [ {reels} ]\n{verdict} Wallet: **{}**",
            outcome.wallet
        ))
        .await?;
        Ok(())
    }

    /// Shows a member's profile.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "Whose profile to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let key = key_for(ctx, user.id)?;
        let view = ctx.data().ledger.balance(key, Utc::now()).await?;
        let account = &view.account;

        let bio = if account.bio.is_empty() {
            "*No bio set.*".to_string()
        } else {
            account.bio.clone()
        };
        let badges = if account.badges.is_empty() {
            "None".to_string()
        } else {
            account
                .badges
                .iter()
                .map(|b| format!("🏅 {b}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let job = account.job.map_or_else(|| "Unemployed".to_string(), |j| j.to_string());

        let embed = serenity::CreateEmbed::default()
            .title(format!("📇 {}", user.name))
            .description(bio)
            .field("Level", account.level.to_string(), true)
            .field("XP", format!("{}/{}", account.xp, account.level * 100), true)
            .field("Job", job, true)
            .field("Wallet", account.wallet.to_string(), true)
            .field("Bank", account.bank.to_string(), true)
            .field("Items", account.items.len().to_string(), true)
            .field("Badges", badges, false)
            .color(0x0034_98DB);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets the bio shown on your profile.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn setbio(
        ctx: Context<'_>,
        #[description = "Your new bio (up to 200 characters)"]
        #[rest]
        bio: String,
    ) -> Result<()> {
        let key = author_key(ctx)?;
        ctx.data().ledger.set_bio(key, &bio).await?;
        ctx.say("✅ Bio updated.").await?;
        Ok(())
    }

    /// Lists everything for sale.
    #[poise::command(slash_command, prefix_command)]
    pub async fn shop(ctx: Context<'_>) -> Result<()> {
        let mut embed = serenity::CreateEmbed::default()
            .title("🛒 Shop")
            .description("Buy with `buy <item> [quantity]`.")
            .color(0x002E_CC71);
        for item in Item::ALL {
            embed = embed.field(
                format!("{item} - {} coins", item.price()),
                format!("`{}` {}", item.id(), item.description()),
                false,
            );
        }
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Buys items from the shop.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn buy(
        ctx: Context<'_>,
        #[description = "Item to buy"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
        #[description = "How many (default 1)"] quantity: Option<i64>,
    ) -> Result<()> {
        let item: Item = item.parse()?;
        let quantity = quantity.unwrap_or(1);
        let key = author_key(ctx)?;
        let wallet = ctx.data().ledger.buy(key, item, quantity).await?;
        ctx.say(format!(
            "🛍️ Bought **{quantity}× {item}** for **{}** coins. Wallet: **{wallet}**",
            item.price() * quantity
        ))
        .await?;
        Ok(())
    }

    /// Shows the items a member owns.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("inv"))]
    pub async fn inventory(
        ctx: Context<'_>,
        #[description = "Whose inventory to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let key = key_for(ctx, user.id)?;
        let account = ctx.data().ledger.account(key).await?;
        let items = account.inventory();
        if items.is_empty() {
            ctx.say(format!("🎒 {} doesn't own anything yet.", user.name))
                .await?;
            return Ok(());
        }

        let mut body = String::new();
        for (item, count) in items {
            writeln!(body, "• **{item}** ×{count}")?;
        }
        let embed = serenity::CreateEmbed::default()
            .title(format!("🎒 {}'s inventory", user.name))
            .description(body)
            .color(0x009B_59B6);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Uses an item from your inventory.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "use")]
    pub async fn use_item(
        ctx: Context<'_>,
        #[description = "Item to use"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
    ) -> Result<()> {
        let item: Item = item.parse()?;
        let key = author_key(ctx)?;
        let outcome = ctx.data().ledger.use_item(key, item, Utc::now()).await?;
        let reply = match outcome {
            UseOutcome::DoubleEarningsArmed => {
                "🧪 You drank the potion. Your next `work` pays double!".to_string()
            }
            UseOutcome::RobBoostArmed => {
                "⚔️ You drew your sword. Your next robbery has better odds.".to_string()
            }
            UseOutcome::Shielded(until) => format!(
                "🛡️ You're protected from robberies until <t:{}:f>.",
                until.timestamp()
            ),
            UseOutcome::Lucky(until) => format!(
                "🍀 Luck is on your side until <t:{}:t>. Gambling wins pay more.",
                until.timestamp()
            ),
            UseOutcome::Experience { level, leveled_up } => {
                if leveled_up {
                    format!("📜 The scroll's wisdom lifted you to level **{level}**!")
                } else {
                    "📜 You read the scroll and gained experience.".to_string()
                }
            }
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Tries to steal from another member's wallet.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn rob(
        ctx: Context<'_>,
        #[description = "Who to rob"] user: serenity::User,
    ) -> Result<()> {
        if user.bot {
            ctx.say("❌ Bots keep their coins somewhere you can't reach.")
                .await?;
            return Ok(());
        }
        let key = author_key(ctx)?;
        let outcome = ctx
            .data()
            .ledger
            .rob(key, user.id.get(), Utc::now(), &mut command_rng())
            .await?;
        let reply = match outcome {
            RobOutcome::Success { stolen, wallet, .. } => format!(
                "🦹 You robbed <@{}> and got away with **{stolen}** coins! Wallet: **{wallet}**",
                user.id
            ),
            RobOutcome::Caught { penalty, wallet, .. } => format!(
                "🚓 You got caught trying to rob <@{}> and paid a **{penalty}** coin fine. Wallet: **{wallet}**",
                user.id
            ),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Resets a member's economy account. Requires a premium role or administrator.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn reset(
        ctx: Context<'_>,
        #[description = "Whose account to reset"] user: serenity::User,
    ) -> Result<()> {
        ensure_elevated(ctx).await?;
        let key = key_for(ctx, user.id)?;
        let account = ctx.data().ledger.reset(key).await?;
        ctx.say(format!(
            "♻️ Reset <@{}>'s account. Wallet: **{}** | Bank: **{}**",
            user.id, account.wallet, account.bank
        ))
        .await?;
        Ok(())
    }

    /// Awards a profile badge. Requires a premium role or administrator.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn badge(
        ctx: Context<'_>,
        #[description = "Who gets the badge"] user: serenity::User,
        #[description = "Badge name"]
        #[rest]
        name: String,
    ) -> Result<()> {
        ensure_elevated(ctx).await?;
        let key = key_for(ctx, user.id)?;
        if ctx.data().ledger.grant_badge(key, &name).await? {
            ctx.say(format!("🏅 <@{}> earned the **{}** badge!", user.id, name.trim()))
                .await?;
            access::notify(
                ctx,
                user.id,
                format!("🏅 You earned the **{}** badge!", name.trim()),
            )
            .await;
        } else {
            return Err(Error::conflict(format!(
                "<@{}> already has that badge.",
                user.id
            )));
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
