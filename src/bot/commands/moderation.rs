//! Moderation commands - warnings, jail, mutes, kicks, bans and guild settings.
//!
//! Discord permission checks are left to poise's `required_permissions`; the
//! premium-role gate is applied where members with a premium role may act too.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            access::{ensure_elevated, ensure_other_member, key_for, notify},
        },
        core::moderation::parse_duration,
        errors::{Error, Result},
        models::AccountKey,
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::{info, warn};

    const NO_REASON: &str = "No reason given";

    fn reason_or_default(reason: Option<String>) -> String {
        reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_REASON.to_string())
    }

    fn guild_of(ctx: Context<'_>) -> Result<serenity::GuildId> {
        ctx.guild_id()
            .ok_or_else(|| Error::validation("This command only works in a server."))
    }

    /// Warns a member. Reaching the server's warn limit kicks them.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MODERATE_MEMBERS"
    )]
    pub async fn warn(
        ctx: Context<'_>,
        #[description = "Member to warn"] user: serenity::User,
        #[description = "Why they are being warned"]
        #[rest]
        reason: Option<String>,
    ) -> Result<()> {
        ensure_other_member(ctx, &user)?;
        let reason = reason_or_default(reason);
        let key = key_for(ctx, user.id)?;
        let outcome = ctx
            .data()
            .moderation
            .warn(key, ctx.author().id.get(), &reason, Utc::now())
            .await?;

        ctx.say(format!(
            "⚠️ Warned <@{}> ({}/{}): {reason}",
            user.id, outcome.count, outcome.limit
        ))
        .await?;
        notify(
            ctx,
            user.id,
            format!(
                "⚠️ You were warned in a server ({}/{}): {reason}",
                outcome.count, outcome.limit
            ),
        )
        .await;

        if outcome.auto_kick {
            let guild_id = guild_of(ctx)?;
            let kick_reason = format!("Reached the warning limit of {}", outcome.limit);
            match guild_id.kick_with_reason(ctx.http(), user.id, &kick_reason).await {
                Ok(()) => {
                    info!(guild_id = %guild_id, user_id = %user.id, "auto-kicked at warn limit");
                    ctx.say(format!(
                        "👢 <@{}> reached the warning limit and was kicked.",
                        user.id
                    ))
                    .await?;
                }
                Err(e) => {
                    warn!("Auto-kick of {} failed: {e}", user.id);
                    ctx.say(format!(
                        "❌ <@{}> reached the warning limit but I couldn't kick them.",
                        user.id
                    ))
                    .await?;
                }
            }
        }
        Ok(())
    }

    /// Lists a member's warnings.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn warnings(
        ctx: Context<'_>,
        #[description = "Whose warnings to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let key = key_for(ctx, user.id)?;
        let list = ctx.data().moderation.warnings(key).await?;
        let limit = ctx.data().moderation.settings(key.guild_id).await?.warn_limit;
        if list.is_empty() {
            ctx.say(format!("✅ {} has no warnings.", user.name)).await?;
            return Ok(());
        }

        let mut body = String::new();
        for (i, warning) in list.iter().enumerate() {
            writeln!(
                body,
                "**{}.** <t:{}:d> by <@{}>: {}",
                i + 1,
                warning.created_at.timestamp(),
                warning.moderator_id,
                warning.reason
            )?;
        }
        let embed = serenity::CreateEmbed::default()
            .title(format!("⚠️ Warnings for {} ({}/{limit})", user.name, list.len()))
            .description(body)
            .color(0x00E7_4C3C);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets how many warnings trigger an automatic kick. Requires a premium role or administrator.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn warnlimit(
        ctx: Context<'_>,
        #[description = "Warnings before a kick (at least 1)"] limit: u32,
    ) -> Result<()> {
        ensure_elevated(ctx).await?;
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .set_warn_limit(guild_id.get(), limit)
            .await?;
        ctx.say(format!("✅ Members are now kicked at **{limit}** warnings."))
            .await?;
        Ok(())
    }

    /// Strips a member's roles and gives them the jail role.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_ROLES"
    )]
    pub async fn jail(
        ctx: Context<'_>,
        #[description = "Member to jail"] user: serenity::User,
        #[description = "Why they are being jailed"]
        #[rest]
        reason: Option<String>,
    ) -> Result<()> {
        ensure_other_member(ctx, &user)?;
        let reason = reason_or_default(reason);
        let guild_id = guild_of(ctx)?;
        let key = AccountKey::new(guild_id.get(), user.id.get());
        let member = guild_id.member(ctx, user.id).await?;
        let roles = member.roles.iter().map(|r| r.get()).collect();

        let moderation = &ctx.data().moderation;
        let (record, jail_role) = moderation
            .jail(key, ctx.author().id.get(), &reason, roles, Utc::now())
            .await?;

        let saved: Vec<serenity::RoleId> =
            record.roles.iter().copied().map(serenity::RoleId::new).collect();
        let applied = async {
            member.remove_roles(ctx.http(), &saved).await?;
            member
                .add_role(ctx.http(), serenity::RoleId::new(jail_role))
                .await
        }
        .await;
        if let Err(e) = applied {
            // Without the role swap the record would trap the member's roles.
            moderation.free(key).await?;
            return Err(e.into());
        }

        ctx.say(format!("🔒 Jailed <@{}>: {reason}", user.id)).await?;
        notify(ctx, user.id, format!("🔒 You were jailed: {reason}")).await;
        Ok(())
    }

    /// Lists everyone currently jailed.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn jailers(ctx: Context<'_>) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let records = ctx.data().moderation.jailed(guild_id.get()).await?;
        if records.is_empty() {
            ctx.say("Nobody is in jail.").await?;
            return Ok(());
        }

        let mut body = String::new();
        for record in &records {
            writeln!(
                body,
                "• <@{}> since <t:{}:R> by <@{}>: {}",
                record.user_id,
                record.jailed_at.timestamp(),
                record.moderator_id,
                record.reason
            )?;
        }
        let embed = serenity::CreateEmbed::default()
            .title(format!("🔒 Jailed members ({})", records.len()))
            .description(body)
            .color(0x0095_A5A6);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Releases a jailed member and restores their roles.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_ROLES"
    )]
    pub async fn free(
        ctx: Context<'_>,
        #[description = "Member to release"] user: serenity::User,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let key = AccountKey::new(guild_id.get(), user.id.get());
        let moderation = &ctx.data().moderation;
        let jail_role = moderation.settings(guild_id.get()).await?.jail_role;
        let record = moderation.free(key).await?;

        let member = guild_id.member(ctx, user.id).await?;
        if let Some(role) = jail_role {
            member
                .remove_role(ctx.http(), serenity::RoleId::new(role))
                .await?;
        }
        let restored: Vec<serenity::RoleId> =
            record.roles.iter().copied().map(serenity::RoleId::new).collect();
        member.add_roles(ctx.http(), &restored).await?;

        ctx.say(format!(
            "🔓 Freed <@{}> and restored {} role(s).",
            user.id,
            restored.len()
        ))
        .await?;
        Ok(())
    }

    /// Kicks a member.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "KICK_MEMBERS"
    )]
    pub async fn kick(
        ctx: Context<'_>,
        #[description = "Member to kick"] user: serenity::User,
        #[description = "Why they are being kicked"]
        #[rest]
        reason: Option<String>,
    ) -> Result<()> {
        ensure_other_member(ctx, &user)?;
        let reason = reason_or_default(reason);
        let guild_id = guild_of(ctx)?;

        notify(ctx, user.id, format!("👢 You were kicked: {reason}")).await;
        guild_id
            .kick_with_reason(ctx.http(), user.id, &reason)
            .await?;
        info!(guild_id = %guild_id, user_id = %user.id, "member kicked");
        ctx.say(format!("👢 Kicked <@{}>: {reason}", user.id)).await?;
        Ok(())
    }

    /// Bans a member.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "BAN_MEMBERS"
    )]
    pub async fn ban(
        ctx: Context<'_>,
        #[description = "Member to ban"] user: serenity::User,
        #[description = "Why they are being banned"]
        #[rest]
        reason: Option<String>,
    ) -> Result<()> {
        ensure_other_member(ctx, &user)?;
        let reason = reason_or_default(reason);
        let guild_id = guild_of(ctx)?;

        notify(ctx, user.id, format!("🔨 You were banned: {reason}")).await;
        guild_id
            .ban_with_reason(ctx.http(), user.id, 0, &reason)
            .await?;
        info!(guild_id = %guild_id, user_id = %user.id, "member banned");
        ctx.say(format!("🔨 Banned <@{}>: {reason}", user.id)).await?;
        Ok(())
    }

    /// Gives a member the muted role for a while.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MODERATE_MEMBERS"
    )]
    pub async fn mute(
        ctx: Context<'_>,
        #[description = "Member to mute"] user: serenity::User,
        #[description = "How long, like 10m, 2h or 1d (max 28d)"] duration: String,
    ) -> Result<()> {
        ensure_other_member(ctx, &user)?;
        let length = parse_duration(&duration)?;
        let sleep_for = length
            .to_std()
            .map_err(|_| Error::validation("Mute duration must be positive."))?;
        let guild_id = guild_of(ctx)?;
        let key = AccountKey::new(guild_id.get(), user.id.get());
        let role = serenity::RoleId::new(ctx.data().moderation.muted_role(guild_id.get()).await?);

        let member = guild_id.member(ctx, user.id).await?;
        member.add_role(ctx.http(), role).await?;
        let mutes = ctx.data().mutes.clone();
        let ticket = mutes.issue(key);

        let http = ctx.serenity_context().http.clone();
        let user_id = user.id;
        tokio::spawn(async move {
            tokio::time::sleep(sleep_for).await;
            if !mutes.release(key, ticket) {
                return;
            }
            if let Err(e) = http
                .remove_member_role(guild_id, user_id, role, Some("Mute expired"))
                .await
            {
                warn!("Failed to lift expired mute for {user_id}: {e}");
            } else {
                info!(guild_id = %guild_id, user_id = %user_id, "mute expired");
            }
        });

        ctx.say(format!(
            "🔇 Muted <@{}> until <t:{}:f>.",
            user.id,
            (Utc::now() + length).timestamp()
        ))
        .await?;
        Ok(())
    }

    /// Lifts a mute early.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MODERATE_MEMBERS"
    )]
    pub async fn unmute(
        ctx: Context<'_>,
        #[description = "Member to unmute"] user: serenity::User,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let key = AccountKey::new(guild_id.get(), user.id.get());
        let role = serenity::RoleId::new(ctx.data().moderation.muted_role(guild_id.get()).await?);

        ctx.data().mutes.clear(key);
        let member = guild_id.member(ctx, user.id).await?;
        if !member.roles.contains(&role) {
            return Err(Error::not_found(format!("a mute on <@{}>", user.id)));
        }
        member.remove_role(ctx.http(), role).await?;
        ctx.say(format!("🔊 Unmuted <@{}>.", user.id)).await?;
        Ok(())
    }

    /// Manages the roles that grant premium access.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        subcommands("premiumrole_add", "premiumrole_remove", "premiumrole_list")
    )]
    pub async fn premiumrole(ctx: Context<'_>) -> Result<()> {
        let help_text = "Premium role command. Available subcommands:\n\
            `premiumrole add <role>` - Grant premium access to a role\n\
            `premiumrole remove <role>` - Revoke it\n\
            `premiumrole list` - Show premium roles";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Grants premium access to a role.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "add"
    )]
    pub async fn premiumrole_add(
        ctx: Context<'_>,
        #[description = "Role to add"] role: serenity::Role,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .add_premium_role(guild_id.get(), role.id.get())
            .await?;
        ctx.say(format!("✅ <@&{}> now has premium access.", role.id))
            .await?;
        Ok(())
    }

    /// Revokes premium access from a role.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "remove"
    )]
    pub async fn premiumrole_remove(
        ctx: Context<'_>,
        #[description = "Role to remove"] role: serenity::Role,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .remove_premium_role(guild_id.get(), role.id.get())
            .await?;
        ctx.say(format!("✅ <@&{}> no longer has premium access.", role.id))
            .await?;
        Ok(())
    }

    /// Lists premium roles.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "list")]
    pub async fn premiumrole_list(ctx: Context<'_>) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let settings = ctx.data().moderation.settings(guild_id.get()).await?;
        if settings.premium_roles.is_empty() {
            ctx.say("No premium roles are configured.").await?;
            return Ok(());
        }
        let roles = settings
            .premium_roles
            .iter()
            .map(|id| format!("<@&{id}>"))
            .collect::<Vec<_>>()
            .join(", ");
        ctx.say(format!("⭐ Premium roles: {roles}")).await?;
        Ok(())
    }

    /// Sets the role given to jailed members.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn setjailrole(
        ctx: Context<'_>,
        #[description = "Jail role"] role: serenity::Role,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .set_jail_role(guild_id.get(), role.id.get())
            .await?;
        ctx.say(format!("✅ Jail role set to <@&{}>.", role.id)).await?;
        Ok(())
    }

    /// Sets the role given to muted members.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn setmuterole(
        ctx: Context<'_>,
        #[description = "Muted role"] role: serenity::Role,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .set_muted_role(guild_id.get(), role.id.get())
            .await?;
        ctx.say(format!("✅ Muted role set to <@&{}>.", role.id)).await?;
        Ok(())
    }

    /// Sets the category new ticket channels are created in.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn setticketcategory(
        ctx: Context<'_>,
        #[description = "Category for ticket channels"] category: serenity::GuildChannel,
    ) -> Result<()> {
        if category.kind != serenity::ChannelType::Category {
            ctx.say("❌ That channel is not a category.").await?;
            return Ok(());
        }
        let guild_id = guild_of(ctx)?;
        ctx.data()
            .moderation
            .set_ticket_category(guild_id.get(), category.id.get())
            .await?;
        ctx.say(format!("✅ Tickets will be opened under **{}**.", category.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
