//! Helpers shared by command handlers.

use crate::{
    bot::Context,
    core::gate,
    errors::{Error, Result},
    models::AccountKey,
};
use poise::serenity_prelude as serenity;
use rand::{SeedableRng, rngs::StdRng};
use tracing::warn;

/// Account key for `user` in the guild the command ran in.
pub fn key_for(ctx: Context<'_>, user: serenity::UserId) -> Result<AccountKey> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| Error::validation("This command only works in a server."))?;
    Ok(AccountKey::new(guild_id.get(), user.get()))
}

/// Account key for the command author.
pub fn author_key(ctx: Context<'_>) -> Result<AccountKey> {
    key_for(ctx, ctx.author().id)
}

/// Whether the author is an administrator, and the role ids they hold.
pub async fn author_access(ctx: Context<'_>) -> Result<(bool, Vec<u64>)> {
    let member = ctx
        .author_member()
        .await
        .ok_or_else(|| Error::not_found("Your member record"))?;
    let roles: Vec<u64> = member.roles.iter().map(|role| role.get()).collect();

    let is_admin = member
        .permissions
        .is_some_and(|permissions| permissions.administrator())
        || ctx.guild().is_some_and(|guild| {
            guild.owner_id == member.user.id
                || member.roles.iter().any(|id| {
                    guild
                        .roles
                        .get(id)
                        .is_some_and(|role| role.permissions.administrator())
                })
        });
    Ok((is_admin, roles))
}

/// Fails unless the author is an administrator or holds a premium role.
pub async fn ensure_elevated(ctx: Context<'_>) -> Result<()> {
    let key = author_key(ctx)?;
    let (is_admin, roles) = author_access(ctx).await?;
    let settings = ctx.data().moderation.settings(key.guild_id).await?;
    gate::ensure_elevated(is_admin, &roles, &settings.premium_roles)
}

/// Rejects bots and the author as the other party of a command.
pub fn ensure_other_member(ctx: Context<'_>, user: &serenity::User) -> Result<()> {
    if user.bot {
        return Err(Error::validation("Bots can't take part in that."));
    }
    if user.id == ctx.author().id {
        return Err(Error::validation("You need to pick someone other than yourself."));
    }
    Ok(())
}

/// Fresh RNG for one command.
#[must_use]
pub fn command_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Sends a DM. Failures are logged and reported as `false`, never raised.
pub async fn notify(
    cache_http: impl serenity::CacheHttp,
    user: serenity::UserId,
    content: impl Into<String>,
) -> bool {
    let message = serenity::CreateMessage::new().content(content);
    match user.direct_message(cache_http, message).await {
        Ok(_) => true,
        Err(e) => {
            let failure = Error::ExternalDelivery {
                message: e.to_string(),
            };
            warn!(user_id = %user, "{failure}");
            false
        }
    }
}
