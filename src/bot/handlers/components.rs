//! Button and select-menu handling for games and tickets.
//!
//! Custom ids are `<prefix>:<value>`. Game buttons also carry the session's
//! generation id, `<prefix>:<game id>:<value>`, so a click always reaches the
//! game whose message was clicked. Messages that carry components are built
//! here too, so the command that posts a game and the handler that updates it
//! render the same way.

use crate::{
    bot::{BotData, access::notify},
    core::{
        applications::{self, APPLICATION_PREFIX, ApplicationSetup, Decision},
        gate,
        tickets::{self, CLOSE_TICKET_ID, OPEN_TICKET_ID, TicketKind},
    },
    errors::{Error, Result},
    games::{
        GameKey, GameKind, GamePayload, Step,
        rps::{RpsChoice, RpsOutcome, RpsResult},
        tictactoe::{Mark, MoveOutcome, TicTacToe},
        trivia::TriviaQuestion,
    },
    models::AccountKey,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

const RPS_PREFIX: &str = "rps";
const TTT_PREFIX: &str = "ttt";
const TRIVIA_PREFIX: &str = "trivia";

/// Custom id of a button belonging to game `game_id`.
fn session_custom_id(prefix: &str, game_id: u64, value: impl std::fmt::Display) -> String {
    format!("{prefix}:{game_id}:{value}")
}

/// Rock, paper and scissors buttons for game `game_id`.
#[must_use]
pub fn rps_buttons(game_id: u64) -> Vec<serenity::CreateActionRow> {
    let buttons = RpsChoice::ALL
        .into_iter()
        .map(|choice| {
            serenity::CreateButton::new(session_custom_id(RPS_PREFIX, game_id, choice.id()))
                .label(choice.to_string())
                .emoji(serenity::ReactionType::Unicode(choice.emoji().to_string()))
                .style(serenity::ButtonStyle::Primary)
        })
        .collect();
    vec![serenity::CreateActionRow::Buttons(buttons)]
}

/// The board as a 3x3 grid of buttons. Filled cells, and every cell once
/// `finished`, are disabled.
#[must_use]
pub fn ttt_board(game_id: u64, game: &TicTacToe, finished: bool) -> Vec<serenity::CreateActionRow> {
    game.board()
        .chunks(3)
        .enumerate()
        .map(|(row, cells)| {
            let buttons = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let index = row * 3 + col;
                    let style = match cell {
                        Some(Mark::X) => serenity::ButtonStyle::Danger,
                        Some(Mark::O) => serenity::ButtonStyle::Success,
                        None => serenity::ButtonStyle::Secondary,
                    };
                    serenity::CreateButton::new(session_custom_id(TTT_PREFIX, game_id, index))
                        .label(cell.map_or("⬜", Mark::emoji))
                        .style(style)
                        .disabled(finished || cell.is_some())
                })
                .collect();
            serenity::CreateActionRow::Buttons(buttons)
        })
        .collect()
}

/// Text shown above a trivia question's buttons.
#[must_use]
pub fn trivia_prompt(user: serenity::UserId, question: &TriviaQuestion) -> String {
    format!(
        "🧠 <@{user}>, **{}**\nYou have {} seconds.",
        question.question,
        GameKind::Trivia.ttl().as_secs()
    )
}

/// One button per option.
#[must_use]
pub fn trivia_buttons(game_id: u64, question: &TriviaQuestion) -> Vec<serenity::CreateActionRow> {
    let buttons = question
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            serenity::CreateButton::new(session_custom_id(TRIVIA_PREFIX, game_id, index))
                .label(*option)
                .style(serenity::ButtonStyle::Secondary)
        })
        .collect();
    vec![serenity::CreateActionRow::Buttons(buttons)]
}

/// The ticket type picker.
#[must_use]
pub fn ticket_panel() -> Vec<serenity::CreateActionRow> {
    let options = TicketKind::ALL
        .into_iter()
        .map(|kind| {
            serenity::CreateSelectMenuOption::new(kind.label(), kind.id())
                .description(kind.description())
        })
        .collect();
    let menu = serenity::CreateSelectMenu::new(
        OPEN_TICKET_ID,
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder("Choose a ticket type");
    vec![serenity::CreateActionRow::SelectMenu(menu)]
}

/// Approve and deny buttons under a role application.
#[must_use]
pub fn review_buttons(applicant: u64) -> Vec<serenity::CreateActionRow> {
    let buttons = Decision::ALL
        .into_iter()
        .map(|decision| {
            let style = match decision {
                Decision::Approve => serenity::ButtonStyle::Success,
                Decision::Deny => serenity::ButtonStyle::Danger,
            };
            serenity::CreateButton::new(decision.custom_id(applicant))
                .label(decision.to_string())
                .style(style)
        })
        .collect();
    vec![serenity::CreateActionRow::Buttons(buttons)]
}

fn close_ticket_button() -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(CLOSE_TICKET_ID)
            .label("Close ticket")
            .emoji(serenity::ReactionType::Unicode("🔒".to_string()))
            .style(serenity::ButtonStyle::Danger),
    ])]
}

/// Summary line for a resolved Rock-Paper-Scissors round.
#[must_use]
pub fn rps_summary(players: [u64; 2], outcome: &RpsOutcome) -> String {
    let [a, b] = players;
    let [ca, cb] = outcome.choices;
    let verdict = match outcome.result {
        RpsResult::Winner(user) => format!("🏆 <@{user}> wins!"),
        RpsResult::Tie => "🤝 It's a tie!".to_string(),
    };
    format!(
        "<@{a}> picked {} {ca}, <@{b}> picked {} {cb}.\n{verdict}",
        ca.emoji(),
        cb.emoji()
    )
}

/// Heading for a Tic-Tac-Toe message.
#[must_use]
pub fn ttt_status(game: &TicTacToe, outcome: Option<MoveOutcome>) -> String {
    let [x, o] = game.players();
    let header = format!("{} <@{x}> vs {} <@{o}>", Mark::X.emoji(), Mark::O.emoji());
    let status = match outcome {
        None | Some(MoveOutcome::Next(_)) => format!("<@{}>'s turn.", game.current_player()),
        Some(MoveOutcome::Won(user)) => format!("🏆 <@{user}> wins!"),
        Some(MoveOutcome::Draw) => "🤝 It's a draw!".to_string(),
    };
    format!("{header}\n{status}")
}

fn update_message(
    content: impl Into<String>,
    components: Vec<serenity::CreateActionRow>,
) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::UpdateMessage(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .components(components),
    )
}

fn ephemeral(content: impl Into<String>) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Splits `prefix:value` custom ids.
fn split_custom_id(custom_id: &str) -> Option<(&str, &str)> {
    custom_id.split_once(':')
}

/// Splits the `<game id>:<value>` part of a game button's custom id.
fn split_session(value: &str) -> Result<(u64, &str)> {
    let stale = || Error::validation("That button is from an older version of the bot.");
    let (id, rest) = value.split_once(':').ok_or_else(stale)?;
    Ok((id.parse().map_err(|_| stale())?, rest))
}

/// Routes a component click. Domain errors are shown to the clicker only.
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let custom_id = component.data.custom_id.as_str();
    debug!(custom_id, user_id = %component.user.id, "component interaction");

    let result = match split_custom_id(custom_id) {
        Some((RPS_PREFIX, value)) => handle_rps(ctx, component, data, value).await,
        Some((TTT_PREFIX, value)) => handle_ttt(ctx, component, data, value).await,
        Some((TRIVIA_PREFIX, value)) => handle_trivia(ctx, component, data, value).await,
        Some((APPLICATION_PREFIX, value)) => review_application(ctx, component, data, value).await,
        _ if custom_id == OPEN_TICKET_ID => open_ticket(ctx, component, data).await,
        _ if custom_id == CLOSE_TICKET_ID => close_ticket(ctx, component).await,
        _ => {
            debug!(custom_id, "ignoring unknown component");
            Ok(())
        }
    };

    match result {
        Err(e) if e.is_user_facing() => {
            component
                .create_response(&ctx.http, ephemeral(format!("❌ {e}")))
                .await?;
            Ok(())
        }
        other => other,
    }
}

fn not_playing(kind: GameKind) -> Error {
    Error::denied(format!("you're not playing in this {kind} game"))
}

/// Fails unless `user` plays in the game registered under `key`.
fn ensure_player(key: &GameKey, user: u64) -> Result<()> {
    if key.involves(user) {
        Ok(())
    } else {
        Err(not_playing(key.kind))
    }
}

async fn handle_rps(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
    value: &str,
) -> Result<()> {
    let (game_id, choice) = split_session(value)?;
    let choice: RpsChoice = choice.parse()?;
    let user = component.user.id.get();

    let (players, outcome) = data.games.update_session(game_id, |key, payload| {
        ensure_player(key, user)?;
        let GamePayload::Rps(game) = payload else {
            return Err(not_playing(GameKind::Rps));
        };
        let players = game.players();
        Ok(match game.choose(user, choice)? {
            Some(outcome) => Step::Finished((players, Some(outcome))),
            None => Step::Continue((players, None)),
        })
    })?;

    let response = match outcome {
        Some(outcome) => update_message(rps_summary(players, &outcome), Vec::new()),
        None => ephemeral(format!(
            "You picked {} **{choice}**. Waiting for your opponent...",
            choice.emoji()
        )),
    };
    component.create_response(&ctx.http, response).await?;
    Ok(())
}

async fn handle_ttt(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
    value: &str,
) -> Result<()> {
    let (game_id, cell) = split_session(value)?;
    let cell: usize = cell
        .parse()
        .map_err(|_| Error::validation("That square doesn't exist."))?;
    let user = component.user.id.get();

    let (outcome, board) = data.games.update_session(game_id, |key, payload| {
        ensure_player(key, user)?;
        let GamePayload::TicTacToe(game) = payload else {
            return Err(not_playing(GameKind::TicTacToe));
        };
        let outcome = game.play(user, cell)?;
        let snapshot = game.clone();
        Ok(match outcome {
            MoveOutcome::Next(_) => Step::Continue((outcome, snapshot)),
            MoveOutcome::Won(_) | MoveOutcome::Draw => Step::Finished((outcome, snapshot)),
        })
    })?;

    let finished = !matches!(outcome, MoveOutcome::Next(_));
    let response = update_message(
        ttt_status(&board, Some(outcome)),
        ttt_board(game_id, &board, finished),
    );
    component.create_response(&ctx.http, response).await?;
    Ok(())
}

async fn handle_trivia(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
    value: &str,
) -> Result<()> {
    let (game_id, index) = split_session(value)?;
    let index: usize = index
        .parse()
        .map_err(|_| Error::validation("That option doesn't exist."))?;
    let user = component.user.id.get();

    let (correct, question) = data.games.update_session(game_id, |key, payload| {
        ensure_player(key, user)?;
        let GamePayload::Trivia(round) = payload else {
            return Err(not_playing(GameKind::Trivia));
        };
        let correct = round.answer(index)?;
        Ok(Step::Finished((correct, *round.question())))
    })?;

    let verdict = if correct {
        format!("✅ <@{user}> got it! The answer was **{}**.", question.correct_option())
    } else {
        format!(
            "❌ <@{user}> picked **{}**. The answer was **{}**.",
            question.options[index],
            question.correct_option()
        )
    };
    let content = format!("🧠 **{}**\n{verdict}", question.question);
    component
        .create_response(&ctx.http, update_message(content, Vec::new()))
        .await?;
    Ok(())
}

/// Status line that replaces a reviewed application's buttons.
fn review_verdict(decision: Decision, reviewer: serenity::UserId) -> String {
    match decision {
        Decision::Approve => format!("✅ Approved by <@{reviewer}>."),
        Decision::Deny => format!("❌ Denied by <@{reviewer}>."),
    }
}

async fn review_application(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
    value: &str,
) -> Result<()> {
    let (decision, applicant) = applications::parse_review(value)?;
    let guild_id = component
        .guild_id
        .ok_or_else(|| Error::validation("Applications are reviewed in a server."))?;
    let reviewer = component
        .member
        .as_ref()
        .ok_or_else(|| Error::not_found("Your member record"))?;
    let is_admin = reviewer
        .permissions
        .is_some_and(|permissions| permissions.administrator());
    let roles: Vec<u64> = reviewer.roles.iter().map(|role| role.get()).collect();

    let settings = data.moderation.settings(guild_id.get()).await?;
    gate::ensure_elevated(is_admin, &roles, &settings.premium_roles)?;
    let setup = ApplicationSetup::of(&settings)?;

    let key = AccountKey::new(guild_id.get(), applicant);
    let application = data.applications.review(key, decision)?;
    let applicant = serenity::UserId::new(applicant);
    if decision == Decision::Approve {
        let granted = ctx
            .http
            .add_member_role(
                guild_id,
                applicant,
                serenity::RoleId::new(setup.role_id),
                Some("Application approved"),
            )
            .await;
        if let Err(e) = granted {
            data.applications.reopen(application);
            return Err(e.into());
        }
    }
    info!(guild_id = %guild_id, user_id = %applicant, reviewer = %component.user.id, ?decision, "application reviewed");

    let dm = match decision {
        Decision::Approve => format!(
            "✅ Your role application was approved. You now have the <@&{}> role.",
            setup.role_id
        ),
        Decision::Deny => "❌ Your role application was denied.".to_string(),
    };
    notify(ctx, applicant, dm).await;

    component
        .create_response(
            &ctx.http,
            update_message(review_verdict(decision, component.user.id), Vec::new()),
        )
        .await?;
    Ok(())
}

async fn open_ticket(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let serenity::ComponentInteractionDataKind::StringSelect { values } = &component.data.kind
    else {
        return Err(Error::validation("Pick a ticket type from the menu."));
    };
    let kind: TicketKind = values
        .first()
        .ok_or_else(|| Error::validation("Pick a ticket type from the menu."))?
        .parse()?;
    let guild_id = component
        .guild_id
        .ok_or_else(|| Error::validation("Tickets can only be opened in a server."))?;
    let category = data
        .moderation
        .settings(guild_id.get())
        .await?
        .ticket_category
        .ok_or_else(|| {
            Error::validation("No ticket category is configured. Ask an admin to run `setticketcategory`.")
        })?;

    let user = &component.user;
    let bot_id = ctx.cache.current_user().id;
    let private = serenity::Permissions::VIEW_CHANNEL
        | serenity::Permissions::SEND_MESSAGES
        | serenity::Permissions::READ_MESSAGE_HISTORY;
    let overwrites = vec![
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id.get())),
        },
        serenity::PermissionOverwrite {
            allow: private,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(user.id),
        },
        serenity::PermissionOverwrite {
            allow: private | serenity::Permissions::MANAGE_CHANNELS,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(bot_id),
        },
    ];
    let channel = guild_id
        .create_channel(
            &ctx.http,
            serenity::CreateChannel::new(tickets::channel_name(kind, &user.name))
                .kind(serenity::ChannelType::Text)
                .category(serenity::ChannelId::new(category))
                .permissions(overwrites),
        )
        .await?;
    info!(guild_id = %guild_id, user_id = %user.id, channel_id = %channel.id, %kind, "ticket opened");

    let welcome = serenity::CreateMessage::new()
        .content(format!(
            "🎫 <@{}> opened a **{kind}** ticket. Describe the problem and staff will be with you shortly.",
            user.id
        ))
        .components(close_ticket_button());
    if let Err(e) = channel.id.send_message(&ctx.http, welcome).await {
        warn!("Failed to post ticket welcome in {}: {e}", channel.id);
    }

    component
        .create_response(
            &ctx.http,
            ephemeral(format!("✅ Your ticket is open: <#{}>", channel.id)),
        )
        .await?;
    Ok(())
}

async fn close_ticket(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
) -> Result<()> {
    component
        .create_response(&ctx.http, update_message("🔒 Closing this ticket...", Vec::new()))
        .await?;
    component.channel_id.delete(&ctx.http).await?;
    info!(channel_id = %component.channel_id, user_id = %component.user.id, "ticket closed");
    Ok(())
}
