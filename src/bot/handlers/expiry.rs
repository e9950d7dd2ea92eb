//! Background announcers for game timeouts and scheduled lottery draws.

use crate::{
    bot::access::notify,
    core::lottery::DrawResult,
    games::{ExpiredGame, GamePayload},
};
use poise::serenity_prelude as serenity;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

/// Timeout message for a game, revealing the answer where there is one.
#[must_use]
pub fn expiry_notice(game: &ExpiredGame) -> String {
    let mentions = game
        .key
        .participants
        .iter()
        .map(|user| format!("<@{user}>"))
        .collect::<Vec<_>>()
        .join(" and ");
    let kind = game.key.kind;
    match &game.payload {
        GamePayload::Guess(guess) => format!(
            "⏰ Time's up, {mentions}! The number was **{}**.",
            guess.secret()
        ),
        GamePayload::Math(challenge) => format!(
            "⏰ Time's up, {mentions}! {challenge} = **{}**.",
            challenge.answer()
        ),
        GamePayload::Trivia(round) => format!(
            "⏰ Time's up, {mentions}! The answer was **{}**.",
            round.question().correct_option()
        ),
        GamePayload::Typing(_) => format!("⏰ Time's up, {mentions}! The typing test has ended."),
        GamePayload::Rps(_) => format!("⏰ The {kind} game between {mentions} timed out."),
        GamePayload::TicTacToe(board) => format!(
            "⏰ The {kind} game between {mentions} timed out. Final board:\n{}",
            board.render()
        ),
    }
}

/// DM sent to the winner of a scheduled draw.
#[must_use]
pub fn winner_notice(draw: &DrawResult) -> String {
    format!(
        "🎉 You won the daily lottery! **{}** coins from {} ticket(s) are in your wallet.",
        draw.pot, draw.tickets
    )
}

/// Spawns the tasks that post expiry notices in their channels and DM
/// lottery winners. Each task ends when its sender side is dropped.
pub fn spawn_announcers(
    ctx: serenity::Context,
    mut expired: mpsc::UnboundedReceiver<ExpiredGame>,
    mut draws: mpsc::UnboundedReceiver<DrawResult>,
) -> [JoinHandle<()>; 2] {
    let expiry_ctx = ctx.clone();
    let games = tokio::spawn(async move {
        while let Some(game) = expired.recv().await {
            let channel = serenity::ChannelId::new(game.channel_id);
            if let Err(e) = channel.say(&expiry_ctx.http, expiry_notice(&game)).await {
                warn!("Failed to announce expired game in {channel}: {e}");
            }
        }
    });

    let lottery = tokio::spawn(async move {
        while let Some(draw) = draws.recv().await {
            info!(
                guild_id = draw.guild_id,
                winner = draw.winner,
                pot = draw.pot,
                "scheduled lottery drawn"
            );
            notify(&ctx, serenity::UserId::new(draw.winner), winner_notice(&draw)).await;
        }
    });

    [games, lottery]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{GameKey, GameKind, guess::GuessGame, rps::RpsGame, tictactoe::TicTacToe};

    #[test]
    fn test_guess_expiry_reveals_secret() {
        let notice = expiry_notice(&ExpiredGame {
            key: GameKey::solo(GameKind::Guess, 5),
            channel_id: 1,
            payload: GamePayload::Guess(GuessGame::with_secret(64)),
        });
        assert_eq!(notice, "⏰ Time's up, <@5>! The number was **64**.");
    }

    #[test]
    fn test_duel_expiry_mentions_both_players() -> crate::errors::Result<()> {
        let notice = expiry_notice(&ExpiredGame {
            key: GameKey::duel(GameKind::Rps, 1, 2),
            channel_id: 1,
            payload: GamePayload::Rps(RpsGame::new(1, 2)?),
        });
        assert!(notice.contains("<@1> and <@2>"));
        assert!(notice.contains("Rock-Paper-Scissors"));
        Ok(())
    }

    #[test]
    fn test_ttt_expiry_shows_final_board() -> crate::errors::Result<()> {
        let mut board = TicTacToe::new(1, 2)?;
        board.play(1, 0)?;
        let notice = expiry_notice(&ExpiredGame {
            key: GameKey::duel(GameKind::TicTacToe, 1, 2),
            channel_id: 1,
            payload: GamePayload::TicTacToe(board),
        });
        assert!(notice.ends_with("❌⬜⬜\n⬜⬜⬜\n⬜⬜⬜"));
        Ok(())
    }

    #[test]
    fn test_winner_notice_matches_draw_cadence() {
        let notice = winner_notice(&DrawResult {
            guild_id: 1,
            winner: 2,
            pot: 300,
            tickets: 3,
        });
        assert!(notice.contains("daily lottery"));
        assert!(notice.contains("**300** coins from 3 ticket(s)"));
    }
}
