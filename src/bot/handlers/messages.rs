//! Chat messages as answers to running guess, math and typing games.

use crate::{
    bot::BotData,
    errors::Result,
    games::{
        GameKey, GameKind, GamePayload, GameRegistry, Step,
        guess::{GuessFeedback, parse_guess},
    },
};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use tracing::warn;

const MESSAGE_GAMES: [GameKind; 3] = [GameKind::Guess, GameKind::Math, GameKind::Typing];

/// Feeds `content` to every message-driven game `user` has open in
/// `channel_id` and returns the replies to post, in order.
///
/// Messages starting with the command `prefix` are commands poise has
/// already dispatched, never answers.
pub fn answer_games(
    games: &GameRegistry,
    prefix: &str,
    user: u64,
    channel_id: u64,
    content: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    if !prefix.is_empty() && content.trim_start().starts_with(prefix) {
        return Vec::new();
    }
    MESSAGE_GAMES
        .into_iter()
        .filter_map(|kind| games.find_by_participant(user, kind, channel_id))
        .filter_map(|key| match step(games, &key, user, content, now) {
            Ok(reply) => reply,
            // The game ended between lookup and update.
            Err(_) => None,
        })
        .collect()
}

fn step(
    games: &GameRegistry,
    key: &GameKey,
    user: u64,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    games.update(key, |payload| {
        Ok(match payload {
            GamePayload::Guess(game) => {
                let Some(value) = parse_guess(content) else {
                    return Ok(Step::Continue(None));
                };
                match game.guess(value) {
                    GuessFeedback::Higher => Step::Continue(Some("📈 Higher!".to_string())),
                    GuessFeedback::Lower => Step::Continue(Some("📉 Lower!".to_string())),
                    GuessFeedback::Correct(attempts) => Step::Finished(Some(format!(
                        "🎉 <@{user}> got it! The number was **{value}** ({attempts} attempt{}).",
                        if attempts == 1 { "" } else { "s" }
                    ))),
                }
            }
            GamePayload::Math(challenge) => {
                if challenge.is_correct(content) {
                    Step::Finished(Some(format!(
                        "✅ Correct, <@{user}>! {challenge} = **{}**",
                        challenge.answer()
                    )))
                } else {
                    Step::Continue(None)
                }
            }
            GamePayload::Typing(test) => match test.attempt(content, now) {
                Some(result) => Step::Finished(Some(format!(
                    "⌨️ <@{user}> finished in **{:.2}s** at **{} WPM**!",
                    result.seconds, result.wpm
                ))),
                None => Step::Continue(Some(
                    "❌ That doesn't match. Copy the sentence exactly and try again.".to_string(),
                )),
            },
            GamePayload::Rps(_) | GamePayload::TicTacToe(_) | GamePayload::Trivia(_) => {
                Step::Continue(None)
            }
        })
    })
}

/// Replies to a chat message that answers one of the author's games.
pub async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    if message.author.bot || message.guild_id.is_none() {
        return Ok(());
    }
    let replies = answer_games(
        &data.games,
        &data.config.bot.prefix,
        message.author.id.get(),
        message.channel_id.get(),
        &message.content,
        Utc::now(),
    );
    for reply in replies {
        if let Err(e) = message.reply(&ctx.http, reply).await {
            warn!("Failed to reply in channel {}: {e}", message.channel_id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::Error,
        games::{guess::GuessGame, math::MathChallenge, math::Op, typing::TypingTest},
        test_utils::{fixed_now, seeded_rng},
    };
    use chrono::TimeDelta;

    const PREFIX: &str = "!";
    const USER: u64 = 7;
    const CHANNEL: u64 = 70;

    #[tokio::test(start_paused = true)]
    async fn test_guess_hints_then_finishes() -> Result<()> {
        let (games, _rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Guess, USER);
        games.create(key.clone(), CHANNEL, GamePayload::Guess(GuessGame::with_secret(42)))?;

        let now = fixed_now();
        assert_eq!(answer_games(&games, PREFIX, USER, CHANNEL, "hello", now), Vec::<String>::new());
        assert_eq!(answer_games(&games, PREFIX, USER, CHANNEL, "10", now), vec!["📈 Higher!"]);
        assert_eq!(answer_games(&games, PREFIX, USER, CHANNEL, "90", now), vec!["📉 Lower!"]);
        assert!(answer_games(&games, PREFIX, 8, CHANNEL, "42", now).is_empty());
        assert!(answer_games(&games, PREFIX, USER, CHANNEL + 1, "42", now).is_empty());

        let replies = answer_games(&games, PREFIX, USER, CHANNEL, "42", now);
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("(3 attempts)"));
        assert!(games.get(&key).is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_math_ignores_wrong_answers() -> Result<()> {
        let (games, _rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Math, USER);
        let challenge = MathChallenge::with_op(Op::Add, &mut seeded_rng(3));
        let answer = challenge.answer();
        games.create(key.clone(), CHANNEL, GamePayload::Math(challenge))?;

        let now = fixed_now();
        assert!(answer_games(&games, PREFIX, USER, CHANNEL, &(answer + 1).to_string(), now).is_empty());
        assert!(games.get(&key).is_some());

        let replies = answer_games(&games, PREFIX, USER, CHANNEL, &answer.to_string(), now);
        assert_eq!(replies.len(), 1);
        assert!(games.get(&key).is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_retries_until_exact() -> Result<()> {
        let (games, _rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Typing, USER);
        let started = fixed_now();
        let sentence = "The quick brown fox jumps over the lazy dog.";
        games.create(
            key.clone(),
            CHANNEL,
            GamePayload::Typing(TypingTest::with_sentence(sentence, started)),
        )?;

        let later = started + TimeDelta::seconds(9);
        let retry = answer_games(&games, PREFIX, USER, CHANNEL, "the quick brown fox", later);
        assert_eq!(retry.len(), 1);
        assert!(retry[0].starts_with('❌'));

        let done = answer_games(&games, PREFIX, USER, CHANNEL, sentence, later);
        let reply = done.first().ok_or_else(|| Error::not_found("typing reply"))?;
        assert!(reply.contains("60 WPM"));
        assert!(games.get(&key).is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_starting_command_is_not_an_attempt() -> Result<()> {
        let (games, _rx) = GameRegistry::new();
        let key = GameKey::solo(GameKind::Typing, USER);
        let started = fixed_now();
        let sentence = "Pack my box with five dozen liquor jugs.";
        games.create(
            key.clone(),
            CHANNEL,
            GamePayload::Typing(TypingTest::with_sentence(sentence, started)),
        )?;

        assert!(answer_games(&games, PREFIX, USER, CHANNEL, "!type", started).is_empty());
        assert!(answer_games(&games, PREFIX, USER, CHANNEL, "  !guess", started).is_empty());
        assert!(games.get(&key).is_some());

        let later = started + TimeDelta::seconds(4);
        assert_eq!(answer_games(&games, PREFIX, USER, CHANNEL, sentence, later).len(), 1);
        assert!(games.get(&key).is_none());
        Ok(())
    }
}
