//! Mini-game commands. Each one registers a session and posts its prompt;
//! replies arrive through buttons or chat messages handled in `handlers`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            access::{command_rng, ensure_other_member},
            handlers::components,
        },
        errors::Result,
        games::{
            GameKey, GameKind, GamePayload,
            guess::{GuessGame, MAX_SECRET, MIN_SECRET},
            math::MathChallenge,
            rps::RpsGame,
            tictactoe::TicTacToe,
            trivia::TriviaRound,
            typing::TypingTest,
        },
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    fn channel_of(ctx: Context<'_>) -> u64 {
        ctx.channel_id().get()
    }

    /// Challenges a member to Rock-Paper-Scissors.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn rps(
        ctx: Context<'_>,
        #[description = "Who to challenge"] opponent: serenity::User,
    ) -> Result<()> {
        ensure_other_member(ctx, &opponent)?;
        let challenger = ctx.author().id;
        let game = RpsGame::new(challenger.get(), opponent.id.get())?;
        let game_id = ctx.data().games.create(
            GameKey::duel(GameKind::Rps, challenger.get(), opponent.id.get()),
            channel_of(ctx),
            GamePayload::Rps(game),
        )?;

        let reply = poise::CreateReply::default()
            .content(format!(
                "✊ <@{challenger}> challenged <@{}> to Rock-Paper-Scissors! Both of you, pick below within {} seconds.",
                opponent.id,
                GameKind::Rps.ttl().as_secs()
            ))
            .components(components::rps_buttons(game_id));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Challenges a member to Tic-Tac-Toe. The challenger plays first.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("ttt"))]
    pub async fn tictactoe(
        ctx: Context<'_>,
        #[description = "Who to challenge"] opponent: serenity::User,
    ) -> Result<()> {
        ensure_other_member(ctx, &opponent)?;
        let challenger = ctx.author().id.get();
        let game = TicTacToe::new(challenger, opponent.id.get())?;
        let game_id = ctx.data().games.create(
            GameKey::duel(GameKind::TicTacToe, challenger, opponent.id.get()),
            channel_of(ctx),
            GamePayload::TicTacToe(game.clone()),
        )?;
        let reply = poise::CreateReply::default()
            .content(components::ttt_status(&game, None))
            .components(components::ttt_board(game_id, &game, false));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Starts a number guessing game.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn guess(ctx: Context<'_>) -> Result<()> {
        let user = ctx.author().id;
        let game = GuessGame::new(&mut command_rng());
        ctx.data().games.create(
            GameKey::solo(GameKind::Guess, user.get()),
            channel_of(ctx),
            GamePayload::Guess(game),
        )?;
        ctx.say(format!(
            "🔢 <@{user}>, I'm thinking of a number from {MIN_SECRET} to {MAX_SECRET}. Type your guesses in this channel. You have {} seconds.",
            GameKind::Guess.ttl().as_secs()
        ))
        .await?;
        Ok(())
    }

    /// Asks an arithmetic question.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn math(ctx: Context<'_>) -> Result<()> {
        let user = ctx.author().id;
        let challenge = MathChallenge::new(&mut command_rng());
        let prompt = format!(
            "➗ <@{user}>, what is **{challenge}**? You have {} seconds.",
            GameKind::Math.ttl().as_secs()
        );
        ctx.data().games.create(
            GameKey::solo(GameKind::Math, user.get()),
            channel_of(ctx),
            GamePayload::Math(challenge),
        )?;
        ctx.say(prompt).await?;
        Ok(())
    }

    /// Asks a multiple-choice trivia question.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn trivia(ctx: Context<'_>) -> Result<()> {
        let user = ctx.author().id;
        let round = TriviaRound::new(&mut command_rng());
        let question = *round.question();
        let game_id = ctx.data().games.create(
            GameKey::solo(GameKind::Trivia, user.get()),
            channel_of(ctx),
            GamePayload::Trivia(round),
        )?;

        let reply = poise::CreateReply::default()
            .content(components::trivia_prompt(user, &question))
            .components(components::trivia_buttons(game_id, &question));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Starts a typing speed test.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "type")]
    pub async fn typing_test(ctx: Context<'_>) -> Result<()> {
        let user = ctx.author().id;
        let test = TypingTest::new(&mut command_rng(), Utc::now());
        let sentence = test.sentence();
        ctx.data().games.create(
            GameKey::solo(GameKind::Typing, user.get()),
            channel_of(ctx),
            GamePayload::Typing(test),
        )?;
        ctx.say(format!(
            "⌨️ <@{user}>, type this exactly as fast as you can:\n```\n{sentence}\n```"
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
