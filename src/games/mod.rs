//! Chat mini-games.
//!
//! Each game kind is a small state machine in its own module. Live sessions
//! sit in the [`GameRegistry`], keyed by kind and participants, and expire on
//! a per-kind timer.

/// Number guessing
pub mod guess;
/// Arithmetic challenge
pub mod math;
/// Live session registry
pub mod registry;
/// Rock-Paper-Scissors
pub mod rps;
/// Tic-Tac-Toe
pub mod tictactoe;
/// Multiple-choice trivia
pub mod trivia;
/// Typing speed test
pub mod typing;

pub use registry::{ActiveGame, ExpiredGame, GameRegistry, Step};

use std::fmt;
use std::time::Duration;

/// Kinds of game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// Rock-Paper-Scissors
    Rps,
    /// Tic-Tac-Toe
    TicTacToe,
    /// Number guessing
    Guess,
    /// Math challenge
    Math,
    /// Trivia
    Trivia,
    /// Typing test
    Typing,
}

impl GameKind {
    /// How long a session may stay open.
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Rps | Self::Guess | Self::Typing => Duration::from_secs(60),
            Self::TicTacToe => Duration::from_secs(300),
            Self::Math => Duration::from_secs(15),
            Self::Trivia => Duration::from_secs(30),
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rps => "Rock-Paper-Scissors",
            Self::TicTacToe => "Tic-Tac-Toe",
            Self::Guess => "number guessing",
            Self::Math => "math challenge",
            Self::Trivia => "trivia",
            Self::Typing => "typing test",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry key: at most one live game per kind and set of participants.
///
/// Participants are stored sorted, so who challenged whom does not matter.
/// Seat order (who moves first) lives in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey {
    /// Kind of game
    pub kind: GameKind,
    /// One player for solo games, both players in ascending id order for duels
    pub participants: Vec<u64>,
}

impl GameKey {
    /// Key for a solo game.
    #[must_use]
    pub fn solo(kind: GameKind, user: u64) -> Self {
        Self {
            kind,
            participants: vec![user],
        }
    }

    /// Key for a two-player game.
    #[must_use]
    pub fn duel(kind: GameKind, challenger: u64, opponent: u64) -> Self {
        Self {
            kind,
            participants: vec![challenger.min(opponent), challenger.max(opponent)],
        }
    }

    /// Whether `user` plays in this game.
    #[must_use]
    pub fn involves(&self, user: u64) -> bool {
        self.participants.contains(&user)
    }
}

/// Kind-specific game state.
#[derive(Debug, Clone, PartialEq)]
pub enum GamePayload {
    /// Rock-Paper-Scissors round
    Rps(rps::RpsGame),
    /// Tic-Tac-Toe board
    TicTacToe(tictactoe::TicTacToe),
    /// Number guessing session
    Guess(guess::GuessGame),
    /// Math question
    Math(math::MathChallenge),
    /// Trivia question
    Trivia(trivia::TriviaRound),
    /// Typing test
    Typing(typing::TypingTest),
}

impl GamePayload {
    /// Kind of game this state belongs to.
    #[must_use]
    pub const fn kind(&self) -> GameKind {
        match self {
            Self::Rps(_) => GameKind::Rps,
            Self::TicTacToe(_) => GameKind::TicTacToe,
            Self::Guess(_) => GameKind::Guess,
            Self::Math(_) => GameKind::Math,
            Self::Trivia(_) => GameKind::Trivia,
            Self::Typing(_) => GameKind::Typing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duel_key_ignores_seat_order() {
        assert_eq!(
            GameKey::duel(GameKind::TicTacToe, 2, 1),
            GameKey::duel(GameKind::TicTacToe, 1, 2)
        );
        assert_ne!(
            GameKey::duel(GameKind::TicTacToe, 1, 2),
            GameKey::duel(GameKind::Rps, 1, 2)
        );
        assert_eq!(GameKey::duel(GameKind::Rps, 9, 3).participants, vec![3, 9]);
    }
}
