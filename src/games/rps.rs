//! Rock-Paper-Scissors between two members.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsChoice {
    /// Beats scissors
    Rock,
    /// Beats rock
    Paper,
    /// Beats paper
    Scissors,
}

impl RpsChoice {
    /// Every choice, in button order.
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// Button id suffix.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    /// Button emoji.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Rock => "🪨",
            Self::Paper => "📄",
            Self::Scissors => "✂️",
        }
    }

    /// Whether `self` defeats `other`.
    #[must_use]
    pub const fn beats(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Paper, Self::Rock) | (Self::Scissors, Self::Paper)
        )
    }
}

impl fmt::Display for RpsChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.id())
    }
}

impl FromStr for RpsChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("`{s}` is not rock, paper or scissors")))
    }
}

/// How a resolved round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsResult {
    /// The given player won
    Winner(u64),
    /// Both picked the same
    Tie,
}

/// Both hands and the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpsOutcome {
    /// Hands in player order
    pub choices: [RpsChoice; 2],
    /// Result
    pub result: RpsResult,
}

/// A round waiting for both players to pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpsGame {
    players: [u64; 2],
    choices: [Option<RpsChoice>; 2],
}

impl RpsGame {
    /// Challenger first, opponent second.
    pub fn new(challenger: u64, opponent: u64) -> Result<Self> {
        if challenger == opponent {
            return Err(Error::validation("You can't challenge yourself."));
        }
        Ok(Self {
            players: [challenger, opponent],
            choices: [None, None],
        })
    }

    /// Both players.
    #[must_use]
    pub const fn players(&self) -> [u64; 2] {
        self.players
    }

    /// Records `user`'s pick, replacing an earlier one. Resolves once both
    /// have picked.
    pub fn choose(&mut self, user: u64, choice: RpsChoice) -> Result<Option<RpsOutcome>> {
        let seat = self
            .players
            .iter()
            .position(|p| *p == user)
            .ok_or_else(|| Error::denied("you're not playing in this game"))?;
        self.choices[seat] = Some(choice);

        let [Some(first), Some(second)] = self.choices else {
            return Ok(None);
        };
        let result = if first == second {
            RpsResult::Tie
        } else if first.beats(second) {
            RpsResult::Winner(self.players[0])
        } else {
            RpsResult::Winner(self.players[1])
        };
        Ok(Some(RpsOutcome {
            choices: [first, second],
            result,
        }))
    }

    /// Whether `user` has picked yet.
    #[must_use]
    pub fn has_chosen(&self, user: u64) -> bool {
        self.players
            .iter()
            .zip(self.choices)
            .any(|(p, c)| *p == user && c.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_is_cyclic() {
        for a in RpsChoice::ALL {
            assert!(!a.beats(a));
            for b in RpsChoice::ALL {
                if a != b {
                    assert!(a.beats(b) ^ b.beats(a), "{a} vs {b}");
                }
            }
        }
        assert!(RpsChoice::Rock.beats(RpsChoice::Scissors));
        assert!(RpsChoice::Paper.beats(RpsChoice::Rock));
        assert!(RpsChoice::Scissors.beats(RpsChoice::Paper));
    }

    #[test]
    fn test_resolves_after_both_choose() -> Result<()> {
        let mut game = RpsGame::new(1, 2)?;
        assert_eq!(game.choose(1, RpsChoice::Rock)?, None);
        // A second pick overwrites the first.
        assert_eq!(game.choose(1, RpsChoice::Paper)?, None);
        assert!(game.has_chosen(1));
        assert!(!game.has_chosen(2));

        let outcome = game.choose(2, RpsChoice::Rock)?;
        assert_eq!(
            outcome,
            Some(RpsOutcome {
                choices: [RpsChoice::Paper, RpsChoice::Rock],
                result: RpsResult::Winner(1),
            })
        );
        Ok(())
    }

    #[test]
    fn test_equal_choices_tie() -> Result<()> {
        for choice in RpsChoice::ALL {
            let mut game = RpsGame::new(1, 2)?;
            game.choose(2, choice)?;
            let outcome = game.choose(1, choice)?;
            assert_eq!(outcome.map(|o| o.result), Some(RpsResult::Tie));
        }
        Ok(())
    }

    #[test]
    fn test_outsiders_are_rejected() -> Result<()> {
        let mut game = RpsGame::new(1, 2)?;
        assert!(matches!(
            game.choose(3, RpsChoice::Rock),
            Err(Error::PermissionDenied { .. })
        ));
        assert!(RpsGame::new(4, 4).is_err());
        Ok(())
    }
}
