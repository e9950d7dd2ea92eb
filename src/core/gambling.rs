//! Gambling outcomes.
//!
//! Draws take any [`Rng`] so tests can seed them, and payout arithmetic is
//! separated from the draw so forced results can be checked directly.
//! Every payout is expressed as the net change to the wallet.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A side of the coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinSide {
    /// Heads
    Heads,
    /// Tails
    Tails,
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        })
    }
}

impl FromStr for CoinSide {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heads" | "head" | "h" => Ok(Self::Heads),
            "tails" | "tail" | "t" => Ok(Self::Tails),
            other => Err(crate::errors::Error::validation(format!(
                "`{other}` is not a coin side; pick heads or tails"
            ))),
        }
    }
}

/// Flips the coin.
///
/// Thresholds the mean of four uniform draws at 0.5. Symmetric, but not
/// distributed like a single draw.
pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> CoinSide {
    let mean = (0..4).map(|_| rng.r#gen::<f64>()).sum::<f64>() / 4.0;
    if mean < 0.5 {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

/// Net wallet change for a coinflip: even money, or 1.15× floored with a lucky charm.
#[must_use]
pub const fn coinflip_delta(won: bool, bet: i64, lucky: bool) -> i64 {
    match (won, lucky) {
        (true, true) => bet * 115 / 100,
        (true, false) => bet,
        (false, _) => -bet,
    }
}

/// Rolls a six-sided die.
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// Net wallet change for a dice bet: ×5 on an exact match (×6 lucky), else the bet is lost.
#[must_use]
pub const fn dice_delta(guess: u8, roll: u8, bet: i64, lucky: bool) -> i64 {
    if guess != roll {
        -bet
    } else if lucky {
        bet * 6
    } else {
        bet * 5
    }
}

/// Slot machine reel symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    /// 🍒
    Cherry,
    /// 🍋
    Lemon,
    /// 🍊
    Orange,
    /// 🍇
    Grape,
    /// 🔔
    Bell,
    /// 7️⃣
    Seven,
}

impl Symbol {
    /// Every reel symbol.
    pub const ALL: [Self; 6] = [
        Self::Cherry,
        Self::Lemon,
        Self::Orange,
        Self::Grape,
        Self::Bell,
        Self::Seven,
    ];

    /// Emoji shown on the reel.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Cherry => "🍒",
            Self::Lemon => "🍋",
            Self::Orange => "🍊",
            Self::Grape => "🍇",
            Self::Bell => "🔔",
            Self::Seven => "7️⃣",
        }
    }
}

/// Spins three independent reels.
pub fn spin_reels<R: Rng + ?Sized>(rng: &mut R) -> [Symbol; 3] {
    let mut pick = || *Symbol::ALL.choose(rng).unwrap_or(&Symbol::Cherry);
    [pick(), pick(), pick()]
}

/// How many reels agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotsResult {
    /// All three symbols equal
    Jackpot,
    /// Exactly two symbols equal
    Pair,
    /// All symbols different
    Miss,
}

/// Classifies a spin.
#[must_use]
pub fn classify_reels(reels: [Symbol; 3]) -> SlotsResult {
    let [a, b, c] = reels;
    if a == b && b == c {
        SlotsResult::Jackpot
    } else if a == b || b == c || a == c {
        SlotsResult::Pair
    } else {
        SlotsResult::Miss
    }
}

/// Net wallet change for a spin: jackpot ×10 (×11 lucky), a pair refunds the bet, a miss loses it.
#[must_use]
pub fn slots_delta(reels: [Symbol; 3], bet: i64, lucky: bool) -> i64 {
    match classify_reels(reels) {
        SlotsResult::Jackpot if lucky => bet * 11,
        SlotsResult::Jackpot => bet * 10,
        SlotsResult::Pair => 0,
        SlotsResult::Miss => -bet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_slots_forced_draws() {
        use Symbol::{Bell, Cherry, Seven};
        assert_eq!(slots_delta([Seven, Seven, Seven], 20, false), 200);
        assert_eq!(slots_delta([Seven, Seven, Seven], 20, true), 220);
        assert_eq!(slots_delta([Seven, Bell, Seven], 20, false), 0);
        assert_eq!(slots_delta([Cherry, Bell, Bell], 20, true), 0);
        assert_eq!(slots_delta([Cherry, Bell, Seven], 20, false), -20);
        assert_eq!(classify_reels([Bell, Cherry, Bell]), SlotsResult::Pair);
    }

    #[test]
    fn test_coinflip_payouts() {
        assert_eq!(coinflip_delta(true, 100, false), 100);
        assert_eq!(coinflip_delta(true, 100, true), 115);
        // Floors the boosted payout.
        assert_eq!(coinflip_delta(true, 7, true), 8);
        assert_eq!(coinflip_delta(false, 100, true), -100);
    }

    #[test]
    fn test_dice_payouts() {
        assert_eq!(dice_delta(3, 3, 10, false), 50);
        assert_eq!(dice_delta(3, 3, 10, true), 60);
        assert_eq!(dice_delta(2, 3, 10, true), -10);
    }

    #[test]
    fn test_flip_coin_is_roughly_balanced() {
        let mut rng = StdRng::seed_from_u64(42);
        let heads = (0..10_000)
            .filter(|_| flip_coin(&mut rng) == CoinSide::Heads)
            .count();
        assert!((4_700..=5_300).contains(&heads), "heads = {heads}");
    }

    #[test]
    fn test_die_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert!((1..=6).contains(&roll_die(&mut rng)));
        }
    }

    #[test]
    fn test_parse_coin_side() {
        assert_eq!("Heads".parse::<CoinSide>().ok(), Some(CoinSide::Heads));
        assert_eq!("t".parse::<CoinSide>().ok(), Some(CoinSide::Tails));
        assert!("edge".parse::<CoinSide>().is_err());
    }
}
