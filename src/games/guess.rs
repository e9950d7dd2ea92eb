//! Number guessing: find a secret between 1 and 100.

use rand::Rng;
use std::cmp::Ordering;

/// Smallest possible secret.
pub const MIN_SECRET: i64 = 1;
/// Largest possible secret.
pub const MAX_SECRET: i64 = 100;

/// Response to a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessFeedback {
    /// The secret is bigger
    Higher,
    /// The secret is smaller
    Lower,
    /// Found it after this many attempts
    Correct(u32),
}

/// One member's guessing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessGame {
    secret: i64,
    attempts: u32,
}

impl GuessGame {
    /// Picks a uniform secret in `MIN_SECRET..=MAX_SECRET`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_secret(rng.gen_range(MIN_SECRET..=MAX_SECRET))
    }

    /// A game with a known secret.
    #[must_use]
    pub const fn with_secret(secret: i64) -> Self {
        Self {
            secret,
            attempts: 0,
        }
    }

    /// The number to find, revealed on expiry.
    #[must_use]
    pub const fn secret(&self) -> i64 {
        self.secret
    }

    /// Attempts so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Counts an attempt and compares it with the secret.
    pub fn guess(&mut self, value: i64) -> GuessFeedback {
        self.attempts += 1;
        match value.cmp(&self.secret) {
            Ordering::Less => GuessFeedback::Higher,
            Ordering::Greater => GuessFeedback::Lower,
            Ordering::Equal => GuessFeedback::Correct(self.attempts),
        }
    }
}

/// A chat message counts as a guess only when it is a bare integer.
#[must_use]
pub fn parse_guess(message: &str) -> Option<i64> {
    let trimmed = message.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_hints_and_attempt_count() {
        let mut game = GuessGame::with_secret(42);
        assert_eq!(game.guess(50), GuessFeedback::Lower);
        assert_eq!(game.guess(25), GuessFeedback::Higher);
        assert_eq!(game.guess(42), GuessFeedback::Correct(3));
    }

    #[test]
    fn test_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let secret = GuessGame::new(&mut rng).secret();
            assert!((MIN_SECRET..=MAX_SECRET).contains(&secret));
        }
    }

    #[test]
    fn test_parse_guess() {
        assert_eq!(parse_guess(" 17 "), Some(17));
        assert_eq!(parse_guess("-3"), Some(-3));
        assert_eq!(parse_guess("17 please"), None);
        assert_eq!(parse_guess("+5"), None);
        assert_eq!(parse_guess(""), None);
    }
}
