//! Typing speed test.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Sentences to copy.
pub const SENTENCES: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Practice makes perfect, so keep typing every day.",
    "A journey of a thousand miles begins with a single step.",
    "Rust gives you memory safety without a garbage collector.",
    "Bright stars shine above the quiet mountain lake tonight.",
    "Every great developer was once a beginner who kept going.",
    "Coffee in the morning makes the whole day feel better.",
];

/// Result of a finished test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingResult {
    /// Seconds between the prompt and the matching message
    pub seconds: f64,
    /// Words per minute, rounded
    pub wpm: u32,
}

/// An open typing test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingTest {
    sentence: &'static str,
    started_at: DateTime<Utc>,
}

impl TypingTest {
    /// Draws a sentence and starts the clock at `now`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Self {
        Self::with_sentence(SENTENCES.choose(rng).copied().unwrap_or(SENTENCES[0]), now)
    }

    /// A test for a known sentence.
    #[must_use]
    pub const fn with_sentence(sentence: &'static str, started_at: DateTime<Utc>) -> Self {
        Self {
            sentence,
            started_at,
        }
    }

    /// Sentence to type.
    #[must_use]
    pub const fn sentence(&self) -> &'static str {
        self.sentence
    }

    /// Finishes when `message` matches the sentence exactly; `None` means try again.
    #[must_use]
    pub fn attempt(&self, message: &str, now: DateTime<Utc>) -> Option<TypingResult> {
        if message != self.sentence {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let seconds = ((now - self.started_at).num_milliseconds() as f64 / 1000.0).max(0.001);
        Some(TypingResult {
            seconds,
            wpm: words_per_minute(self.sentence, seconds),
        })
    }
}

/// `round(words / seconds * 60)`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn words_per_minute(sentence: &str, seconds: f64) -> u32 {
    let words = sentence.split_whitespace().count() as f64;
    (words / seconds * 60.0).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_exact_match_finishes() {
        let start = Utc::now();
        let test = TypingTest::with_sentence(SENTENCES[0], start);
        // Nine words in 18 seconds is 30 wpm.
        let result = test.attempt(SENTENCES[0], start + TimeDelta::seconds(18));
        assert_eq!(result.map(|r| r.wpm), Some(30));
    }

    #[test]
    fn test_near_miss_is_rejected() {
        let start = Utc::now();
        let test = TypingTest::with_sentence(SENTENCES[0], start);
        let sloppy = SENTENCES[0].to_lowercase();
        assert!(test.attempt(&sloppy, start).is_none());
        assert!(test.attempt(SENTENCES[0].trim_end_matches('.'), start).is_none());
    }

    #[test]
    fn test_wpm_rounding() {
        assert_eq!(words_per_minute("one two three", 7.0), 26);
        assert_eq!(words_per_minute("a b", 60.0), 2);
    }
}
