//! Multiple-choice trivia from a fixed question pool.

use crate::errors::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// One question with four options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaQuestion {
    /// Question text
    pub question: &'static str,
    /// Answer options, shown as buttons
    pub options: [&'static str; 4],
    /// Index of the correct option
    pub answer: usize,
}

impl TriviaQuestion {
    /// Text of the correct option.
    #[must_use]
    pub const fn correct_option(&self) -> &'static str {
        self.options[self.answer]
    }
}

/// Question pool.
pub const QUESTIONS: &[TriviaQuestion] = &[
    TriviaQuestion {
        question: "What is the capital of Australia?",
        options: ["Sydney", "Melbourne", "Canberra", "Perth"],
        answer: 2,
    },
    TriviaQuestion {
        question: "Which planet is known as the Red Planet?",
        options: ["Venus", "Mars", "Jupiter", "Mercury"],
        answer: 1,
    },
    TriviaQuestion {
        question: "How many sides does a hexagon have?",
        options: ["5", "6", "7", "8"],
        answer: 1,
    },
    TriviaQuestion {
        question: "What is the chemical symbol for gold?",
        options: ["Ag", "Go", "Gd", "Au"],
        answer: 3,
    },
    TriviaQuestion {
        question: "Who painted the Mona Lisa?",
        options: ["Leonardo da Vinci", "Michelangelo", "Raphael", "Rembrandt"],
        answer: 0,
    },
    TriviaQuestion {
        question: "What is the largest ocean on Earth?",
        options: ["Atlantic", "Indian", "Arctic", "Pacific"],
        answer: 3,
    },
    TriviaQuestion {
        question: "In which year did the first person walk on the Moon?",
        options: ["1965", "1969", "1972", "1959"],
        answer: 1,
    },
    TriviaQuestion {
        question: "What is the hardest natural substance?",
        options: ["Diamond", "Quartz", "Iron", "Granite"],
        answer: 0,
    },
    TriviaQuestion {
        question: "Which language has the most native speakers?",
        options: ["English", "Spanish", "Mandarin Chinese", "Hindi"],
        answer: 2,
    },
    TriviaQuestion {
        question: "How many bits are in a byte?",
        options: ["4", "8", "16", "32"],
        answer: 1,
    },
];

/// A member's open question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaRound {
    question: TriviaQuestion,
}

impl TriviaRound {
    /// Draws a question from [`QUESTIONS`].
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_question(*QUESTIONS.choose(rng).unwrap_or(&QUESTIONS[0]))
    }

    /// A round for a known question.
    #[must_use]
    pub const fn with_question(question: TriviaQuestion) -> Self {
        Self { question }
    }

    /// The question being asked.
    #[must_use]
    pub const fn question(&self) -> &TriviaQuestion {
        &self.question
    }

    /// Checks a clicked option. Any valid click ends the round.
    pub fn answer(&self, index: usize) -> Result<bool> {
        if index >= self.question.options.len() {
            return Err(Error::validation("That option doesn't exist."));
        }
        Ok(index == self.question.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pool_is_well_formed() {
        for q in QUESTIONS {
            assert!(q.answer < q.options.len(), "{}", q.question);
        }
    }

    #[test]
    fn test_answering() -> Result<()> {
        let round = TriviaRound::with_question(QUESTIONS[0]);
        assert!(round.answer(2)?);
        assert!(!round.answer(0)?);
        assert!(round.answer(4).is_err());
        assert_eq!(round.question().correct_option(), "Canberra");
        Ok(())
    }

    #[test]
    fn test_random_round_comes_from_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let round = TriviaRound::new(&mut rng);
        assert!(QUESTIONS.contains(round.question()));
    }
}
