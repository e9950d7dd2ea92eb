//! Quick arithmetic challenge.
//!
//! Operand ranges keep every answer a non-negative integer.

use super::guess::parse_guess;
use rand::Rng;
use std::fmt;

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl Op {
    /// Every operator.
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Symbol shown in the question.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '×',
            Self::Div => '÷',
        }
    }
}

/// A question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathChallenge {
    lhs: i64,
    rhs: i64,
    op: Op,
}

impl MathChallenge {
    /// Random operator and operands.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let op = Op::ALL[rng.gen_range(0..Op::ALL.len())];
        Self::with_op(op, rng)
    }

    /// Random operands for `op`.
    pub fn with_op<R: Rng + ?Sized>(op: Op, rng: &mut R) -> Self {
        let (lhs, rhs) = match op {
            Op::Add => (rng.gen_range(1..=50), rng.gen_range(1..=50)),
            Op::Sub => {
                let a = rng.gen_range(1..=50);
                let b = rng.gen_range(1..=50);
                (a.max(b), a.min(b))
            }
            Op::Mul => (rng.gen_range(1..=12), rng.gen_range(1..=12)),
            Op::Div => {
                let divisor = rng.gen_range(1..=10);
                let quotient = rng.gen_range(0..=9);
                (divisor * quotient, divisor)
            }
        };
        Self { lhs, rhs, op }
    }

    /// The expected reply.
    #[must_use]
    pub const fn answer(&self) -> i64 {
        match self.op {
            Op::Add => self.lhs + self.rhs,
            Op::Sub => self.lhs - self.rhs,
            Op::Mul => self.lhs * self.rhs,
            Op::Div => self.lhs / self.rhs,
        }
    }

    /// Whether a chat message is the right answer. Non-numeric messages never are.
    #[must_use]
    pub fn is_correct(&self, message: &str) -> bool {
        parse_guess(message) == Some(self.answer())
    }
}

impl fmt::Display for MathChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_operand_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..300 {
            let add = MathChallenge::with_op(Op::Add, &mut rng);
            assert!((1..=50).contains(&add.lhs) && (1..=50).contains(&add.rhs));

            let sub = MathChallenge::with_op(Op::Sub, &mut rng);
            assert!(sub.lhs >= sub.rhs && sub.rhs >= 1 && sub.lhs <= 50);
            assert!(sub.answer() >= 0);

            let mul = MathChallenge::with_op(Op::Mul, &mut rng);
            assert!((1..=12).contains(&mul.lhs) && (1..=12).contains(&mul.rhs));

            let div = MathChallenge::with_op(Op::Div, &mut rng);
            assert!((1..=10).contains(&div.rhs));
            assert_eq!(div.lhs % div.rhs, 0);
            assert!((0..=9).contains(&div.answer()));
        }
    }

    #[test]
    fn test_answer_checking() {
        let challenge = MathChallenge {
            lhs: 36,
            rhs: 4,
            op: Op::Div,
        };
        assert_eq!(challenge.to_string(), "36 ÷ 4");
        assert!(challenge.is_correct(" 9"));
        assert!(!challenge.is_correct("8"));
        assert!(!challenge.is_correct("nine"));
    }
}
