//! Tic-Tac-Toe between two members. The challenger plays X and moves first.

use crate::errors::{Error, Result};

/// The eight winning lines: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// First player
    X,
    /// Second player
    O,
}

impl Mark {
    /// Emoji shown on the board.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::X => "❌",
            Self::O => "⭕",
        }
    }
}

/// Result of a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game continues; the given player moves next
    Next(u64),
    /// The given player completed a line
    Won(u64),
    /// Board full with no line
    Draw,
}

/// Board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    players: [u64; 2],
    board: [Option<Mark>; 9],
    turn: usize,
    finished: bool,
}

impl TicTacToe {
    /// New game; `challenger` is X.
    pub fn new(challenger: u64, opponent: u64) -> Result<Self> {
        if challenger == opponent {
            return Err(Error::validation("You can't challenge yourself."));
        }
        Ok(Self {
            players: [challenger, opponent],
            board: [None; 9],
            turn: 0,
            finished: false,
        })
    }

    /// Both players, X first.
    #[must_use]
    pub const fn players(&self) -> [u64; 2] {
        self.players
    }

    /// Player whose turn it is.
    #[must_use]
    pub const fn current_player(&self) -> u64 {
        self.players[self.turn]
    }

    /// Cells in row-major order.
    #[must_use]
    pub const fn board(&self) -> &[Option<Mark>; 9] {
        &self.board
    }

    /// Places the current player's mark at `cell` (0..9, row-major).
    pub fn play(&mut self, user: u64, cell: usize) -> Result<MoveOutcome> {
        if self.finished {
            return Err(Error::conflict("This game is already over."));
        }
        let seat = self
            .players
            .iter()
            .position(|p| *p == user)
            .ok_or_else(|| Error::denied("you're not playing in this game"))?;
        if seat != self.turn {
            return Err(Error::validation("It's not your turn."));
        }
        let slot = self
            .board
            .get_mut(cell)
            .ok_or_else(|| Error::validation("That cell doesn't exist."))?;
        if slot.is_some() {
            return Err(Error::validation("That cell is already taken."));
        }

        let mark = if seat == 0 { Mark::X } else { Mark::O };
        *slot = Some(mark);

        if self.has_line(mark) {
            self.finished = true;
            return Ok(MoveOutcome::Won(user));
        }
        if self.board.iter().all(Option::is_some) {
            self.finished = true;
            return Ok(MoveOutcome::Draw);
        }
        self.turn = 1 - self.turn;
        Ok(MoveOutcome::Next(self.current_player()))
    }

    fn has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&cell| self.board[cell] == Some(mark)))
    }

    /// Board as three lines of emoji.
    #[must_use]
    pub fn render(&self) -> String {
        self.board
            .chunks(3)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or("⬜", Mark::emoji))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: u64 = 10;
    const O: u64 = 20;

    #[test]
    fn test_scripted_top_row_win() -> Result<()> {
        let mut game = TicTacToe::new(X, O)?;
        // (row, col) pairs: X(0,0) O(1,1) X(0,1) O(2,2) X(0,2)
        let script = [(X, 0), (O, 4), (X, 1), (O, 8), (X, 2)];

        for (index, (player, cell)) in script.into_iter().enumerate() {
            let other = if player == X { O } else { X };
            let before = game.clone();
            assert!(
                matches!(game.play(other, cell), Err(Error::Validation { .. })),
                "move {index} accepted from the waiting player"
            );
            assert_eq!(game, before);

            let outcome = game.play(player, cell)?;
            if index == script.len() - 1 {
                assert_eq!(outcome, MoveOutcome::Won(X));
            } else {
                assert_eq!(outcome, MoveOutcome::Next(other));
            }
        }
        assert!(matches!(game.play(O, 3), Err(Error::Conflict { .. })));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_moves() -> Result<()> {
        let mut game = TicTacToe::new(X, O)?;
        assert!(matches!(
            game.play(99, 0),
            Err(Error::PermissionDenied { .. })
        ));
        assert!(game.play(X, 9).is_err());
        game.play(X, 4)?;
        assert!(matches!(game.play(O, 4), Err(Error::Validation { .. })));
        assert_eq!(game.current_player(), O);
        Ok(())
    }

    #[test]
    fn test_full_board_is_a_draw() -> Result<()> {
        let mut game = TicTacToe::new(X, O)?;
        // X O X / X O O / O X X
        let moves = [0, 1, 2, 4, 3, 5, 7, 6];
        for cell in moves {
            let player = game.current_player();
            assert!(matches!(game.play(player, cell)?, MoveOutcome::Next(_)));
        }
        assert_eq!(game.play(X, 8)?, MoveOutcome::Draw);
        assert_eq!(game.render().lines().count(), 3);
        Ok(())
    }
}
