use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{Cell, Position};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// (row, col) step along this direction
    pub fn step(&self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }
}

/// Identity of a word on the board: two scans that start at the same anchor,
/// run the same way and cover the same number of cells found the same word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordKey {
    pub anchor: Position,
    pub direction: Direction,
    pub len: usize,
}

/// A run of two or more letters formed by a move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub anchor: Position,
    pub direction: Direction,
    pub letters: String,
    pub score: u32,
    pub cells: Vec<Cell>,
    /// Touches the center square or a tile from an earlier turn
    pub connected_to_existing: bool,
    pub definition: Option<String>,
}

impl Word {
    pub fn key(&self) -> WordKey {
        WordKey {
            anchor: self.anchor,
            direction: self.direction,
            len: self.cells.len(),
        }
    }

    /// Single letters are never words
    pub fn is_word(&self) -> bool {
        self.letters.chars().count() > 1
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().filter_map(Cell::position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.positions().any(|p| p == position)
    }

    pub fn shares_cell_with(&self, other: &Word) -> bool {
        self.positions().any(|p| other.contains(p))
    }

    /// Positions of the tiles this move put down
    pub fn placed_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_current_move())
            .filter_map(Cell::position)
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Letter strings of a word list, joined for messages and logs
pub fn letters_of(words: &[Word]) -> String {
    words
        .iter()
        .map(|word| word.letters.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
