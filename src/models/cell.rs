use std::fmt;

use serde::{Deserialize, Serialize};

use super::LetterTile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Where a cell lives. Board cells only ever carry row/col and rack cells
/// only ever carry a slot index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Slot {
    Board { row: usize, col: usize },
    Rack { pos: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellRole {
    Board,
    Rack,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// No flag set. Says nothing about whether a tile is present.
    #[default]
    Empty,
    Immutable,
    CurrentMove,
    MarkedForExchange,
    Error,
    /// Confirmed tile from the most recent move, highlighted for the other players
    Historical,
}

/// Board premium square
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Bonus {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "DW")]
    WordDouble,
    #[serde(rename = "TW")]
    WordTriple,
    #[serde(rename = "DL")]
    LetterDouble,
    #[serde(rename = "TL")]
    LetterTriple,
}

impl Bonus {
    pub fn letter_multiplier(&self) -> u32 {
        match self {
            Bonus::LetterDouble => 2,
            Bonus::LetterTriple => 3,
            _ => 1,
        }
    }

    pub fn word_multiplier(&self) -> u32 {
        match self {
            Bonus::WordDouble => 2,
            Bonus::WordTriple => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub slot: Slot,
    pub tile: Option<LetterTile>,
    pub status: CellStatus,
    pub bonus: Bonus,
    is_immutable: bool,
}

impl Cell {
    pub fn empty_board(row: usize, col: usize, bonus: Bonus) -> Self {
        Self {
            slot: Slot::Board { row, col },
            tile: None,
            status: CellStatus::Empty,
            bonus,
            is_immutable: false,
        }
    }

    pub fn empty_rack(pos: usize) -> Self {
        Self {
            slot: Slot::Rack { pos },
            tile: None,
            status: CellStatus::Empty,
            bonus: Bonus::None,
            is_immutable: false,
        }
    }

    pub fn role(&self) -> CellRole {
        match self.slot {
            Slot::Board { .. } => CellRole::Board,
            Slot::Rack { .. } => CellRole::Rack,
        }
    }

    /// Board coordinates, `None` for rack cells
    pub fn position(&self) -> Option<Position> {
        match self.slot {
            Slot::Board { row, col } => Some(Position { row, col }),
            Slot::Rack { .. } => None,
        }
    }

    /// Rack slot index, `None` for board cells
    pub fn rack_pos(&self) -> Option<usize> {
        match self.slot {
            Slot::Rack { pos } => Some(pos),
            Slot::Board { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    pub fn is_immutable(&self) -> bool {
        self.is_immutable
    }

    /// A board tile placed this turn and not yet confirmed
    pub fn is_current_move(&self) -> bool {
        self.role() == CellRole::Board && self.tile.is_some() && !self.is_immutable
    }

    pub fn set_tile(&mut self, tile: Option<LetterTile>) {
        self.tile = tile;
    }

    pub fn set_status(&mut self, status: CellStatus) {
        self.status = status;
    }

    /// Lock a confirmed tile. Happens once per cell, when its move is accepted.
    pub fn mark_immutable(&mut self) {
        debug_assert!(!self.is_immutable, "cell {:?} locked twice", self.slot);
        debug_assert!(self.tile.is_some(), "locking an empty cell {:?}", self.slot);
        self.is_immutable = true;
        self.status = CellStatus::Immutable;
    }

    /// Letter shown on the cell, the pinned letter for wildcards
    pub fn letter(&self) -> Option<char> {
        self.tile.map(|tile| tile.letter)
    }

    /// Points this cell contributes to a word.
    ///
    /// Premium squares count only while the tile belongs to the move being
    /// built. Once confirmed the tile is worth its face value.
    pub fn score(&self) -> u32 {
        match self.tile {
            None => 0,
            Some(tile) if self.is_immutable => tile.value as u32,
            Some(tile) => tile.value as u32 * self.bonus.letter_multiplier(),
        }
    }
}
