use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::models::{Cell, Word};

/// Points awarded when a move empties the whole rack
pub const DEFAULT_FULL_RACK_BONUS: u32 = 50;

/// Result of scoring a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of all word scores
    pub words_total: u32,
    /// Full-rack bonus, 0 when not earned
    pub bonus: u32,
    pub total: u32,
}

pub struct Scorer;

impl Scorer {
    /// Score a run of cells as one word.
    ///
    /// Scoring rules:
    /// - Each letter has a base value, wildcards are worth 0
    /// - DL / TL multiply a newly placed letter by 2 / 3
    /// - DW / TW under newly placed letters multiply the whole word, and
    ///   stack when a word covers more than one
    /// - Premiums under tiles from earlier turns count for nothing
    pub fn word_score(cells: &[Cell]) -> u32 {
        let letter_total: u32 = cells.iter().map(Cell::score).sum();
        let word_multiplier: u32 = cells
            .iter()
            .filter(|cell| cell.is_current_move())
            .map(|cell| cell.bonus.word_multiplier())
            .product();

        letter_total * word_multiplier
    }

    /// Bonus for a move that leaves the rack empty at confirm time
    pub fn full_rack_bonus(rack: &Grid, bonus: u32) -> u32 {
        if rack.occupied() == 0 {
            bonus
        } else {
            0
        }
    }

    pub fn score_move(words: &[Word], rack: &Grid, bonus: u32) -> ScoreResult {
        let words_total = words.iter().map(|word| word.score).sum();
        let bonus = Self::full_rack_bonus(rack, bonus);

        ScoreResult {
            words_total,
            bonus,
            total: words_total + bonus,
        }
    }
}
