use std::collections::HashSet;

use super::{
    grid::{Grid, CENTER},
    scorer::Scorer,
};
use crate::{
    error::MoveRejection,
    models::{Cell, Direction, Position, Word},
};

/// Derives every word formed by the tiles placed this turn.
pub struct WordExtractor<'a> {
    board: &'a Grid,
}

impl<'a> WordExtractor<'a> {
    pub fn new(board: &'a Grid) -> Self {
        Self { board }
    }

    /// Scan both axes through each placed tile.
    ///
    /// A placed tile that forms no word on either axis makes the whole move
    /// invalid. Words reached from several placed tiles are kept once.
    pub fn extract(&self) -> Result<Vec<Word>, MoveRejection> {
        let mut seen = HashSet::new();
        let mut words = Vec::new();

        for cell in self.board.current_move_cells() {
            let Some(origin) = cell.position() else {
                continue;
            };

            let mut formed_any = false;
            for direction in [Direction::Horizontal, Direction::Vertical] {
                if let Some(word) = self.scan(origin, direction) {
                    formed_any = true;
                    if seen.insert(word.key()) {
                        words.push(word);
                    }
                }
            }

            if !formed_any {
                tracing::debug!("Placed tile at {} forms no word", origin);
                return Err(MoveRejection::InvalidPlacement(cell.clone()));
            }
        }

        Ok(words)
    }

    /// Walk back to the anchor, then forward over the run. `None` when the
    /// run is a single letter.
    fn scan(&self, origin: Position, direction: Direction) -> Option<Word> {
        let (dr, dc) = direction.step();
        let (mut row, mut col) = (origin.row as isize, origin.col as isize);

        while self
            .board
            .get(row - dr, col - dc)
            .is_some_and(|cell| !cell.is_empty())
        {
            row -= dr;
            col -= dc;
        }
        let anchor = Position::new(row as usize, col as usize);

        let mut cells: Vec<Cell> = Vec::new();
        while let Some(cell) = self.board.get(row, col).filter(|cell| !cell.is_empty()) {
            cells.push(cell.clone());
            row += dr;
            col += dc;
        }

        let letters: String = cells.iter().filter_map(Cell::letter).collect();
        let connected_to_existing = cells
            .iter()
            .any(|cell| cell.position() == Some(CENTER) || !cell.is_current_move());

        let word = Word {
            anchor,
            direction,
            letters,
            score: Scorer::word_score(&cells),
            cells,
            connected_to_existing,
            definition: None,
        };

        word.is_word().then_some(word)
    }
}

/// Convenience wrapper over [`WordExtractor::extract`]
pub fn extract_words(board: &Grid) -> Result<Vec<Word>, MoveRejection> {
    WordExtractor::new(board).extract()
}
