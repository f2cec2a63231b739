use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::{Bonus, Cell, CellRole, CellStatus, Position, Slot};

pub const BOARD_SIZE: usize = 15;
pub const RACK_SIZE: usize = 8;
pub const CENTER: Position = Position::new(7, 7);

/// Premium squares of the standard board, seeded once
static BONUS_LAYOUT: Lazy<HashMap<Position, Bonus>> = Lazy::new(|| {
    let mut layout = HashMap::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let bonus = standard_bonus(row, col);
            if bonus != Bonus::None {
                layout.insert(Position::new(row, col), bonus);
            }
        }
    }
    layout
});

/// Fold the board into one octant and read the premium off it
fn standard_bonus(row: usize, col: usize) -> Bonus {
    if row == CENTER.row && col == CENTER.col {
        return Bonus::None;
    }
    if row % 7 == 0 && col % 7 == 0 {
        return Bonus::WordTriple;
    }

    let last = BOARD_SIZE - 1;
    let mut x = if row > CENTER.row { last - row } else { row };
    let mut y = if col > CENTER.col { last - col } else { col };
    if y > x {
        std::mem::swap(&mut x, &mut y);
    }

    match (x, y) {
        (3, 0) | (6, 2) | (7, 3) | (6, 6) => Bonus::LetterDouble,
        (5, 1) | (5, 5) => Bonus::LetterTriple,
        (x, y) if x == y => Bonus::WordDouble,
        _ => Bonus::None,
    }
}

pub fn bonus_at(row: usize, col: usize) -> Bonus {
    BONUS_LAYOUT
        .get(&Position::new(row, col))
        .copied()
        .unwrap_or_default()
}

/// Fixed-size container of cells: the 15x15 board or a rack of 8 slots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    role: CellRole,
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn board() -> Self {
        let cells = (0..BOARD_SIZE * BOARD_SIZE)
            .map(|i| {
                let (row, col) = (i / BOARD_SIZE, i % BOARD_SIZE);
                Cell::empty_board(row, col, bonus_at(row, col))
            })
            .collect();

        Self {
            role: CellRole::Board,
            rows: BOARD_SIZE,
            cols: BOARD_SIZE,
            cells,
        }
    }

    pub fn rack() -> Self {
        Self {
            role: CellRole::Rack,
            rows: 1,
            cols: RACK_SIZE,
            cells: (0..RACK_SIZE).map(Cell::empty_rack).collect(),
        }
    }

    /// Rebuild a board from the occupied cells of a snapshot
    pub fn board_from_snapshot(occupied: &[Cell]) -> Self {
        let mut board = Self::board();
        for cell in occupied {
            if let Slot::Board { row, col } = cell.slot {
                *board.cell_at_mut(row, col) = cell.clone();
            }
        }
        board
    }

    /// Rebuild a rack from stored rack cells. Missing slots stay empty.
    pub fn rack_from_cells(cells: &[Cell]) -> Self {
        let mut rack = Self::rack();
        for cell in cells {
            if let Slot::Rack { pos } = cell.slot {
                if pos < RACK_SIZE {
                    rack.cells[pos] = cell.clone();
                }
            }
        }
        rack
    }

    pub fn role(&self) -> CellRole {
        self.role
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Panics when out of range or called on a rack
    pub fn cell_at(&self, row: usize, col: usize) -> &Cell {
        debug_assert_eq!(self.role, CellRole::Board, "cell_at on a rack");
        assert!(self.in_bounds(row, col), "({row}, {col}) is off the board");
        &self.cells[row * self.cols + col]
    }

    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        debug_assert_eq!(self.role, CellRole::Board, "cell_at_mut on a rack");
        assert!(self.in_bounds(row, col), "({row}, {col}) is off the board");
        &mut self.cells[row * self.cols + col]
    }

    /// Panics when out of range or called on the board
    pub fn rack_cell(&self, pos: usize) -> &Cell {
        debug_assert_eq!(self.role, CellRole::Rack, "rack_cell on the board");
        &self.cells[pos]
    }

    pub fn rack_cell_mut(&mut self, pos: usize) -> &mut Cell {
        debug_assert_eq!(self.role, CellRole::Rack, "rack_cell_mut on the board");
        &mut self.cells[pos]
    }

    /// Bounds-checked lookup for scans that may walk off the edge
    pub fn get(&self, row: isize, col: isize) -> Option<&Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn current_move_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_current_move())
    }

    pub fn has_current_move(&self) -> bool {
        self.current_move_cells().next().is_some()
    }

    /// No tile has been confirmed on this board yet
    pub fn is_first_move(&self) -> bool {
        !self.cells.iter().any(Cell::is_immutable)
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Occupied cells only, the form a board is stored in
    pub fn snapshot(&self) -> Vec<Cell> {
        self.cells.iter().filter(|cell| !cell.is_empty()).cloned().collect()
    }

    pub fn first_empty_slot(&self) -> Option<usize> {
        self.cells.iter().position(Cell::is_empty)
    }

    /// Reset cosmetic flags on this turn's tiles back to `CurrentMove`
    pub fn clear_error_flags(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_current_move()) {
            cell.set_status(CellStatus::CurrentMove);
        }
    }

    /// Lock every tile of this turn, returning how many were locked
    pub fn confirm_current_move(&mut self) -> usize {
        let mut locked = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_current_move()) {
            cell.mark_immutable();
            locked += 1;
        }
        locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_dimensions() {
        let board = Grid::board();
        assert_eq!(board.cells().len(), 225);
        assert_eq!(board.cell_at(3, 11).position(), Some(Position::new(3, 11)));
        assert!(board.is_first_move());
    }

    #[test]
    fn test_rack_dimensions() {
        let rack = Grid::rack();
        assert_eq!(rack.cells().len(), RACK_SIZE);
        assert_eq!(rack.rack_cell(5).rack_pos(), Some(5));
        assert_eq!(rack.first_empty_slot(), Some(0));
    }

    #[test]
    fn test_bonus_layout() {
        assert_eq!(bonus_at(7, 7), Bonus::None);
        assert_eq!(bonus_at(0, 0), Bonus::WordTriple);
        assert_eq!(bonus_at(7, 14), Bonus::WordTriple);
        assert_eq!(bonus_at(1, 1), Bonus::WordDouble);
        assert_eq!(bonus_at(13, 13), Bonus::WordDouble);
        assert_eq!(bonus_at(1, 5), Bonus::LetterTriple);
        assert_eq!(bonus_at(9, 9), Bonus::LetterTriple);
        assert_eq!(bonus_at(0, 3), Bonus::LetterDouble);
        assert_eq!(bonus_at(8, 6), Bonus::LetterDouble);
        assert_eq!(bonus_at(3, 7), Bonus::LetterDouble);
        assert_eq!(bonus_at(7, 6), Bonus::None);
        assert_eq!(bonus_at(7, 8), Bonus::None);
        assert_eq!(bonus_at(7, 9), Bonus::None);
    }

    #[test]
    fn test_bonus_counts_match_standard_board() {
        let count = |bonus| BONUS_LAYOUT.values().filter(|b| **b == bonus).count();
        assert_eq!(count(Bonus::WordTriple), 8);
        assert_eq!(count(Bonus::WordDouble), 16);
        assert_eq!(count(Bonus::LetterTriple), 12);
        assert_eq!(count(Bonus::LetterDouble), 24);
    }

    #[test]
    fn test_get_is_bounds_checked() {
        let board = Grid::board();
        assert!(board.get(-1, 0).is_none());
        assert!(board.get(0, 15).is_none());
        assert!(board.get(14, 14).is_some());
    }

    #[test]
    #[should_panic]
    fn test_cell_at_out_of_range_panics() {
        let board = Grid::board();
        board.cell_at(15, 0);
    }
}
