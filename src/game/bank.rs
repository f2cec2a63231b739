use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::grid::Grid;
use crate::{
    models::{CellStatus, Language, LetterTile},
    utils::letters::tile_table,
};

/// Every tile of a full bag for the language, each repeated by its weight
pub fn all_tiles(language: Language) -> Vec<LetterTile> {
    tile_table(language)
        .iter()
        .flat_map(|tile| std::iter::repeat(*tile).take(tile.weight as usize))
        .collect()
}

/// Draws tiles for racks.
///
/// There is no depleting pool: every draw shuffles a fresh full bag and
/// takes from the front, so each refill is an independent weighted sample.
pub struct Bank {
    language: Language,
    rng: StdRng,
}

impl Bank {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic bank for tests and replays
    pub fn seeded(language: Language, seed: u64) -> Self {
        Self {
            language,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn shuffled_bag(&mut self) -> Vec<LetterTile> {
        let mut bag = all_tiles(self.language);
        bag.shuffle(&mut self.rng);
        bag
    }

    pub fn draw(&mut self, count: usize) -> Vec<LetterTile> {
        let mut bag = self.shuffled_bag();
        bag.truncate(count);
        bag
    }

    /// Fill every empty rack slot, returning how many tiles were drawn
    pub fn refill(&mut self, rack: &mut Grid) -> usize {
        let empty: Vec<usize> = rack
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect();

        let drawn = self.draw(empty.len());
        for (pos, tile) in empty.iter().zip(drawn) {
            let cell = rack.rack_cell_mut(*pos);
            cell.set_tile(Some(tile));
            cell.set_status(CellStatus::Empty);
        }

        tracing::debug!("Refilled {} rack slot(s)", empty.len());
        empty.len()
    }

    /// Swap every slot marked for exchange for a new draw.
    /// Returns how many tiles were swapped.
    pub fn exchange(&mut self, rack: &mut Grid) -> usize {
        let marked: Vec<usize> = rack
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.status == CellStatus::MarkedForExchange && !cell.is_empty())
            .map(|(pos, _)| pos)
            .collect();

        let drawn = self.draw(marked.len());
        for (pos, tile) in marked.iter().zip(drawn) {
            let cell = rack.rack_cell_mut(*pos);
            cell.set_tile(Some(tile));
            cell.set_status(CellStatus::Empty);
        }

        tracing::debug!("Exchanged {} tile(s)", marked.len());
        marked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::RACK_SIZE;

    #[test]
    fn test_all_tiles_repeats_by_weight() {
        let tiles = all_tiles(Language::En);
        assert_eq!(tiles.len(), 100);
        assert_eq!(tiles.iter().filter(|t| t.letter == 'E').count(), 12);
        assert_eq!(tiles.iter().filter(|t| t.is_wildcard).count(), 2);
    }

    #[test]
    fn test_each_bag_is_a_full_bag() {
        let mut bank = Bank::seeded(Language::De, 7);
        let first = bank.shuffled_bag();
        let second = bank.shuffled_bag();
        assert_eq!(first.len(), all_tiles(Language::De).len());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_refill_fills_only_empty_slots() {
        let mut bank = Bank::seeded(Language::En, 42);
        let mut rack = Grid::rack();
        let kept = LetterTile::new('Q', 10, 1, Language::En);
        rack.rack_cell_mut(2).set_tile(Some(kept));

        assert_eq!(bank.refill(&mut rack), RACK_SIZE - 1);
        assert_eq!(rack.occupied(), RACK_SIZE);
        assert_eq!(rack.rack_cell(2).tile, Some(kept));
        assert_eq!(bank.refill(&mut rack), 0);
    }

    #[test]
    fn test_exchange_swaps_marked_slots() {
        let mut bank = Bank::seeded(Language::En, 3);
        let mut rack = Grid::rack();
        bank.refill(&mut rack);
        rack.rack_cell_mut(0).set_status(CellStatus::MarkedForExchange);
        rack.rack_cell_mut(5).set_status(CellStatus::MarkedForExchange);

        assert_eq!(bank.exchange(&mut rack), 2);
        assert_eq!(rack.occupied(), RACK_SIZE);
        assert!(rack
            .cells()
            .iter()
            .all(|cell| cell.status != CellStatus::MarkedForExchange));
    }

    #[test]
    fn test_seeded_banks_agree() {
        let mut a = Bank::seeded(Language::Ru, 11);
        let mut b = Bank::seeded(Language::Ru, 11);
        assert_eq!(a.draw(8), b.draw(8));
    }
}
