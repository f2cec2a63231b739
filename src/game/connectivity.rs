use crate::{error::MoveRejection, models::Word};

/// Words of a move split by whether they reach the existing board
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub connected: Vec<Word>,
    pub hanging: Vec<Word>,
}

impl Partition {
    /// Seed from each word's own connectivity flag, then promote
    pub fn of(words: Vec<Word>) -> Self {
        let (connected, hanging) = words
            .into_iter()
            .partition(|word| word.connected_to_existing);
        Self { connected, hanging }.promote()
    }

    /// Move hanging words that share a cell with a connected word into
    /// `connected`, repeating until a pass changes nothing.
    pub fn promote(mut self) -> Self {
        loop {
            let (reached, still_hanging): (Vec<Word>, Vec<Word>) =
                self.hanging.into_iter().partition(|word| {
                    self.connected
                        .iter()
                        .any(|anchor| anchor.shares_cell_with(word))
                });

            self.hanging = still_hanging;
            if reached.is_empty() {
                return self;
            }
            self.connected.extend(reached);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.hanging.is_empty()
    }
}

/// Reject the move when any word is left hanging.
///
/// On an empty board the word over the center square is connected by
/// definition, so the first move is covered by the same check.
pub fn check_connectivity(words: &[Word]) -> Result<(), MoveRejection> {
    let partition = Partition::of(words.to_vec());
    if partition.is_connected() {
        Ok(())
    } else {
        tracing::debug!("{} hanging word(s)", partition.hanging.len());
        Err(MoveRejection::HangingWords(partition.hanging))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        extractor::{
            extract_words,
            fixtures::{place_word, played_word},
        },
        grid::Grid,
    };

    #[test]
    fn test_first_move_through_center_is_connected() {
        let mut board = Grid::board();
        place_word(&mut board, 7, 6, true, "CAT");
        let words = extract_words(&board).unwrap();
        assert!(check_connectivity(&words).is_ok());
    }

    #[test]
    fn test_disjoint_placements_both_hang() {
        let mut board = Grid::board();
        place_word(&mut board, 1, 1, true, "DOG");
        place_word(&mut board, 12, 3, true, "CAT");
        let words = extract_words(&board).unwrap();

        match check_connectivity(&words) {
            Err(MoveRejection::HangingWords(hanging)) => {
                let mut letters: Vec<_> = hanging.iter().map(|w| w.letters.as_str()).collect();
                letters.sort();
                assert_eq!(letters, vec!["CAT", "DOG"]);
            }
            other => panic!("expected HangingWords, got {:?}", other),
        }
    }

    #[test]
    fn test_hanging_word_promoted_through_shared_cell() {
        let mut board = Grid::board();
        played_word(&mut board, 7, 6, true, "CAT");
        // "CATS" reaches the old tiles; "SO" hangs off the new S only
        place_word(&mut board, 7, 6, true, "CATS");
        place_word(&mut board, 7, 9, false, "SO");

        let words = extract_words(&board).unwrap();
        let so = words.iter().find(|w| w.letters == "SO").unwrap();
        assert!(!so.connected_to_existing);

        let partition = Partition::of(words.clone());
        assert!(partition.is_connected());
        assert_eq!(partition.connected.len(), 2);
    }

    #[test]
    fn test_promotion_is_a_fixed_point() {
        let mut board = Grid::board();
        played_word(&mut board, 7, 6, true, "CAT");
        place_word(&mut board, 7, 6, true, "CATS");
        place_word(&mut board, 7, 9, false, "SO");
        place_word(&mut board, 2, 2, true, "OX");

        let once = Partition::of(extract_words(&board).unwrap());
        let twice = once.clone().promote();

        let letters = |words: &[Word]| {
            let mut l: Vec<_> = words.iter().map(|w| w.letters.clone()).collect();
            l.sort();
            l
        };
        assert_eq!(letters(&once.connected), letters(&twice.connected));
        assert_eq!(letters(&once.hanging), letters(&twice.hanging));
        assert_eq!(letters(&once.hanging), vec!["OX".to_string()]);
    }
}
