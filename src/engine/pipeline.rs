use crate::{
    error::MoveRejection,
    game::{check_connectivity, check_duplicates, extract_words, Grid, ScoreResult, Scorer, WordValidator},
    models::{Move, Word},
};

use super::events::MoveSummary;

/// An accepted evaluation of the current board
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub words: Vec<Word>,
    pub score: ScoreResult,
}

impl Evaluation {
    pub fn summary(&self) -> MoveSummary {
        MoveSummary::new(&self.words, self.score)
    }
}

/// Rule checks that need no dictionary, in the order the player sees them
pub fn check_structure(board: &Grid, history: &[Move]) -> Result<Vec<Word>, MoveRejection> {
    let words = extract_words(board)?;
    check_connectivity(&words)?;
    check_duplicates(&words, history)?;
    Ok(words)
}

/// Full validation: extraction, connectivity, duplicates, dictionary, score
pub async fn evaluate(
    board: &Grid,
    rack: &Grid,
    history: &[Move],
    validator: &WordValidator,
    full_rack_bonus: u32,
) -> Result<Evaluation, MoveRejection> {
    let words = check_structure(board, history)?;
    let words = validator.check_legality(words).await?;
    let score = Scorer::score_move(&words, rack, full_rack_bonus);

    Ok(Evaluation { words, score })
}

/// Owned copy of everything a validation needs, so a preview can run in
/// its own task while the session keeps taking edits
#[derive(Clone)]
pub struct ValidationJob {
    pub(crate) board: Grid,
    pub(crate) rack: Grid,
    pub(crate) history: Vec<Move>,
    pub(crate) validator: WordValidator,
    pub(crate) full_rack_bonus: u32,
}

impl ValidationJob {
    pub async fn run(self) -> Result<Evaluation, MoveRejection> {
        evaluate(
            &self.board,
            &self.rack,
            &self.history,
            &self.validator,
            self.full_rack_bonus,
        )
        .await
    }
}
