use thiserror::Error;

use crate::{
    models::{letters_of, Cell, GameStatus, Position, Word},
    store::StoreError,
};

/// Why a move was turned down. All of these go back to the player for
/// correction. Nothing is reverted on the board.
#[derive(Error, Debug, Clone)]
pub enum MoveRejection {
    #[error("tile at {} forms no word", describe(.0))]
    InvalidPlacement(Cell),

    #[error("words not connected to the board: {}", letters_of(.0))]
    HangingWords(Vec<Word>),

    #[error("words already played: {}", letters_of(.0))]
    RepeatedWords(Vec<Word>),

    #[error("words not accepted by the dictionary: {}", letters_of(.0))]
    InvalidWords(Vec<Word>),
}

fn describe(cell: &Cell) -> String {
    cell.position()
        .map(|p| p.to_string())
        .unwrap_or_else(|| format!("{:?}", cell.slot))
}

impl MoveRejection {
    /// Words named by the rejection, empty for a bad placement
    pub fn words(&self) -> &[Word] {
        match self {
            MoveRejection::InvalidPlacement(_) => &[],
            MoveRejection::HangingWords(words)
            | MoveRejection::RepeatedWords(words)
            | MoveRejection::InvalidWords(words) => words,
        }
    }

    /// Newly placed tiles to flag on the board
    pub fn offending_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = match self {
            MoveRejection::InvalidPlacement(cell) => cell.position().into_iter().collect(),
            _ => self
                .words()
                .iter()
                .flat_map(|word| word.placed_positions())
                .collect(),
        };
        positions.sort();
        positions.dedup();
        positions
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("game has no players")]
    NoPlayers,

    #[error("it is not player {0}'s turn")]
    NotPlayersTurn(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("game cannot go from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: GameStatus,
    pub to: GameStatus,
}

/// Errors from driving a move session
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Rejected(#[from] MoveRejection),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("game is {0:?}, moves need a running game")]
    GameNotRunning(GameStatus),

    #[error("cell {0} already holds a tile")]
    CellOccupied(Position),

    #[error("cell {0} holds no tile from this move")]
    CellLocked(Position),

    #[error("rack slot {0} is empty")]
    EmptyRackSlot(usize),

    #[error("rack has no free slot")]
    RackFull,

    #[error("wildcard needs a letter")]
    WildcardLetterMissing,

    #[error("no tiles placed")]
    NothingPlaced,

    #[error("tiles are still on the board")]
    MoveInProgress,

    #[error("no tiles selected for exchange")]
    NothingToExchange,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("move engine has stopped")]
    EngineStopped,
}
