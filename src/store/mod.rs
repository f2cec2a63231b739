use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    error::{TransitionError, TurnError},
    models::{Game, GameStatus, Move, TurnAdvance},
};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("game {0} not found")]
    GameNotFound(Uuid),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Live views of one game, updated whenever the store changes it
pub struct GameSubscription {
    pub game: watch::Receiver<Game>,
    pub moves: watch::Receiver<Vec<Move>>,
}

/// Persistence and sync collaborator
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn load_game(&self, game_id: Uuid) -> Result<Game, StoreError>;

    /// Record a confirmed move, returning its id
    async fn create_move(&self, game_id: Uuid, mv: &Move) -> Result<Uuid, StoreError>;

    /// All moves of the game, oldest first
    async fn load_move_history(&self, game_id: Uuid) -> Result<Vec<Move>, StoreError>;

    /// Apply a confirmed turn atomically and return the resulting game
    ///
    /// # Arguments
    /// * `game_id` - The game to advance
    /// * `advance` - Acting player, score delta, refilled rack and board snapshot
    ///
    /// # Returns
    /// The game as observers will see it after the turn
    async fn advance_turn(&self, game_id: Uuid, advance: TurnAdvance) -> Result<Game, StoreError>;

    /// Record a move and apply its turn advance as one update. When the
    /// advance is refused neither the move nor the game changes.
    async fn commit_turn(
        &self,
        game_id: Uuid,
        mv: &Move,
        advance: TurnAdvance,
    ) -> Result<Game, StoreError>;

    async fn set_status(&self, game_id: Uuid, status: GameStatus) -> Result<Game, StoreError>;

    async fn subscribe(&self, game_id: Uuid) -> Result<GameSubscription, StoreError>;
}
