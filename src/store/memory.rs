use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use super::{GameStore, GameSubscription, StoreError};
use crate::models::{Game, GameStatus, Move, TurnAdvance};

struct GameRecord {
    game: watch::Sender<Game>,
    moves: watch::Sender<Vec<Move>>,
}

/// In-process store. Each game's updates run under its map entry lock, so
/// observers only ever see whole turns.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<Uuid, GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_game(&self, game: Game) -> Uuid {
        let game_id = game.game_id;
        let (game_tx, _) = watch::channel(game);
        let (moves_tx, _) = watch::channel(Vec::new());

        self.games.insert(
            game_id,
            GameRecord {
                game: game_tx,
                moves: moves_tx,
            },
        );
        tracing::debug!("Created game {}", game_id);
        game_id
    }

    /// Replace a game wholesale, e.g. after players joined
    pub fn update_game(&self, game: Game) -> Result<(), StoreError> {
        let record = self
            .games
            .get_mut(&game.game_id)
            .ok_or(StoreError::GameNotFound(game.game_id))?;
        record.game.send_replace(game);
        Ok(())
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn load_game(&self, game_id: Uuid) -> Result<Game, StoreError> {
        let record = self
            .games
            .get(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;
        let game = record.game.borrow().clone();
        Ok(game)
    }

    async fn create_move(&self, game_id: Uuid, mv: &Move) -> Result<Uuid, StoreError> {
        let record = self
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;
        record.moves.send_modify(|moves| moves.push(mv.clone()));

        tracing::debug!(
            "Recorded {:?} move {} in game {} ({} points)",
            mv.kind,
            mv.move_id,
            game_id,
            mv.score
        );
        Ok(mv.move_id)
    }

    async fn load_move_history(&self, game_id: Uuid) -> Result<Vec<Move>, StoreError> {
        let record = self
            .games
            .get(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;
        let moves = record.moves.borrow().clone();
        Ok(moves)
    }

    async fn advance_turn(&self, game_id: Uuid, advance: TurnAdvance) -> Result<Game, StoreError> {
        let record = self
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;

        let mut next = record.game.borrow().clone();
        next.apply_turn(&advance)?;
        record.game.send_replace(next.clone());

        tracing::debug!(
            "Game {} advanced: player {} +{}",
            game_id,
            advance.player,
            advance.score_delta
        );
        Ok(next)
    }

    async fn commit_turn(
        &self,
        game_id: Uuid,
        mv: &Move,
        advance: TurnAdvance,
    ) -> Result<Game, StoreError> {
        let record = self
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;

        let mut next = record.game.borrow().clone();
        next.apply_turn(&advance)?;

        // Moves first: followers react to the game and read the moves then
        record.moves.send_modify(|moves| moves.push(mv.clone()));
        record.game.send_replace(next.clone());

        tracing::debug!(
            "Committed {:?} move {} in game {}: player {} +{}",
            mv.kind,
            mv.move_id,
            game_id,
            advance.player,
            advance.score_delta
        );
        Ok(next)
    }

    async fn set_status(&self, game_id: Uuid, status: GameStatus) -> Result<Game, StoreError> {
        let record = self
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;

        let mut next = record.game.borrow().clone();
        next.transition(status)?;
        record.game.send_replace(next.clone());
        Ok(next)
    }

    async fn subscribe(&self, game_id: Uuid) -> Result<GameSubscription, StoreError> {
        let record = self
            .games
            .get(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;

        Ok(GameSubscription {
            game: record.game.subscribe(),
            moves: record.moves.subscribe(),
        })
    }
}
