use chrono::Utc;

use crate::{
    error::{TransitionError, TurnError},
    models::{Game, GameStatus, Player, TurnAdvance},
};

impl Game {
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn)
    }

    pub fn is_players_turn(&self, user_id: i64) -> bool {
        self.current_player()
            .is_some_and(|player| player.user_id == user_id)
    }

    /// Apply a confirmed turn: score, rack, board and turn index change
    /// together or not at all.
    pub fn apply_turn(&mut self, advance: &TurnAdvance) -> Result<(), TurnError> {
        if self.players.is_empty() {
            return Err(TurnError::NoPlayers);
        }
        if !self.is_players_turn(advance.player) {
            return Err(TurnError::NotPlayersTurn(advance.player));
        }

        let player = &mut self.players[self.turn];
        player.score += advance.score_delta;
        player.rack = advance.next_rack.clone();
        self.board = advance.board.clone();
        self.turn = (self.turn + 1) % self.players.len();
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Move along the lifecycle, refusing edges the table does not allow
    pub fn transition(&mut self, next: GameStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }

        tracing::info!(
            "Game {} status {:?} -> {:?}",
            self.game_id,
            self.status,
            next
        );
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Add a player while the game is still gathering
    pub fn join(&mut self, player: Player) -> Result<(), TransitionError> {
        if self.status != GameStatus::Waiting {
            return Err(TransitionError {
                from: self.status,
                to: GameStatus::Waiting,
            });
        }
        if self.player(player.user_id).is_none() {
            self.players.push(player);
        }
        Ok(())
    }
}
