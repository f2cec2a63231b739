use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    events::{
        EngineEvent, EngineSnapshot, MovePhase, MoveSummary, ProvisionalScore, RejectionReport,
        ScoreInfo,
    },
    pipeline::{self, Evaluation, ValidationJob},
};
use crate::{
    config::EngineConfig,
    dictionary::WordLookup,
    error::{EngineError, MoveRejection, TransitionError},
    game::{Bank, Grid, WordValidator, BOARD_SIZE, RACK_SIZE},
    models::{
        Cell, CellStatus, Game, GameStatus, LetterTile, Move, MoveKind, Position, TurnAdvance,
        User,
    },
    store::GameStore,
};

/// One player's view of one game: the board and rack being edited, the
/// move history and the collaborators needed to confirm a turn.
///
/// A session is driven from a single owner (see [`super::EngineHandle`]);
/// none of its methods are meant to run concurrently.
pub struct MoveSession {
    game: Game,
    user: User,
    board: Grid,
    rack: Grid,
    history: Vec<Move>,
    phase: MovePhase,
    preview: Option<MoveSummary>,
    validator: WordValidator,
    bank: Bank,
    store: Arc<dyn GameStore>,
    config: EngineConfig,
    events: broadcast::Sender<EngineEvent>,
}

impl MoveSession {
    pub fn new(
        game: Game,
        history: Vec<Move>,
        user: User,
        store: Arc<dyn GameStore>,
        lookup: Arc<dyn WordLookup>,
        config: EngineConfig,
    ) -> Self {
        let validator = WordValidator::new(lookup, game.language, config.lookup_timeout);
        let mut bank = Bank::new(game.language);

        let mut board = Grid::board_from_snapshot(&game.board);
        mark_latest_move(&mut board, &history);

        let mut rack = game
            .player(user.user_id)
            .map(|player| Grid::rack_from_cells(&player.rack))
            .unwrap_or_else(Grid::rack);
        if rack.occupied() == 0 {
            bank.refill(&mut rack);
        }

        let (events, _) = broadcast::channel(config.event_buffer.max(1));

        tracing::info!(
            "Opened session for {} ({}) in game {}",
            user.display_name(),
            user.user_id,
            game.game_id
        );

        Self {
            game,
            user,
            board,
            rack,
            history,
            phase: MovePhase::Editing,
            preview: None,
            validator,
            bank,
            store,
            config,
            events,
        }
    }

    /// Load the game and its history from the store and open a session on it
    pub async fn open(
        game_id: Uuid,
        user: User,
        store: Arc<dyn GameStore>,
        lookup: Arc<dyn WordLookup>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let game = store.load_game(game_id).await?;
        let history = store.load_move_history(game_id).await?;
        Ok(Self::new(game, history, user, store, lookup, config))
    }

    /// Swap the bank, e.g. for a seeded one
    pub fn with_bank(mut self, bank: Bank) -> Self {
        self.bank = bank;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn rack(&self) -> &Grid {
        &self.rack
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn phase(&self) -> &MovePhase {
        &self.phase
    }

    /// Latest successful preview of the turn being built
    pub fn preview(&self) -> Option<&MoveSummary> {
        self.preview.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<EngineEvent> {
        self.events.clone()
    }

    /// Move a tile from a rack slot onto an empty board cell.
    /// Wildcards need the letter they stand for.
    pub fn place_tile(
        &mut self,
        rack_pos: usize,
        row: usize,
        col: usize,
        letter: Option<char>,
    ) -> Result<(), EngineError> {
        self.ensure_running()?;
        assert!(rack_pos < RACK_SIZE, "rack slot {rack_pos} out of range");

        let position = Position::new(row, col);
        let tile = self
            .rack
            .rack_cell(rack_pos)
            .tile
            .ok_or(EngineError::EmptyRackSlot(rack_pos))?;
        if !self.board.cell_at(row, col).is_empty() {
            return Err(EngineError::CellOccupied(position));
        }

        let tile = if tile.is_wildcard {
            tile.pinned(letter.ok_or(EngineError::WildcardLetterMissing)?)
        } else {
            tile
        };

        let slot = self.rack.rack_cell_mut(rack_pos);
        slot.set_tile(None);
        slot.set_status(CellStatus::Empty);

        let cell = self.board.cell_at_mut(row, col);
        cell.set_tile(Some(tile));
        cell.set_status(CellStatus::CurrentMove);

        tracing::debug!("Placed '{}' at {}", tile.letter, position);
        self.edited();
        Ok(())
    }

    /// Send a tile placed this turn back to the first free rack slot
    pub fn remove_tile(&mut self, row: usize, col: usize) -> Result<(), EngineError> {
        self.take_back(Position::new(row, col))?;
        self.edited();
        Ok(())
    }

    /// Send every tile placed this turn back to the rack
    pub fn recall_all(&mut self) -> Result<usize, EngineError> {
        let placed: Vec<Position> = self
            .board
            .current_move_cells()
            .filter_map(Cell::position)
            .collect();

        for position in &placed {
            self.take_back(*position)?;
        }
        if !placed.is_empty() {
            self.edited();
        }
        Ok(placed.len())
    }

    fn take_back(&mut self, position: Position) -> Result<(), EngineError> {
        let cell = self.board.cell_at(position.row, position.col);
        if !cell.is_current_move() {
            return Err(EngineError::CellLocked(position));
        }
        let tile = cell.tile.map(LetterTile::unpinned);
        let slot = self.rack.first_empty_slot().ok_or(EngineError::RackFull)?;

        let cell = self.board.cell_at_mut(position.row, position.col);
        cell.set_tile(None);
        cell.set_status(CellStatus::Empty);

        let rack_cell = self.rack.rack_cell_mut(slot);
        rack_cell.set_tile(tile);
        rack_cell.set_status(CellStatus::Empty);
        Ok(())
    }

    /// Flip the exchange mark on a rack tile, returning whether it is now marked
    pub fn toggle_exchange(&mut self, rack_pos: usize) -> Result<bool, EngineError> {
        self.ensure_running()?;
        assert!(rack_pos < RACK_SIZE, "rack slot {rack_pos} out of range");

        let cell = self.rack.rack_cell_mut(rack_pos);
        if cell.is_empty() {
            return Err(EngineError::EmptyRackSlot(rack_pos));
        }
        let marked = cell.status != CellStatus::MarkedForExchange;
        cell.set_status(if marked {
            CellStatus::MarkedForExchange
        } else {
            CellStatus::Empty
        });

        self.emit(EngineEvent::BoardChanged {
            snapshot: self.snapshot(),
        });
        Ok(marked)
    }

    /// Any edit drops stale feedback and returns the turn to `Editing`
    fn edited(&mut self) {
        self.board.clear_error_flags();
        self.phase = MovePhase::Editing;
        self.preview = None;
        self.emit(EngineEvent::BoardChanged {
            snapshot: self.snapshot(),
        });
    }

    /// Owned inputs for a validation pass over the current board
    pub fn validation_job(&self) -> ValidationJob {
        ValidationJob {
            board: self.board.clone(),
            rack: self.rack.clone(),
            history: self.history.clone(),
            validator: self.validator.clone(),
            full_rack_bonus: self.config.full_rack_bonus,
        }
    }

    pub(crate) fn preview_started(&mut self) {
        self.phase = MovePhase::Validating;
    }

    /// Validate the turn for feedback only. Never confirms.
    pub async fn validate(&mut self) -> Result<MoveSummary, EngineError> {
        if !self.board.has_current_move() {
            return Err(EngineError::NothingPlaced);
        }
        self.phase = MovePhase::Validating;
        let outcome = self.validation_job().run().await;
        self.apply_preview(outcome.clone());
        outcome.map(|evaluation| evaluation.summary()).map_err(Into::into)
    }

    /// Show the outcome of a preview: provisional score or flagged tiles
    pub fn apply_preview(&mut self, outcome: Result<Evaluation, MoveRejection>) {
        match outcome {
            Ok(evaluation) => {
                self.board.clear_error_flags();
                self.phase = MovePhase::Editing;
                let summary = evaluation.summary();
                self.preview = Some(summary.clone());
                self.emit(EngineEvent::PreviewScored {
                    summary,
                    provisional: self.provisional_scores(),
                });
            }
            Err(rejection) => self.reject(&rejection),
        }
        self.emit(EngineEvent::BoardChanged {
            snapshot: self.snapshot(),
        });
    }

    /// Flag the offending tiles and leave them where they are
    fn reject(&mut self, rejection: &MoveRejection) {
        tracing::info!("Move by {} rejected: {}", self.user.user_id, rejection);

        self.board.clear_error_flags();
        let report = RejectionReport::from(rejection);
        for position in &report.cells {
            self.board
                .cell_at_mut(position.row, position.col)
                .set_status(CellStatus::Error);
        }

        self.preview = None;
        self.phase = MovePhase::Rejected {
            report: report.clone(),
        };
        self.emit(EngineEvent::MoveRejected { report });
    }

    /// Validate and confirm the turn being built
    pub async fn submit(&mut self) -> Result<MoveSummary, EngineError> {
        self.ensure_my_turn()?;
        if !self.board.has_current_move() {
            return Err(EngineError::NothingPlaced);
        }

        self.phase = MovePhase::Validating;
        let evaluation = match pipeline::evaluate(
            &self.board,
            &self.rack,
            &self.history,
            &self.validator,
            self.config.full_rack_bonus,
        )
        .await
        {
            Ok(evaluation) => evaluation,
            Err(rejection) => {
                self.reject(&rejection);
                self.emit(EngineEvent::BoardChanged {
                    snapshot: self.snapshot(),
                });
                return Err(rejection.into());
            }
        };

        let summary = evaluation.summary();
        let mv = Move::placement(
            self.game.game_id,
            self.user.user_id,
            evaluation.words,
            evaluation.score.total,
            evaluation.score.bonus,
        );

        let mut board = self.board.clone();
        let locked = board.confirm_current_move();
        let mut rack = self.rack.clone();
        self.bank.refill(&mut rack);

        if let Err(e) = self.commit_turn(mv, board, rack, summary.total).await {
            self.phase = MovePhase::Editing;
            return Err(e);
        }

        tracing::info!(
            "{} scored {} with {} tile(s) ({} bonus)",
            self.user.display_name(),
            summary.total,
            locked,
            summary.bonus
        );
        self.phase = MovePhase::Accepted;
        self.emit(EngineEvent::MoveAccepted {
            summary: summary.clone(),
        });
        self.emit_turn();
        Ok(summary)
    }

    /// Swap the marked rack tiles for new ones, using up the turn
    pub async fn exchange(&mut self) -> Result<usize, EngineError> {
        self.ensure_my_turn()?;
        if self.board.has_current_move() {
            return Err(EngineError::MoveInProgress);
        }

        let mut rack = self.rack.clone();
        let count = self.bank.exchange(&mut rack);
        if count == 0 {
            return Err(EngineError::NothingToExchange);
        }

        let mv = Move::skip(self.game.game_id, self.user.user_id, MoveKind::Exchange);
        self.commit_turn(mv, self.board.clone(), rack, 0).await?;

        tracing::info!("{} exchanged {} tile(s)", self.user.display_name(), count);
        self.emit(EngineEvent::TilesExchanged { count });
        self.emit_turn();
        Ok(count)
    }

    /// Give up the turn without placing anything
    pub async fn pass_turn(&mut self) -> Result<(), EngineError> {
        self.ensure_my_turn()?;
        if self.board.has_current_move() {
            return Err(EngineError::MoveInProgress);
        }

        let mv = Move::skip(self.game.game_id, self.user.user_id, MoveKind::Pass);
        self.commit_turn(mv, self.board.clone(), self.rack.clone(), 0)
            .await?;

        tracing::info!("{} passed", self.user.display_name());
        self.emit(EngineEvent::TurnPassed {
            user_id: self.user.user_id,
        });
        self.emit_turn();
        Ok(())
    }

    /// Persist a turn and swap in its results. The store takes the move and
    /// the advance together, and local state only changes once it has.
    async fn commit_turn(
        &mut self,
        mv: Move,
        board: Grid,
        rack: Grid,
        score: u32,
    ) -> Result<(), EngineError> {
        let advance = TurnAdvance {
            player: self.user.user_id,
            score_delta: score,
            next_rack: rack.cells().to_vec(),
            board: board.snapshot(),
        };
        let game = self
            .store
            .commit_turn(self.game.game_id, &mv, advance)
            .await?;

        self.game = game;
        self.board = board;
        self.rack = rack;
        self.history.push(mv);
        self.preview = None;
        Ok(())
    }

    /// Take in a game snapshot published by the store, e.g. after another
    /// player moved. Tiles staged here stay put where the cell is still free.
    /// Returns false when the snapshot is the game this session already holds.
    pub fn apply_remote(&mut self, game: Game, history: Vec<Move>) -> bool {
        if game == self.game {
            return false;
        }
        let staged: Vec<Cell> = self.board.current_move_cells().cloned().collect();

        let mut board = Grid::board_from_snapshot(&game.board);
        mark_latest_move(&mut board, &history);

        for cell in staged {
            let Some(position) = cell.position() else {
                continue;
            };
            let target = board.cell_at_mut(position.row, position.col);
            if target.is_empty() {
                *target = cell;
            } else if let Some(slot) = self.rack.first_empty_slot() {
                let rack_cell = self.rack.rack_cell_mut(slot);
                rack_cell.set_tile(cell.tile.map(LetterTile::unpinned));
                rack_cell.set_status(CellStatus::Empty);
            }
        }

        self.board = board;
        self.game = game;
        self.history = history;
        self.edited();
        self.emit_turn();
        true
    }

    pub async fn set_status(&mut self, status: GameStatus) -> Result<(), EngineError> {
        if !self.game.status.can_transition_to(status) {
            return Err(TransitionError {
                from: self.game.status,
                to: status,
            }
            .into());
        }

        self.game = self.store.set_status(self.game.game_id, status).await?;
        self.emit(EngineEvent::StatusChanged { status });
        Ok(())
    }

    pub async fn start(&mut self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Running).await
    }

    pub async fn suspend(&mut self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Suspended).await
    }

    pub async fn resume(&mut self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Running).await
    }

    pub async fn finish(&mut self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Finished).await
    }

    pub async fn abort(&mut self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Aborted).await
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            game_id: self.game.game_id,
            status: self.game.status,
            phase: self.phase.clone(),
            board: self.board.cells().to_vec(),
            rack: self.rack.cells().to_vec(),
            current_player: self.game.current_player().map(|p| p.user_id),
            scores: ScoreInfo::all(&self.game),
        }
    }

    /// Each player's score with what the previewed turn would add
    pub fn provisional_scores(&self) -> Vec<ProvisionalScore> {
        let pending = self.preview.as_ref().map_or(0, |summary| summary.total);
        self.game
            .players
            .iter()
            .map(|player| {
                let delta = if player.user_id == self.user.user_id {
                    pending
                } else {
                    0
                };
                ProvisionalScore {
                    user_id: player.user_id,
                    score: player.score,
                    delta,
                }
            })
            .collect()
    }

    pub async fn definition_for(&self, word: &str) -> Option<String> {
        self.validator.definition_for(word).await
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        match self.game.status {
            GameStatus::Running => Ok(()),
            status => Err(EngineError::GameNotRunning(status)),
        }
    }

    fn ensure_my_turn(&self) -> Result<(), EngineError> {
        self.ensure_running()?;
        if !self.game.is_players_turn(self.user.user_id) {
            return Err(EngineError::NotYourTurn);
        }
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }

    fn emit_turn(&self) {
        self.emit(EngineEvent::TurnAdvanced {
            current_player: self.game.current_player().map(|p| p.user_id),
            scores: ScoreInfo::all(&self.game),
        });
        self.emit(EngineEvent::BoardChanged {
            snapshot: self.snapshot(),
        });
    }
}

/// Highlight the tiles of the most recent placement as `Historical`
fn mark_latest_move(board: &mut Grid, history: &[Move]) {
    let latest: Vec<Position> = history
        .iter()
        .rev()
        .find(|mv| mv.kind == MoveKind::Place)
        .map(|mv| mv.words.iter().flat_map(|w| w.placed_positions()).collect())
        .unwrap_or_default();

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let cell = board.cell_at_mut(row, col);
            if !cell.is_immutable() {
                continue;
            }
            let status = if latest.contains(&Position::new(row, col)) {
                CellStatus::Historical
            } else {
                CellStatus::Immutable
            };
            cell.set_status(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::testing::{lay, Table},
        error::TurnError,
        models::WILDCARD_GLYPH,
        store::StoreError,
    };

    #[tokio::test]
    async fn test_first_move_is_scored_and_advances_turn() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        lay(&mut alice, "CAT", 7, 6, true);
        let summary = alice.submit().await.unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.words[0].letters, "CAT");
        assert_eq!(alice.phase(), &MovePhase::Accepted);
        assert_eq!(alice.rack().occupied(), RACK_SIZE);
        assert!(alice.board().cell_at(7, 7).is_immutable());
        assert!(!alice.board().has_current_move());

        let stored = table.stored_game().await;
        assert_eq!(stored.player(table.alice.user_id).unwrap().score, 5);
        assert_eq!(stored.board.len(), 3);
        assert!(stored.is_players_turn(table.bob.user_id));
        assert_eq!(alice.game(), &stored);
        assert_eq!(alice.history().len(), 1);
    }

    #[tokio::test]
    async fn test_extension_accepted_and_repeat_rejected() {
        let table = Table::new(&["CAT", "CATS"], "CATATXYZ", "SDOGEEEE");
        let mut alice = table.session(&table.alice).await;
        lay(&mut alice, "CAT", 7, 6, true);
        alice.submit().await.unwrap();

        let mut bob = table.session(&table.bob).await;
        lay(&mut bob, "CATS", 7, 6, true);
        let summary = bob.submit().await.unwrap();
        assert_eq!(summary.total, 6);

        let game = table.stored_game().await;
        let moves = table.store.load_move_history(table.game_id).await.unwrap();
        assert!(alice.apply_remote(game, moves));
        assert_eq!(alice.board().cell_at(7, 9).status, CellStatus::Historical);
        assert_eq!(alice.board().cell_at(7, 6).status, CellStatus::Immutable);

        // CAT again, down from the C
        lay(&mut alice, "CAT", 7, 6, false);
        let err = alice.submit().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected(MoveRejection::RepeatedWords(_))
        ));
        assert_eq!(alice.board().cell_at(8, 6).status, CellStatus::Error);
        assert_eq!(alice.board().cell_at(9, 6).status, CellStatus::Error);
        assert!(matches!(alice.phase(), MovePhase::Rejected { .. }));
        assert!(table.stored_game().await.is_players_turn(table.alice.user_id));
    }

    #[tokio::test]
    async fn test_extension_still_needs_dictionary() {
        let table = Table::new(&["CAT"], "CATXYZEE", "SDOGEEEE");
        let mut alice = table.session(&table.alice).await;
        lay(&mut alice, "CAT", 7, 6, true);
        alice.submit().await.unwrap();

        let mut bob = table.session(&table.bob).await;
        lay(&mut bob, "CATS", 7, 6, true);
        match bob.submit().await {
            Err(EngineError::Rejected(MoveRejection::InvalidWords(words))) => {
                assert_eq!(words.len(), 1);
                assert_eq!(words[0].letters, "CATS");
            }
            other => panic!("expected InvalidWords, got {:?}", other),
        }

        assert_eq!(bob.board().cell_at(7, 9).status, CellStatus::Error);
        let stored = table.stored_game().await;
        assert!(stored.is_players_turn(table.bob.user_id));
        assert_eq!(stored.player(table.bob.user_id).unwrap().score, 0);
        assert_eq!(table.store.load_move_history(table.game_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refused_turn_leaves_no_move_behind() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        let mut moved_on = table.stored_game().await;
        moved_on.turn = 1;
        table.store.update_game(moved_on).unwrap();

        lay(&mut alice, "CAT", 7, 6, true);
        let err = alice.submit().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(StoreError::Turn(TurnError::NotPlayersTurn(1)))
        ));

        assert!(table.store.load_move_history(table.game_id).await.unwrap().is_empty());
        let stored = table.stored_game().await;
        assert_eq!(stored.player(table.alice.user_id).unwrap().score, 0);
        assert_eq!(stored.turn, 1);
        assert!(alice.history().is_empty());
        assert_eq!(alice.board().current_move_cells().count(), 3);
        assert_eq!(alice.phase(), &MovePhase::Editing);
    }

    #[tokio::test]
    async fn test_hanging_word_stays_on_board() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        lay(&mut alice, "CAT", 2, 2, true);
        let err = alice.submit().await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::Rejected(MoveRejection::HangingWords(ref words)) if words.len() == 1
        ));
        assert_eq!(alice.board().current_move_cells().count(), 3);
        assert_eq!(alice.board().cell_at(2, 3).status, CellStatus::Error);
        assert!(alice.history().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_word_flagged_until_next_edit() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        lay(&mut alice, "TAC", 7, 6, true);
        let err = alice.submit().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected(MoveRejection::InvalidWords(_))
        ));
        assert_eq!(alice.board().cell_at(7, 6).status, CellStatus::Error);

        alice.remove_tile(7, 8).unwrap();
        assert_eq!(alice.board().cell_at(7, 6).status, CellStatus::CurrentMove);
        assert_eq!(alice.phase(), &MovePhase::Editing);
    }

    #[tokio::test]
    async fn test_full_rack_bonus_applied_once() {
        let table = Table::new(&["ABSOLUTE"], "ABSOLUTE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        lay(&mut alice, "ABSOLUTE", 7, 3, true);
        assert_eq!(alice.rack().occupied(), 0);
        let summary = alice.submit().await.unwrap();

        assert_eq!(summary.words_total, 11);
        assert_eq!(summary.bonus, 50);
        assert_eq!(summary.total, 61);
        assert_eq!(alice.rack().occupied(), RACK_SIZE);
        assert!(alice.history()[0].used_full_rack);
    }

    #[tokio::test]
    async fn test_submit_out_of_turn() {
        let table = Table::new(&["DOG"], "CATXYZEE", "DOGSAAEE");
        let mut bob = table.session(&table.bob).await;

        lay(&mut bob, "DOG", 7, 7, true);
        let err = bob.submit().await.unwrap_err();
        assert!(matches!(err, EngineError::NotYourTurn));
        assert_eq!(bob.board().current_move_cells().count(), 3);
    }

    #[tokio::test]
    async fn test_preview_does_not_confirm() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        lay(&mut alice, "CAT", 7, 6, true);
        let summary = alice.validate().await.unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(alice.preview(), Some(&summary));

        let provisional = alice.provisional_scores();
        assert_eq!(provisional[0].delta, 5);
        assert_eq!(provisional[1].delta, 0);

        assert!(alice.board().has_current_move());
        assert!(table.store.load_move_history(table.game_id).await.unwrap().is_empty());
        assert!(table.stored_game().await.is_players_turn(table.alice.user_id));
    }

    #[tokio::test]
    async fn test_wildcard_needs_letter() {
        let table = Table::new(&["CAT"], "*ATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        let err = alice.place_tile(0, 7, 6, None).unwrap_err();
        assert!(matches!(err, EngineError::WildcardLetterMissing));
        assert!(!alice.rack().rack_cell(0).is_empty());

        alice.place_tile(0, 7, 6, Some('c')).unwrap();
        assert_eq!(alice.board().cell_at(7, 6).letter(), Some('C'));

        alice.remove_tile(7, 6).unwrap();
        assert_eq!(alice.rack().rack_cell(0).letter(), Some(WILDCARD_GLYPH));
    }

    #[tokio::test]
    async fn test_placement_rules() {
        let table = Table::new(&["CAT"], "CATXYZE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        alice.place_tile(0, 7, 7, None).unwrap();
        assert!(matches!(
            alice.place_tile(1, 7, 7, None),
            Err(EngineError::CellOccupied(_))
        ));
        assert!(matches!(
            alice.place_tile(0, 7, 8, None),
            Err(EngineError::EmptyRackSlot(0))
        ));
        assert!(matches!(
            alice.remove_tile(3, 3),
            Err(EngineError::CellLocked(_))
        ));
        assert_eq!(alice.recall_all().unwrap(), 1);
        assert!(!alice.board().has_current_move());
    }

    #[tokio::test]
    async fn test_exchange_uses_turn() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        assert!(matches!(
            alice.exchange().await,
            Err(EngineError::NothingToExchange)
        ));
        assert!(alice.toggle_exchange(3).unwrap());
        assert!(alice.toggle_exchange(4).unwrap());
        assert!(alice.toggle_exchange(5).unwrap());
        assert!(!alice.toggle_exchange(5).unwrap());

        assert_eq!(alice.exchange().await.unwrap(), 2);
        assert_eq!(alice.rack().occupied(), RACK_SIZE);
        assert!(alice
            .rack()
            .cells()
            .iter()
            .all(|cell| cell.status != CellStatus::MarkedForExchange));

        let stored = table.stored_game().await;
        assert!(stored.is_players_turn(table.bob.user_id));
        assert_eq!(stored.player(table.alice.user_id).unwrap().score, 0);
        assert_eq!(alice.history()[0].kind, MoveKind::Exchange);
    }

    #[tokio::test]
    async fn test_pass_needs_empty_board() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;

        alice.place_tile(0, 7, 7, None).unwrap();
        assert!(matches!(
            alice.pass_turn().await,
            Err(EngineError::MoveInProgress)
        ));

        alice.recall_all().unwrap();
        alice.pass_turn().await.unwrap();
        assert!(table.stored_game().await.is_players_turn(table.bob.user_id));
        assert_eq!(alice.history()[0].kind, MoveKind::Pass);
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let table = Table::new(&["CAT"], "CATXYZEE", "DOGSAAEE");
        let mut alice = table.session(&table.alice).await;
        let mut events = alice.subscribe();

        alice.suspend().await.unwrap();
        assert!(matches!(
            alice.place_tile(0, 7, 7, None),
            Err(EngineError::GameNotRunning(GameStatus::Suspended))
        ));
        assert!(matches!(
            alice.toggle_exchange(0),
            Err(EngineError::GameNotRunning(GameStatus::Suspended))
        ));
        assert_eq!(alice.rack().rack_cell(0).status, CellStatus::Empty);
        assert!(matches!(
            events.recv().await.unwrap(),
            EngineEvent::StatusChanged {
                status: GameStatus::Suspended
            }
        ));

        alice.resume().await.unwrap();
        alice.finish().await.unwrap();
        assert_eq!(table.stored_game().await.status, GameStatus::Finished);
        assert!(matches!(
            alice.start().await,
            Err(EngineError::Transition(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_board_bounces_conflicting_tile() {
        let table = Table::new(&["CAT", "DOG"], "CATXYZEE", "DOGSAAEE");
        let mut bob = table.session(&table.bob).await;
        bob.place_tile(0, 7, 7, None).unwrap();

        let mut alice = table.session(&table.alice).await;
        lay(&mut alice, "CAT", 7, 6, true);
        alice.submit().await.unwrap();

        let game = table.stored_game().await;
        let moves = table.store.load_move_history(table.game_id).await.unwrap();
        assert!(bob.apply_remote(game, moves));

        assert_eq!(bob.board().cell_at(7, 7).letter(), Some('A'));
        assert_eq!(bob.board().cell_at(7, 7).status, CellStatus::Historical);
        assert!(!bob.board().has_current_move());
        assert_eq!(bob.rack().occupied(), RACK_SIZE);
        assert!(bob.game().is_players_turn(table.bob.user_id));
    }
}
