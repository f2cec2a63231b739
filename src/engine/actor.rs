use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use uuid::Uuid;

use super::{
    debounce::Debouncer,
    events::{EngineEvent, EngineSnapshot, MoveSummary, ProvisionalScore},
    pipeline::Evaluation,
    session::MoveSession,
};
use crate::{
    config::EngineConfig,
    dictionary::WordLookup,
    error::{EngineError, MoveRejection},
    models::{Game, GameStatus, Move, User},
    store::{GameStore, GameSubscription},
};

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

/// Messages handled by the session actor, one at a time
pub enum Command {
    PlaceTile {
        rack_pos: usize,
        row: usize,
        col: usize,
        letter: Option<char>,
        reply: Reply<()>,
    },
    RemoveTile {
        row: usize,
        col: usize,
        reply: Reply<()>,
    },
    RecallAll {
        reply: Reply<usize>,
    },
    ToggleExchange {
        rack_pos: usize,
        reply: Reply<bool>,
    },
    Validate {
        reply: Reply<MoveSummary>,
    },
    Submit {
        reply: Reply<MoveSummary>,
    },
    Exchange {
        reply: Reply<usize>,
    },
    Pass {
        reply: Reply<()>,
    },
    SetStatus {
        status: GameStatus,
        reply: Reply<()>,
    },
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot>,
    },
    ProvisionalScores {
        reply: oneshot::Sender<Vec<ProvisionalScore>>,
    },
    Summary {
        reply: oneshot::Sender<Option<MoveSummary>>,
    },
    Definition {
        word: String,
        reply: oneshot::Sender<Option<String>>,
    },
    RemoteUpdate {
        game: Game,
        moves: Vec<Move>,
    },
    /// The quiet period after the last edit is over
    DebounceElapsed {
        generation: u64,
    },
    PreviewFinished {
        generation: u64,
        outcome: Result<Evaluation, MoveRejection>,
    },
    Shutdown,
}

/// Cheap, cloneable front end to a running session actor
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
    events: broadcast::Sender<EngineEvent>,
}

impl EngineHandle {
    /// Run `session` on its own task
    pub fn spawn(session: MoveSession, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let events = session.event_sender();

        let actor = SessionActor {
            session,
            debounce: Debouncer::new(debounce),
            preview: None,
            tx: tx.downgrade(),
        };
        tokio::spawn(actor.run(rx));

        Self { tx, events }
    }

    /// Open a session from the store, run it and keep it in sync with the
    /// store's view of the game
    pub async fn open(
        game_id: Uuid,
        user: User,
        store: Arc<dyn GameStore>,
        lookup: Arc<dyn WordLookup>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let subscription = store.subscribe(game_id).await?;
        let debounce = config.validation_debounce;
        let session = MoveSession::open(game_id, user, store, lookup, config).await?;

        let handle = Self::spawn(session, debounce);
        handle.follow(subscription);
        Ok(handle)
    }

    /// Forward store updates of the game into the session
    pub fn follow(&self, mut subscription: GameSubscription) -> JoinHandle<()> {
        let tx = self.tx.downgrade();
        tokio::spawn(async move {
            while subscription.game.changed().await.is_ok() {
                let game = subscription.game.borrow_and_update().clone();
                let moves = subscription.moves.borrow().clone();

                let Some(tx) = tx.upgrade() else { break };
                if tx.send(Command::RemoteUpdate { game, moves }).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Stopped following game updates");
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| EngineError::EngineStopped)?;
        rx.await.map_err(|_| EngineError::EngineStopped)
    }

    pub async fn place_tile(
        &self,
        rack_pos: usize,
        row: usize,
        col: usize,
        letter: Option<char>,
    ) -> Result<(), EngineError> {
        self.request(|reply| Command::PlaceTile {
            rack_pos,
            row,
            col,
            letter,
            reply,
        })
        .await?
    }

    pub async fn remove_tile(&self, row: usize, col: usize) -> Result<(), EngineError> {
        self.request(|reply| Command::RemoveTile { row, col, reply })
            .await?
    }

    pub async fn recall_all(&self) -> Result<usize, EngineError> {
        self.request(|reply| Command::RecallAll { reply }).await?
    }

    pub async fn toggle_exchange(&self, rack_pos: usize) -> Result<bool, EngineError> {
        self.request(|reply| Command::ToggleExchange { rack_pos, reply })
            .await?
    }

    pub async fn validate(&self) -> Result<MoveSummary, EngineError> {
        self.request(|reply| Command::Validate { reply }).await?
    }

    pub async fn submit(&self) -> Result<MoveSummary, EngineError> {
        self.request(|reply| Command::Submit { reply }).await?
    }

    pub async fn exchange(&self) -> Result<usize, EngineError> {
        self.request(|reply| Command::Exchange { reply }).await?
    }

    pub async fn pass_turn(&self) -> Result<(), EngineError> {
        self.request(|reply| Command::Pass { reply }).await?
    }

    pub async fn set_status(&self, status: GameStatus) -> Result<(), EngineError> {
        self.request(|reply| Command::SetStatus { status, reply })
            .await?
    }

    pub async fn start(&self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Running).await
    }

    pub async fn suspend(&self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Suspended).await
    }

    pub async fn resume(&self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Running).await
    }

    pub async fn finish(&self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Finished).await
    }

    pub async fn abort(&self) -> Result<(), EngineError> {
        self.set_status(GameStatus::Aborted).await
    }

    pub async fn snapshot(&self) -> Result<EngineSnapshot, EngineError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn provisional_scores(&self) -> Result<Vec<ProvisionalScore>, EngineError> {
        self.request(|reply| Command::ProvisionalScores { reply })
            .await
    }

    /// Latest preview of the turn being built
    pub async fn summary(&self) -> Result<Option<MoveSummary>, EngineError> {
        self.request(|reply| Command::Summary { reply }).await
    }

    pub async fn definition(&self, word: &str) -> Result<Option<String>, EngineError> {
        let word = word.to_string();
        self.request(|reply| Command::Definition { word, reply })
            .await
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }
}

struct SessionActor {
    session: MoveSession,
    debounce: Debouncer,
    /// Preview validation running in the background, if any
    preview: Option<JoinHandle<()>>,
    /// Weak so timers and previews never keep the actor alive
    tx: mpsc::WeakSender<Command>,
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.handle(command).await;
        }

        self.cancel_preview();
        tracing::debug!(
            "Session actor for game {} stopped",
            self.session.game().game_id
        );
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::PlaceTile {
                rack_pos,
                row,
                col,
                letter,
                reply,
            } => {
                let result = self.session.place_tile(rack_pos, row, col, letter);
                self.after_edit(result.is_ok());
                let _ = reply.send(result);
            }
            Command::RemoveTile { row, col, reply } => {
                let result = self.session.remove_tile(row, col);
                self.after_edit(result.is_ok());
                let _ = reply.send(result);
            }
            Command::RecallAll { reply } => {
                let result = self.session.recall_all();
                self.after_edit(matches!(result, Ok(n) if n > 0));
                let _ = reply.send(result);
            }
            Command::ToggleExchange { rack_pos, reply } => {
                let _ = reply.send(self.session.toggle_exchange(rack_pos));
            }
            Command::Validate { reply } => {
                self.cancel_preview();
                let _ = reply.send(self.session.validate().await);
            }
            Command::Submit { reply } => {
                self.cancel_preview();
                let _ = reply.send(self.session.submit().await);
            }
            Command::Exchange { reply } => {
                self.cancel_preview();
                let _ = reply.send(self.session.exchange().await);
            }
            Command::Pass { reply } => {
                self.cancel_preview();
                let _ = reply.send(self.session.pass_turn().await);
            }
            Command::SetStatus { status, reply } => {
                self.cancel_preview();
                let _ = reply.send(self.session.set_status(status).await);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::ProvisionalScores { reply } => {
                let _ = reply.send(self.session.provisional_scores());
            }
            Command::Summary { reply } => {
                let _ = reply.send(self.session.preview().cloned());
            }
            Command::Definition { word, reply } => {
                let _ = reply.send(self.session.definition_for(&word).await);
            }
            Command::RemoteUpdate { game, moves } => {
                if self.session.apply_remote(game, moves) {
                    self.cancel_preview();
                    self.after_edit(self.session.board().has_current_move());
                }
            }
            Command::DebounceElapsed { generation } => self.start_preview(generation),
            Command::PreviewFinished {
                generation,
                outcome,
            } => {
                if self.debounce.is_current(generation) {
                    self.preview = None;
                    self.session.apply_preview(outcome);
                } else {
                    tracing::debug!("Dropped stale preview #{}", generation);
                }
            }
            Command::Shutdown => {}
        }
    }

    /// Re-arm the preview timer after the board changed
    fn after_edit(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.cancel_preview();

        let tx = self.tx.clone();
        self.debounce.arm(move |generation| async move {
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::DebounceElapsed { generation }).await;
            }
        });
    }

    fn start_preview(&mut self, generation: u64) {
        if !self.debounce.is_current(generation) || !self.session.board().has_current_move() {
            return;
        }

        self.session.preview_started();
        let job = self.session.validation_job();
        let tx = self.tx.clone();
        self.preview = Some(tokio::spawn(async move {
            let outcome = job.run().await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx
                    .send(Command::PreviewFinished {
                        generation,
                        outcome,
                    })
                    .await;
            }
        }));
    }

    /// Stop the timer and any running preview, and invalidate their results
    fn cancel_preview(&mut self) {
        self.debounce.cancel();
        if let Some(preview) = self.preview.take() {
            preview.abort();
        }
    }
}
