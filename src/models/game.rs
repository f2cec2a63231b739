use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cell, Language, User, Word};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Running,
    Suspended,
    Finished,
    Aborted,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Aborted)
    }

    /// Legal lifecycle edges. Terminal states have none.
    pub fn can_transition_to(&self, next: GameStatus) -> bool {
        use GameStatus::*;
        matches!(
            (self, next),
            (Waiting, Running)
                | (Waiting, Aborted)
                | (Running, Suspended)
                | (Suspended, Running)
                | (Running, Finished)
                | (Running, Aborted)
                | (Suspended, Finished)
                | (Suspended, Aborted)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub user_id: i64,
    pub username: String,
    pub score: u32,
    /// Rack-role cells
    pub rack: Vec<Cell>,
}

impl Player {
    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.display_name().to_string(),
            score: 0,
            rack: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub game_id: Uuid,
    pub creator: i64,
    pub language: Language,
    pub players: Vec<Player>,
    /// Index into `players`, always in range
    pub turn: usize,
    pub status: GameStatus,
    /// Occupied board cells after the latest confirmed move
    pub board: Vec<Cell>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn new(creator: &User, language: Language) -> Self {
        let now = Utc::now();
        Self {
            game_id: Uuid::new_v4(),
            creator: creator.user_id,
            language,
            players: vec![Player::new(creator)],
            turn: 0,
            status: GameStatus::Waiting,
            board: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn player(&self, user_id: i64) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Place,
    Exchange,
    Pass,
}

/// A confirmed turn. Never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub move_id: Uuid,
    pub game_id: Uuid,
    pub author: i64,
    pub kind: MoveKind,
    pub words: Vec<Word>,
    /// Words total plus bonus
    pub score: u32,
    pub bonus: u32,
    /// The whole rack went down in this move
    pub used_full_rack: bool,
    pub created_at: DateTime<Utc>,
}

impl Move {
    pub fn placement(game_id: Uuid, author: i64, words: Vec<Word>, score: u32, bonus: u32) -> Self {
        Self {
            move_id: Uuid::new_v4(),
            game_id,
            author,
            kind: MoveKind::Place,
            words,
            score,
            bonus,
            used_full_rack: bonus > 0,
            created_at: Utc::now(),
        }
    }

    /// A turn that scored nothing and left the board alone
    pub fn skip(game_id: Uuid, author: i64, kind: MoveKind) -> Self {
        Self {
            move_id: Uuid::new_v4(),
            game_id,
            author,
            kind,
            words: Vec::new(),
            score: 0,
            bonus: 0,
            used_full_rack: false,
            created_at: Utc::now(),
        }
    }
}

/// Everything a confirmed turn changes, applied to a game in one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAdvance {
    pub player: i64,
    pub score_delta: u32,
    pub next_rack: Vec<Cell>,
    /// Occupied board cells after the move
    pub board: Vec<Cell>,
}
