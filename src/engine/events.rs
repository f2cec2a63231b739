use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::MoveRejection,
    game::ScoreResult,
    models::{Cell, Game, GameStatus, Position, Word},
};

/// Where the turn being built stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MovePhase {
    Editing,
    Validating,
    Rejected { report: RejectionReport },
    Accepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidPlacement,
    HangingWords,
    RepeatedWords,
    InvalidWords,
}

/// Rejection as shown to the player: the reason, the words and the tiles to flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionReport {
    pub kind: RejectionKind,
    pub words: Vec<String>,
    pub cells: Vec<Position>,
    pub message: String,
}

impl From<&MoveRejection> for RejectionReport {
    fn from(rejection: &MoveRejection) -> Self {
        let kind = match rejection {
            MoveRejection::InvalidPlacement(_) => RejectionKind::InvalidPlacement,
            MoveRejection::HangingWords(_) => RejectionKind::HangingWords,
            MoveRejection::RepeatedWords(_) => RejectionKind::RepeatedWords,
            MoveRejection::InvalidWords(_) => RejectionKind::InvalidWords,
        };

        Self {
            kind,
            words: rejection.words().iter().map(|w| w.letters.clone()).collect(),
            cells: rejection.offending_positions(),
            message: rejection.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSummary {
    pub letters: String,
    pub score: u32,
    pub definition: Option<String>,
}

/// What a move scores, for the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSummary {
    pub words: Vec<WordSummary>,
    pub words_total: u32,
    pub bonus: u32,
    pub total: u32,
}

impl MoveSummary {
    pub fn new(words: &[Word], score: ScoreResult) -> Self {
        Self {
            words: words
                .iter()
                .map(|word| WordSummary {
                    letters: word.letters.clone(),
                    score: word.score,
                    definition: word.definition.clone(),
                })
                .collect(),
            words_total: score.words_total,
            bonus: score.bonus,
            total: score.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInfo {
    pub user_id: i64,
    pub username: String,
    pub score: u32,
}

impl ScoreInfo {
    pub fn all(game: &Game) -> Vec<ScoreInfo> {
        game.players
            .iter()
            .map(|player| ScoreInfo {
                user_id: player.user_id,
                username: player.username.clone(),
                score: player.score,
            })
            .collect()
    }
}

/// Running score plus what the turn being built would add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionalScore {
    pub user_id: i64,
    pub score: u32,
    pub delta: u32,
}

/// Everything the UI needs to draw the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub game_id: Uuid,
    pub status: GameStatus,
    pub phase: MovePhase,
    pub board: Vec<Cell>,
    pub rack: Vec<Cell>,
    pub current_player: Option<i64>,
    pub scores: Vec<ScoreInfo>,
}

/// Events pushed from a session to its observers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    BoardChanged {
        snapshot: EngineSnapshot,
    },
    PreviewScored {
        summary: MoveSummary,
        provisional: Vec<ProvisionalScore>,
    },
    MoveRejected {
        report: RejectionReport,
    },
    MoveAccepted {
        summary: MoveSummary,
    },
    TilesExchanged {
        count: usize,
    },
    TurnPassed {
        user_id: i64,
    },
    TurnAdvanced {
        current_player: Option<i64>,
        scores: Vec<ScoreInfo>,
    },
    StatusChanged {
        status: GameStatus,
    },
}

impl EngineEvent {
    /// Wire form for observers that forward events to a client
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{
            extractor::{extract_words, fixtures::place_word},
            Grid,
        },
        models::{Language, User},
    };

    #[test]
    fn test_event_tags() {
        let event = EngineEvent::TilesExchanged { count: 3 };
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "tiles_exchanged");
        assert_eq!(value["count"], 3);

        let phase = serde_json::to_value(MovePhase::Validating).unwrap();
        assert_eq!(phase["phase"], "validating");
    }

    #[test]
    fn test_rejection_report_lists_placed_cells() {
        let mut board = Grid::board();
        place_word(&mut board, 2, 2, true, "CAT");
        let words = extract_words(&board).unwrap();

        let report = RejectionReport::from(&MoveRejection::HangingWords(words));
        assert_eq!(report.kind, RejectionKind::HangingWords);
        assert_eq!(report.words, vec!["CAT".to_string()]);
        assert_eq!(
            report.cells,
            vec![Position::new(2, 2), Position::new(2, 3), Position::new(2, 4)]
        );
        assert!(report.message.contains("CAT"));
    }

    #[test]
    fn test_scores_follow_player_order() {
        let game = Game::new(&User::new(9, "zed"), Language::En);
        let scores = ScoreInfo::all(&game);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].user_id, 9);
        assert_eq!(scores[0].score, 0);
    }
}
