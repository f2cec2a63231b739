// Move engine rules: board, words, scoring, validation and turns

pub mod bank;
pub mod connectivity;
pub mod extractor;
pub mod grid;
pub mod scorer;
pub mod turn;
pub mod validator;

pub use bank::Bank;
pub use connectivity::{check_connectivity, Partition};
pub use extractor::{extract_words, WordExtractor};
pub use grid::{Grid, BOARD_SIZE, CENTER, RACK_SIZE};
pub use scorer::{ScoreResult, Scorer};
pub use validator::{check_duplicates, SessionCache, WordValidator};
