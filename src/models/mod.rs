pub mod cell;
pub mod game;
pub mod tile;
pub mod user;
pub mod word;

pub use cell::{Bonus, Cell, CellRole, CellStatus, Position, Slot};
pub use game::{Game, GameStatus, Move, MoveKind, Player, TurnAdvance};
pub use tile::{Language, LetterTile, WILDCARD_GLYPH};
pub use user::User;
pub use word::{letters_of, Direction, Word, WordKey};
