// Shared table setup for engine tests

use std::sync::Arc;

use uuid::Uuid;

use super::session::MoveSession;
use crate::{
    config::EngineConfig,
    game::{validator::fakes::CountingLookup, Bank},
    models::{Cell, Game, GameStatus, Language, LetterTile, Player, User, WILDCARD_GLYPH},
    store::{GameStore, MemoryStore},
    utils::letters::tile_for,
};

/// Rack cells holding `letters` in order, `*` for a wildcard
pub fn rack_cells(letters: &str) -> Vec<Cell> {
    letters
        .chars()
        .enumerate()
        .map(|(pos, letter)| {
            let mut cell = Cell::empty_rack(pos);
            let tile = if letter == WILDCARD_GLYPH {
                LetterTile::wildcard(2, Language::En)
            } else {
                tile_for(Language::En, letter).expect("known letter")
            };
            cell.set_tile(Some(tile));
            cell
        })
        .collect()
}

/// A running two-player game in a memory store
pub struct Table {
    pub store: Arc<MemoryStore>,
    pub lookup: Arc<CountingLookup>,
    pub game_id: Uuid,
    pub alice: User,
    pub bob: User,
}

impl Table {
    pub fn new(words: &[&str], alice_rack: &str, bob_rack: &str) -> Self {
        let alice = User::new(1, "alice");
        let bob = User::new(2, "bob");

        let mut game = Game::new(&alice, Language::En);
        game.join(Player::new(&bob)).unwrap();
        game.players[0].rack = rack_cells(alice_rack);
        game.players[1].rack = rack_cells(bob_rack);
        game.transition(GameStatus::Running).unwrap();

        let store = Arc::new(MemoryStore::new());
        let game_id = store.create_game(game);

        Self {
            store,
            lookup: Arc::new(CountingLookup::new(words)),
            game_id,
            alice,
            bob,
        }
    }

    pub fn config() -> EngineConfig {
        EngineConfig::default()
    }

    pub async fn session(&self, user: &User) -> MoveSession {
        MoveSession::open(
            self.game_id,
            user.clone(),
            self.store.clone(),
            self.lookup.clone(),
            Self::config(),
        )
        .await
        .unwrap()
        .with_bank(Bank::seeded(Language::En, user.user_id as u64))
    }

    pub async fn stored_game(&self) -> Game {
        self.store.load_game(self.game_id).await.unwrap()
    }
}

/// Place `word` from the rack, skipping cells that already hold a tile
pub fn lay(session: &mut MoveSession, word: &str, row: usize, col: usize, horizontal: bool) {
    for (i, letter) in word.chars().enumerate() {
        let (r, c) = if horizontal { (row, col + i) } else { (row + i, col) };
        if !session.board().cell_at(r, c).is_empty() {
            continue;
        }
        let slot = session
            .rack()
            .cells()
            .iter()
            .position(|cell| cell.letter() == Some(letter))
            .expect("letter on rack");
        session.place_tile(slot, r, c, None).unwrap();
    }
}
