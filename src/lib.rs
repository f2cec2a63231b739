pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod game;
pub mod models;
pub mod store;
pub mod utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::EngineConfig;
pub use dictionary::{Dictionary, LookupError, LookupResult, WordLookup};
pub use engine::{EngineEvent, EngineHandle, EngineSnapshot, MovePhase, MoveSession, MoveSummary};
pub use error::{EngineError, MoveRejection, TransitionError, TurnError};
pub use store::{GameStore, GameSubscription, MemoryStore, StoreError};

/// Install the global subscriber: `RUST_LOG` if set, otherwise debug output
/// for this crate. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tile_duel_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
