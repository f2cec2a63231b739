// Move orchestration: one actor per player session, debounced previews
// and the events observers draw from.

pub mod actor;
pub mod debounce;
pub mod events;
pub mod pipeline;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Command, EngineHandle};
pub use debounce::Debouncer;
pub use events::{
    EngineEvent, EngineSnapshot, MovePhase, MoveSummary, ProvisionalScore, RejectionKind,
    RejectionReport, ScoreInfo, WordSummary,
};
pub use pipeline::{check_structure, evaluate, Evaluation, ValidationJob};
pub use session::MoveSession;
