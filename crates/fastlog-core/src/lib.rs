pub mod engine;
pub mod format;
pub mod mutate;
pub mod scoring;
pub mod types;

pub use engine::{
    current_state, find_last_event, is_chronological, needs_confirmation, progress,
    target_event, Progress, Snapshot,
};
pub use mutate::{append, delete, merge, reschedule, restore, sort_log, Mutation, Outcome};
pub use scoring::{decorate_log, recent, DecoratedEvent, Stats, SuccessState};
pub use types::*;
