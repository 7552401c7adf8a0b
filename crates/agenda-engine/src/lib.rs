//! Command engine: intent extraction, availability search and execution.

pub mod availability;
pub mod executor;
pub mod intent;
pub mod store;

pub use availability::{
    WORK_DAY_END, WORK_DAY_START, find_available_slots, find_available_slots_default,
    find_conflict,
};
pub use executor::{
    CommandExecutor, CommandReply, RandomSelector, ResponseSelector, RoundRobinSelector,
    SideEffect,
};
pub use intent::{Intent, IntentKind, parse_intent};
pub use store::{EventDraft, EventStore, MemoryStore, StoreError, StoreResult};
