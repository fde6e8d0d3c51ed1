//! Turn resolution for Ashfall.
//!
//! This crate owns the behavior the story data drives: applying cost and
//! effect deltas, gating choices, ticking the deferred-effect schedule, and
//! the [`GameController`] that strings those into one atomic
//! clone-validate-apply-commit transaction per player choice. Persistence is
//! abstracted behind [`SaveStore`], so the engine works the same against a
//! directory of files, an in-memory map, or whatever a frontend provides.

/// The game controller: choice resolution and persistence orchestration.
pub mod controller;
/// Cost and effect application.
pub mod effects;
/// Error types for the engine.
pub mod error;
/// Bounded event log and objective journal, owned by the presentation layer.
pub mod journal;
/// Deterministic seeded randomness.
pub mod rng;
/// Renderable output for the presentation layer.
pub mod render;
/// Save blob and the key-value store abstraction.
pub mod save;
/// The deferred-effect scheduler.
pub mod scheduler;

pub use controller::{EngineConfig, GameController, IgnoreReason, TurnOutcome, TurnReport};
pub use error::{EngineError, EngineResult};
pub use journal::{EventEntry, EventKind, EventLog, Journal, JournalEntry};
pub use render::{RenderedChoice, RenderedScene};
pub use rng::GameRng;
pub use save::{DirStore, MemoryStore, SaveBlob, SaveStore};
