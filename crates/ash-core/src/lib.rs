//! Core types for Ashfall: the story graph and the player's game state.
//!
//! This crate defines the data model that story content compiles into. It is
//! independent of the engine — you can construct a [`StoryGraph`]
//! programmatically or deserialize one from JSON, and a [`GameState`] is a
//! plain serializable snapshot with no behavior beyond clamped mutation
//! helpers.

/// Effect and cost delta descriptors.
pub mod effect;
/// Error types used throughout the crate.
pub mod error;
/// The story graph and content validation.
pub mod graph;
/// Mutual-exclusion flag groups.
pub mod mutex;
/// Requirement predicates gating choices.
pub mod requirement;
/// Scene and choice definitions.
pub mod scene;
/// The player's game state.
pub mod state;

/// Re-export effect types.
pub use effect::{Cost, Effect, ScheduledEffect};
/// Re-export error types.
pub use error::{AshError, AshResult};
/// Re-export graph types.
pub use graph::{ContentIssue, StoryGraph};
/// Re-export mutex group types.
pub use mutex::MutexGroups;
/// Re-export requirement types.
pub use requirement::{Requirement, StatBound};
/// Re-export scene types.
pub use scene::{Choice, Scene, SceneText};
/// Re-export state types.
pub use state::{GameState, MAX_STAT, MIN_STAT, StressBand};
