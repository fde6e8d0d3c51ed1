//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a game.
///
/// None of these are fatal in normal play: the controller's turn loop
/// degrades every failure to "keep the current state" and reports the
/// problem instead of propagating a panic.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A scene id was requested that the story graph does not contain.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// The save store failed to read or write.
    #[error("save store error: {0}")]
    Store(#[from] std::io::Error),

    /// Saved or imported data did not parse as a save blob.
    #[error("malformed save data: {0}")]
    MalformedSave(#[from] serde_json::Error),
}
