//! Error types used throughout the crate.

/// Alias for `Result<T, AshError>`.
pub type AshResult<T> = Result<T, AshError>;

/// Errors that can occur when building or loading story content.
#[derive(Debug, thiserror::Error)]
pub enum AshError {
    /// The requested scene id does not exist in the story graph.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// Two scenes in the same graph share an id.
    #[error("duplicate scene id: \"{0}\"")]
    DuplicateScene(String),

    /// The story graph source was not valid JSON of either accepted shape.
    #[error("failed to parse story graph: {0}")]
    Parse(#[from] serde_json::Error),

    /// A generic validation error with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
