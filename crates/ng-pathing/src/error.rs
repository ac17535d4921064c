use ng_core::TileId;

/// Alias for `Result<T, PathError>`.
pub type PathResult<T> = Result<T, PathError>;

/// Errors raised by path searches. Unreachable tiles are not errors; they
/// simply keep an infinite distance.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The search origin is not part of the scene.
    #[error("start tile not found: {0}")]
    UnknownStart(TileId),

    /// The movement budget is negative or not a number.
    #[error("invalid movement budget: {0}")]
    InvalidBudget(f32),

    /// The destination cannot be reached within the budget.
    #[error("no path found from {from} to {to}")]
    NoPath {
        /// Search origin.
        from: TileId,
        /// Requested destination.
        to: TileId,
    },
}
