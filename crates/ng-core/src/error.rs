use crate::tile::TileId;

/// Alias for `Result<T, NavError>`.
pub type NavResult<T> = Result<T, NavError>;

/// Errors that can occur when building or loading a scene.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The requested tile ID does not exist in the scene.
    #[error("tile not found: {0}")]
    TileNotFound(TileId),

    /// No tile carries the requested name.
    #[error("no tile named \"{0}\"")]
    UnknownTileName(String),

    /// A tile with the same name already exists.
    #[error("tile already exists: \"{0}\"")]
    DuplicateName(String),

    /// A scene or tile definition is invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// A scene file could not be read.
    #[error("cannot read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// A scene file is not valid JSON for the expected shape.
    #[error("cannot parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
}
