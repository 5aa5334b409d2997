//! Error types

use thiserror::Error;

/// Everything that can go wrong outside the simulation step itself.
///
/// Game over is a phase, not an error.
#[derive(Debug, Error)]
pub enum GameError {
    /// `Session::start` was called before a theme was picked
    #[error("no theme selected; pick a theme before starting")]
    NoThemeSelected,

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("high score storage: {0}")]
    Storage(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
