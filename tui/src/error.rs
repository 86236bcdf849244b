use phototerm_preview::RenderError;
use thiserror::Error;

/// Conditions that end an interactive session.
///
/// Recoverable renderer failures never get here: painters turn them into
/// inline diagnostics. What remains is terminal I/O failure and the one fatal
/// renderer condition, a missing binary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no images provided for selection")]
    NoImages,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
