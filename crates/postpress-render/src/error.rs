use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Core(#[from] postpress_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid browser launch configuration.
    #[error("Browser launch error: {0}")]
    Launch(String),

    /// DevTools protocol failure (navigation, content load, capture).
    #[error("Browser error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Capture timed out after {secs}s")]
    Timeout { secs: u64 },
}

pub type Result<T> = std::result::Result<T, RenderError>;
