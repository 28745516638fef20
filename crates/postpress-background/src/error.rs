use thiserror::Error;

/// Why a background generation attempt failed.
///
/// Carried back to the pipeline instead of a bare success flag so the
/// failure reason can be logged before the batch moves on.
#[derive(Debug, Error)]
pub enum BackgroundError {
    /// Non-success HTTP status from the provider.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure, including request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// The job finished but the result carried no image.
    #[error("Generation result contained no image")]
    MissingImage,

    /// The poll budget was exhausted before the job finished.
    #[error("Queue timeout after {attempts} poll attempts")]
    QueueTimeout { attempts: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BackgroundError>;
