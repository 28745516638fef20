use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The cron expression could not be parsed. Surfaced at startup.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error(transparent)]
    Core(#[from] postpress_core::CoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
