//! `postpress-core` — post records, the JSON post store, and configuration.
//!
//! The store file is the single source of truth for post state: every
//! component fully re-reads and fully rewrites it. Records are created by
//! external tooling; this system only ever augments them (`imagePath`,
//! `status`, `scheduledAt`) and must round-trip fields it does not model.

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::PostpressConfig;
pub use error::{CoreError, Result};
pub use store::PostStore;
pub use types::{Post, PostStatus};
