//! `postpress-scheduler` — cron-driven posting reminders.
//!
//! # Overview
//!
//! The [`engine::SchedulerEngine`] ticks every second and fires when the
//! configured cron expression matches. A firing announces the first `ready`
//! post (console + desktop notification) and flips it to `scheduled` in the
//! store. Missed triggers while the process was down are not replayed.
//!
//! # Cron expressions
//!
//! Standard five-field form (minute hour day-of-month month day-of-week)
//! with `*`, lists, ranges, and `/step`; day-of-week accepts 0–7 where both
//! 0 and 7 mean Sunday. When both day fields are restricted, either
//! matching day fires (vixie-cron behaviour).

pub mod cron;
pub mod engine;
pub mod error;
pub mod reminder;

pub use cron::CronExpr;
pub use engine::SchedulerEngine;
pub use error::{Result, SchedulerError};
