//! `postpress-background` — AI background image generation.
//!
//! # Overview
//!
//! Each provider takes a text prompt, wraps it with a fixed stylistic
//! enhancement, and writes exactly one image file on success (nothing on
//! failure). Failures are structured [`BackgroundError`] values so callers
//! can log *why* generation failed; the generate pipeline treats every
//! failure as "continue without a background".
//!
//! # Providers
//!
//! | Provider       | Strategy                                            |
//! |----------------|-----------------------------------------------------|
//! | `pollinations` | Single GET against a templated URL, raw image bytes |
//! | `horde`        | Submit job, poll status, fetch result, download     |
//! | `huggingface`  | Bearer-token POST, raw image bytes in the response  |
//!
//! Exactly one provider is selected by configuration; there is no fallback
//! chain.

pub mod error;
pub mod horde;
pub mod huggingface;
pub mod pollinations;
pub mod prompt;
pub mod provider;

pub use error::{BackgroundError, Result};
pub use provider::{build_provider, BackgroundProvider};
