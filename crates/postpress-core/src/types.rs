use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback byline when a record carries no `author`.
pub const DEFAULT_AUTHOR: &str = "Your Name";
/// Fallback accent color (LinkedIn blue) when a record carries no `color`.
pub const DEFAULT_COLOR: &str = "#0A66C2";

/// Lifecycle state of a post.
///
/// Only `ready` and `scheduled` are acted on by this system; the store may
/// contain other values written by external tooling, which round-trip
/// unchanged through the `Other` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Eligible for image generation and for the next reminder.
    Ready,
    /// A reminder has fired for this post.
    Scheduled,
    /// Any other status string — preserved verbatim.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Ready => write!(f, "ready"),
            PostStatus::Scheduled => write!(f, "scheduled"),
            PostStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One planned social-media post and its generation state.
///
/// Field names serialize in camelCase to match the on-disk store format.
/// Records are created externally; unknown fields are kept in `extra` so a
/// rewrite never destroys state this system does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique within the store, stable across runs; names the output files.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background prompt; falls back to `title` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
    pub status: PostStatus,
    /// Set by the renderer after a successful screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Stamped by the scheduler when a reminder fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    pub fn is_ready(&self) -> bool {
        self.status == PostStatus::Ready
    }

    pub fn subtitle(&self) -> &str {
        self.subtitle.as_deref().unwrap_or("")
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    pub fn ai_prompt(&self) -> &str {
        self.ai_prompt.as_deref().unwrap_or(&self.title)
    }

    /// File name of the final rendered image for this post.
    pub fn image_file(&self) -> String {
        format!("{}.png", self.id)
    }

    /// File name of the optional AI-generated background for this post.
    pub fn background_file(&self) -> String {
        format!("bg-{}.png", self.id)
    }
}
