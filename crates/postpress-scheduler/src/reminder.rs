//! Reminder mechanics: pick the next ready post, announce it, stamp it.

use chrono::{DateTime, Utc};
use postpress_core::types::{Post, PostStatus};
use tracing::warn;

/// First `ready` record in file order, if any.
pub fn next_ready(posts: &[Post]) -> Option<&Post> {
    posts.iter().find(|p| p.is_ready())
}

/// Flip the record with `id` to `scheduled` and stamp `scheduledAt`.
/// Returns false when no record with that id exists any more.
pub fn mark_scheduled(posts: &mut [Post], id: &str, now: DateTime<Utc>) -> bool {
    match posts.iter_mut().find(|p| p.id == id) {
        Some(post) => {
            post.status = PostStatus::Scheduled;
            post.scheduled_at = Some(now);
            true
        }
        None => false,
    }
}

/// Console reminder block printed on every firing.
pub fn format_reminder(post: &Post) -> String {
    let rule = "─".repeat(50);
    let image = post.image_path.as_deref().unwrap_or("(not rendered yet)");
    format!(
        "\nPOST REMINDER\n{rule}\n\
         Title:  {}\n\
         Author: {}\n\
         Image:  {}\n\
         {rule}\n\
         Time to post on LinkedIn!\n",
        post.title,
        post.author(),
        image,
    )
}

/// Fire-and-forget desktop notification on a blocking task; failures are
/// logged and otherwise ignored.
pub fn notify_desktop(post_title: &str) {
    let body = format!("Time to post: {post_title}");
    tokio::task::spawn_blocking(move || {
        if let Err(e) = notify_rust::Notification::new()
            .summary("LinkedIn Post Reminder")
            .body(&body)
            .sound_name("message-new-instant")
            .show()
        {
            warn!("desktop notification failed: {e}");
        }
    });
}
