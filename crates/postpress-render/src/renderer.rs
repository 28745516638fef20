//! The render pass: every `ready` post gets the template composed and
//! captured; everything else is left untouched.

use std::fs;
use std::path::Path;

use postpress_core::{Post, PostStore, PostpressConfig};
use tracing::{error, info};

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::{retry, template};

/// Render every ready post and rewrite the store with updated `imagePath`
/// fields. The browser is always closed before this returns.
pub async fn run(config: &PostpressConfig, store: &PostStore) -> Result<()> {
    let mut posts = store.load()?;
    let output_dir = Path::new(&config.content.output_dir);
    fs::create_dir_all(output_dir)?;

    let ready = posts.iter().filter(|p| p.is_ready()).count();
    info!(total = posts.len(), ready, "starting render pass");
    if ready == 0 {
        info!("no ready posts; nothing to render");
        return Ok(());
    }

    let session = BrowserSession::launch(&config.render).await?;
    let outcome = render_all(&session, &mut posts, config, output_dir).await;
    session.close().await;
    outcome?;

    store.save(&posts)?;
    Ok(())
}

async fn render_all(
    session: &BrowserSession,
    posts: &mut [Post],
    config: &PostpressConfig,
    output_dir: &Path,
) -> Result<()> {
    for post in posts.iter_mut().filter(|p| p.is_ready()) {
        // Re-read the template for every post so overlay edits are never
        // silently reused from a stale copy.
        let raw = fs::read_to_string(&config.content.template_path)?;
        let background = read_background(output_dir, post)?;
        let html = template::compose(&raw, post, background.as_deref());
        let out_path = output_dir.join(post.image_file());

        match retry::bounded(config.render.max_attempts, || {
            session.capture(&html, &out_path)
        })
        .await
        {
            Ok(()) => {
                post.image_path = Some(out_path.to_string_lossy().into_owned());
                info!(post_id = %post.id, path = %out_path.display(), "image rendered");
            }
            Err(e) => {
                error!(
                    post_id = %post.id,
                    attempts = config.render.max_attempts,
                    error = %e,
                    "rendering failed; skipping post"
                );
            }
        }
    }
    Ok(())
}

fn read_background(output_dir: &Path, post: &Post) -> Result<Option<Vec<u8>>> {
    let path = output_dir.join(post.background_file());
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use postpress_core::types::PostStatus;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: "T".to_string(),
            subtitle: None,
            author: None,
            color: None,
            ai_prompt: None,
            status: PostStatus::Ready,
            image_path: None,
            scheduled_at: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn background_is_read_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let p = post("p1");

        assert_eq!(read_background(dir.path(), &p).unwrap(), None);

        fs::write(dir.path().join("bg-p1.png"), b"png").unwrap();
        assert_eq!(
            read_background(dir.path(), &p).unwrap().as_deref(),
            Some(b"png".as_slice())
        );
    }

    #[test]
    fn background_lookup_is_per_post_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bg-other.png"), b"png").unwrap();
        assert_eq!(read_background(dir.path(), &post("p1")).unwrap(), None);
    }
}
