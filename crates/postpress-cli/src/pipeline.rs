//! The generate pipeline: a best-effort background phase followed by the
//! render pass.

use std::fs;
use std::path::Path;

use postpress_core::{PostStore, PostpressConfig};
use tracing::{debug, info, warn};

pub async fn generate(config: &PostpressConfig) -> anyhow::Result<()> {
    let store = PostStore::new(&config.content.store_path);
    generate_backgrounds(config, &store).await?;
    postpress_render::run(config, &store).await?;
    Ok(())
}

/// Ask the configured provider for a background for every ready post that
/// does not have one yet. A failed generation is logged and the post simply
/// renders without a background; an existing `bg-<id>.png` is kept so the
/// background stays stable across repeated runs.
async fn generate_backgrounds(
    config: &PostpressConfig,
    store: &PostStore,
) -> anyhow::Result<()> {
    let Some(provider) = postpress_background::build_provider(&config.background) else {
        debug!("background phase disabled");
        return Ok(());
    };

    let posts = store.load()?;
    let output_dir = Path::new(&config.content.output_dir);
    fs::create_dir_all(output_dir)?;

    for post in posts.iter().filter(|p| p.is_ready()) {
        let out = output_dir.join(post.background_file());
        if out.exists() {
            debug!(post_id = %post.id, "background already present; keeping it");
            continue;
        }
        info!(
            post_id = %post.id,
            provider = provider.name(),
            prompt = post.ai_prompt(),
            "generating background"
        );
        if let Err(e) = provider.generate(post.ai_prompt(), &out).await {
            warn!(
                post_id = %post.id,
                error = %e,
                "background generation failed; post will render without one"
            );
        }
    }
    Ok(())
}
