//! Direct-fetch provider: one GET against a templated URL returns the raw
//! image bytes synchronously. No job queue, no API key.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use postpress_core::config::{PollinationsConfig, IMAGE_HEIGHT, IMAGE_WIDTH};
use tracing::info;

use crate::error::{BackgroundError, Result};
use crate::prompt;
use crate::provider::BackgroundProvider;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PollinationsProvider {
    client: reqwest::Client,
    config: PollinationsConfig,
}

impl PollinationsProvider {
    pub fn new(config: PollinationsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// `{base}/prompt/{enhanced prompt}?width=&height=`, with the prompt
    /// percent-encoded as a path segment.
    fn image_url(&self, enhanced: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|e| BackgroundError::Parse(format!("bad base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| BackgroundError::Parse("base_url cannot be a base".to_string()))?
            .push("prompt")
            .push(enhanced);
        url.query_pairs_mut()
            .append_pair("width", &IMAGE_WIDTH.to_string())
            .append_pair("height", &IMAGE_HEIGHT.to_string());
        Ok(url)
    }
}

#[async_trait]
impl BackgroundProvider for PollinationsProvider {
    fn name(&self) -> &str {
        "pollinations"
    }

    async fn generate(&self, prompt: &str, output: &Path) -> Result<()> {
        let enhanced = prompt::enhance(prompt);
        let url = self.image_url(&enhanced)?;

        let resp = self.client.get(url).timeout(FETCH_TIMEOUT).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(BackgroundError::Api { status, message });
        }

        let bytes = resp.bytes().await?;
        std::fs::write(output, &bytes)?;
        info!(path = %output.display(), bytes = bytes.len(), "background image saved");
        Ok(())
    }
}
