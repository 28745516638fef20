//! Bearer-token inference provider: POST the prompt, get raw image bytes
//! back in the same response.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use postpress_core::config::HuggingFaceConfig;
use tracing::info;

use crate::error::{BackgroundError, Result};
use crate::prompt;
use crate::provider::BackgroundProvider;

const INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HuggingFaceProvider {
    client: reqwest::Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl BackgroundProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, prompt: &str, output: &Path) -> Result<()> {
        let enhanced = prompt::enhance(prompt);
        let url = format!("{}/models/{}", self.config.base_url, self.config.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .json(&serde_json::json!({ "inputs": enhanced }))
            .timeout(INFERENCE_TIMEOUT)
            .send()
            .await?;

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
