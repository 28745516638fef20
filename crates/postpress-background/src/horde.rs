//! Queue-based provider (AI Horde style): submit an async generation job,
//! poll until done, fetch the result, download the image.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use postpress_core::config::{HordeConfig, IMAGE_HEIGHT, IMAGE_WIDTH};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{BackgroundError, Result};
use crate::prompt;
use crate::provider::BackgroundProvider;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HordeProvider {
    client: reqwest::Client,
    config: HordeConfig,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    done: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    img: String,
}

impl HordeProvider {
    pub fn new(config: HordeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn submit(&self, enhanced: &str) -> Result<String> {
        let url = format!("{}/api/v2/generate/async", self.config.base_url);
        let body = serde_json::json!({
            "prompt": enhanced,
            "params": {
                "steps": 25,
                "width": IMAGE_WIDTH,
                "height": IMAGE_HEIGHT,
                "cfg_scale": 7.5,
                "sampler_name": "k_euler",
                "n": 1
            },
            "nsfw": false,
            "trusted_workers": true
        });

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .json(&body)
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let submit: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| BackgroundError::Parse(e.to_string()))?;
        Ok(submit.id)
    }

    async fn poll_until_done(&self, job_id: &str) -> Result<()> {
        let url = format!("{}/api/v2/generate/check/{}", self.config.base_url, job_id);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(interval).await;

            let resp = self
                .client
                .get(&url)
                .timeout(CHECK_TIMEOUT)
                .send()
                .await?;
            let resp = check_status(resp).await?;
            let check: CheckResponse = resp
                .json()
                .await
                .map_err(|e| BackgroundError::Parse(e.to_string()))?;

            if check.done {
                return Ok(());
            }
            if attempt % 5 == 0 {
                info!(attempt, max = self.config.max_poll_attempts, "still waiting in queue");
            }
        }

        Err(BackgroundError::QueueTimeout {
            attempts: self.config.max_poll_attempts,
        })
    }

    async fn fetch_image_url(&self, job_id: &str) -> Result<String> {
        let url = format!("{}/api/v2/generate/status/{}", self.config.base_url, job_id);
        let resp = self
            .client
            .get(&url)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let status: StatusResponse = resp
            .json()
            .await
            .map_err(|e| BackgroundError::Parse(e.to_string()))?;

        status
            .generations
            .into_iter()
            .next()
            .map(|g| g.img)
            .ok_or(BackgroundError::MissingImage)
    }
}

#[async_trait]
impl BackgroundProvider for HordeProvider {
    fn name(&self) -> &str {
        "horde"
    }

    async fn generate(&self, prompt: &str, output: &Path) -> Result<()> {
        let enhanced = prompt::enhance(prompt);

        let job_id = self.submit(&enhanced).await?;
        debug!(%job_id, "generation job submitted");

        self.poll_until_done(&job_id).await?;

        let image_url = self.fetch_image_url(&job_id).await?;
        let resp = self
            .client
            .get(&image_url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await?;

        std::fs::write(output, &bytes)?;
        info!(path = %output.display(), bytes = bytes.len(), "background image saved");
        Ok(())
    }
}

/// Convert a non-success response into `Api { status, message }`.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(BackgroundError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> HordeConfig {
        HordeConfig {
            base_url: server.uri(),
            api_key: "0000000000".to_string(),
            poll_interval_ms: 10,
            max_poll_attempts: 3,
        }
    }

    #[tokio::test]
    async fn happy_path_writes_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/generate/async"))
            .and(header("apikey", "0000000000"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(serde_json::json!({"id": "job-1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/generate/check/job-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"done": true})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/generate/status/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generations": [{"img": format!("{}/result.png", server.uri())}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/result.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bg-p1.png");
        let provider = HordeProvider::new(test_config(&server));

        provider.generate("rust", &out).await.unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn exhausted_poll_budget_is_queue_timeout_and_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/generate/async"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(serde_json::json!({"id": "job-2"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/generate/check/job-2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"done": false})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bg-p2.png");
        let provider = HordeProvider::new(test_config(&server));

        let err = provider.generate("rust", &out).await.unwrap_err();
        assert!(matches!(
            err,
            BackgroundError::QueueTimeout { attempts: 3 }
        ));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn submit_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/generate/async"))
            .respond_with(ResponseTemplate::new(429).set_body_string("too many requests"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = HordeProvider::new(test_config(&server));

        let err = provider
            .generate("rust", &dir.path().join("bg.png"))
            .await
            .unwrap_err();
        match err {
            BackgroundError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "too many requests");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_generations_is_missing_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/generate/async"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(serde_json::json!({"id": "job-3"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/generate/check/job-3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"done": true})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/generate/status/job-3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"generations": []})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = HordeProvider::new(test_config(&server));

        let err = provider
            .generate("rust", &dir.path().join("bg.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackgroundError::MissingImage));
    }
}
