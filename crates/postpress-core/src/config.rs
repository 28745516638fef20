use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Fixed LinkedIn post image dimensions — used by the renderer viewport and
// by the generation providers' size parameters.
pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 627;

/// Top-level config (postpress.toml + POSTPRESS_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostpressConfig {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Where post state, the overlay template, and output images live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_store_path")]
    pub store_path: String,
    #[serde(default = "default_template_path")]
    pub template_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            template_path: default_template_path(),
            output_dir: default_output_dir(),
        }
    }
}

/// Reminder cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Five-field cron expression. Default: 09:00 on Mon/Wed/Fri.
    /// Override with env var: POSTPRESS_SCHEDULE_EXPRESSION
    #[serde(default = "default_schedule_expression")]
    pub expression: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            expression: default_schedule_expression(),
        }
    }
}

/// Which AI background strategy the generate pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundProviderKind {
    /// Direct templated-URL fetch (single GET, raw image bytes).
    Pollinations,
    /// Queue-based provider (submit job, poll, fetch result).
    Horde,
    /// Bearer-token inference endpoint returning raw image bytes.
    Huggingface,
    /// Skip the background phase entirely.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default = "default_provider_kind")]
    pub provider: BackgroundProviderKind,
    #[serde(default)]
    pub horde: HordeConfig,
    #[serde(default)]
    pub pollinations: PollinationsConfig,
    pub huggingface: Option<HuggingFaceConfig>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            provider: default_provider_kind(),
            horde: HordeConfig::default(),
            pollinations: PollinationsConfig::default(),
            huggingface: None,
        }
    }
}

/// Queue-based provider settings (AI Horde style).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HordeConfig {
    #[serde(default = "default_horde_base_url")]
    pub base_url: String,
    /// Anonymous key is accepted; generation is slower but free.
    #[serde(default = "default_horde_api_key")]
    pub api_key: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self {
            base_url: default_horde_base_url(),
            api_key: default_horde_api_key(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollinationsConfig {
    #[serde(default = "default_pollinations_base_url")]
    pub base_url: String,
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        Self {
            base_url: default_pollinations_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    pub api_token: String,
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
    #[serde(default = "default_hf_model")]
    pub model: String,
}

/// Headless-browser capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_render_width")]
    pub width: u32,
    #[serde(default = "default_render_height")]
    pub height: u32,
    /// Per-post screenshot attempts before the post is skipped.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_render_width(),
            height: default_render_height(),
            max_attempts: default_max_attempts(),
            capture_timeout_secs: default_capture_timeout_secs(),
        }
    }
}

fn default_store_path() -> String {
    "content/posts.json".to_string()
}
fn default_template_path() -> String {
    "templates/post-template.html".to_string()
}
fn default_output_dir() -> String {
    "output/images".to_string()
}
fn default_schedule_expression() -> String {
    "0 9 * * 1,3,5".to_string()
}
fn default_provider_kind() -> BackgroundProviderKind {
    BackgroundProviderKind::Pollinations
}
fn default_horde_base_url() -> String {
    "https://aihorde.net".to_string()
}
fn default_horde_api_key() -> String {
    "0000000000".to_string()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_max_poll_attempts() -> u32 {
    30
}
fn default_pollinations_base_url() -> String {
    "https://image.pollinations.ai".to_string()
}
fn default_hf_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}
fn default_hf_model() -> String {
    "stabilityai/stable-diffusion-2-1".to_string()
}
fn default_render_width() -> u32 {
    IMAGE_WIDTH
}
fn default_render_height() -> u32 {
    IMAGE_HEIGHT
}
fn default_max_attempts() -> u32 {
    3
}
fn default_capture_timeout_secs() -> u64 {
    30
}

impl PostpressConfig {
    /// Load config from a TOML file with POSTPRESS_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./postpress.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("postpress.toml");

        let config: PostpressConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("POSTPRESS_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PostpressConfig::default();
        assert_eq!(config.schedule.expression, "0 9 * * 1,3,5");
        assert_eq!(config.content.store_path, "content/posts.json");
        assert_eq!(config.background.provider, BackgroundProviderKind::Pollinations);
        assert_eq!(config.render.width, 1200);
        assert_eq!(config.render.height, 627);
        assert_eq!(config.render.max_attempts, 3);
        assert_eq!(config.background.horde.max_poll_attempts, 30);
    }

    #[test]
    fn env_overrides_schedule_expression() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("POSTPRESS_SCHEDULE_EXPRESSION", "30 8 * * 2");
            let config = PostpressConfig::load(None).unwrap();
            assert_eq!(config.schedule.expression, "30 8 * * 2");
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "postpress.toml",
                r#"
                [background]
                provider = "horde"

                [render]
                max_attempts = 5
                "#,
            )?;
            let config = PostpressConfig::load(None).unwrap();
            assert_eq!(config.background.provider, BackgroundProviderKind::Horde);
            assert_eq!(config.render.max_attempts, 5);
            Ok(())
        });
    }
}
