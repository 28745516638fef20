use std::path::Path;

use async_trait::async_trait;
use postpress_core::config::{BackgroundConfig, BackgroundProviderKind};
use tracing::warn;

use crate::error::Result;
use crate::horde::HordeProvider;
use crate::huggingface::HuggingFaceProvider;
use crate::pollinations::PollinationsProvider;

/// A background image generation strategy.
///
/// `generate` writes exactly one file to `output` on success and nothing on
/// failure. Implementations apply the prompt enhancement themselves.
#[async_trait]
pub trait BackgroundProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, output: &Path) -> Result<()>;
}

/// Build the configured provider, or `None` when the background phase is
/// disabled (explicitly, or because the selected provider is unconfigured).
pub fn build_provider(config: &BackgroundConfig) -> Option<Box<dyn BackgroundProvider>> {
    match config.provider {
        BackgroundProviderKind::Pollinations => Some(Box::new(PollinationsProvider::new(
            config.pollinations.clone(),
        ))),
        BackgroundProviderKind::Horde => Some(Box::new(HordeProvider::new(config.horde.clone()))),
        BackgroundProviderKind::Huggingface => match &config.huggingface {
            Some(hf) => Some(Box::new(HuggingFaceProvider::new(hf.clone()))),
            None => {
                warn!("huggingface provider selected but [background.huggingface] is not configured; background phase disabled");
                None
            }
        },
        BackgroundProviderKind::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postpress_core::config::BackgroundConfig;

    #[test]
    fn default_config_builds_direct_fetch_provider() {
        let provider = build_provider(&BackgroundConfig::default()).unwrap();
        assert_eq!(provider.name(), "pollinations");
    }

    #[test]
    fn disabled_kind_builds_nothing() {
        let config = BackgroundConfig {
            provider: BackgroundProviderKind::None,
            ..BackgroundConfig::default()
        };
        assert!(build_provider(&config).is_none());
    }

    #[test]
    fn unconfigured_huggingface_builds_nothing() {
        let config = BackgroundConfig {
            provider: BackgroundProviderKind::Huggingface,
            ..BackgroundConfig::default()
        };
        assert!(build_provider(&config).is_none());
    }
}
