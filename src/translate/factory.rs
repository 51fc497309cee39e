use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::aws_translate::AwsTranslateProvider;
use super::deeplx::DeepLxProvider;
use super::interface::TranslationProvider;
use crate::config::TranslateConfig;

/// Factory for creating translation providers
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the provider named by `config.provider`
    pub async fn create_translator(
        config: &TranslateConfig,
        http_client: reqwest::Client,
    ) -> Result<Arc<dyn TranslationProvider>> {
        info!("Initializing translation provider: {}", config.provider);

        match config.provider.as_str() {
            "aws_translate" | "aws" => {
                Ok(Arc::new(AwsTranslateProvider::from_config(&config.aws).await))
            }
            "deeplx" => {
                let deeplx = config
                    .deeplx
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("deeplx provider selected but translate.deeplx is not configured"))?;
                Ok(Arc::new(DeepLxProvider::new(http_client, deeplx)))
            }
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }
}
