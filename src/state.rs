use std::sync::Arc;

use crate::config::Config;
use crate::content::fetcher::PageFetcher;
use crate::translate::{TranslationProvider, TranslatorFactory};

/// Long-lived clients shared by every request. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<dyn TranslationProvider>,
    pub fetcher: Arc<PageFetcher>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let translator =
            TranslatorFactory::create_translator(&config.translate, reqwest::Client::new()).await?;
        Self::with_translator(config, translator)
    }

    /// Build state around an already constructed provider
    pub fn with_translator(
        config: Config,
        translator: Arc<dyn TranslationProvider>,
    ) -> anyhow::Result<Self> {
        let fetcher = Arc::new(PageFetcher::new(&config.fetch)?);

        Ok(Self {
            config: Arc::new(config),
            translator,
            fetcher,
        })
    }
}
