use async_trait::async_trait;
use aws_sdk_translate::error::SdkError;
use aws_sdk_translate::operation::translate_text::TranslateTextError;
use tracing::{debug, info};

use super::interface::{ProviderError, ProviderTranslation, TranslationProvider, TransportFailure};
use crate::config::AwsTranslateConfig;

/// Amazon Translate backed provider
pub struct AwsTranslateProvider {
    client: aws_sdk_translate::Client,
}

impl AwsTranslateProvider {
    /// Build a client from the standard AWS credential and region chains
    pub async fn from_config(config: &AwsTranslateConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        info!(
            "Initialized AWS Translate client: region={:?}",
            sdk_config.region().map(|r| r.as_ref().to_string())
        );
        Self {
            client: aws_sdk_translate::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl TranslationProvider for AwsTranslateProvider {
    fn name(&self) -> &str {
        "aws_translate"
    }

    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<ProviderTranslation, ProviderError> {
        debug!("TranslateText {} -> {} ({} chars)", source, target, text.len());

        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source)
            .target_language_code(target)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(ProviderTranslation {
            translated_text: output.translated_text().to_string(),
            source_language: output.source_language_code().to_string(),
            target_language: output.target_language_code().to_string(),
        })
    }
}

fn classify_sdk_error<R>(err: SdkError<TranslateTextError, R>) -> ProviderError
where
    R: std::fmt::Debug,
{
    match err {
        SdkError::TimeoutError(_) => ProviderError::Transport(TransportFailure::Timeout),
        SdkError::DispatchFailure(failure) => {
            if failure.is_timeout() {
                ProviderError::Transport(TransportFailure::Timeout)
            } else if failure.is_io() {
                ProviderError::Transport(TransportFailure::Connect)
            } else {
                ProviderError::Transport(TransportFailure::Other)
            }
        }
        SdkError::ServiceError(service_err) => classify_service_error(service_err.into_err()),
        other => ProviderError::Unknown(format!("{:?}", other)),
    }
}

fn classify_service_error(err: TranslateTextError) -> ProviderError {
    match err {
        TranslateTextError::UnsupportedLanguagePairException(e) => {
            let detail = e.message().map(str::to_string).unwrap_or_else(|| e.to_string());
            ProviderError::UnsupportedLanguagePair(detail)
        }
        TranslateTextError::InvalidRequestException(e) => {
            let detail = e.message().map(str::to_string).unwrap_or_else(|| e.to_string());
            ProviderError::InvalidRequest(detail)
        }
        other => ProviderError::Unknown(other.to_string()),
    }
}
