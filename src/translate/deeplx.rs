use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::interface::{
    ProviderError, ProviderTranslation, TranslationProvider, TransportFailure, AUTO_DETECT,
};
use crate::config::DeepLxConfig;

/// Provider for a DeepLX-compatible translation endpoint
#[derive(Debug, Clone)]
pub struct DeepLxProvider {
    client: Client,
    api_endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeepLxRequest<'a> {
    text: &'a str,
    source_lang: String,
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct DeepLxResponse {
    code: Option<u16>,
    data: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    message: Option<String>,
}

impl DeepLxProvider {
    pub fn new(client: Client, config: &DeepLxConfig) -> Self {
        info!("Initialized DeepLX provider: endpoint={}", config.api_endpoint);
        Self {
            client,
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TranslationProvider for DeepLxProvider {
    fn name(&self) -> &str {
        "deeplx"
    }

    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<ProviderTranslation, ProviderError> {
        let body = DeepLxRequest {
            text,
            source_lang: if source == AUTO_DETECT {
                AUTO_DETECT.to_string()
            } else {
                source.to_uppercase()
            },
            target_lang: target.to_uppercase(),
        };

        let mut request = self.client.post(&self.api_endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        debug!("DeepLX responded with status {}", status);

        let payload: DeepLxResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) if status < 400 => {
                return Err(ProviderError::Unknown(format!("Malformed DeepLX response: {}", e)))
            }
            Err(_) => DeepLxResponse {
                code: Some(status),
                data: None,
                source_lang: None,
                target_lang: None,
                message: None,
            },
        };

        let code = payload.code.unwrap_or(status).max(status);
        if code >= 400 {
            let message = payload
                .message
                .unwrap_or_else(|| format!("DeepLX returned status {}", code));
            return Err(classify_status(code, message));
        }

        let translated_text = payload
            .data
            .ok_or_else(|| ProviderError::Unknown("DeepLX response has no data".to_string()))?;

        Ok(ProviderTranslation {
            translated_text,
            source_language: payload
                .source_lang
                .map(|l| l.to_lowercase())
                .unwrap_or_else(|| source.to_string()),
            target_language: payload
                .target_lang
                .map(|l| l.to_lowercase())
                .unwrap_or_else(|| target.to_string()),
        })
    }
}

fn classify_status(code: u16, message: String) -> ProviderError {
    match code {
        400..=499 if message.to_lowercase().contains("lang") => {
            ProviderError::UnsupportedLanguagePair(message)
        }
        400..=499 => ProviderError::InvalidRequest(message),
        _ => ProviderError::Unknown(message),
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Transport(TransportFailure::Timeout)
    } else if err.is_connect() {
        ProviderError::Transport(TransportFailure::Connect)
    } else {
        ProviderError::Transport(TransportFailure::Other)
    }
}
