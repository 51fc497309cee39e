use std::error::Error as _;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use encoding_rs::{Encoding, UTF_8};
use reqwest::{redirect, Client, Response};
use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("domain could not be resolved")]
    DnsResolution,

    #[error("unsupported content type: {0}")]
    NotHtml(String),

    #[error("page exceeds {0} bytes")]
    TooLarge(usize),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::Status(status) => *status,
            FetchError::Timeout => 408,
            FetchError::DnsResolution | FetchError::NotHtml(_) | FetchError::TooLarge(_) => 400,
            FetchError::Transport(_) => 500,
        }
    }

    /// Client-facing message; never includes transport internals
    pub fn public_message(&self) -> &'static str {
        match self {
            FetchError::Status(404) => "Page not found",
            FetchError::Status(403) => "Access forbidden",
            FetchError::Status(500) => "Target server error",
            FetchError::Status(_) => "Failed to fetch content: upstream returned an error",
            FetchError::Timeout => "Request timeout",
            FetchError::DnsResolution => "Domain not found",
            FetchError::NotHtml(_) => "URL does not point to an HTML page",
            FetchError::TooLarge(_) => "Page is too large to process",
            FetchError::Transport(_) => "Failed to fetch content",
        }
    }
}

#[derive(Debug, Error)]
#[error("stopped after {0} redirects")]
struct TooManyRedirects(usize);

/// Follow at most `max` redirect hops.
///
/// `previous` already holds every URL requested so far, the original one
/// included, so hop `n` sees `n` entries.
fn redirect_policy(max: usize) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            attempt.error(TooManyRedirects(max))
        } else {
            attempt.follow()
        }
    })
}

/// HTTP client for retrieving pages to extract
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect_policy(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch `url` and return its body if it is an HTML page
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_html(&content_type) {
            return Err(FetchError::NotHtml(content_type));
        }

        let bytes = self.read_body(response).await?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);

        let encoding = charset(&content_type)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&bytes);
        Ok(text.into_owned())
    }

    /// Read the body in chunks, giving up once it passes `max_body_bytes`
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>, FetchError> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge(limit));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn is_html(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    HTML_MEDIA_TYPES.contains(&media_type.as_str())
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    if is_dns_failure(&err) {
        return FetchError::DnsResolution;
    }
    FetchError::Transport(err)
}

/// hyper reports resolver failures only through the error's source chain
fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let message = inner.to_string().to_lowercase();
        if message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
            || message.contains("no such host")
        {
            return true;
        }
        source = inner.source();
    }
    false
}
