use std::fs;
use std::path::Path;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Single CORS policy shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: String,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: String,
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_allowed_headers() -> String {
    "Content-Type,X-Request-Id,Authorization".to_string()
}

fn default_allowed_methods() -> String {
    "OPTIONS,POST".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
            allow_credentials: true,
            allowed_headers: default_allowed_headers(),
            allowed_methods: default_allowed_methods(),
        }
    }
}

/// Configuration for the translation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// "aws_translate" or "deeplx"
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    #[serde(default)]
    pub aws: AwsTranslateConfig,

    pub deeplx: Option<DeepLxConfig>,
}

fn default_provider() -> String {
    "aws_translate".to_string()
}

fn default_max_text_length() -> usize {
    5000
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_text_length: default_max_text_length(),
            aws: AwsTranslateConfig::default(),
            deeplx: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsTranslateConfig {
    /// Falls back to the SDK's region chain when unset
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLxConfig {
    pub api_endpoint: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pages larger than this are refused before extraction
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; translate-gateway/{}; content extraction)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = substitute_env_vars(&load_text_file(path)?);

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}

/// Replace `${VAR_NAME}` with the environment value, leaving unknown variables untouched
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = match Regex::new(r"\$\{(\w+)\}") {
        Ok(pattern) => pattern,
        Err(_) => return content.to_string(),
    };
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Read a text file, stripping a UTF-8 BOM and falling back to GBK for non-UTF-8 bytes
fn load_text_file(file_path: &str) -> Result<String> {
    let mut buffer = fs::read(file_path)?;
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(e) => {
            let (cow, _, _) = encoding_rs::GBK.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}
