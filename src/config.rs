use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

/// Default maximum report upload size (32 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 32 << 20;

const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api/";
const DEFAULT_SLACK_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub slack: SlackConfig,
    /// Logical destination used when a request does not name one (`CHANNEL`)
    pub default_channel: Option<String>,
    /// Largest accepted report file, in bytes
    pub max_upload_size: usize,
}

/// Slack Web API connection settings
#[derive(Clone)]
pub struct SlackConfig {
    pub token: String,
    pub api_url: Url,
    pub timeout: Duration,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            slack: SlackConfig::from_env()?,
            default_channel: env::var("CHANNEL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
        })
    }
}

impl SlackConfig {
    /// Load Slack configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("SLACK_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingSlackToken)?;

        let api_url =
            env::var("SLACK_API_URL").unwrap_or_else(|_| DEFAULT_SLACK_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|_| ConfigError::InvalidSlackApiUrl)?;

        Ok(Self {
            token,
            api_url,
            timeout: Duration::from_secs(
                env::var("SLACK_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_SLACK_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_SLACK_TIMEOUT_SECS),
            ),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    MissingSlackToken,
    InvalidSlackApiUrl,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
            ConfigError::MissingSlackToken => {
                write!(f, "SLACK_TOKEN environment variable is required")
            }
            ConfigError::InvalidSlackApiUrl => write!(f, "SLACK_API_URL must be a valid URL"),
        }
    }
}

impl std::error::Error for ConfigError {}
