use std::env;

const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,

    // Slack credentials
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub slack_api_base: String,
    pub skip_signature_verification: bool,

    /// Channel that receives failure reports
    pub bot_logs_channel: String,
    /// Channels in which mentions are handled
    pub allowed_channels: Vec<String>,
    /// Teams users can join and give bits to
    pub teams: Vec<String>,

    /// Value echoed by `/health`
    pub health_value: String,
}

impl AppConfig {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from any key lookup, so tests do not have to touch the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let slack_bot_token = required("SLACK_BOT_TOKEN")?;
        let slack_signing_secret = required("SLACK_SIGNING_SECRET")?;
        let bot_logs_channel = required("BOT_LOGS_CHANNEL")?;
        let health_value = required("ENV_TEST")?;

        let slack_api_base = lookup("SLACK_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let skip_signature_verification = lookup("SLACK_SKIP_VERIFICATION")
            .map(|v| v == "true")
            .unwrap_or(false);
        if skip_signature_verification {
            tracing::warn!(
                "SLACK_SKIP_VERIFICATION is enabled. Never use this outside local development."
            );
        }

        let mut allowed_channels = lookup("SLACK_ALLOWED_CHANNELS")
            .map(|v| split_list(&v))
            .unwrap_or_default();
        if allowed_channels.is_empty() {
            allowed_channels.push(bot_logs_channel.clone());
        }

        let teams = lookup("BIT_TEAMS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Self {
            server_port,
            slack_bot_token,
            slack_signing_secret,
            slack_api_base,
            skip_signature_verification,
            bot_logs_channel,
            allowed_channels,
            teams,
            health_value,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("{0} environment variable is required")]
    Missing(&'static str),
}
