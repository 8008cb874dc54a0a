use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::analytics::MatomoConfig;
use crate::i18n::DEFAULT_LOCALE;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen address (e.g. "127.0.0.1:3000")
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Unix socket path; takes precedence over `listen`
    pub socket: Option<String>,

    /// Locale for UI strings (e.g. "en-US", "fr")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// OpenTelemetry configuration
    #[serde(default)]
    pub otel: OtelConfig,

    /// Repository whose history supplies page contributors
    pub github: Option<GitHubConfig>,

    /// Matomo analytics; no tracking script is served when unset
    pub matomo: Option<MatomoConfig>,
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OtelConfig {
    /// OTLP endpoint (if None, uses OTEL_EXPORTER_OTLP_ENDPOINT env var)
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,

    /// Branch to read history from (defaults to the repository's default branch)
    pub branch: Option<String>,

    /// GitHub personal access token (optional, increases rate limits)
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys are separated by a double underscore:
    /// - FC_LISTEN
    /// - FC_SOCKET
    /// - FC_LOCALE
    /// - FC_OTEL__ENDPOINT
    /// - FC_GITHUB__OWNER, FC_GITHUB__REPO, FC_GITHUB__BRANCH
    /// - FC_GITHUB__TOKEN or GITHUB_TOKEN
    /// - FC_MATOMO__URL, FC_MATOMO__SITE_ID
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ConfigDefaults::default()))
            .merge(Env::prefixed("FC_").split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let mut config: Config = figment.extract()?;

        // Handle GITHUB_TOKEN without prefix for compatibility
        if let Some(github) = config.github.as_mut() {
            if github.token.is_none() {
                github.token = std::env::var("GITHUB_TOKEN").ok();
            }
        }

        Ok(config)
    }
}

/// Helper struct for default values in figment
#[derive(Debug, Serialize)]
struct ConfigDefaults {
    listen: String,
    locale: String,
    otel: OtelConfig,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            locale: default_locale(),
            otel: OtelConfig::default(),
        }
    }
}
