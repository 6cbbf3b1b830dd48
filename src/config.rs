use serde::{Deserialize, Serialize};

use crate::common::http::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractorConfig {
    /// Per-call timeout for outbound provider requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Enables the browser-observation fallback when a probe is wired in.
    #[serde(default)]
    pub browser: bool,
    /// Replacement batchexecute argument templates, `%TOKEN%` marks the
    /// token slot. When unset the four built-in variants are used.
    pub rpc_arg_variants: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            browser: false,
            rpc_arg_variants: None,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory. A missing file is
    /// fine (all fields have defaults); a file that exists but does not
    /// parse is a startup error.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string("config.toml").unwrap_or_else(|_| "".to_string());
        if config_str.is_empty() {
            return Ok(Self::default());
        }
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.extractor.timeout_secs, 25);
        assert!(!config.extractor.browser);
        assert!(config.extractor.rpc_arg_variants.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [extractor]
            browser = true
            rpc_arg_variants = ["[\"%TOKEN%\", \"\", false, false]"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.extractor.browser);
        assert_eq!(
            config.extractor.rpc_arg_variants.as_deref().map(|v| v.len()),
            Some(1)
        );
    }
}
