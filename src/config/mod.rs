//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `OA_*` environment variables;
//! the OpenAI key is read from the conventional `OPENAI_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::service::DEFAULT_CLUSTER_REFRESH_SECS;

/// Email sent to Unpaywall when none is configured. Unpaywall requires a
/// contact address on every request.
pub const DEFAULT_UNPAYWALL_EMAIL: &str = "YOUR_EMAIL@example.com";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `OA_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for the file-backed JSON cache. Default: `./cache`.
    pub cache_dir: PathBuf,

    /// Directory for downloaded article PDFs. Default: `./pdfs`.
    pub pdf_dir: PathBuf,

    /// Contact email attached to Unpaywall requests.
    pub unpaywall_email: String,

    /// OpenAI API key. When absent the server still starts; embeddings are
    /// skipped and affected articles fall back to zero vectors.
    pub openai_api_key: Option<String>,

    /// Override for the OpenAI API base URL (tests and proxies).
    pub openai_api_base: Option<String>,

    /// Background cluster-refresh interval, in seconds. Default: `1800`.
    pub cluster_refresh_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            cache_dir: PathBuf::from("./cache"),
            pdf_dir: PathBuf::from("./pdfs"),
            unpaywall_email: DEFAULT_UNPAYWALL_EMAIL.to_string(),
            openai_api_key: None,
            openai_api_base: None,
            cluster_refresh_secs: DEFAULT_CLUSTER_REFRESH_SECS,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "OA_PORT";
    const ENV_BIND_ADDR: &'static str = "OA_BIND_ADDR";
    const ENV_CACHE_DIR: &'static str = "OA_CACHE_DIR";
    const ENV_PDF_DIR: &'static str = "OA_PDF_DIR";
    const ENV_UNPAYWALL_EMAIL: &'static str = "OA_UNPAYWALL_EMAIL";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_OPENAI_API_BASE: &'static str = "OA_OPENAI_API_BASE";
    const ENV_CLUSTER_REFRESH_SECS: &'static str = "OA_CLUSTER_REFRESH_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let cache_dir = Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir);
        let pdf_dir = Self::parse_path_from_env(Self::ENV_PDF_DIR, defaults.pdf_dir);
        let unpaywall_email =
            Self::parse_string_from_env(Self::ENV_UNPAYWALL_EMAIL, defaults.unpaywall_email);
        let openai_api_key = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY);
        let openai_api_base = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_BASE);
        let cluster_refresh_secs = Self::parse_u64_from_env(
            Self::ENV_CLUSTER_REFRESH_SECS,
            defaults.cluster_refresh_secs,
        );

        Ok(Self {
            port,
            bind_addr,
            cache_dir,
            pdf_dir,
            unpaywall_email,
            openai_api_key,
            openai_api_base,
            cluster_refresh_secs,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        if self.pdf_dir.exists() && !self.pdf_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.pdf_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
