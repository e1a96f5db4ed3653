//! Configuration loading for the OPSI client tools.
//!
//! Settings are grouped into three sections:
//!
//! - **server** (`ServerConfig`): JSON-RPC endpoint, credentials, TLS trust
//!   and the per-call timeout.
//! - **webdav** (`WebdavConfig`): the package share and the depot directory
//!   it maps to.
//! - **logging** (`LoggingConfig`): the tracing filter directive.
//!
//! # Usage
//!
//! ```rust,no_run
//! use opsiconf::OpsiConfig;
//!
//! let config = OpsiConfig::load().expect("Failed to load config");
//! config.validate().expect("Invalid config");
//!
//! println!("Endpoint: {}", config.server.endpoint);
//! println!("WebDAV: {}", config.webdav.url);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/opsiclient/config.toml` (system)
//! 2. `~/.config/opsiclient/config.toml` (user)
//! 3. `./opsiclient.toml` (local override), or the file given on the
//!    command line
//! 4. Environment variables (`OPSI_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [server]
//! endpoint = "https://opsi.example.org:4447/rpc"
//! username = "admin"
//! password = "secret"
//! accept_invalid_certs = false
//! timeout_secs = 10
//!
//! [webdav]
//! url = "https://opsi.example.org:4447/repository"
//! repository_dir = "/var/lib/opsi/repository"
//!
//! [logging]
//! level = "info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};
pub use sections::{LoggingConfig, ServerConfig, WebdavConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsiConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub webdav: WebdavConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OpsiConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/opsiclient/config.toml`
    /// 3. `~/.config/opsiclient/config.toml`
    /// 4. `./opsiclient.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with an explicit file replacing `./opsiclient.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    /// Load configuration from optional path and return information about sources.
    ///
    /// A path given explicitly must exist.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::FileRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
        }

        let files = loader::discover_config_files_with_override(config_path);
        let (mut config, mut sources) = Self::load_files(&files)?;

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Layer the given files over the defaults, in order. No env overrides.
    pub fn load_files(files: &[PathBuf]) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = OpsiConfig::default();

        for path in files {
            let layer = loader::load_from_file(path)?;
            loader::merge_layer(&mut config, layer);
            sources.files.push(path.clone());
        }

        Ok((config, sources))
    }

    /// Check the settings a connection needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.server.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.endpoint",
                message: "must not be empty".to_string(),
            });
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "server.endpoint",
                message: format!("{} is not an http(s) URL", endpoint),
            });
        }
        if self.server.username.is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.username",
                message: "must not be empty".to_string(),
            });
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "server.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.webdav.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "webdav.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Copy with the password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.server.password.is_empty() {
            config.server.password = "********".to_string();
        }
        config
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# OPSI client configuration\n\n");

        output.push_str("[server]\n");
        output.push_str(&format!("endpoint = {}\n", quote(&self.server.endpoint)));
        output.push_str(&format!("username = {}\n", quote(&self.server.username)));
        output.push_str(&format!("password = {}\n", quote(&self.server.password)));
        output.push_str(&format!(
            "accept_invalid_certs = {}\n",
            self.server.accept_invalid_certs
        ));
        output.push_str(&format!("timeout_secs = {}\n", self.server.timeout_secs));

        output.push_str("\n[webdav]\n");
        output.push_str(&format!("url = {}\n", quote(&self.webdav.url)));
        output.push_str(&format!(
            "repository_dir = {}\n",
            quote(&self.webdav.repository_dir)
        ));
        output.push_str(&format!("timeout_secs = {}\n", self.webdav.timeout_secs));

        output.push_str("\n[logging]\n");
        output.push_str(&format!("level = {}\n", quote(&self.logging.level)));

        output
    }
}

fn quote(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
