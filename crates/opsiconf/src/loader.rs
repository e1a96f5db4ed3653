//! Config file discovery, loading, and environment variable overlay.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{ConfigError, OpsiConfig};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/opsiclient/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("opsiclient/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("opsiclient.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// One config file. Absent keys leave the lower layer untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    server: ServerLayer,
    webdav: WebdavLayer,
    logging: LoggingLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerLayer {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    accept_invalid_certs: Option<bool>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WebdavLayer {
    url: Option<String>,
    repository_dir: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingLayer {
    level: Option<String>,
}

/// Load one layer from a TOML file.
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay `layer` onto `config`; keys set in the layer win.
pub fn merge_layer(config: &mut OpsiConfig, layer: ConfigLayer) {
    let ConfigLayer {
        server,
        webdav,
        logging,
    } = layer;

    if let Some(v) = server.endpoint {
        config.server.endpoint = v;
    }
    if let Some(v) = server.username {
        config.server.username = v;
    }
    if let Some(v) = server.password {
        config.server.password = v;
    }
    if let Some(v) = server.accept_invalid_certs {
        config.server.accept_invalid_certs = v;
    }
    if let Some(v) = server.timeout_secs {
        config.server.timeout_secs = v;
    }

    if let Some(v) = webdav.url {
        config.webdav.url = v;
    }
    if let Some(v) = webdav.repository_dir {
        config.webdav.repository_dir = v;
    }
    if let Some(v) = webdav.timeout_secs {
        config.webdav.timeout_secs = v;
    }

    if let Some(v) = logging.level {
        config.logging.level = v;
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut OpsiConfig, sources: &mut ConfigSources) {
    apply_env_vars(config, sources, env::vars());
}

/// Apply overrides from an explicit set of variables.
///
/// Values that fail to parse are ignored and not recorded as overrides.
pub fn apply_env_vars<I>(config: &mut OpsiConfig, sources: &mut ConfigSources, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut rust_log = None;

    for (key, value) in vars {
        let applied = match key.as_str() {
            "OPSI_ENDPOINT" => {
                config.server.endpoint = value;
                true
            }
            "OPSI_USERNAME" => {
                config.server.username = value;
                true
            }
            "OPSI_PASSWORD" => {
                config.server.password = value;
                true
            }
            "OPSI_ACCEPT_INVALID_CERTS" => match parse_bool(&value) {
                Some(v) => {
                    config.server.accept_invalid_certs = v;
                    true
                }
                None => false,
            },
            "OPSI_TIMEOUT_SECS" => match value.parse() {
                Ok(v) => {
                    config.server.timeout_secs = v;
                    true
                }
                Err(_) => false,
            },
            "OPSI_WEBDAV_URL" => {
                config.webdav.url = value;
                true
            }
            "OPSI_WEBDAV_TIMEOUT_SECS" => match value.parse() {
                Ok(v) => {
                    config.webdav.timeout_secs = v;
                    true
                }
                Err(_) => false,
            },
            "OPSI_REPOSITORY_DIR" => {
                config.webdav.repository_dir = value;
                true
            }
            "OPSI_LOG_LEVEL" => {
                config.logging.level = value;
                true
            }
            // Applied last so it wins over OPSI_LOG_LEVEL
            "RUST_LOG" => {
                rust_log = Some(value);
                false
            }
            _ => false,
        };

        if applied {
            sources.env_overrides.push(key);
        }
    }

    if let Some(level) = rust_log {
        config.logging.level = level;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        return match directories::BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(stripped),
            None => PathBuf::from(path),
        };
    }

    // $VAR or $VAR/rest/of/path
    if let Some(stripped) = path.strip_prefix('$') {
        let (var_name, rest) = match stripped.find('/') {
            Some(pos) => (&stripped[..pos], Some(&stripped[pos + 1..])),
            None => (stripped, None),
        };
        return match (env::var(var_name), rest) {
            (Ok(value), Some(rest)) => PathBuf::from(value).join(rest),
            (Ok(value), None) => PathBuf::from(value),
            (Err(_), _) => PathBuf::from(path),
        };
    }

    PathBuf::from(path)
}
