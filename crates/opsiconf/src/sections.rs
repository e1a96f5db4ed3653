//! Configuration sections: server connection, WebDAV share, logging.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// JSON-RPC endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Full RPC URL.
    /// Default: https://localhost:4447/rpc
    #[serde(default = "ServerConfig::default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Skip TLS certificate validation. OPSI servers ship self-signed
    /// certificates, but this stays off unless asked for.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Per-call deadline in seconds.
    /// Default: 10
    #[serde(default = "ServerConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    fn default_endpoint() -> String {
        "https://localhost:4447/rpc".to_string()
    }

    fn default_timeout_secs() -> u64 {
        10
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            username: String::new(),
            password: String::new(),
            accept_invalid_certs: false,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// Package staging share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebdavConfig {
    /// Base URL of the share.
    /// Default: https://localhost:4447/repository
    #[serde(default = "WebdavConfig::default_url")]
    pub url: String,

    /// Directory on the depot that the share maps to. Uploaded packages
    /// are installed from here.
    /// Default: /var/lib/opsi/repository
    #[serde(default = "WebdavConfig::default_repository_dir")]
    pub repository_dir: String,

    /// Upload deadline in seconds.
    /// Default: 300
    #[serde(default = "WebdavConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WebdavConfig {
    fn default_url() -> String {
        "https://localhost:4447/repository".to_string()
    }

    fn default_repository_dir() -> String {
        "/var/lib/opsi/repository".to_string()
    }

    fn default_timeout_secs() -> u64 {
        300
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute depot path of an uploaded file.
    pub fn repository_path(&self, filename: &str) -> String {
        format!("{}/{}", self.repository_dir.trim_end_matches('/'), filename)
    }
}

impl Default for WebdavConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            repository_dir: Self::default_repository_dir(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `opsiclient=debug`.
    /// Default: info
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.endpoint, "https://localhost:4447/rpc");
        assert_eq!(server.timeout(), Duration::from_secs(10));
        assert!(!server.accept_invalid_certs);

        let webdav = WebdavConfig::default();
        assert_eq!(webdav.timeout(), Duration::from_secs(300));
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_repository_path() {
        let webdav = WebdavConfig {
            repository_dir: "/srv/opsi/repo/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            webdav.repository_path("firefox_124.0-1.opsi"),
            "/srv/opsi/repo/firefox_124.0-1.opsi"
        );
    }
}
