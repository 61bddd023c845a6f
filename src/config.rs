use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::trace;

const ENV_WEB_PORT: &str = "MONITOR_WEB_WEB_PORT";
const ENV_DB_PATH: &str = "MONITOR_WEB_DB_PATH";

const DEFAULT_PORT: u16 = 8080;

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (no persistence)
    #[serde(rename = "none")]
    None,

    /// SQLite database (default)
    Sqlite {
        /// Path to the SQLite database file
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,

        /// Connection pool size
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_sqlite_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./alerts.db")
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_addr")]
    pub addr: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Allow cross-origin requests
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Directory served under `/static` if it exists
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            storage: StorageConfig::default(),
            enable_cors: true,
            static_dir: default_static_dir(),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    /// Apply `MONITOR_WEB_*` overrides from the given lookup
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup(ENV_WEB_PORT).and_then(|p| p.parse().ok()) {
            self.port = port;
        }

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            self.storage = match self.storage {
                StorageConfig::Sqlite {
                    max_connections, ..
                } => StorageConfig::Sqlite {
                    path: PathBuf::from(path),
                    max_connections,
                },
                StorageConfig::None => StorageConfig::Sqlite {
                    path: PathBuf::from(path),
                    max_connections: default_max_connections(),
                },
            };
        }

        self
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}

/// Config file (if any) with environment overrides applied
pub fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    Ok(config.apply_env(|key| std::env::var(key).ok()))
}
