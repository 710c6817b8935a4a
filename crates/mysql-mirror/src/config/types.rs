//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::transfer::DEFAULT_BATCH_SIZE;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Database the rows are read from.
    pub source: EndpointConfig,

    /// Database the rows are written to.
    pub target: EndpointConfig,

    /// Rows per batch (default: 100000).
    ///
    /// Peak memory grows linearly with this value; insert round trips shrink
    /// in proportion.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl MirrorConfig {
    /// Create a configuration with the default batch size.
    pub fn new(source: EndpointConfig, target: EndpointConfig) -> Self {
        Self {
            source,
            target,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Connection settings for one MySQL database.
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Database host (default: "localhost").
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl EndpointConfig {
    /// Create an endpoint on the default port.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        let host = host.into();
        Self {
            host: if host.is_empty() { default_host() } else { host },
            port: default_mysql_port(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Override the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port/database`, for log lines.
    pub fn display_name(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}
