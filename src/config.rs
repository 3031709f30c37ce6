//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables and command-line flags (both resolved by `clap`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 2718;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for [`ServerConfig`].
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },
    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for `twui serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Root directory for static assets.
    pub public_dir: PathBuf,
    /// File served for `/`, relative to `public_dir`.
    pub index_file: String,
    /// Program invoked for the Taskwarrior store.
    pub task_program: String,
    /// Largest accepted mutation body.
    pub max_body_bytes: usize,
    /// Deadline for a single task store call.
    pub collaborator_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from("public"),
            index_file: "index.html".to_string(),
            task_program: "task".to_string(),
            max_body_bytes: 64 * 1024,
            collaborator_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Loads the config file at `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a YAML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed documents or unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be positive".to_string(),
            ));
        }
        if self.collaborator_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "collaborator_timeout_secs must be positive".to_string(),
            ));
        }
        let mut components = Path::new(&self.index_file).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain_name {
            return Err(ConfigError::Invalid(format!(
                "index_file must be a plain file name, got {:?}",
                self.index_file
            )));
        }
        if self.task_program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "task_program must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The address to listen on.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Deadline applied to every task store call.
    #[must_use]
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    /// Path of the document served for `/`.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join(&self.index_file)
    }
}
