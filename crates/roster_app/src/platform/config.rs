//! Client configuration read from `roster.ron`.
//!
//! Every field has a default, so a missing file or a partial one is fine:
//!
//! ```ron
//! (
//!     source: Local(dir: "./roster_data"),
//!     page_size: 6,
//!     log: (destination: Both, level: "debug"),
//! )
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use roster_core::{CoreSettings, Dimensions, ValidationRules, DEFAULT_NOTICE_TTL, DEFAULT_PAGE_SIZE};
use roster_engine::{HttpSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "roster.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to ./roster.log in the current directory.
    #[default]
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub destination: LogDestination,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceConfig {
    Http {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_connect_timeout_ms")]
        connect_timeout_ms: u64,
        #[serde(default = "default_request_timeout_ms")]
        request_timeout_ms: u64,
        #[serde(default = "default_max_response_bytes")]
        max_response_bytes: u64,
    },
    Local {
        dir: PathBuf,
    },
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    duration_ms(HttpSettings::default().connect_timeout)
}

fn default_request_timeout_ms() -> u64 {
    duration_ms(HttpSettings::default().request_timeout)
}

fn default_max_response_bytes() -> u64 {
    HttpSettings::default().max_response_bytes
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub source: SourceConfig,
    pub page_size: u32,
    /// `None` turns the pixel-size check off.
    pub min_photo_dimensions: Option<(u32, u32)>,
    pub notice_ttl_ms: u64,
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            source: SourceConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            min_photo_dimensions: rules
                .min_photo_dimensions
                .map(|dims| (dims.width, dims.height)),
            notice_ttl_ms: duration_ms(DEFAULT_NOTICE_TTL),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(&content).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: PathBuf::new(),
            message: err.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if let SourceConfig::Http {
            request_timeout_ms, ..
        } = &self.source
        {
            if *request_timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "request_timeout_ms must be positive".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            page_size: self.page_size,
            validation: ValidationRules {
                min_photo_dimensions: self
                    .min_photo_dimensions
                    .map(|(width, height)| Dimensions::new(width, height)),
            },
            notice_ttl: Duration::from_millis(self.notice_ttl_ms),
        }
    }

    pub fn http_settings(&self) -> Option<HttpSettings> {
        match &self.source {
            SourceConfig::Http {
                base_url,
                connect_timeout_ms,
                request_timeout_ms,
                max_response_bytes,
            } => Some(HttpSettings {
                base_url: base_url.clone(),
                connect_timeout: Duration::from_millis(*connect_timeout_ms),
                request_timeout: Duration::from_millis(*request_timeout_ms),
                max_response_bytes: *max_response_bytes,
            }),
            SourceConfig::Local { .. } => None,
        }
    }
}
