//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use guardiq_store::ActivityPolicy;
use guardiq_utils::LogFormat;
use guardiq_verification::GateFailurePolicy;

use crate::RpcError;

/// Configuration for the verification service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every key is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Origins allowed by CORS. `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Behaviour when the suspicious-activity lookup fails.
    #[serde(default)]
    pub gate_failure_policy: GateFailurePolicy,

    /// Look-back window for counting failed attempts.
    #[serde(default = "default_activity_window_secs")]
    pub activity_window_secs: u64,

    /// Failed attempts within the window that flag an email.
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./guardiq_data")
}

fn default_map_size() -> usize {
    1 << 30
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_activity_window_secs() -> u64 {
    ActivityPolicy::default().window_secs
}

fn default_max_failed_attempts() -> u64 {
    ActivityPolicy::default().max_failed_attempts
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RpcError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Socket address assembled from `host` (an IPv4 or IPv6 literal) and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, RpcError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| RpcError::Config(format!("invalid host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn activity_policy(&self) -> ActivityPolicy {
        ActivityPolicy {
            window_secs: self.activity_window_secs,
            max_failed_attempts: self.max_failed_attempts,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            cors_origins: default_cors_origins(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            gate_failure_policy: GateFailurePolicy::default(),
            activity_window_secs: default_activity_window_secs(),
            max_failed_attempts: default_max_failed_attempts(),
        }
    }
}
