//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
use crate::store::VaultSettings;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// One line per write/delete (default)
    #[default]
    Normal,
    /// Resolution and planning details
    Info,
    /// Every store request
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration: how to reach Vault and how loudly to log.
#[derive(Clone)]
pub struct Config {
    /// Vault server address, e.g. https://vault.example.com:8200
    pub address: String,
    /// Client token; never read from the config file
    pub token: Option<String>,
    /// Enterprise namespace sent as X-Vault-Namespace
    pub namespace: Option<String>,
    /// Per-request client timeout
    pub timeout: Duration,
    /// Disable TLS certificate verification
    pub skip_verify: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            namespace: None,
            timeout: DEFAULT_TIMEOUT,
            skip_verify: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .field("skip_verify", &self.skip_verify)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Config {
    /// Client settings for this config. Call `validate()` first; a missing token is
    /// passed through as an empty string here.
    pub fn vault_settings(&self) -> VaultSettings {
        VaultSettings {
            address: self.address.clone(),
            token: self.token.clone().unwrap_or_default(),
            namespace: self.namespace.clone(),
            timeout: self.timeout,
            skip_verify: self.skip_verify,
        }
    }
}
