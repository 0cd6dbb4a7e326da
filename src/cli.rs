//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - A trailing `/` on either path selects directory semantics and is never stripped.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::env::parse_timeout;
use crate::config::types::{Config, LogLevel};

const EXAMPLES: &str = "\
Examples:
  # Rename a secret
  vault-kv-mv secret/foo secret/bar

  # Move a secret into a new directory
  vault-kv-mv secret/foo secret/new/

  # Move all secrets from one directory to another
  vault-kv-mv secret/old/ secret/new/

Authentication:
  The standard Vault environment variables are used (VAULT_ADDR, VAULT_TOKEN,
  VAULT_NAMESPACE, VAULT_CLIENT_TIMEOUT, VAULT_SKIP_VERIFY). Without VAULT_TOKEN
  the token written by `vault login` (~/.vault-token) is used.";

/// Move or rename secrets in HashiCorp Vault's KV secrets engine.
/// CLI flags override environment variables, which override the config file.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move or rename secrets in HashiCorp Vault's KV secrets engine",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Current path of the secret or directory. Use a trailing '/' for a directory.
    #[arg(
        value_name = "SOURCE_PATH",
        required_unless_present_any = ["print_config", "init_config"]
    )]
    pub source: Option<String>,

    /// New path for the secret or directory. Use a trailing '/' for a directory.
    #[arg(
        value_name = "DESTINATION_PATH",
        required_unless_present_any = ["print_config", "init_config"]
    )]
    pub destination: Option<String>,

    /// Vault server address (overrides VAULT_ADDR and the config file).
    #[arg(long, value_name = "URL", value_hint = ValueHint::Url)]
    pub address: Option<String>,

    /// Vault Enterprise namespace (overrides VAULT_NAMESPACE).
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Per-request timeout in seconds, e.g. 5 or 5s (overrides VAULT_CLIENT_TIMEOUT).
    #[arg(long, value_name = "SECONDS", value_parser = parse_timeout_arg)]
    pub timeout: Option<std::time::Duration>,

    /// Skip TLS certificate verification.
    #[arg(long)]
    pub skip_verify: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where the config file is looked up (or VAULT_KV_MV_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,

    /// Write a template config file at the default location, then exit.
    #[arg(long, help = "Create a template config file and exit")]
    pub init_config: bool,
}

fn parse_timeout_arg(s: &str) -> Result<std::time::Duration, String> {
    parse_timeout(s).ok_or_else(|| format!("invalid timeout '{s}'; expected a positive number of seconds"))
}

impl Args {
    /// Sanitized (source, destination), if both were given.
    pub fn paths(&self) -> Option<(String, String)> {
        let source = self.source.as_deref()?;
        let destination = self.destination.as_deref()?;
        Some((Self::sanitize(source), Self::sanitize(destination)))
    }

    /// Trim whitespace and stray quotes left by shell escaping, and any leading `/`
    /// (Vault paths are relative to the API root). The trailing `/` is significant
    /// and kept.
    fn sanitize(s: &str) -> String {
        let trimmed = s.trim();
        let unquoted = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            &trimmed[1..trimmed.len() - 1]
        } else {
            trimmed
        };
        unquoted.trim().trim_start_matches('/').to_string()
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(addr) = &self.address {
            cfg.address = addr.clone();
        }
        if let Some(ns) = &self.namespace {
            cfg.namespace = Some(ns.clone());
        }
        if let Some(t) = self.timeout {
            cfg.timeout = t;
        }
        if self.skip_verify {
            cfg.skip_verify = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
