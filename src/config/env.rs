//! Environment overlay.
//! Reads the standard Vault client variables on top of file/default values.
//!
//! - VAULT_ADDR, VAULT_TOKEN, VAULT_NAMESPACE
//! - VAULT_CLIENT_TIMEOUT: seconds, optionally suffixed with `s`
//! - VAULT_SKIP_VERIFY: boolean
//! - token fallback: ~/.vault-token when VAULT_TOKEN is unset

use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::paths::token_helper_path;
use super::types::Config;

/// Apply variables from the process environment.
pub fn apply_env(cfg: &mut Config) {
    apply_env_from(cfg, |k| std::env::var(k).ok());
    if cfg.token.is_none()
        && let Some(path) = token_helper_path()
    {
        cfg.token = read_token_file(&path);
    }
}

/// Apply variables through `lookup` (lets tests avoid touching the real environment).
pub fn apply_env_from<F>(cfg: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(addr) = get("VAULT_ADDR") {
        cfg.address = addr;
    }
    if let Some(token) = get("VAULT_TOKEN") {
        cfg.token = Some(token);
    }
    if let Some(ns) = get("VAULT_NAMESPACE") {
        cfg.namespace = Some(ns);
    }
    if let Some(raw) = get("VAULT_CLIENT_TIMEOUT") {
        match parse_timeout(&raw) {
            Some(t) => cfg.timeout = t,
            None => debug!(value = %raw, "Ignoring unparsable VAULT_CLIENT_TIMEOUT"),
        }
    }
    if let Some(raw) = get("VAULT_SKIP_VERIFY") {
        match parse_bool(&raw) {
            Some(b) => cfg.skip_verify = b,
            None => debug!(value = %raw, "Ignoring unparsable VAULT_SKIP_VERIFY"),
        }
    }
}

/// Accepts `30` or `30s`; zero is rejected.
pub fn parse_timeout(raw: &str) -> Option<Duration> {
    let s = raw.trim();
    let s = s.strip_suffix('s').unwrap_or(s);
    s.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_token_file(path: &Path) -> Option<String> {
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        debug!(path = %path.display(), "Using token from token helper file");
        Some(token.to_string())
    }
}
