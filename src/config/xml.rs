//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - Unknown XML fields are a hard error so misconfigurations (including an attempt
//!   to store the token here) surface early.
//! - A missing file simply means "use defaults".

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::paths::path_has_symlink_ancestor;
use super::types::{Config, LogLevel};
use super::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct XmlConfig {
    address: Option<String>,
    namespace: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    timeout_seconds: Option<u64>,
    skip_verify: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl XmlConfig {
    /// Overlay the values present in the file onto `cfg`.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(addr) = non_empty(self.address.as_deref()) {
            cfg.address = addr.to_string();
        }
        if let Some(ns) = non_empty(self.namespace.as_deref()) {
            cfg.namespace = Some(ns.to_string());
        }
        if let Some(secs) = self.timeout_seconds.filter(|s| *s > 0) {
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(skip) = self.skip_verify {
            cfg.skip_verify = skip;
        }
        if let Some(level) = non_empty(self.log_level.as_deref()).and_then(LogLevel::parse) {
            cfg.log_level = level;
        }
        if let Some(file) = non_empty(self.log_file.as_deref()) {
            cfg.log_file = Some(PathBuf::from(file));
        }
    }
}

pub fn parse_config_xml(contents: &str) -> Result<XmlConfig> {
    from_xml_str(contents).context("parse config xml")
}

/// Load the XML file at `path`; `Ok(None)` when it does not exist.
pub fn load_config_from_xml_path(path: &Path) -> Result<Option<XmlConfig>> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed = parse_config_xml(&contents)
        .with_context(|| format!("in config file '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(Some(parsed))
}

/// Write the default template to `path` (0600, parent 0700). Refuses to overwrite.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let content = format!(
        "<!--\n  vault-kv-mv configuration (XML)\n\n  Fields (all optional):\n    address          -> Vault server address (VAULT_ADDR overrides)\n    namespace        -> Vault Enterprise namespace (VAULT_NAMESPACE overrides)\n    timeout_seconds  -> per-request client timeout (VAULT_CLIENT_TIMEOUT overrides)\n    skip_verify      -> true to skip TLS verification (VAULT_SKIP_VERIFY overrides)\n    log_level        -> quiet | normal | info | debug\n    log_file         -> path to an additional log file\n\n  The token is never read from this file: use VAULT_TOKEN or `vault login`.\n  CLI flags override everything.\n-->\n<config>\n  <address>{}</address>\n  <timeout_seconds>{}</timeout_seconds>\n  <skip_verify>false</skip_verify>\n  <log_level>normal</log_level>\n</config>\n",
        DEFAULT_ADDRESS,
        DEFAULT_TIMEOUT.as_secs()
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
