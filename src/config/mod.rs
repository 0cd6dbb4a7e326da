//! Config module.
//! Provides configuration types, default paths, XML loading, environment overlay and
//! validation.
//!
//! Precedence (lowest first): defaults, config.xml, environment, CLI flags. The CLI
//! layer is applied by the caller (`Args::apply_overrides`).

pub mod env;
pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor, token_helper_path};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config_from_xml_path};

use anyhow::Result;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "VAULT_KV_MV_CONFIG";
/// Same default as the Vault CLI.
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Outcome of loading layered configuration.
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    /// The file that was read, if one existed.
    pub source_file: Option<PathBuf>,
}

/// Build a Config from defaults, the config file (if present) and the environment.
pub fn load_layered() -> Result<Loaded> {
    let mut config = Config::default();
    let path = default_config_path()?;

    let source_file = match load_config_from_xml_path(&path)? {
        Some(parsed) => {
            parsed.apply(&mut config);
            Some(path)
        }
        None => None,
    };

    env::apply_env(&mut config);
    Ok(Loaded {
        config,
        source_file,
    })
}
