//! Default path helpers and symlink checks.
//! Determines the config file location and the Vault token-helper file, and detects
//! symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config path: `$VAULT_KV_MV_CONFIG` if set, else `<config_dir>/vault_kv_mv/config.xml`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    if let Some(mut base) = config_dir() {
        base.push("vault_kv_mv");
        base.push("config.xml");
        return Ok(base);
    }
    env::var("HOME")
        .map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("vault_kv_mv")
                .join("config.xml")
        })
        .map_err(|_| anyhow!("cannot determine a config directory (no HOME)"))
}

/// The file `vault login` writes the token to.
pub fn token_helper_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".vault-token"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
