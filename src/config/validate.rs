//! Config validation logic.
//! Checks the address, token and timeout before any request is sent.

use anyhow::{Result, bail};
use reqwest::Url;
use tracing::{error, info, warn};

use super::types::Config;

impl Config {
    /// Validate the settings needed to talk to Vault.
    pub fn validate(&self) -> Result<()> {
        let url = match Url::parse(&self.address) {
            Ok(u) => u,
            Err(e) => {
                error!(address = %self.address, "Vault address is not a URL");
                bail!("Vault address '{}' is not a valid URL: {e}", self.address);
            }
        };
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Vault address '{}' must use http or https, not '{}'",
                self.address,
                url.scheme()
            );
        }
        if url.host_str().is_none() {
            bail!("Vault address '{}' has no host", self.address);
        }

        match self.token.as_deref() {
            Some(t) if !t.trim().is_empty() => {}
            _ => bail!("No Vault token found; set VAULT_TOKEN or run `vault login`"),
        }

        if self.timeout.is_zero() {
            bail!("Client timeout must be greater than zero");
        }

        if self.skip_verify {
            warn!("TLS certificate verification is disabled");
        }

        info!(
            "Config validated: address='{}' namespace='{}' timeout={}s",
            self.address,
            self.namespace.as_deref().unwrap_or("<none>"),
            self.timeout.as_secs()
        );
        Ok(())
    }
}
