//! Blocking HTTP client for Vault's logical API (KV v1 paths).
//!
//! - LIST is sent as `GET /v1/<path>?list=true`.
//! - A 404 without error messages means "not found" for list/read.
//! - Any other non-2xx status is surfaced with Vault's `errors` array as the message.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, trace};

use super::{SecretStore, StoreError, ValueBundle};

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Connection settings for [`VaultClient`].
#[derive(Clone)]
pub struct VaultSettings {
    pub address: String,
    pub token: String,
    pub namespace: Option<String>,
    pub timeout: Duration,
    pub skip_verify: bool,
}

impl std::fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSettings")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .field("skip_verify", &self.skip_verify)
            .finish()
    }
}

pub struct VaultClient {
    http: Client,
    base: Url,
    token: String,
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecretResponse<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultClient {
    /// Build a client; fails only on a malformed address or TLS backend setup errors.
    pub fn new(settings: VaultSettings) -> Result<Self, StoreError> {
        let base = Url::parse(&settings.address).map_err(|e| StoreError::Rejected {
            path: settings.address.clone(),
            reason: format!("invalid Vault address: {e}"),
        })?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.skip_verify)
            .user_agent(concat!("vault-kv-mv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport {
                url: settings.address.clone(),
                source: e,
            })?;

        debug!(address = %base, namespace = ?settings.namespace, timeout = ?settings.timeout, "Vault client ready");
        Ok(Self {
            http,
            base,
            token: settings.token,
            namespace: settings.namespace,
        })
    }

    /// `<base>/v1/<path>` with every `/`-separated segment percent-encoded, so key
    /// names containing `#`, `?`, `%` or spaces stay path data. A trailing `/` on
    /// `path` is kept as an empty last segment.
    fn url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| StoreError::Rejected {
                path: path.to_string(),
                reason: format!("Vault address '{}' cannot carry a path", self.base),
            })?;
            segments
                .pop_if_empty()
                .push("v1")
                .extend(path.trim_start_matches('/').split('/'));
        }
        Ok(url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header(TOKEN_HEADER, &self.token);
        match &self.namespace {
            Some(ns) => req.header(NAMESPACE_HEADER, ns),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder, url: &Url) -> Result<Response, StoreError> {
        self.authed(req).send().map_err(|e| StoreError::Transport {
            url: url.to_string(),
            source: e,
        })
    }

    /// Read a response body, mapping 404 to `None` and non-2xx to `StoreError::Status`.
    fn body_or_missing(resp: Response, url: &Url) -> Result<Option<String>, StoreError> {
        let status = resp.status();
        let body = resp.text().map_err(|e| StoreError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        trace!(%url, status = status.as_u16(), "vault response");

        if status == StatusCode::NOT_FOUND {
            let errors = error_messages(&body);
            if errors.is_empty() {
                return Ok(None);
            }
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: errors.join("; "),
            });
        }
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        Ok(Some(body))
    }

    fn expect_success(resp: Response, url: &Url) -> Result<(), StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().map_err(|e| StoreError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        Err(status_error(status, &body))
    }
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    let errors = error_messages(body);
    let message = if errors.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        errors.join("; ")
    };
    StoreError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Vault error bodies look like `{"errors":["..."]}`; anything else yields no messages.
fn error_messages(body: &str) -> Vec<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.errors)
        .unwrap_or_default()
}

fn parse_list_keys(body: &str, url: &Url) -> Result<Option<Vec<String>>, StoreError> {
    let parsed: SecretResponse<ListData> =
        serde_json::from_str(body).map_err(|e| StoreError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(parsed
        .data
        .map(|d| d.keys)
        .filter(|keys| !keys.is_empty()))
}

fn parse_read_data(body: &str, url: &Url) -> Result<Option<ValueBundle>, StoreError> {
    // 204 or empty body: nothing stored.
    if body.trim().is_empty() {
        return Ok(None);
    }
    let parsed: SecretResponse<ValueBundle> =
        serde_json::from_str(body).map_err(|e| StoreError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(parsed.data)
}

impl SecretStore for VaultClient {
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("list", "true");
        debug!(%path, "LIST");
        let resp = self.send(self.http.get(url.clone()), &url)?;
        match Self::body_or_missing(resp, &url)? {
            Some(body) => parse_list_keys(&body, &url),
            None => Ok(None),
        }
    }

    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError> {
        let url = self.url(path)?;
        debug!(%path, "READ");
        let resp = self.send(self.http.get(url.clone()), &url)?;
        match Self::body_or_missing(resp, &url)? {
            Some(body) => parse_read_data(&body, &url),
            None => Ok(None),
        }
    }

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError> {
        let url = self.url(path)?;
        debug!(%path, keys = value.len(), "WRITE");
        let resp = self.send(self.http.put(url.clone()).json(value), &url)?;
        Self::expect_success(resp, &url)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = self.url(path)?;
        debug!(%path, "DELETE");
        let resp = self.send(self.http.delete(url.clone()), &url)?;
        Self::expect_success(resp, &url)
    }
}
