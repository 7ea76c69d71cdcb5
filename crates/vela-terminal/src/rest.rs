//! # REST Adapters
//!
//! HTTP/JSON implementations of the two collaborator traits against the
//! backend API:
//!
//! - `GET  {base}/api/products/lookup?code=...` -> [`ProductSnapshot`]
//! - `POST {base}/api/invoices`                 -> [`InvoiceReceipt`]
//!
//! Status codes map onto the boundary error taxonomy: 404 on lookup is
//! [`LookupError::NotFound`], any 4xx on invoice creation is
//! [`InvoiceError::Rejected`] with the service's own message, everything
//! else (5xx, transport failures, malformed bodies) is `Unavailable`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use vela_core::{InvoiceReceipt, InvoiceRequest, ProductSnapshot};

use crate::catalog::{LookupError, ProductLookup};
use crate::invoicing::{InvoiceError, InvoiceService};

/// Default per-request timeout. A hung backend otherwise leaves the
/// terminal's in-flight indicator stuck forever.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PRODUCT_LOOKUP_PATH: &str = "api/products/lookup";
const INVOICE_PATH: &str = "api/invoices";

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the backend API.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// API root, e.g. `https://pos.example.com/`.
    pub base_url: Url,

    /// Bearer token, when the deployment requires one.
    pub api_key: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl RestConfig {
    /// Creates a config with default timeout and no credentials.
    pub fn new(base_url: Url) -> Self {
        RestConfig {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads configuration from the environment.
    ///
    /// `VELA_API_URL` is required; `VELA_API_KEY` and
    /// `VELA_API_TIMEOUT_SECS` are optional overrides.
    pub fn from_env() -> Result<Self, RestInitError> {
        let base = std::env::var("VELA_API_URL").map_err(|_| RestInitError::MissingBaseUrl)?;
        let mut config = RestConfig::new(Url::parse(&base)?);

        if let Ok(api_key) = std::env::var("VELA_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(secs) = std::env::var("VELA_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        Ok(config)
    }
}

/// Failures while building the REST adapter (not per-request failures).
#[derive(Debug, Error)]
pub enum RestInitError {
    #[error("VELA_API_URL is not set")]
    MissingBaseUrl,

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("API key contains invalid header characters")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

// =============================================================================
// Backend Client
// =============================================================================

/// One HTTP client implementing both collaborator traits.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl RestBackend {
    /// Builds the client, normalizing the base URL so endpoint joins never
    /// swallow a path segment.
    pub fn new(config: RestConfig) -> Result<Self, RestInitError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| RestInitError::InvalidApiKey)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(RestBackend { http, base_url })
    }

    fn lookup_url(&self, code: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(PRODUCT_LOOKUP_PATH)?;
        url.query_pairs_mut().append_pair("code", code);
        Ok(url)
    }

    fn invoice_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(INVOICE_PATH)
    }
}

#[async_trait]
impl ProductLookup for RestBackend {
    async fn resolve(&self, code: &str) -> Result<ProductSnapshot, LookupError> {
        let url = self
            .lookup_url(code)
            .map_err(|err| LookupError::Unavailable(err.to_string()))?;
        debug!(code = %code, "catalog lookup");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| LookupError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(code.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Unavailable(read_error_message(response).await));
        }

        response
            .json::<ProductSnapshot>()
            .await
            .map_err(|err| LookupError::Unavailable(format!("Malformed catalog response: {}", err)))
    }
}

#[async_trait]
impl InvoiceService for RestBackend {
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<InvoiceReceipt, InvoiceError> {
        let url = self
            .invoice_url()
            .map_err(|err| InvoiceError::Unavailable(err.to_string()))?;
        debug!(lines = request.items.len(), "invoice submission");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| InvoiceError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(InvoiceError::Rejected(read_error_message(response).await));
        }
        if !status.is_success() {
            return Err(InvoiceError::Unavailable(read_error_message(response).await));
        }

        response
            .json::<InvoiceReceipt>()
            .await
            .map_err(|err| {
                InvoiceError::Unavailable(format!("Malformed invoicing response: {}", err))
            })
    }
}

// =============================================================================
// Error Body Handling
// =============================================================================

/// The backend's error envelope.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts the service's message from an error response, falling back to
/// the raw body and then the status line.
async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) => body,
        },
        _ => format!("HTTP {}", status),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> RestBackend {
        RestBackend::new(RestConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = RestConfig::new(Url::parse("https://pos.example.com").unwrap());
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        let config = config.with_api_key("secret").with_timeout(Duration::from_secs(3));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let backend = backend("https://pos.example.com/tenant-1");
        assert_eq!(
            backend.invoice_url().unwrap().as_str(),
            "https://pos.example.com/tenant-1/api/invoices"
        );
    }

    #[test]
    fn test_lookup_url_encodes_code() {
        let backend = backend("https://pos.example.com");
        let url = backend.lookup_url("AB 12&34").unwrap();
        assert_eq!(
            url.as_str(),
            "https://pos.example.com/api/products/lookup?code=AB+12%2634"
        );
    }

    #[test]
    fn test_error_body_parses_message_field() {
        let parsed: ErrorBody =
            serde_json::from_str("{\"message\":\"customer name is required\"}").unwrap();
        assert_eq!(parsed.message, "customer name is required");
    }
}
