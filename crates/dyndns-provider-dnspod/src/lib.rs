// # DNSPod Record Gateway
//
// This crate binds the core's `RecordGateway` capability to the DNSPod API.
//
// ## API Reference
//
// - DNSPod API: https://docs.dnspod.cn/api/
// - List records: POST `/Record.List`
// - Create record: POST `/Record.Create`
// - Modify record: POST `/Record.Modify`
//
// All calls are form-encoded POSTs authenticated with
// `login_token=<token_id>,<token>`; responses are JSON with a `status`
// object whose `code` is `"1"` on success.
//
// ## Responsibility Boundary
//
// The gateway is a transport binding only:
//
// - One API call per method invocation
// - Provider errors (network, auth, rate-limit, validation) surface
//   verbatim as gateway errors; no retry, no backoff, no interpretation;
//   the scheduler's polling interval is the retry interval
// - No caching between calls, no update/no-update decisions (owned by the
//   reconciler)
//
// ## Security
//
// The credential pair is never logged; the `Debug` implementation redacts
// it.

use async_trait::async_trait;
use serde::Deserialize;

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{DnsRecord, RecordGateway};

/// DNSPod API base URL
const DNSPOD_API_BASE: &str = "https://dnsapi.cn";

/// Bound on a single API request
const DEFAULT_HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Default record line ("默认"), addressed by its stable numeric id
const DEFAULT_RECORD_LINE_ID: &str = "0";

/// DNSPod-backed record gateway
///
/// Credentials are the API token pair from the DNSPod console; the core
/// passes them through as opaque strings.
pub struct DnspodGateway {
    /// `<token_id>,<token>`; never log this value
    login_token: String,

    /// API base URL, injectable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Keep the credential pair out of Debug output.
impl std::fmt::Debug for DnspodGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnspodGateway")
            .field("login_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: ApiStatus,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    status: ApiStatus,
    #[serde(default)]
    records: Vec<ApiRecord>,
}

impl DnspodGateway {
    /// Create a gateway against the public DNSPod API.
    ///
    /// Fails fast on empty credentials; a misconfigured gateway is a
    /// startup error, not something to discover on the first cycle.
    pub fn new(access_key: &str, access_secret: &str) -> Result<Self> {
        Self::with_base_url(access_key, access_secret, DNSPOD_API_BASE)
    }

    /// Create a gateway against a custom API base URL (used in tests).
    pub fn with_base_url(
        access_key: &str,
        access_secret: &str,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        if access_key.is_empty() || access_secret.is_empty() {
            return Err(Error::config("DNSPod credentials cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::gateway(format!("failed to build HTTP client: {e}")))?;

        let base_url: String = base_url.into();

        Ok(Self {
            login_token: format!("{access_key},{access_secret}"),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// One authenticated form-encoded POST to `{base}/{action}`.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        mut form: Vec<(&'static str, String)>,
    ) -> Result<T> {
        form.push(("login_token", self.login_token.clone()));
        form.push(("format", "json".to_string()));

        let url = format!("{}/{}", self.base_url, action);
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::gateway(format!("{action} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::gateway(format!(
                "{action} failed with HTTP status {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::gateway(format!("{action} returned malformed JSON: {e}")))
    }
}

/// Reject provider-level failures reported inside a 200 response.
fn ensure_success(action: &str, status: &ApiStatus) -> Result<()> {
    if status.code != "1" {
        return Err(Error::gateway(format!(
            "{action} rejected by provider (code {}): {}",
            status.code, status.message
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordGateway for DnspodGateway {
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let response: ListResponse = self
            .call("Record.List", vec![("domain", domain.to_string())])
            .await?;
        ensure_success("Record.List", &response.status)?;

        // Provider order is preserved; the reconciler relies on it for its
        // first-match duplicate policy.
        Ok(response
            .records
            .into_iter()
            .map(|r| DnsRecord {
                id: r.id,
                host_prefix: r.name,
                record_type: r.record_type,
                value: r.value,
            })
            .collect())
    }

    async fn create_record(
        &self,
        domain: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        tracing::debug!(domain, host_prefix, record_type, value, "creating record");

        let response: StatusResponse = self
            .call(
                "Record.Create",
                vec![
                    ("domain", domain.to_string()),
                    ("sub_domain", host_prefix.to_string()),
                    ("record_type", record_type.to_string()),
                    ("record_line_id", DEFAULT_RECORD_LINE_ID.to_string()),
                    ("value", value.to_string()),
                ],
            )
            .await?;
        ensure_success("Record.Create", &response.status)
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        tracing::debug!(domain, record_id, host_prefix, record_type, value, "updating record");

        let response: StatusResponse = self
            .call(
                "Record.Modify",
                vec![
                    ("domain", domain.to_string()),
                    ("record_id", record_id.to_string()),
                    ("sub_domain", host_prefix.to_string()),
                    ("record_type", record_type.to_string()),
                    ("record_line_id", DEFAULT_RECORD_LINE_ID.to_string()),
                    ("value", value.to_string()),
                ],
            )
            .await?;
        ensure_success("Record.Modify", &response.status)
    }
}
