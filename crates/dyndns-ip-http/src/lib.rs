// # HTTP Public-IP Resolver
//
// This crate resolves the machine's public IP by asking an external
// "what is my IP" HTTP endpoint.
//
// ## Endpoint Contract
//
// The endpoint must return a JSON object with a string field holding the
// caller's address, e.g. `https://api.ipify.org/?format=json`:
//
// ```json
// { "ip": "203.0.113.7" }
// ```
//
// Any endpoint returning this shape works; the field name is configurable.
//
// ## Responsibility Boundary
//
// One request per `resolve()` call, no caching, no internal retry; a failed
// resolution is surfaced to the scheduler, which skips the cycle and retries
// on the next tick.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use dyndns_core::error::{Error, Result};
use dyndns_core::traits::PublicIpResolver;

/// JSON field the default endpoint carries the address in
pub const DEFAULT_IP_FIELD: &str = "ip";

/// Bound on a single lookup request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP resolver
pub struct HttpIpResolver {
    /// Endpoint to query
    endpoint: String,

    /// JSON field holding the IP string in the response body
    ip_field: String,

    /// HTTP client (bounded timeout)
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver for an endpoint using the default `ip` field.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_field(endpoint, DEFAULT_IP_FIELD)
    }

    /// Create a resolver extracting a custom field from the response body.
    pub fn with_field(endpoint: impl Into<String>, ip_field: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ip_field: ip_field.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PublicIpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::ip_resolver(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::malformed_response(format!("body is not a JSON object: {e}")))?;

        let ip_text = body
            .get(self.ip_field.as_str())
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::malformed_response(format!(
                    "field `{}` missing or not a string",
                    self.ip_field
                ))
            })?;

        let ip: IpAddr = ip_text.trim().parse().map_err(|_| {
            Error::malformed_response(format!("`{ip_text}` is not an IP address"))
        })?;

        tracing::debug!(%ip, endpoint = %self.endpoint, "public IP resolved");
        Ok(ip)
    }
}
