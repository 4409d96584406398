//! Configuration types for the DDNS reconciler
//!
//! The configuration is a JSON document (camelCase keys) loaded once at
//! startup and consumed read-only by the core. When no file exists, the
//! daemon writes a template produced by [`DdnsConfig::template()`] and exits
//! so the operator can fill in credentials.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default "what is my IP" endpoint (JSON object with an `ip` field)
pub const DEFAULT_IP_LOOKUP_ENDPOINT: &str = "https://api.ipify.org/?format=json";

/// Default seconds between reconciliation cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

fn default_host_prefix() -> String {
    "*".to_string()
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_ip_lookup_endpoint() -> String {
    DEFAULT_IP_LOOKUP_ENDPOINT.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Main configuration, one managed record per process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdnsConfig {
    /// Provider credential, first half of the API token pair. Opaque to the
    /// core; passed to gateway construction only.
    pub access_key: String,

    /// Provider credential, second half of the API token pair
    pub access_secret: String,

    /// Base domain whose record set is managed (e.g. "example.com")
    pub domain_name: String,

    /// Host label of the managed record (e.g. "*", "www", "@")
    #[serde(default = "default_host_prefix")]
    pub host_prefix: String,

    /// Record type of the managed record
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// HTTP endpoint returning a JSON object with the caller's public IP
    #[serde(default = "default_ip_lookup_endpoint")]
    pub ip_lookup_endpoint: String,

    /// Seconds between reconciliation cycles. Zero is tolerated here and
    /// substituted with a safe default by the scheduler.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Log file path; logs go to stderr when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_name: Option<String>,
}

impl DdnsConfig {
    /// Build the default template written when no config file exists.
    ///
    /// Fresh value per call; there is no process-wide default instance.
    pub fn template() -> Self {
        Self {
            access_key: "your_access_key".to_string(),
            access_secret: "your_access_secret".to_string(),
            domain_name: "your_domain_name".to_string(),
            host_prefix: default_host_prefix(),
            record_type: default_record_type(),
            ip_lookup_endpoint: default_ip_lookup_endpoint(),
            poll_interval_secs: default_poll_interval_secs(),
            log_file_name: Some("dyndns.log".to_string()),
        }
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate startup-fatal conditions.
    ///
    /// Checks presence of credentials and domain, and rejects obvious
    /// placeholder values left over from the template. A zero poll interval
    /// is NOT an error; the scheduler substitutes a default.
    pub fn validate(&self) -> Result<()> {
        if self.access_key.is_empty() || self.access_secret.is_empty() {
            return Err(Error::config("provider credentials are required"));
        }

        let key_lower = self.access_key.to_lowercase();
        if key_lower.contains("your_access") || key_lower.contains("replace_me") {
            return Err(Error::config(
                "accessKey looks like a template placeholder, edit the config file first",
            ));
        }

        if self.domain_name.is_empty() || self.domain_name == "your_domain_name" {
            return Err(Error::config("domainName is required"));
        }

        if self.record_type.is_empty() {
            return Err(Error::config("recordType cannot be empty"));
        }

        if self.host_prefix.is_empty() {
            return Err(Error::config("hostPrefix cannot be empty"));
        }

        if self.ip_lookup_endpoint.is_empty() {
            return Err(Error::config("ipLookupEndpoint cannot be empty"));
        }

        Ok(())
    }

    /// The configured polling interval as a [`Duration`](std::time::Duration).
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }
}
