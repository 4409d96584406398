//! Core traits for the DDNS reconciler
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`PublicIpResolver`]: Determine the machine's current public IP
//! - [`RecordGateway`]: List, create and update DNS records via a provider API

pub mod ip_resolver;
pub mod record_gateway;

pub use ip_resolver::PublicIpResolver;
pub use record_gateway::{DnsRecord, RecordGateway};
