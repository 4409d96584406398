//! Test doubles and common utilities for contract tests
//!
//! These doubles record every call so tests can assert exactly which remote
//! operations a cycle performed.

use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{DnsRecord, PublicIpResolver, RecordGateway};

/// Arguments of one `update_record` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub domain: String,
    pub record_id: String,
    pub host_prefix: String,
    pub record_type: String,
    pub value: String,
}

/// Arguments of one `create_record` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub domain: String,
    pub host_prefix: String,
    pub record_type: String,
    pub value: String,
}

/// A gateway double that serves a fixed record set and records every call.
///
/// Clones share state, so a test can keep a handle while boxing another
/// clone into the engine.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    fail_list: Arc<AtomicBool>,
    fail_update: Arc<AtomicBool>,
    fail_create: Arc<AtomicBool>,
    list_calls: Arc<AtomicUsize>,
    update_calls: Arc<Mutex<Vec<UpdateCall>>>,
    create_calls: Arc<Mutex<Vec<CreateCall>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let gateway = Self::default();
        *gateway.records.lock().unwrap() = records;
        gateway
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Total number of mutating calls (updates + creates)
    pub fn mutating_call_count(&self) -> usize {
        self.update_calls.lock().unwrap().len() + self.create_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RecordGateway for RecordingGateway {
    async fn list_records(&self, _domain: &str) -> Result<Vec<DnsRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::gateway("injected list failure"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_record(
        &self,
        domain: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        self.create_calls.lock().unwrap().push(CreateCall {
            domain: domain.to_string(),
            host_prefix: host_prefix.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
        });
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::gateway("injected create failure"));
        }
        Ok(())
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        host_prefix: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        self.update_calls.lock().unwrap().push(UpdateCall {
            domain: domain.to_string(),
            record_id: record_id.to_string(),
            host_prefix: host_prefix.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
        });
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Error::gateway("injected update failure"));
        }
        Ok(())
    }
}

/// A resolver double driven by a script of per-cycle results.
///
/// Each `resolve()` call consumes the next scripted entry; once the script
/// is exhausted the fallback address is returned.
#[derive(Clone)]
pub struct ScriptedResolver {
    script: Arc<Mutex<VecDeque<std::result::Result<IpAddr, String>>>>,
    calls: Arc<AtomicUsize>,
    fallback: IpAddr,
}

impl ScriptedResolver {
    pub fn new(fallback: IpAddr) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            fallback,
        }
    }

    pub fn push_ok(&self, ip: IpAddr) {
        self.script.lock().unwrap().push_back(Ok(ip));
    }

    pub fn push_err(&self, msg: &str) {
        self.script.lock().unwrap().push_back(Err(msg.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PublicIpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(ip)) => Ok(ip),
            Some(Err(msg)) => Err(Error::ip_resolver(msg)),
            None => Ok(self.fallback),
        }
    }
}

/// Shorthand for building a record in tests
pub fn record(id: &str, host_prefix: &str, record_type: &str, value: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        host_prefix: host_prefix.to_string(),
        record_type: record_type.to_string(),
        value: value.to_string(),
    }
}

/// Parse shorthand for test addresses
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid test IP")
}
