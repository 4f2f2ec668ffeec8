//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides minimal in-memory collaborators that record how the
//! reconciler drives them.

#![allow(dead_code)]

use dyndns_core::error::{ApiError, Error, Result};
use dyndns_core::record::{DnsRecord, RecordType};
use dyndns_core::traits::{DnsProvider, IpResolver};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Zone used by every contract test
pub const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";

/// How an update for a given record name should fail
#[derive(Debug, Clone)]
pub enum UpdateFailure {
    Rejected(Vec<ApiError>),
    Transport(String),
}

/// An in-memory DnsProvider that tracks calls
///
/// Clones share state, so a test can keep one handle while the reconciler
/// owns another. Successful updates are applied to the stored records.
#[derive(Clone)]
pub struct MockDnsProvider {
    /// Records returned by list_records()
    records: Arc<Mutex<Vec<DnsRecord>>>,
    /// When set, list_records() fails with these provider errors
    list_rejection: Arc<Mutex<Option<Vec<ApiError>>>>,
    /// Per-name update failures
    update_failures: Arc<Mutex<HashMap<String, UpdateFailure>>>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// Zone ids passed to any call
    zone_ids: Arc<Mutex<Vec<String>>>,
    /// Records sent to update_record(), in call order
    updates: Arc<Mutex<Vec<DnsRecord>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            list_rejection: Arc::new(Mutex::new(None)),
            update_failures: Arc::new(Mutex::new(HashMap::new())),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            zone_ids: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make list_records() answer with `success=false`
    pub fn reject_list(&self, errors: Vec<ApiError>) {
        *self.list_rejection.lock().unwrap() = Some(errors);
    }

    /// Make updates of `name` fail
    pub fn fail_update(&self, name: &str, failure: UpdateFailure) {
        self.update_failures
            .lock()
            .unwrap()
            .insert(name.to_string(), failure);
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get the records sent to update_record()
    pub fn updates(&self) -> Vec<DnsRecord> {
        self.updates.lock().unwrap().clone()
    }

    /// Get the zone ids the provider was called with
    pub fn zone_ids(&self) -> Vec<String> {
        self.zone_ids.lock().unwrap().clone()
    }

    /// Current stored state of a record
    pub fn stored(&self, id: &str) -> Option<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.zone_ids.lock().unwrap().push(zone_id.to_string());

        if let Some(errors) = self.list_rejection.lock().unwrap().clone() {
            return Err(Error::api(errors));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.zone_ids.lock().unwrap().push(zone_id.to_string());
        self.updates.lock().unwrap().push(record.clone());

        match self.update_failures.lock().unwrap().get(&record.name).cloned() {
            Some(UpdateFailure::Rejected(errors)) => return Err(Error::api(errors)),
            Some(UpdateFailure::Transport(message)) => return Err(Error::transport(message)),
            None => {}
        }

        let mut records = self.records.lock().unwrap();
        if let Some(stored) = records.iter_mut().find(|stored| stored.id == record.id) {
            *stored = record.clone();
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IpResolver that answers from a fixed script
pub struct ScriptedResolver {
    answer: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn answering(address: &str) -> Self {
        Self {
            answer: Some(address.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or_else(|| Error::IpUnresolved {
            attempts: 5,
            last_error: "connection refused".to_string(),
        })
    }
}

/// Helper to create an A record
pub fn a_record(id: &str, name: &str, address: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: RecordType::A,
        content: address.to_string(),
        proxied: false,
        ttl: 1,
        comment: None,
    }
}

/// Helper to build the desired name list
pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
