//! Read-only views of previously seen service responses.
//!
//! The response decoder and cache live outside this crate; the planner
//! only needs per-record presence and TTL/renewal state, captured here as
//! plain snapshots. Times are monotonic milliseconds from the injected
//! [`Clock`](shared::Clock).

use std::time::Duration;

/// Share of the original TTL that must remain for a record to still count
/// as fresh. Renewal is due from half the TTL onward; RFC 6762 §5.2
/// schedules refresh queries at 80% of the TTL and later.
pub const DEFAULT_RENEWAL_PERCENT: u64 = 50;

/// Receipt time and TTL of a cached record, in monotonic milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordExpiry {
    received_at: u64,
    ttl: u64,
    renewal_percent: u64,
}

impl RecordExpiry {
    pub fn new(received_at: u64, ttl: Duration) -> Self {
        Self {
            received_at,
            ttl: ttl.as_millis() as u64,
            renewal_percent: DEFAULT_RENEWAL_PERCENT,
        }
    }

    /// Override the renewal threshold, clamped to 0..=100.
    pub fn with_renewal_percent(mut self, percent: u64) -> Self {
        self.renewal_percent = percent.min(100);
        self
    }

    /// Remaining TTL at `now`, saturating at zero.
    pub fn remaining_ttl(&self, now: u64) -> u64 {
        (self.received_at + self.ttl).saturating_sub(now)
    }

    /// True when the remaining TTL has fallen to or below the renewal
    /// threshold.
    pub fn needs_renewal(&self, now: u64) -> bool {
        self.remaining_ttl(now) * 100 <= self.ttl * self.renewal_percent
    }
}

/// SRV record state: expiry plus the advertised target host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    expiry: RecordExpiry,
    host: Vec<String>,
}

impl SrvRecord {
    pub fn new(expiry: RecordExpiry, host: Vec<String>) -> Self {
        Self { expiry, host }
    }

    pub fn expiry(&self) -> &RecordExpiry {
        &self.expiry
    }

    /// Target host of the service, as labels.
    pub fn host(&self) -> &[String] {
        &self.host
    }
}

/// Read-only snapshot of a previously seen service response.
///
/// Borrowed immutably for the duration of a query build; planning never
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedResponse {
    service_name: Option<Vec<String>>,
    txt: Option<RecordExpiry>,
    srv: Option<SrvRecord>,
    has_inet4_address: bool,
    has_inet6_address: bool,
}

impl CachedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service instance name, as labels.
    pub fn with_service_name(mut self, labels: Vec<String>) -> Self {
        self.service_name = Some(labels);
        self
    }

    pub fn with_txt_record(mut self, expiry: RecordExpiry) -> Self {
        self.txt = Some(expiry);
        self
    }

    pub fn with_srv_record(mut self, srv: SrvRecord) -> Self {
        self.srv = Some(srv);
        self
    }

    pub fn with_inet4_address(mut self, present: bool) -> Self {
        self.has_inet4_address = present;
        self
    }

    pub fn with_inet6_address(mut self, present: bool) -> Self {
        self.has_inet6_address = present;
        self
    }

    pub fn service_name(&self) -> Option<&[String]> {
        self.service_name.as_deref()
    }

    pub fn has_txt_record(&self) -> bool {
        self.txt.is_some()
    }

    pub fn txt_record(&self) -> Option<&RecordExpiry> {
        self.txt.as_ref()
    }

    pub fn has_srv_record(&self) -> bool {
        self.srv.is_some()
    }

    pub fn srv_record(&self) -> Option<&SrvRecord> {
        self.srv.as_ref()
    }

    pub fn has_inet4_address_record(&self) -> bool {
        self.has_inet4_address
    }

    pub fn has_inet6_address_record(&self) -> bool {
        self.has_inet6_address
    }
}
