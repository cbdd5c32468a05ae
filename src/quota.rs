//! Daily problem-generation quota.
//!
//! Counts are kept per user identity and per calendar day. There is no
//! background reset: a record whose day differs from today is treated as
//! zero the next time it is touched. Reads drop such a record, increments
//! overwrite it in place. Reads never create records.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use dashmap::DashMap;

pub const DEFAULT_DAILY_LIMIT: u32 = 100;

// Quota entry - count for one identity on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRecord {
    pub count: u32,
    pub day: NaiveDate,
}

impl QuotaRecord {
    pub fn fresh(day: NaiveDate) -> Self {
        Self { count: 0, day }
    }

    fn is_stale(&self, today: NaiveDate) -> bool {
        self.day != today
    }
}

/// Outcome of an attempt to spend one unit of quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { count: u32 },
    QuotaExceeded { count: u32, limit: u32 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed { .. })
    }
}

/// Source of "today". Swappable so day rollover can be simulated.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

// System local date
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a date until it is moved with [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock {
    day: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: Mutex::new(day),
        }
    }

    pub fn set(&self, day: NaiveDate) {
        *self.day.lock().unwrap_or_else(|e| e.into_inner()) = day;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.day.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Backing storage for quota records.
///
/// A missing record and a record from an earlier day both mean zero.
///
/// Implementations must make `try_increment` atomic per user id: the
/// compare against `limit` and the write of `count + 1` happen under one
/// lock (or one server-side primitive for external stores).
pub trait QuotaStore: Send + Sync {
    fn get_count(&self, user_id: &str, today: NaiveDate) -> u32;

    fn try_increment(&self, user_id: &str, today: NaiveDate, limit: u32) -> QuotaDecision;

    /// Number of identities with a record, stale ones included.
    fn tracked_identities(&self) -> usize;
}

/// Process-local store. Lost on restart, not shared between instances.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    records: DashMap<String, QuotaRecord>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, user_id: &str) -> Option<QuotaRecord> {
        self.records.get(user_id).map(|r| *r)
    }
}

impl QuotaStore for InMemoryQuotaStore {
    fn get_count(&self, user_id: &str, today: NaiveDate) -> u32 {
        // reads never insert; a stale record is dropped instead of reset
        if self
            .records
            .remove_if(user_id, |_, record| record.is_stale(today))
            .is_some()
        {
            return 0;
        }
        self.records.get(user_id).map_or(0, |record| record.count)
    }

    fn try_increment(&self, user_id: &str, today: NaiveDate, limit: u32) -> QuotaDecision {
        // entry() holds the shard write lock until the guard drops
        let mut entry = self
            .records
            .entry(user_id.to_string())
            .or_insert_with(|| QuotaRecord::fresh(today));

        if entry.is_stale(today) {
            *entry = QuotaRecord::fresh(today);
        }

        if entry.count >= limit {
            return QuotaDecision::QuotaExceeded {
                count: entry.count,
                limit,
            };
        }

        entry.count += 1;
        QuotaDecision::Allowed { count: entry.count }
    }

    fn tracked_identities(&self) -> usize {
        self.records.len()
    }
}

/// Gates problem generation per identity per calendar day.
#[derive(Clone)]
pub struct DailyQuotaTracker {
    store: Arc<dyn QuotaStore>,
    clock: Arc<dyn Clock>,
    daily_limit: u32,
}

impl DailyQuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>, clock: Arc<dyn Clock>, daily_limit: u32) -> Self {
        Self {
            store,
            clock,
            daily_limit,
        }
    }

    /// In-memory store on the system local date.
    pub fn in_memory(daily_limit: u32) -> Self {
        Self::new(
            Arc::new(InMemoryQuotaStore::new()),
            Arc::new(LocalClock),
            daily_limit,
        )
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Today's count for `user_id`. Never spends quota or adds a record.
    pub fn get_count(&self, user_id: &str) -> u32 {
        self.store.get_count(user_id, self.clock.today())
    }

    /// Spend one unit of today's quota if any is left.
    pub fn try_increment(&self, user_id: &str) -> QuotaDecision {
        let decision = self
            .store
            .try_increment(user_id, self.clock.today(), self.daily_limit);

        match decision {
            QuotaDecision::Allowed { count } => {
                tracing::debug!(user_id, count, limit = self.daily_limit, "quota spent");
            }
            QuotaDecision::QuotaExceeded { count, limit } => {
                tracing::info!(user_id, count, limit, "daily quota exhausted");
            }
        }
        decision
    }

    pub fn remaining(&self, user_id: &str) -> u32 {
        self.daily_limit.saturating_sub(self.get_count(user_id))
    }

    pub fn tracked_identities(&self) -> usize {
        self.store.tracked_identities()
    }
}
