use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::{format_countdown, SaveRecord};
use tracing::info;

use crate::clock::{after, until};
use crate::services::wallet_service::EconomyStore;

/// Grants `amount` coins once per `interval` of wall-clock time.
pub struct AutoRefill {
    amount: u64,
    interval: Duration,
}

impl AutoRefill {
    pub fn new(amount: u64, interval: Duration) -> Self {
        Self { amount, interval }
    }

    /// At most one grant per poll, however many intervals have passed. The
    /// next refill is scheduled from `now`, not from the missed deadline.
    pub fn poll(&self, store: &mut EconomyStore, now: DateTime<Utc>) -> Option<u64> {
        if now < store.record().next_refill_at {
            return None;
        }

        let next = after(now, self.interval);
        store.grant_with(self.amount, |record| record.next_refill_at = next);
        info!("Auto-refill granted {} coins, next at {}", self.amount, next);
        Some(self.amount)
    }

    pub fn remaining(&self, record: &SaveRecord, now: DateTime<Utc>) -> Duration {
        until(now, record.next_refill_at)
    }

    pub fn countdown(&self, record: &SaveRecord, now: DateTime<Utc>) -> String {
        format_countdown(self.remaining(record, now))
    }
}
