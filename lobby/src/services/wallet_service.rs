use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::SaveRecord;
use tracing::{error, info, warn};

use crate::clock::after;
use crate::error::PersistenceError;
use crate::persistence::SaveFile;

/// The single in-memory owner of the economy state. Every mutation is written
/// straight back to the save file.
pub struct EconomyStore {
    record: SaveRecord,
    save_file: SaveFile,
    starting_coins: u64,
    refill_interval: Duration,
}

impl EconomyStore {
    /// Loads the save, falling back to (and persisting) the first-run record
    /// when the file is missing or unreadable.
    pub fn load(
        save_file: SaveFile,
        starting_coins: u64,
        refill_interval: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let loaded = save_file.load();
        let mut store = Self {
            record: SaveRecord::new_default(starting_coins, after(now, refill_interval)),
            save_file,
            starting_coins,
            refill_interval,
        };

        match loaded {
            Ok(record) => {
                info!(
                    "Loaded economy from {}: {} coins, day {}",
                    store.save_file.path().display(),
                    record.total_coins,
                    record.day_index
                );
                store.record = record;
            }
            Err(e) => {
                if e.is_missing() {
                    info!("No save at {}, starting with {} coins", store.save_file.path().display(), starting_coins);
                } else {
                    warn!("Discarding unreadable save {}: {}", store.save_file.path().display(), e);
                }
                store.persist();
            }
        }
        store
    }

    pub fn record(&self) -> &SaveRecord {
        &self.record
    }

    pub fn balance(&self) -> u64 {
        self.record.total_coins
    }

    /// Deducts `amount` only if the balance covers it.
    pub fn spend(&mut self, amount: u64) -> bool {
        if self.record.total_coins < amount {
            return false;
        }
        self.record.total_coins -= amount;
        self.persist();
        true
    }

    pub fn grant(&mut self, amount: u64) {
        self.record.total_coins = self.record.total_coins.saturating_add(amount);
        self.persist();
    }

    /// Grants `amount` and applies further record changes in a single write.
    pub(crate) fn grant_with(&mut self, amount: u64, update: impl FnOnce(&mut SaveRecord)) {
        self.record.total_coins = self.record.total_coins.saturating_add(amount);
        update(&mut self.record);
        self.persist();
    }

    /// Back to the first-run record.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.record = SaveRecord::new_default(self.starting_coins, after(now, self.refill_interval));
        info!("Economy reset to {} coins", self.starting_coins);
        self.persist();
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        self.save_file.save(&self.record)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to write save {}: {}", self.save_file.path().display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const HOUR: Duration = Duration::from_secs(3600);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn scratch_file() -> SaveFile {
        let dir = std::env::temp_dir().join(format!("lobby-wallet-{}", uuid::Uuid::new_v4()));
        SaveFile::new(dir.join("economy.json"))
    }

    #[test]
    fn test_first_run_defaults_are_persisted() {
        let file = scratch_file();
        let store = EconomyStore::load(file.clone(), 500, HOUR, now());
        assert_eq!(store.balance(), 500);
        assert_eq!(store.record().day_index, 0);
        assert_eq!(store.record().last_claim_date, None);
        assert_eq!(store.record().next_refill_at, now() + chrono::Duration::hours(1));
        assert_eq!(&file.load().unwrap(), store.record());
    }

    #[test]
    fn test_spend_and_grant() {
        let file = scratch_file();
        let mut store = EconomyStore::load(file.clone(), 500, HOUR, now());
        assert!(store.spend(100));
        assert!(!store.spend(401));
        assert_eq!(store.balance(), 400);
        store.grant(25);
        assert_eq!(store.balance(), 425);
        assert_eq!(file.load().unwrap().total_coins, 425);
    }

    #[test]
    fn test_spend_exact_balance() {
        let mut store = EconomyStore::load(scratch_file(), 500, HOUR, now());
        assert!(store.spend(500));
        assert_eq!(store.balance(), 0);
        assert!(!store.spend(1));
        assert!(store.spend(0));
    }

    #[test]
    fn test_grant_saturates() {
        let mut store = EconomyStore::load(scratch_file(), u64::MAX - 1, HOUR, now());
        store.grant(10);
        assert_eq!(store.balance(), u64::MAX);
    }

    #[test]
    fn test_existing_save_is_kept() {
        let file = scratch_file();
        let mut first = EconomyStore::load(file.clone(), 500, HOUR, now());
        first.spend(300);

        let later = now() + chrono::Duration::days(3);
        let second = EconomyStore::load(file, 500, HOUR, later);
        assert_eq!(second.balance(), 200);
        assert_eq!(second.record().next_refill_at, now() + chrono::Duration::hours(1));
    }

    #[test]
    fn test_reset() {
        let file = scratch_file();
        let mut store = EconomyStore::load(file.clone(), 500, HOUR, now());
        store.grant_with(50, |record| record.day_index = 4);
        let later = now() + chrono::Duration::minutes(5);
        store.reset(later);
        assert_eq!(store.record(), &SaveRecord::new_default(500, later + chrono::Duration::hours(1)));
        assert_eq!(&file.load().unwrap(), store.record());
    }
}
