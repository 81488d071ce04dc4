use std::str::FromStr;

use chrono::NaiveDate;
use shared::constants::DEFAULT_DAILY_LADDER;
use shared::SaveRecord;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::services::wallet_service::EconomyStore;

/// What happens after the last rung of the ladder is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderPolicy {
    /// Stay on the last reward.
    #[default]
    Cap,
    /// Start over at day 0.
    Wrap,
}

impl FromStr for LadderPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cap" => Ok(Self::Cap),
            "wrap" => Ok(Self::Wrap),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyRewardStatus {
    Claimable { day_index: usize, reward: u64 },
    Claimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed { reward: u64, day_index: usize, next_day_index: usize },
    NothingToClaim,
}

pub struct DailyRewards {
    ladder: Vec<u64>,
    policy: LadderPolicy,
}

impl DailyRewards {
    pub fn new(ladder: Vec<u64>, policy: LadderPolicy) -> Self {
        let ladder = if ladder.is_empty() {
            warn!("Empty daily reward ladder, using the default one");
            DEFAULT_DAILY_LADDER.to_vec()
        } else {
            ladder
        };
        Self { ladder, policy }
    }

    pub fn ladder(&self) -> &[u64] {
        &self.ladder
    }

    pub fn policy(&self) -> LadderPolicy {
        self.policy
    }

    /// Saved index, clamped in case the ladder got shorter since the save was written.
    pub fn current_index(&self, record: &SaveRecord) -> usize {
        record.day_index.min(self.ladder.len() - 1)
    }

    /// A reward is claimable when nothing was claimed on `today` or later.
    pub fn status(&self, record: &SaveRecord, today: NaiveDate) -> DailyRewardStatus {
        match record.last_claim_date {
            Some(last) if last >= today => DailyRewardStatus::Claimed,
            _ => {
                let day_index = self.current_index(record);
                DailyRewardStatus::Claimable { day_index, reward: self.ladder[day_index] }
            }
        }
    }

    pub fn claim(&self, store: &mut EconomyStore, today: NaiveDate) -> ClaimOutcome {
        let DailyRewardStatus::Claimable { day_index, reward } = self.status(store.record(), today) else {
            return ClaimOutcome::NothingToClaim;
        };

        let next_day_index = self.next_index(day_index);
        store.grant_with(reward, |record| {
            record.last_claim_date = Some(today);
            record.day_index = next_day_index;
        });

        info!("Daily reward claimed: day {} for {} coins", day_index + 1, reward);
        ClaimOutcome::Claimed { reward, day_index, next_day_index }
    }

    fn next_index(&self, day_index: usize) -> usize {
        let last = self.ladder.len() - 1;
        match self.policy {
            LadderPolicy::Cap => (day_index + 1).min(last),
            LadderPolicy::Wrap => (day_index + 1) % self.ladder.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SaveFile;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn store() -> EconomyStore {
        let dir = std::env::temp_dir().join(format!("lobby-daily-{}", uuid::Uuid::new_v4()));
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        EconomyStore::load(SaveFile::new(dir.join("economy.json")), 500, Duration::from_secs(3600), now)
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, n).unwrap()
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("cap".parse::<LadderPolicy>(), Ok(LadderPolicy::Cap));
        assert_eq!(" WRAP ".parse::<LadderPolicy>(), Ok(LadderPolicy::Wrap));
        assert!("loop".parse::<LadderPolicy>().is_err());
    }

    #[test]
    fn test_first_claim() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Cap);
        let mut store = store();
        assert_eq!(
            rewards.status(store.record(), day(16)),
            DailyRewardStatus::Claimable { day_index: 0, reward: 10 }
        );
        assert_eq!(
            rewards.claim(&mut store, day(16)),
            ClaimOutcome::Claimed { reward: 10, day_index: 0, next_day_index: 1 }
        );
        assert_eq!(store.balance(), 510);
        assert_eq!(store.record().last_claim_date, Some(day(16)));
    }

    #[test]
    fn test_second_claim_same_day_is_noop() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Cap);
        let mut store = store();
        rewards.claim(&mut store, day(16));
        assert_eq!(rewards.claim(&mut store, day(16)), ClaimOutcome::NothingToClaim);
        assert_eq!(store.balance(), 510);
        assert_eq!(store.record().day_index, 1);
        assert_eq!(rewards.status(store.record(), day(16)), DailyRewardStatus::Claimed);
    }

    #[test]
    fn test_cap_policy_stays_on_last_rung() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Cap);
        let mut store = store();
        let grants: Vec<u64> = (16..22)
            .map(|d| match rewards.claim(&mut store, day(d)) {
                ClaimOutcome::Claimed { reward, .. } => reward,
                ClaimOutcome::NothingToClaim => 0,
            })
            .collect();
        assert_eq!(grants, vec![10, 20, 30, 30, 30, 30]);
        assert_eq!(store.record().day_index, 2);
    }

    #[test]
    fn test_wrap_policy_restarts() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Wrap);
        let mut store = store();
        for d in 16..19 {
            rewards.claim(&mut store, day(d));
        }
        assert_eq!(store.record().day_index, 0);
        assert_eq!(
            rewards.claim(&mut store, day(19)),
            ClaimOutcome::Claimed { reward: 10, day_index: 0, next_day_index: 1 }
        );
    }

    #[test]
    fn test_skipped_days_do_not_reset_ladder() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Cap);
        let mut store = store();
        rewards.claim(&mut store, day(1));
        assert_eq!(
            rewards.status(store.record(), day(20)),
            DailyRewardStatus::Claimable { day_index: 1, reward: 20 }
        );
    }

    #[test]
    fn test_clock_moved_back_is_not_claimable() {
        let rewards = DailyRewards::new(vec![10, 20, 30], LadderPolicy::Cap);
        let mut store = store();
        rewards.claim(&mut store, day(20));
        assert_eq!(rewards.claim(&mut store, day(19)), ClaimOutcome::NothingToClaim);
    }

    #[test]
    fn test_saved_index_past_ladder_is_clamped() {
        let rewards = DailyRewards::new(vec![10, 20], LadderPolicy::Cap);
        let mut store = store();
        store.grant_with(0, |record| record.day_index = 9);
        assert_eq!(
            rewards.status(store.record(), day(16)),
            DailyRewardStatus::Claimable { day_index: 1, reward: 20 }
        );
    }

    #[test]
    fn test_empty_ladder_falls_back() {
        let rewards = DailyRewards::new(Vec::new(), LadderPolicy::Cap);
        assert_eq!(rewards.ladder(), &DEFAULT_DAILY_LADDER);
    }
}
