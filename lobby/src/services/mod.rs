pub mod daily_reward_service;
pub mod entry_service;
pub mod refill_service;
pub mod wallet_service;

pub use daily_reward_service::{ClaimOutcome, DailyRewardStatus, DailyRewards, LadderPolicy};
pub use entry_service::{DenyReason, EntryDecision, EntryGate};
pub use refill_service::AutoRefill;
pub use wallet_service::EconomyStore;
