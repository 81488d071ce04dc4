use shared::constants::{
    ENTRY_PENDING_MESSAGE, INSUFFICIENT_FUNDS_MESSAGE, NOTHING_TO_CLAIM_MESSAGE, NO_ENTRY_PROMPT_MESSAGE,
};
use shared::run::{RunOutcome, RunSummary};
use tracing::info;

use crate::clock::Clock;
use crate::config::LobbyConfig;
use crate::persistence::SaveFile;
use crate::services::{
    AutoRefill, ClaimOutcome, DailyRewardStatus, DailyRewards, DenyReason, EconomyStore, EntryDecision, EntryGate,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTransition {
    Gameplay(String),
    Lobby(String),
}

/// What the presentation layer should show after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyView {
    pub balance: u64,
    pub message: String,
    pub transition: Option<SceneTransition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyStatus {
    pub balance: u64,
    pub entry_fee: u64,
    pub daily_reward: DailyRewardStatus,
    pub refill_countdown: String,
    pub confirm_open: bool,
}

/// Lobby screen actions, each mapped onto one economy operation.
///
/// Built once by the composition root; the UI holds it and calls the `on_*`
/// handlers from its button callbacks and [`Lobby::tick`] from its frame loop.
pub struct Lobby {
    store: EconomyStore,
    rewards: DailyRewards,
    refill: AutoRefill,
    gate: EntryGate,
    clock: Box<dyn Clock>,
    entry_fee: u64,
    promo_coins: u64,
    lobby_scene: String,
    confirm_open: bool,
}

impl Lobby {
    pub fn new(config: &LobbyConfig, clock: Box<dyn Clock>) -> Self {
        let store = EconomyStore::load(
            SaveFile::new(&config.save_path),
            config.starting_coins,
            config.refill_interval,
            clock.now(),
        );

        Self {
            store,
            rewards: DailyRewards::new(config.daily_ladder.clone(), config.ladder_policy),
            refill: AutoRefill::new(config.refill_amount, config.refill_interval),
            gate: EntryGate::new(config.game_scene.clone()),
            clock,
            entry_fee: config.entry_fee,
            promo_coins: config.promo_coins,
            lobby_scene: config.lobby_scene.clone(),
            confirm_open: false,
        }
    }

    pub fn store(&self) -> &EconomyStore {
        &self.store
    }

    pub fn balance(&self) -> u64 {
        self.store.balance()
    }

    pub fn status(&self) -> LobbyStatus {
        let now = self.clock.now();
        let record = self.store.record();
        LobbyStatus {
            balance: record.total_coins,
            entry_fee: self.entry_fee,
            daily_reward: self.rewards.status(record, self.clock.today()),
            refill_countdown: self.refill.countdown(record, now),
            confirm_open: self.confirm_open,
        }
    }

    /// Polls the auto-refill. Returns a view only when coins were granted.
    pub fn tick(&mut self) -> Option<LobbyView> {
        let granted = self.refill.poll(&mut self.store, self.clock.now())?;
        Some(self.view(format!("Auto-refill: +{} coins", granted)))
    }

    /// Opens the entry confirmation prompt.
    pub fn on_play_pressed(&mut self) -> LobbyView {
        if self.gate.is_in_flight() {
            return self.view(ENTRY_PENDING_MESSAGE);
        }
        self.confirm_open = true;
        self.view(format!("Entry fee: {} coins. Start the race?", self.entry_fee))
    }

    /// Charges the fee. Does nothing unless the prompt from [`Lobby::on_play_pressed`] is open.
    pub fn on_confirm_entry(&mut self) -> LobbyView {
        if !self.confirm_open {
            return self.view(NO_ENTRY_PROMPT_MESSAGE);
        }
        self.confirm_open = false;
        match self.gate.request_entry(&mut self.store, self.entry_fee) {
            EntryDecision::Granted { scene, balance } => LobbyView {
                balance,
                message: format!("Paid {} coins. Good luck!", self.entry_fee),
                transition: Some(SceneTransition::Gameplay(scene)),
            },
            EntryDecision::Denied(DenyReason::InsufficientFunds { .. }) => self.view(INSUFFICIENT_FUNDS_MESSAGE),
            EntryDecision::Denied(DenyReason::AlreadyInFlight) => self.view(ENTRY_PENDING_MESSAGE),
        }
    }

    pub fn on_cancel_entry(&mut self) -> LobbyView {
        self.confirm_open = false;
        self.view("Entry cancelled.")
    }

    /// The host reports that the gameplay scene is up.
    pub fn on_gameplay_started(&mut self) {
        self.gate.complete_transition();
    }

    pub fn on_claim_daily_reward(&mut self) -> LobbyView {
        match self.rewards.claim(&mut self.store, self.clock.today()) {
            ClaimOutcome::Claimed { reward, day_index, .. } => {
                self.view(format!("Day {} reward: +{} coins!", day_index + 1, reward))
            }
            ClaimOutcome::NothingToClaim => self.view(NOTHING_TO_CLAIM_MESSAGE),
        }
    }

    pub fn on_add_promo_coins(&mut self) -> LobbyView {
        self.store.grant(self.promo_coins);
        self.view(format!("Promo: +{} coins", self.promo_coins))
    }

    pub fn on_reset_coins(&mut self) -> LobbyView {
        self.store.reset(self.clock.now());
        self.view("All coins reset.")
    }

    /// Credits coins picked up during the run and sends the player back to the lobby.
    pub fn on_run_finished(&mut self, summary: &RunSummary) -> LobbyView {
        self.gate.complete_transition();
        if summary.coins > 0 {
            self.store.grant(summary.coins);
        }

        let headline = match summary.outcome {
            RunOutcome::Won => "You win!",
            RunOutcome::GameOver => "Game over.",
            RunOutcome::Abandoned => "Run abandoned.",
        };
        info!("Run finished ({:?}): score {}, {} coins", summary.outcome, summary.score, summary.coins);

        LobbyView {
            balance: self.store.balance(),
            message: format!("{} Score {}, +{} coins", headline, summary.score, summary.coins),
            transition: Some(SceneTransition::Lobby(self.lobby_scene.clone())),
        }
    }

    fn view(&self, message: impl Into<String>) -> LobbyView {
        LobbyView {
            balance: self.store.balance(),
            message: message.into(),
            transition: None,
        }
    }
}
