use tracing::info;

use crate::services::wallet_service::EconomyStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    InsufficientFunds { balance: u64, fee: u64 },
    /// A paid entry is still waiting for the gameplay scene to load.
    AlreadyInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDecision {
    Granted { scene: String, balance: u64 },
    Denied(DenyReason),
}

/// Charges the entry fee and hands out the gameplay scene, one entry at a time.
pub struct EntryGate {
    scene: String,
    in_flight: bool,
}

impl EntryGate {
    pub fn new(scene: impl Into<String>) -> Self {
        Self { scene: scene.into(), in_flight: false }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn request_entry(&mut self, store: &mut EconomyStore, fee: u64) -> EntryDecision {
        if self.in_flight {
            return EntryDecision::Denied(DenyReason::AlreadyInFlight);
        }
        if !store.spend(fee) {
            return EntryDecision::Denied(DenyReason::InsufficientFunds { balance: store.balance(), fee });
        }

        self.in_flight = true;
        info!("Entry fee of {} paid, loading {}", fee, self.scene);
        EntryDecision::Granted { scene: self.scene.clone(), balance: store.balance() }
    }

    /// Called once the host has switched scenes.
    pub fn complete_transition(&mut self) {
        self.in_flight = false;
    }
}
