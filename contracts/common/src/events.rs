//! Contract Events for the Free Mana Sharer
//!
//! Events are emitted after a successful mutation and can be indexed
//! off-chain. Each event names the accounts it impacts so indexers can
//! route it without decoding the payload. Events never influence a
//! decision of the contract.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::Address;

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Config Events (0x01 - 0x1F)
    OwnerSet = 0x01,
    RcLimitSet = 0x02,
    RecommendedManaOffsetSet = 0x03,

    // Ledger Events (0x20 - 0x3F)
    Deposit = 0x20,
    PrepareWithdraw = 0x21,
    Withdraw = 0x22,
}

impl EventType {
    /// Event name as published to indexers
    pub fn name(&self) -> &'static str {
        match self {
            Self::OwnerSet => "set_owner",
            Self::RcLimitSet => "set_rc_limit",
            Self::RecommendedManaOffsetSet => "set_recommended_mana_offset",
            Self::Deposit => "deposit",
            Self::PrepareWithdraw => "prepare_withdraw",
            Self::Withdraw => "withdraw",
        }
    }
}

/// Main event enum containing all contract events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ManaSharerEvent {
    // ============ Config Events ============

    /// Emitted when the owner is set or changed
    OwnerSet {
        previous: Option<Address>,
        owner: Address,
    },

    /// Emitted when the max rc limit changes
    RcLimitSet { value: u64 },

    /// Emitted when the recommended mana offset changes
    RecommendedManaOffsetSet { value: u64 },

    // ============ Ledger Events ============

    /// Emitted when KOIN is deposited into the pool
    Deposit {
        to: Address,
        amount: u64,
        new_balance: u64,
    },

    /// Emitted when an account changes its pending withdrawal
    PrepareWithdraw {
        to: Address,
        amount: u64,
        koin_reserved: u64,
    },

    /// Emitted when KOIN is withdrawn from the pool
    Withdraw {
        to: Address,
        amount: u64,
        new_balance: u64,
        settled: u64,
    },
}

impl ManaSharerEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::OwnerSet { .. } => EventType::OwnerSet,
            Self::RcLimitSet { .. } => EventType::RcLimitSet,
            Self::RecommendedManaOffsetSet { .. } => EventType::RecommendedManaOffsetSet,
            Self::Deposit { .. } => EventType::Deposit,
            Self::PrepareWithdraw { .. } => EventType::PrepareWithdraw,
            Self::Withdraw { .. } => EventType::Withdraw,
        }
    }

    /// Accounts impacted by the event
    pub fn impacted(&self) -> Vec<Address> {
        match self {
            Self::OwnerSet { owner, .. } => {
                let mut impacted = Vec::new();
                impacted.push(*owner);
                impacted
            }
            Self::RcLimitSet { .. } | Self::RecommendedManaOffsetSet { .. } => Vec::new(),
            Self::Deposit { to, .. }
            | Self::PrepareWithdraw { to, .. }
            | Self::Withdraw { to, .. } => {
                let mut impacted = Vec::new();
                impacted.push(*to);
                impacted
            }
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<ManaSharerEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: ManaSharerEvent) {
        self.events.push(event);
    }

    /// Append every event of another log, in order
    pub fn extend(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    /// Get all events
    pub fn events(&self) -> &[ManaSharerEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<ManaSharerEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&ManaSharerEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events that impact the given account
    pub fn for_account(&self, account: &Address) -> Vec<&ManaSharerEvent> {
        self.events
            .iter()
            .filter(|e| e.impacted().contains(account))
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events were emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
