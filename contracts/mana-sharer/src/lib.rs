//! Free Mana Sharer Contract
//!
//! A shared pool of KOIN whose mana pays for other accounts' transactions.
//!
//! ## Components
//!
//! - [`config`]: owner, max rc limit and recommended mana offset
//! - [`ledger`]: KOIN funded per account (deposit / withdraw)
//! - [`reservation`]: pending withdrawals and the global reserved KOIN
//! - [`gate`]: the authorization decision taken for every transaction
//!   that names the pool as payer
//!
//! ## Call model
//!
//! The host serializes calls. Each mutating call runs against an
//! [`Overlay`] of the committed store; writes and events are committed
//! only when the call succeeds, so a failed call leaves no trace.
//!
//! ```text
//! ManaSharer::call(action)
//!   ├─ Overlay::new(&store)
//!   ├─ execute(ctx, action)      // config / ledger / reservation
//!   ├─ Ok  → store.apply(writes), events committed
//!   └─ Err → overlay dropped
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod gate;
pub mod ledger;
pub mod reservation;

#[cfg(test)]
mod integration_tests;

use manasharer_common::{
    errors::{ManaShareError, ManaShareResult},
    events::EventLog,
    host::{AuthorityProvider, FeeToken, ResourceMeter},
    storage::{KeyValueStore, MemoryStore, Overlay},
    types::{is_zero_address, Address, AddressHex, AuthorizeRequest, ManaSharerAction, PoolStatus},
};

// ============ Mana Sharer Config ============

/// Deployment configuration, injected once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ManaSharerConfig {
    /// Address of the pool account itself (holds the KOIN, owns the mana)
    pub contract_id: Address,
}

impl ManaSharerConfig {
    /// Create a config for the pool living at `contract_id`
    pub fn new(contract_id: Address) -> ManaShareResult<Self> {
        if is_zero_address(&contract_id) {
            return Err(ManaShareError::InvalidAddress {
                reason: "contract id cannot be the zero address",
            });
        }
        Ok(Self { contract_id })
    }
}

// ============ Storage Records ============

/// Record declarations, one per storage space
pub mod records {
    use manasharer_common::{
        constants::{limits, spaces},
        storage::{StorageMap, StorageObj},
        types::Address,
    };

    /// Contract owner, unset until the first `set_owner`
    pub fn owner() -> StorageObj<Option<Address>> {
        StorageObj::new(spaces::OWNER, || None)
    }

    /// Max rc limit admitted by the gate
    pub fn rc_limit() -> StorageObj<u64> {
        StorageObj::new(spaces::RC_LIMIT, || limits::DEFAULT_RC_LIMIT)
    }

    /// Advisory mana offset
    pub fn recommended_mana_offset() -> StorageObj<u64> {
        StorageObj::new(spaces::RECOMMENDED_MANA_OFFSET, || {
            limits::DEFAULT_RECOMMENDED_MANA_OFFSET
        })
    }

    /// Sum of all pending withdrawals
    pub fn koin_reserved() -> StorageObj<u64> {
        StorageObj::new(spaces::KOIN_RESERVED, || 0)
    }

    /// Funded balance per account
    pub fn balances() -> StorageMap<u64> {
        StorageMap::new(spaces::BALANCES, || 0)
    }

    /// Pending withdrawal per account
    pub fn pending_withdraws() -> StorageMap<u64> {
        StorageMap::new(spaces::PENDING_WITHDRAWS, || 0)
    }
}

// ============ Execution Context ============

/// Everything a mutating call can touch
pub struct ManaSharerContext<'a> {
    /// Deployment config
    pub config: &'a ManaSharerConfig,
    /// Store for this call (an overlay when driven by [`ManaSharer`])
    pub store: &'a mut dyn KeyValueStore,
    /// Capability checks of the current caller
    pub authority: &'a dyn AuthorityProvider,
    /// KOIN token
    pub token: &'a mut dyn FeeToken,
    /// Events emitted by this call
    pub events: EventLog,
}

/// Main dispatch entry point for mutating calls
pub fn execute(ctx: &mut ManaSharerContext<'_>, action: &ManaSharerAction) -> ManaShareResult<()> {
    match action {
        ManaSharerAction::SetOwner { account } => config::set_owner(ctx, account),
        ManaSharerAction::SetRcLimit { value } => config::set_rc_limit(ctx, *value),
        ManaSharerAction::SetRecommendedManaOffset { value } => {
            config::set_recommended_mana_offset(ctx, *value)
        }
        ManaSharerAction::Deposit { to, amount } => ledger::deposit(ctx, to, *amount),
        ManaSharerAction::PrepareWithdraw { to, amount } => {
            reservation::prepare_withdraw(ctx, to, *amount)
        }
        ManaSharerAction::Withdraw { to, amount } => ledger::withdraw(ctx, to, *amount),
    }
}

// ============ Host-Facing Contract ============

/// The contract as a host sees it: committed state plus committed events
#[derive(Debug, Clone)]
pub struct ManaSharer<S: KeyValueStore = MemoryStore> {
    config: ManaSharerConfig,
    store: S,
    events: EventLog,
}

impl ManaSharer<MemoryStore> {
    /// Fresh contract backed by an empty in-memory store
    pub fn in_memory(config: ManaSharerConfig) -> Self {
        Self::new(config, MemoryStore::new())
    }
}

impl<S: KeyValueStore> ManaSharer<S> {
    /// Contract over an existing store
    pub fn new(config: ManaSharerConfig, store: S) -> Self {
        Self {
            config,
            store,
            events: EventLog::new(),
        }
    }

    /// Deployment config
    pub fn config(&self) -> &ManaSharerConfig {
        &self.config
    }

    /// Committed store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events of every committed call, oldest first
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand the committed events to an indexer and start a new log
    pub fn drain_events(&mut self) -> EventLog {
        std::mem::take(&mut self.events)
    }

    /// Run one mutating call atomically
    pub fn call(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        action: &ManaSharerAction,
    ) -> ManaShareResult<()> {
        let mut overlay = Overlay::new(&self.store);

        let result = {
            let mut ctx = ManaSharerContext {
                config: &self.config,
                store: &mut overlay,
                authority,
                token,
                events: EventLog::new(),
            };
            execute(&mut ctx, action).map(|()| ctx.events)
        };

        match result {
            Ok(events) => {
                let writes = overlay.into_writes();
                tracing::debug!(
                    action = action.name(),
                    writes = writes.len(),
                    events = events.len(),
                    "call committed"
                );
                self.store.apply(writes);
                self.events.extend(events);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    action = action.name(),
                    code = err.code(),
                    "call rolled back: {err}"
                );
                Err(err)
            }
        }
    }

    // ============ Mutating Entry Points ============

    /// Set or change the owner
    pub fn set_owner(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        account: Address,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::SetOwner { account })
    }

    /// Overwrite the max rc limit (owner only)
    pub fn set_rc_limit(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        value: u64,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::SetRcLimit { value })
    }

    /// Overwrite the recommended mana offset (owner only)
    pub fn set_recommended_mana_offset(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        value: u64,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::SetRecommendedManaOffset { value })
    }

    /// Fund the pool on behalf of `to`
    pub fn deposit(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        to: Address,
        amount: u64,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::Deposit { to, amount })
    }

    /// Earmark `amount` of `to`'s funds for withdrawal
    pub fn prepare_withdraw(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        to: Address,
        amount: u64,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::PrepareWithdraw { to, amount })
    }

    /// Take `amount` of `to`'s funds out of the pool
    pub fn withdraw(
        &mut self,
        authority: &dyn AuthorityProvider,
        token: &mut dyn FeeToken,
        to: Address,
        amount: u64,
    ) -> ManaShareResult<()> {
        self.call(authority, token, &ManaSharerAction::Withdraw { to, amount })
    }

    // ============ Read-Only Entry Points ============

    /// Decide whether the pool pays for a transaction (see [`gate::authorize`])
    pub fn authorize<H>(&self, host: &H, request: &AuthorizeRequest) -> ManaShareResult<()>
    where
        H: AuthorityProvider + ResourceMeter + ?Sized,
    {
        gate::authorize(&self.config, &self.store, host, request)
    }

    /// Funded balance of `account`
    pub fn balance_of(&self, account: &Address) -> ManaShareResult<u64> {
        ledger::balance_of(&self.store, account)
    }

    /// Pending withdrawal of `account`
    pub fn pending_withdraw_of(&self, account: &Address) -> ManaShareResult<u64> {
        reservation::pending_withdraw_of(&self.store, account)
    }

    /// Sum of all pending withdrawals
    pub fn koin_reserved(&self) -> ManaShareResult<u64> {
        reservation::koin_reserved(&self.store)
    }

    /// Live status of the pool
    pub fn get_status(
        &self,
        meter: &dyn ResourceMeter,
        token: &dyn FeeToken,
    ) -> ManaShareResult<PoolStatus> {
        gate::get_status(&self.config, &self.store, meter, token)
    }

    /// Current owner; fails if none has been set
    pub fn get_owner(&self) -> ManaShareResult<Address> {
        config::get_owner(&self.store)
    }

    /// Max rc limit admitted by the gate
    pub fn get_rc_limit(&self) -> ManaShareResult<u64> {
        config::get_rc_limit(&self.store)
    }

    /// Advisory mana offset
    pub fn get_recommended_mana_offset(&self) -> ManaShareResult<u64> {
        config::get_recommended_mana_offset(&self.store)
    }
}

/// Log-friendly rendering of an account
pub(crate) fn hex(account: &Address) -> AddressHex<'_> {
    AddressHex(account)
}
