//! In-memory host and token doubles
//!
//! Enabled by the `testing` feature so contract crates can drive the
//! mana sharer without a real platform.

use std::collections::{BTreeMap, BTreeSet};
use std::vec::Vec;

use crate::errors::{ManaShareError, ManaShareResult};
use crate::host::{AuthorityProvider, FeeToken, ResourceMeter};
use crate::types::Address;

/// Host double: who the caller may act as, and the mana of each account
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    authorized: BTreeSet<Address>,
    system: bool,
    mana: BTreeMap<Address, u64>,
}

impl MockHost {
    /// Host where the caller holds no authority and no account has mana
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the caller act as `account`
    pub fn authorize(&mut self, account: Address) -> &mut Self {
        self.authorized.insert(account);
        self
    }

    /// Stop the caller from acting as `account`
    pub fn revoke(&mut self, account: &Address) -> &mut Self {
        self.authorized.remove(account);
        self
    }

    /// Only let the caller act as `account`
    pub fn act_as(&mut self, account: Address) -> &mut Self {
        self.authorized.clear();
        self.authorized.insert(account);
        self
    }

    /// Grant or drop system authority
    pub fn set_system_authority(&mut self, system: bool) -> &mut Self {
        self.system = system;
        self
    }

    /// Set the live mana of `account`
    pub fn set_mana(&mut self, account: Address, mana: u64) -> &mut Self {
        self.mana.insert(account, mana);
        self
    }
}

impl AuthorityProvider for MockHost {
    fn check_authority(&self, account: &Address) -> bool {
        self.authorized.contains(account)
    }

    fn has_system_authority(&self) -> bool {
        self.system
    }
}

impl ResourceMeter for MockHost {
    fn account_rc(&self, account: &Address) -> u64 {
        self.mana.get(account).copied().unwrap_or(0)
    }
}

/// KOIN double with balances and a transfer journal
#[derive(Debug, Clone, Default)]
pub struct MockToken {
    balances: BTreeMap<Address, u64>,
    frozen: BTreeSet<Address>,
    transfers: Vec<(Address, Address, u64)>,
}

impl MockToken {
    /// Token with no holders
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air
    pub fn mint(&mut self, account: Address, amount: u64) -> &mut Self {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        self
    }

    /// Reject every transfer out of `account`, as if its owner did not sign
    pub fn freeze(&mut self, account: Address) -> &mut Self {
        self.frozen.insert(account);
        self
    }

    /// Successful transfers, oldest first
    pub fn transfers(&self) -> &[(Address, Address, u64)] {
        &self.transfers
    }
}

impl FeeToken for MockToken {
    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> ManaShareResult<()> {
        let failed = ManaShareError::TransferFailed {
            from: *from,
            to: *to,
            amount,
        };

        if self.frozen.contains(from) {
            return Err(failed);
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(failed);
        }
        let to_balance = self.balance_of(to);
        let new_to_balance = if from == to {
            to_balance
        } else {
            to_balance.checked_add(amount).ok_or(ManaShareError::Overflow)?
        };

        if from != to {
            self.balances.insert(*from, from_balance - amount);
            self.balances.insert(*to, new_to_balance);
        }
        self.transfers.push((*from, *to, amount));
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}
