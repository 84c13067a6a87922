//! Host Interfaces
//!
//! Everything the contract reads or calls but does not own. The host
//! implements these per call; the contract never caches their answers.

use crate::errors::ManaShareResult;
use crate::types::Address;

/// Capability checks performed by the platform
pub trait AuthorityProvider {
    /// Is the current caller authorized to act as `account`?
    fn check_authority(&self, account: &Address) -> bool;

    /// Does the current caller hold system-level authority?
    fn has_system_authority(&self) -> bool;
}

/// Live resource accounting of the platform
pub trait ResourceMeter {
    /// Mana currently available to `account`
    fn account_rc(&self, account: &Address) -> u64;
}

/// The fee asset (KOIN) token contract
///
/// `transfer` enforces the sender's own authorization; the mana sharer
/// does not duplicate that check.
pub trait FeeToken {
    /// Move `amount` from `from` to `to`
    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> ManaShareResult<()>;

    /// Token balance of `account`
    fn balance_of(&self, account: &Address) -> u64;
}
