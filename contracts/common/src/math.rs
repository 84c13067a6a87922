//! Mathematical Utilities for the Free Mana Sharer
//!
//! Reservation arithmetic shared by `prepare_withdraw` and `withdraw`,
//! capacity helpers for the mana gate, and fixed-point formatting.

use core::fmt;

use crate::errors::{ManaShareError, ManaShareResult};

/// Reservation state of one account after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationUpdate {
    /// New global reserved KOIN
    pub koin_reserved: u64,
    /// New pending withdrawal of the account
    pub pending: u64,
}

/// Apply a signed delta to an unsigned amount
///
/// Fails with `Underflow` if the result would be negative and `Overflow`
/// if it does not fit in a u64.
pub fn apply_delta(value: u64, delta: i128) -> ManaShareResult<u64> {
    let result = (value as i128)
        .checked_add(delta)
        .ok_or(ManaShareError::Overflow)?;

    if result < 0 {
        return Err(ManaShareError::Underflow);
    }

    u64::try_from(result).map_err(|_| ManaShareError::Overflow)
}

/// Move an account's pending withdrawal to `amount`
///
/// delta = amount - pending, applied to both the account and the global
/// reserve so that `koin_reserved == Σ pending` keeps holding.
pub fn reserve(koin_reserved: u64, pending: u64, amount: u64) -> ManaShareResult<ReservationUpdate> {
    let delta = amount as i128 - pending as i128;

    Ok(ReservationUpdate {
        koin_reserved: apply_delta(koin_reserved, delta)?,
        pending: apply_delta(pending, delta)?,
    })
}

/// Release the part of a pending withdrawal covered by an actual withdrawal
///
/// settled = min(pending, withdrawn). A withdrawal that was never prepared
/// settles nothing.
pub fn settle(koin_reserved: u64, pending: u64, withdrawn: u64) -> ManaShareResult<ReservationUpdate> {
    let settled = pending.min(withdrawn);

    Ok(ReservationUpdate {
        koin_reserved: koin_reserved
            .checked_sub(settled)
            .ok_or(ManaShareError::Underflow)?,
        pending: pending - settled,
    })
}

/// Mana the gate can still lend: max(0, mana - koin_reserved)
pub fn available_mana(mana: u64, koin_reserved: u64) -> u64 {
    mana.saturating_sub(koin_reserved)
}

/// KOIN in the pool not earmarked by pending withdrawals
pub fn available_koin(koin_balance: u64, koin_reserved: u64) -> u64 {
    koin_balance.saturating_sub(koin_reserved)
}

/// Fixed-point amount rendered with its decimal point
///
/// Trailing fractional zeros are dropped: 150_000_000 with 8 decimals
/// renders as `1.5`, 100_000_000 as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayAmount {
    amount: u64,
    decimals: u8,
}

impl DisplayAmount {
    /// Wrap an amount expressed in base units
    pub fn new(amount: u64, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// Split into whole and fractional base units
    pub fn split(&self) -> (u64, u64) {
        match 10u64.checked_pow(self.decimals as u32) {
            Some(one) => (self.amount / one, self.amount % one),
            // More decimals than u64 can hold: everything is fractional
            None => (0, self.amount),
        }
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, fractional) = self.split();
        if fractional == 0 {
            return write!(f, "{whole}");
        }

        let mut digits = self.decimals as usize;
        let mut fractional = fractional;
        while fractional % 10 == 0 {
            fractional /= 10;
            digits -= 1;
        }
        write!(f, "{whole}.{fractional:0digits$}")
    }
}
