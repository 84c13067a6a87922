//! Balance Ledger
//!
//! KOIN funded per account. Deposits move KOIN into the pool account and
//! credit the beneficiary; withdrawals move it back out and settle any
//! pending withdrawal.
//!
//! In both operations the token transfer happens before any local write,
//! and every fallible computation happens before the transfer.

use manasharer_common::{
    errors::{ManaShareError, ManaShareResult},
    events::ManaSharerEvent,
    storage::KeyValueStore,
    types::Address,
};

use crate::{config, hex, records, reservation, ManaSharerContext};

/// Funded balance of `account`
pub fn balance_of<S: KeyValueStore + ?Sized>(store: &S, account: &Address) -> ManaShareResult<u64> {
    records::balances().get(store, account)
}

/// Move `amount` KOIN from `to` into the pool and credit `to`
///
/// Needs a configured owner. The token enforces that the caller may spend
/// `to`'s KOIN.
pub fn deposit(ctx: &mut ManaSharerContext<'_>, to: &Address, amount: u64) -> ManaShareResult<()> {
    // 1. Contract must be configured
    config::get_owner(&*ctx.store)?;

    // 2. Compute the new balance
    let new_balance = balance_of(&*ctx.store, to)?
        .checked_add(amount)
        .ok_or(ManaShareError::Overflow)?;

    // 3. Pull the KOIN into the pool
    let pool = ctx.config.contract_id;
    ctx.token.transfer(to, &pool, amount)?;

    // 4. Credit the account
    records::balances().put(&mut *ctx.store, to, &new_balance)?;

    tracing::debug!(to = %hex(to), amount, new_balance, "deposit");
    ctx.events.emit(ManaSharerEvent::Deposit {
        to: *to,
        amount,
        new_balance,
    });

    Ok(())
}

/// Move `amount` KOIN from the pool back to `to`
pub fn withdraw(ctx: &mut ManaSharerContext<'_>, to: &Address, amount: u64) -> ManaShareResult<()> {
    // 1. Caller must act as the account
    if !ctx.authority.check_authority(to) {
        return Err(ManaShareError::Unauthorized { account: *to });
    }

    // 2. Account must have the funds
    let balance = balance_of(&*ctx.store, to)?;
    if balance < amount {
        return Err(ManaShareError::InsufficientBalance {
            available: balance,
            requested: amount,
        });
    }
    let new_balance = balance - amount;

    // 3. Settle the pending withdrawal
    let pending = reservation::pending_withdraw_of(&*ctx.store, to)?;
    let update = reservation::settlement(&*ctx.store, to, amount)?;

    // 4. Send the KOIN out of the pool
    let pool = ctx.config.contract_id;
    ctx.token.transfer(&pool, to, amount)?;

    // 5. Debit the account and release its reservation
    records::balances().put(&mut *ctx.store, to, &new_balance)?;
    reservation::store_update(&mut *ctx.store, to, &update)?;

    let settled = pending - update.pending;
    tracing::debug!(
        to = %hex(to),
        amount,
        new_balance,
        settled,
        koin_reserved = update.koin_reserved,
        "withdraw"
    );
    ctx.events.emit(ManaSharerEvent::Withdraw {
        to: *to,
        amount,
        new_balance,
        settled,
    });

    Ok(())
}
