//! Withdrawal Reservation
//!
//! An account announces how much it plans to withdraw with
//! `prepare_withdraw`. The announced amount is added to `koin_reserved`,
//! which the gate subtracts from the pool's mana, so new transactions stop
//! consuming mana the account is about to take back.
//!
//! ## Invariant
//!
//! `koin_reserved == Σ pending[account]`. It is maintained by applying the
//! same delta to both sides on every change, never recomputed.
//!
//! Reservations are not bounded by the funded balance: an account can
//! announce more than it holds. Only `withdraw` checks the balance.

use manasharer_common::{
    errors::{ManaShareError, ManaShareResult},
    events::ManaSharerEvent,
    math::{reserve, settle, ReservationUpdate},
    storage::KeyValueStore,
    types::Address,
};

use crate::{hex, records, ManaSharerContext};

/// Pending withdrawal of `account`
pub fn pending_withdraw_of<S: KeyValueStore + ?Sized>(store: &S, account: &Address) -> ManaShareResult<u64> {
    records::pending_withdraws().get(store, account)
}

/// Sum of all pending withdrawals
pub fn koin_reserved<S: KeyValueStore + ?Sized>(store: &S) -> ManaShareResult<u64> {
    records::koin_reserved().get(store)
}

/// Set `to`'s pending withdrawal to `amount`
///
/// A smaller amount than the current one hands capacity back to the pool.
/// Calling twice with the same amount changes nothing the second time.
pub fn prepare_withdraw(ctx: &mut ManaSharerContext<'_>, to: &Address, amount: u64) -> ManaShareResult<()> {
    if !ctx.authority.check_authority(to) {
        return Err(ManaShareError::Unauthorized { account: *to });
    }

    let pending = pending_withdraw_of(&*ctx.store, to)?;
    let update = reserve(koin_reserved(&*ctx.store)?, pending, amount)?;
    store_update(&mut *ctx.store, to, &update)?;

    tracing::debug!(
        to = %hex(to),
        previous = pending,
        amount,
        koin_reserved = update.koin_reserved,
        "withdrawal prepared"
    );
    ctx.events.emit(ManaSharerEvent::PrepareWithdraw {
        to: *to,
        amount,
        koin_reserved: update.koin_reserved,
    });

    Ok(())
}

/// Reservation state of `to` once `withdrawn` leaves the pool
///
/// Computed before the token transfer so nothing can fail after it.
pub(crate) fn settlement<S: KeyValueStore + ?Sized>(
    store: &S,
    to: &Address,
    withdrawn: u64,
) -> ManaShareResult<ReservationUpdate> {
    settle(koin_reserved(store)?, pending_withdraw_of(store, to)?, withdrawn)
}

/// Persist a reservation update for `to`
pub(crate) fn store_update<S: KeyValueStore + ?Sized>(
    store: &mut S,
    to: &Address,
    update: &ReservationUpdate,
) -> ManaShareResult<()> {
    records::koin_reserved().put(&mut *store, &update.koin_reserved)?;
    records::pending_withdraws().put(store, to, &update.pending)
}
