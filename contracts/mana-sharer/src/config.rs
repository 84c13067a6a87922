//! Owner and Configuration
//!
//! The first `set_owner` call claims the contract; afterwards only the
//! current owner can change the owner, the max rc limit or the recommended
//! mana offset. Setters overwrite unconditionally: lowering the rc limit
//! below what reservations or balances would allow is the owner's call.

use manasharer_common::{
    errors::{ManaShareError, ManaShareResult},
    events::ManaSharerEvent,
    storage::KeyValueStore,
    types::{is_zero_address, Address},
};

use crate::{hex, records, ManaSharerContext};

/// Current owner; fails with `OwnerNotSet` before the first `set_owner`
pub fn get_owner<S: KeyValueStore + ?Sized>(store: &S) -> ManaShareResult<Address> {
    records::owner().get(store)?.ok_or(ManaShareError::OwnerNotSet)
}

/// Max rc limit admitted by the gate
pub fn get_rc_limit<S: KeyValueStore + ?Sized>(store: &S) -> ManaShareResult<u64> {
    records::rc_limit().get(store)
}

/// Advisory mana offset
pub fn get_recommended_mana_offset<S: KeyValueStore + ?Sized>(store: &S) -> ManaShareResult<u64> {
    records::recommended_mana_offset().get(store)
}

/// Require an owner to exist and the caller to act as it
fn require_owner(ctx: &ManaSharerContext<'_>) -> ManaShareResult<Address> {
    let owner = get_owner(&*ctx.store)?;
    if !ctx.authority.check_authority(&owner) {
        return Err(ManaShareError::OwnerOnly { owner });
    }
    Ok(owner)
}

/// Set or change the owner
///
/// Anyone may set the first owner. Once set, only the current owner can
/// replace it. The zero address is rejected.
pub fn set_owner(ctx: &mut ManaSharerContext<'_>, account: &Address) -> ManaShareResult<()> {
    let previous = records::owner().get(&*ctx.store)?;

    if let Some(owner) = previous {
        if !ctx.authority.check_authority(&owner) {
            return Err(ManaShareError::OwnerOnly { owner });
        }
    }

    if is_zero_address(account) {
        return Err(ManaShareError::InvalidAddress {
            reason: "owner cannot be empty",
        });
    }

    records::owner().put(&mut *ctx.store, &Some(*account))?;

    tracing::debug!(owner = %hex(account), claimed = previous.is_none(), "owner set");
    ctx.events.emit(ManaSharerEvent::OwnerSet {
        previous,
        owner: *account,
    });

    Ok(())
}

/// Overwrite the max rc limit (owner only)
pub fn set_rc_limit(ctx: &mut ManaSharerContext<'_>, value: u64) -> ManaShareResult<()> {
    require_owner(ctx)?;

    records::rc_limit().put(&mut *ctx.store, &value)?;

    tracing::debug!(value, "rc limit set");
    ctx.events.emit(ManaSharerEvent::RcLimitSet { value });

    Ok(())
}

/// Overwrite the recommended mana offset (owner only)
pub fn set_recommended_mana_offset(ctx: &mut ManaSharerContext<'_>, value: u64) -> ManaShareResult<()> {
    require_owner(ctx)?;

    records::recommended_mana_offset().put(&mut *ctx.store, &value)?;

    tracing::debug!(value, "recommended mana offset set");
    ctx.events.emit(ManaSharerEvent::RecommendedManaOffsetSet { value });

    Ok(())
}
