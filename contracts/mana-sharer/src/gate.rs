//! Mana Gate
//!
//! Called by the host for every transaction that names the pool as payer.
//! The pool lends its mana as long as two limits hold:
//!
//! - the transaction's rc limit fits in the mana left after reserved KOIN
//!   is set aside
//! - the rc limit is at most the owner's configured ceiling
//!
//! Any other kind of request (contract call, upload) is only admitted for
//! system-authority callers. Every refusal is a hard error.

use manasharer_common::{
    errors::{ManaShareError, ManaShareResult},
    host::{AuthorityProvider, FeeToken, ResourceMeter},
    math::{available_koin, available_mana},
    storage::KeyValueStore,
    types::{AuthorizeRequest, PoolStatus},
};

use crate::{config, reservation, ManaSharerConfig};

/// Admit or refuse a request
pub fn authorize<S, H>(
    sharer: &ManaSharerConfig,
    store: &S,
    host: &H,
    request: &AuthorizeRequest,
) -> ManaShareResult<()>
where
    S: KeyValueStore + ?Sized,
    H: AuthorityProvider + ResourceMeter + ?Sized,
{
    if !request.is_transaction_application() {
        if host.has_system_authority() {
            return Ok(());
        }
        tracing::debug!(kind = ?request.kind, "non-application request refused");
        return Err(ManaShareError::SystemAuthorityRequired);
    }

    let requested = request.rc_limit;

    let mana = host.account_rc(&sharer.contract_id);
    let available = available_mana(mana, reservation::koin_reserved(store)?);
    if available < requested {
        tracing::debug!(available, requested, "not enough mana");
        return Err(ManaShareError::InsufficientMana {
            available,
            requested,
        });
    }

    let max_rc_limit = config::get_rc_limit(store)?;
    if requested > max_rc_limit {
        tracing::debug!(requested, max_rc_limit, "rc limit above ceiling");
        return Err(ManaShareError::RcLimitExceeded {
            requested,
            max_rc_limit,
        });
    }

    tracing::debug!(requested, available, "transaction admitted");
    Ok(())
}

/// Live status of the pool
pub fn get_status<S: KeyValueStore + ?Sized>(
    sharer: &ManaSharerConfig,
    store: &S,
    meter: &dyn ResourceMeter,
    token: &dyn FeeToken,
) -> ManaShareResult<PoolStatus> {
    let mana = meter.account_rc(&sharer.contract_id);
    let koin_balance = token.balance_of(&sharer.contract_id);
    let koin_reserved = reservation::koin_reserved(store)?;

    Ok(PoolStatus {
        mana,
        koin_balance,
        koin_reserved,
        mana_available: available_mana(mana, koin_reserved),
        koin_available: available_koin(koin_balance, koin_reserved),
        recommended_mana_offset: config::get_recommended_mana_offset(store)?,
    })
}
