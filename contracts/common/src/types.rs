//! Core Types for the Free Mana Sharer
//!
//! Arguments, requests and snapshots shared between the contract and the
//! hosts that call it.

use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for account addresses
pub type Address = [u8; 32];

/// The all-zero address, used as "no account"
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Returns true if the address is the empty (all-zero) address
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

/// Lowercase hex rendering of an address for messages and logs
pub struct AddressHex<'a>(pub &'a Address);

impl fmt::Display for AddressHex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for AddressHex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ============ Authorization Types ============

/// Why the host is asking the contract for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum AuthorizationKind {
    /// Calling another contract on behalf of this one
    ContractCall = 0,
    /// Paying the mana of a transaction
    TransactionApplication = 1,
    /// Uploading new code for this contract
    ContractUpload = 2,
}

/// Authorization request the host submits during transaction validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AuthorizeRequest {
    /// Purpose of the request
    pub kind: AuthorizationKind,
    /// rc limit declared in the transaction header (only read for
    /// transaction application)
    pub rc_limit: u64,
}

impl AuthorizeRequest {
    /// Request to pay for a transaction with the given rc limit
    pub fn apply_transaction(rc_limit: u64) -> Self {
        Self {
            kind: AuthorizationKind::TransactionApplication,
            rc_limit,
        }
    }

    /// Request of any other kind
    pub fn other(kind: AuthorizationKind) -> Self {
        Self { kind, rc_limit: 0 }
    }

    /// Returns true if this request asks the pool to pay for a transaction
    pub fn is_transaction_application(&self) -> bool {
        self.kind == AuthorizationKind::TransactionApplication
    }
}

// ============ Contract Actions ============

/// Mutating entry points of the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ManaSharerAction {
    /// Set or change the owner
    SetOwner { account: Address },
    /// Overwrite the max rc limit per transaction
    SetRcLimit { value: u64 },
    /// Overwrite the advisory mana offset
    SetRecommendedManaOffset { value: u64 },
    /// Fund the pool on behalf of `to`
    Deposit { to: Address, amount: u64 },
    /// Earmark `amount` of `to`'s funds for withdrawal
    PrepareWithdraw { to: Address, amount: u64 },
    /// Take funds out of the pool
    Withdraw { to: Address, amount: u64 },
}

impl ManaSharerAction {
    /// Entry point name, as used in events and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetOwner { .. } => "set_owner",
            Self::SetRcLimit { .. } => "set_rc_limit",
            Self::SetRecommendedManaOffset { .. } => "set_recommended_mana_offset",
            Self::Deposit { .. } => "deposit",
            Self::PrepareWithdraw { .. } => "prepare_withdraw",
            Self::Withdraw { .. } => "withdraw",
        }
    }
}

// ============ Pool Status ============

/// Snapshot returned by `get_status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolStatus {
    /// Live mana of the pool account, as reported by the host
    pub mana: u64,
    /// KOIN held by the pool account
    pub koin_balance: u64,
    /// KOIN earmarked by pending withdrawals
    pub koin_reserved: u64,
    /// Mana the gate can still lend (never negative)
    pub mana_available: u64,
    /// KOIN not earmarked by pending withdrawals (never negative)
    pub koin_available: u64,
    /// Advisory offset for callers estimating their rc limit
    pub recommended_mana_offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(is_zero_address(&ZERO_ADDRESS));
        assert!(!is_zero_address(&[1u8; 32]));
    }

    #[test]
    fn test_address_hex() {
        let mut address = [0u8; 32];
        address[0] = 0x0f;
        address[31] = 0xa0;
        let hex = AddressHex(&address).to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("0f00"));
        assert!(hex.ends_with("00a0"));
    }

    #[test]
    fn test_authorize_request_kinds() {
        assert!(AuthorizeRequest::apply_transaction(10).is_transaction_application());
        assert!(!AuthorizeRequest::other(AuthorizationKind::ContractCall).is_transaction_application());
        assert!(!AuthorizeRequest::other(AuthorizationKind::ContractUpload).is_transaction_application());
    }

    #[test]
    fn test_authorization_kind_borsh_discriminant() {
        let bytes = borsh::to_vec(&AuthorizationKind::ContractUpload).unwrap();
        assert_eq!(bytes, vec![2u8]);
    }
}
