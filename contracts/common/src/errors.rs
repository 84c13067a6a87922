//! Error Types for the Free Mana Sharer
//!
//! Every failure aborts the current call. Variants carry the values that
//! caused them so a rejected caller can tell what to change.

use core::fmt;

use crate::constants::token;
use crate::math::DisplayAmount;
use crate::types::{Address, AddressHex};

/// Result type alias for mana sharer operations
pub type ManaShareResult<T> = Result<T, ManaShareError>;

/// Main error enum for all mana sharer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManaShareError {
    // ============ Configuration Errors ============
    /// Operation needs an owner but none has been set
    OwnerNotSet,

    // ============ Authorization Errors ============
    /// Caller cannot act on behalf of the account
    Unauthorized { account: Address },

    /// Only the current owner can perform this action
    OwnerOnly { owner: Address },

    /// Non-application authorizations need system authority
    SystemAuthorityRequired,

    // ============ Funds Errors ============
    /// Withdrawal exceeds the funded balance
    InsufficientBalance { available: u64, requested: u64 },

    // ============ Mana Gate Errors ============
    /// Pool does not have enough unreserved mana for the transaction
    InsufficientMana { available: u64, requested: u64 },

    /// Transaction rc limit is above the configured ceiling
    RcLimitExceeded { requested: u64, max_rc_limit: u64 },

    // ============ Input Validation Errors ============
    /// Invalid address (e.g., zero address)
    InvalidAddress {
        /// Description of why the address is invalid
        reason: &'static str,
    },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    // ============ Collaborator Errors ============
    /// Stored record could not be decoded
    StorageCorrupted { space: u32 },

    /// Token transfer failed
    TransferFailed { from: Address, to: Address, amount: u64 },
}

/// Coarse classification of errors, one per failure class a caller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Owner-dependent operation before any owner exists
    Configuration,
    /// Missing capability (act-as account, owner or system)
    Authorization,
    /// Funded balance too small
    InsufficientFunds,
    /// Pool mana too small
    InsufficientCapacity,
    /// Request above the configured ceiling
    CeilingExceeded,
    /// Malformed argument
    InvalidArgument,
    /// Arithmetic, storage or token failure
    Internal,
}

impl ManaShareError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::OwnerNotSet => "E001_OWNER_NOT_SET",
            Self::Unauthorized { .. } => "E010_UNAUTHORIZED",
            Self::OwnerOnly { .. } => "E011_OWNER_ONLY",
            Self::SystemAuthorityRequired => "E012_SYSTEM_ONLY",
            Self::InsufficientBalance { .. } => "E020_INSUFFICIENT_BALANCE",
            Self::InsufficientMana { .. } => "E030_INSUFFICIENT_MANA",
            Self::RcLimitExceeded { .. } => "E031_RC_LIMIT_EXCEEDED",
            Self::InvalidAddress { .. } => "E040_INVALID_ADDRESS",
            Self::Overflow => "E050_OVERFLOW",
            Self::Underflow => "E051_UNDERFLOW",
            Self::StorageCorrupted { .. } => "E060_STORAGE_CORRUPTED",
            Self::TransferFailed { .. } => "E061_TRANSFER_FAILED",
        }
    }

    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OwnerNotSet => ErrorKind::Configuration,
            Self::Unauthorized { .. } | Self::OwnerOnly { .. } | Self::SystemAuthorityRequired => {
                ErrorKind::Authorization
            }
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientMana { .. } => ErrorKind::InsufficientCapacity,
            Self::RcLimitExceeded { .. } => ErrorKind::CeilingExceeded,
            Self::InvalidAddress { .. } => ErrorKind::InvalidArgument,
            Self::Overflow
            | Self::Underflow
            | Self::StorageCorrupted { .. }
            | Self::TransferFailed { .. } => ErrorKind::Internal,
        }
    }

    /// Returns true if the caller can succeed by resubmitting later or with
    /// different arguments
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true, // Withdraw less
            Self::InsufficientMana { .. } => true,    // Wait for mana to recharge
            Self::RcLimitExceeded { .. } => true,     // Lower the rc limit
            Self::OwnerNotSet => true,                // Wait for setup
            _ => false,
        }
    }
}

impl fmt::Display for ManaShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerNotSet => write!(f, "owner not set"),
            Self::Unauthorized { account } => {
                write!(f, "not authorized by {}", AddressHex(account))
            }
            Self::OwnerOnly { owner } => {
                write!(f, "not authorized by the owner {}", AddressHex(owner))
            }
            Self::SystemAuthorityRequired => {
                write!(f, "not authorized: system authority required")
            }
            Self::InsufficientBalance { available, requested } => write!(
                f,
                "insufficient balance: {} available, {} requested",
                DisplayAmount::new(*available, token::DECIMALS),
                DisplayAmount::new(*requested, token::DECIMALS),
            ),
            Self::InsufficientMana { available, requested } => write!(
                f,
                "insufficient mana in the pool: {} available, {} requested",
                DisplayAmount::new(*available, token::DECIMALS),
                DisplayAmount::new(*requested, token::DECIMALS),
            ),
            Self::RcLimitExceeded { requested, max_rc_limit } => write!(
                f,
                "rc limit {} exceeds the max rc limit of {} mana",
                DisplayAmount::new(*requested, token::DECIMALS),
                DisplayAmount::new(*max_rc_limit, token::DECIMALS),
            ),
            Self::InvalidAddress { reason } => write!(f, "invalid address: {reason}"),
            Self::Overflow => write!(f, "arithmetic overflow"),
            Self::Underflow => write!(f, "arithmetic underflow"),
            Self::StorageCorrupted { space } => {
                write!(f, "corrupted record in storage space {space}")
            }
            Self::TransferFailed { from, to, amount } => write!(
                f,
                "transfer of {} from {} to {} failed",
                DisplayAmount::new(*amount, token::DECIMALS),
                AddressHex(from),
                AddressHex(to),
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ManaShareError {}
