//! Contract Constants
//!
//! Magic numbers and storage layout for the Free Mana Sharer.

/// Fee asset metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Koin";
    /// Token symbol
    pub const SYMBOL: &str = "KOIN";
    /// Decimal places shared by KOIN and mana
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 KOIN = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Limits applied by the mana gate
pub mod limits {
    use super::token::ONE;

    /// Ceiling on the rc limit of a single transaction until the owner
    /// configures one (1,000 mana)
    pub const DEFAULT_RC_LIMIT: u64 = 1_000 * ONE;

    /// Recommended mana offset until the owner configures one
    pub const DEFAULT_RECOMMENDED_MANA_OFFSET: u64 = 0;
}

/// Storage space identifiers.
///
/// Every record lives under `(space, key)`. Singletons use an empty key,
/// per-account maps use the account address.
pub mod spaces {
    /// Contract owner
    pub const OWNER: u32 = 0;
    /// Max rc limit admitted by the gate
    pub const RC_LIMIT: u32 = 1;
    /// Advisory mana offset
    pub const RECOMMENDED_MANA_OFFSET: u32 = 2;
    /// Sum of all pending withdrawals
    pub const KOIN_RESERVED: u32 = 3;
    /// Funded balance per account
    pub const BALANCES: u32 = 4;
    /// Pending withdrawal per account
    pub const PENDING_WITHDRAWS: u32 = 5;
}
