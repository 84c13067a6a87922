//! Free Mana Sharer Common Library
//!
//! Shared types, constants, storage and host interfaces for the
//! Free Mana Sharer contract.
//!
//! ## How the pool works
//!
//! An owner funds a shared pool of KOIN. Other accounts name the pool as
//! payer of their transactions and the pool's mana pays for the resources
//! those transactions consume, up to a configured rc limit.
//!
//! - **Balance ledger**: KOIN funded per account (deposit / withdraw)
//! - **Withdrawal reservation**: KOIN earmarked for withdrawal, removed from
//!   the mana the pool is willing to lend
//! - **Mana gate**: admits or rejects each transaction's rc limit
//!
//! Everything the contract does not own is reached through narrow traits in
//! [`host`]: the capability check, the pool's live mana and the KOIN token.
//!
//! This crate is `no_std` compatible when the `std` feature is disabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod storage;
pub mod host;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use events::*;
pub use storage::*;
pub use host::*;
