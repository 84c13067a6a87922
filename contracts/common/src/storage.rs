//! Typed Storage for the Free Mana Sharer
//!
//! The host persists raw bytes under `(space, key)`. This module layers
//! typed, borsh-encoded records on top of it:
//!
//! - [`StorageObj`]: a singleton record (owner, rc limit, reserved KOIN)
//! - [`StorageMap`]: a record per account (balances, pending withdrawals)
//!
//! Reading a missing record never yields "absent": it yields the default
//! produced by the record's factory, so a fresh account simply has a zero
//! balance.
//!
//! ## All-or-nothing calls
//!
//! [`Overlay`] buffers the writes of one call on top of the committed
//! store. The host applies the buffered writes only when the call
//! succeeds; a failed call drops the overlay and leaves no trace.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::errors::{ManaShareError, ManaShareResult};
use crate::types::Address;
use crate::{BTreeMap, Vec};

/// Storage key: space identifier plus record key
pub type StorageKey = (u32, Vec<u8>);

/// Buffered writes of one call
pub type StorageWrites = BTreeMap<StorageKey, Vec<u8>>;

/// Byte-level key-value persistence provided by the host
pub trait KeyValueStore {
    /// Read the raw record under `(space, key)`
    fn get(&self, space: u32, key: &[u8]) -> Option<Vec<u8>>;

    /// Overwrite the raw record under `(space, key)`
    fn put(&mut self, space: u32, key: &[u8], value: Vec<u8>);

    /// Apply buffered writes in key order
    fn apply(&mut self, writes: StorageWrites) {
        for ((space, key), value) in writes {
            self.put(space, &key, value);
        }
    }
}

// ============ In-Memory Store ============

/// Committed state held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    records: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// SHA-256 over every record in key order
    ///
    /// Two stores with the same records have the same digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for ((space, key), value) in &self.records {
            hasher.update(space.to_le_bytes());
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }
        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        digest
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, space: u32, key: &[u8]) -> Option<Vec<u8>> {
        self.records.get(&(space, key.to_vec())).cloned()
    }

    fn put(&mut self, space: u32, key: &[u8], value: Vec<u8>) {
        self.records.insert((space, key.to_vec()), value);
    }
}

// ============ Per-Call Overlay ============

/// Write buffer over a read-only base store
pub struct Overlay<'a, S: KeyValueStore + ?Sized> {
    base: &'a S,
    writes: StorageWrites,
}

impl<'a, S: KeyValueStore + ?Sized> Overlay<'a, S> {
    /// Start buffering on top of `base`
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            writes: StorageWrites::new(),
        }
    }

    /// Number of records written so far
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Release the buffered writes for the host to commit
    pub fn into_writes(self) -> StorageWrites {
        self.writes
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Overlay<'_, S> {
    fn get(&self, space: u32, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(&(space, key.to_vec())) {
            Some(value) => Some(value.clone()),
            None => self.base.get(space, key),
        }
    }

    fn put(&mut self, space: u32, key: &[u8], value: Vec<u8>) {
        self.writes.insert((space, key.to_vec()), value);
    }
}

// ============ Typed Records ============

fn decode<T: BorshDeserialize>(space: u32, bytes: &[u8]) -> ManaShareResult<T> {
    borsh::from_slice(bytes).map_err(|_| {
        tracing::error!(space, len = bytes.len(), "undecodable record");
        ManaShareError::StorageCorrupted { space }
    })
}

fn encode<T: BorshSerialize>(space: u32, value: &T) -> ManaShareResult<Vec<u8>> {
    borsh::to_vec(value).map_err(|_| ManaShareError::StorageCorrupted { space })
}

/// Singleton record with a default factory
pub struct StorageObj<T> {
    space: u32,
    default: fn() -> T,
}

impl<T: BorshSerialize + BorshDeserialize> StorageObj<T> {
    /// Declare a singleton living in `space`
    pub fn new(space: u32, default: fn() -> T) -> Self {
        Self { space, default }
    }

    /// Space identifier of this record
    pub fn space(&self) -> u32 {
        self.space
    }

    /// Read the record, or its default if it was never written
    pub fn get<S: KeyValueStore + ?Sized>(&self, store: &S) -> ManaShareResult<T> {
        match store.get(self.space, &[]) {
            Some(bytes) => decode(self.space, &bytes),
            None => Ok((self.default)()),
        }
    }

    /// Overwrite the record
    pub fn put<S: KeyValueStore + ?Sized>(&self, store: &mut S, value: &T) -> ManaShareResult<()> {
        let bytes = encode(self.space, value)?;
        store.put(self.space, &[], bytes);
        Ok(())
    }
}

/// Per-account record with a default factory
pub struct StorageMap<T> {
    space: u32,
    default: fn() -> T,
}

impl<T: BorshSerialize + BorshDeserialize> StorageMap<T> {
    /// Declare a map living in `space`
    pub fn new(space: u32, default: fn() -> T) -> Self {
        Self { space, default }
    }

    /// Space identifier of this map
    pub fn space(&self) -> u32 {
        self.space
    }

    /// Read the account's record, or the default if it was never written
    pub fn get<S: KeyValueStore + ?Sized>(&self, store: &S, account: &Address) -> ManaShareResult<T> {
        match store.get(self.space, account) {
            Some(bytes) => decode(self.space, &bytes),
            None => Ok((self.default)()),
        }
    }

    /// Overwrite the account's record
    pub fn put<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        account: &Address,
        value: &T,
    ) -> ManaShareResult<()> {
        let bytes = encode(self.space, value)?;
        store.put(self.space, account, bytes);
        Ok(())
    }
}
