//! Persistence seam for pool state.
//!
//! Stores see opaque `Vec<u8>` values so storage backends don't depend on
//! the engine's types; the engine serializes and deserializes its own
//! records with bincode.

use std::collections::HashMap;

use thiserror::Error;
use tidelock_types::{PoolId, StakerId};

use crate::engine::StakePool;
use crate::state::{PoolLedger, StakeAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Store trait for persisting pool state to durable storage.
pub trait PoolStore {
    fn get_ledger(&self, pool: &PoolId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_ledger(&self, pool: &PoolId, bytes: &[u8]) -> Result<(), StoreError>;

    fn put_account(&self, pool: &PoolId, staker: &StakerId, bytes: &[u8])
        -> Result<(), StoreError>;
    fn delete_account(&self, pool: &PoolId, staker: &StakerId) -> Result<(), StoreError>;
    fn iter_accounts(&self, pool: &PoolId) -> Result<Vec<(StakerId, Vec<u8>)>, StoreError>;
}

impl StakePool {
    /// Persist the ledger and every stake account.
    pub fn save_to_store(&self, store: &dyn PoolStore) -> Result<(), StoreError> {
        let ledger_bytes = bincode::serialize(self.ledger())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        store.put_ledger(self.id(), &ledger_bytes)?;

        for (staker, account) in self.accounts() {
            let bytes = bincode::serialize(account)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            store.put_account(self.id(), staker, &bytes)?;
        }
        Ok(())
    }

    /// Restore a pool from a store. `Ok(None)` when the pool was never
    /// persisted.
    pub fn load_from_store(
        id: PoolId,
        store: &dyn PoolStore,
    ) -> Result<Option<Self>, StoreError> {
        let Some(ledger_bytes) = store.get_ledger(&id)? else {
            return Ok(None);
        };
        let ledger: PoolLedger = bincode::deserialize(&ledger_bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut accounts = HashMap::new();
        for (staker, bytes) in store.iter_accounts(&id)? {
            let account: StakeAccount = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            accounts.insert(staker, account);
        }
        Ok(Some(StakePool::from_parts(id, ledger, accounts)))
    }
}
