//! Pool registry: single writer per pool, parallelism across pools.
//!
//! The engine itself performs no locking (it assumes operations on one pool
//! are externally serialized); this registry is that serialization for
//! in-process use. Each pool sits behind its own mutex, so operations on
//! different pools run concurrently while operations on the same pool
//! execute one at a time, start to finish.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tidelock_types::{PoolConfig, PoolId, StakerId, Timestamp};

use crate::engine::StakePool;
use crate::error::StakingError;

#[derive(Default)]
pub struct PoolRegistry {
    pools: RwLock<HashMap<PoolId, Arc<Mutex<StakePool>>>>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool; the creator becomes its authority.
    pub fn create_pool(
        &self,
        id: PoolId,
        config: PoolConfig,
        creator: StakerId,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        let pool = StakePool::new(id.clone(), config, creator, now)?;
        let mut pools = self
            .pools
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if pools.contains_key(&id) {
            return Err(StakingError::PoolAlreadyExists(id));
        }
        pools.insert(id, Arc::new(Mutex::new(pool)));
        Ok(())
    }

    /// Run `op` with exclusive access to one pool.
    pub fn with_pool<R>(
        &self,
        id: &PoolId,
        op: impl FnOnce(&mut StakePool) -> Result<R, StakingError>,
    ) -> Result<R, StakingError> {
        let pool = {
            let pools = self.pools.read().unwrap_or_else(PoisonError::into_inner);
            pools
                .get(id)
                .cloned()
                .ok_or_else(|| StakingError::PoolNotFound(id.clone()))?
        };
        let mut guard = pool.lock().unwrap_or_else(PoisonError::into_inner);
        op(&mut guard)
    }

    pub fn contains(&self, id: &PoolId) -> bool {
        self.pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
