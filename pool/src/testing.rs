//! In-memory capability and store doubles for tests and benches.

use std::collections::HashMap;
use std::sync::Mutex;

use tidelock_types::{PoolId, StakerId};

use crate::store::{PoolStore, StoreError};
use crate::vault::{PrincipalVault, RewardCustody, TransferError};

/// In-memory staked-asset bank: per-staker balances plus per-pool vaults.
#[derive(Debug, Default)]
pub struct MemoryVault {
    balances: HashMap<StakerId, u64>,
    vaults: HashMap<PoolId, u64>,
}

impl MemoryVault {
    /// Give a staker tokens to stake with.
    pub fn credit(&mut self, staker: &StakerId, amount: u64) {
        *self.balances.entry(staker.clone()).or_default() += amount;
    }

    pub fn balance_of(&self, staker: &StakerId) -> u64 {
        self.balances.get(staker).copied().unwrap_or(0)
    }

    pub fn vault_balance(&self, pool: &PoolId) -> u64 {
        self.vaults.get(pool).copied().unwrap_or(0)
    }
}

impl PrincipalVault for MemoryVault {
    fn deposit_principal(
        &mut self,
        pool: &PoolId,
        from: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError> {
        let balance = self.balances.entry(from.clone()).or_default();
        if *balance < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        *self.vaults.entry(pool.clone()).or_default() += amount;
        Ok(())
    }

    fn withdraw_principal(
        &mut self,
        pool: &PoolId,
        to: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError> {
        let vault = self.vaults.entry(pool.clone()).or_default();
        if *vault < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: *vault,
            });
        }
        *vault -= amount;
        *self.balances.entry(to.clone()).or_default() += amount;
        Ok(())
    }
}

/// In-memory reward-currency bank: wallets plus per-pool custody.
#[derive(Debug, Default)]
pub struct MemoryCustody {
    wallets: HashMap<StakerId, u64>,
    custody: HashMap<PoolId, u64>,
}

impl MemoryCustody {
    /// Give a wallet reward currency to deposit.
    pub fn fund(&mut self, staker: &StakerId, amount: u64) {
        *self.wallets.entry(staker.clone()).or_default() += amount;
    }

    /// Drop value straight into pool custody, bypassing the deposit
    /// operation; the side channel that reward sync detects.
    pub fn airdrop(&mut self, pool: &PoolId, amount: u64) {
        *self.custody.entry(pool.clone()).or_default() += amount;
    }

    pub fn wallet_balance(&self, staker: &StakerId) -> u64 {
        self.wallets.get(staker).copied().unwrap_or(0)
    }

    pub fn custody_balance(&self, pool: &PoolId) -> u64 {
        self.custody.get(pool).copied().unwrap_or(0)
    }
}

impl RewardCustody for MemoryCustody {
    fn deposit_value(
        &mut self,
        pool: &PoolId,
        from: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError> {
        let wallet = self.wallets.entry(from.clone()).or_default();
        if *wallet < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: *wallet,
            });
        }
        *wallet -= amount;
        *self.custody.entry(pool.clone()).or_default() += amount;
        Ok(())
    }

    fn withdraw_value(
        &mut self,
        pool: &PoolId,
        to: &StakerId,
        amount: u64,
    ) -> Result<(), TransferError> {
        let custody = self.custody.entry(pool.clone()).or_default();
        if *custody < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: *custody,
            });
        }
        *custody -= amount;
        *self.wallets.entry(to.clone()).or_default() += amount;
        Ok(())
    }

    fn balance(&self, pool: &PoolId) -> u64 {
        self.custody.get(pool).copied().unwrap_or(0)
    }
}

/// In-memory [`PoolStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledgers: Mutex<HashMap<PoolId, Vec<u8>>>,
    accounts: Mutex<HashMap<(PoolId, StakerId), Vec<u8>>>,
}

impl PoolStore for MemoryStore {
    fn get_ledger(&self, pool: &PoolId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .ledgers
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(pool)
            .cloned())
    }

    fn put_ledger(&self, pool: &PoolId, bytes: &[u8]) -> Result<(), StoreError> {
        self.ledgers
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(pool.clone(), bytes.to_vec());
        Ok(())
    }

    fn put_account(
        &self,
        pool: &PoolId,
        staker: &StakerId,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert((pool.clone(), staker.clone()), bytes.to_vec());
        Ok(())
    }

    fn delete_account(&self, pool: &PoolId, staker: &StakerId) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .remove(&(pool.clone(), staker.clone()));
        Ok(())
    }

    fn iter_accounts(&self, pool: &PoolId) -> Result<Vec<(StakerId, Vec<u8>)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .filter(|((p, _), _)| p == pool)
            .map(|((_, staker), bytes)| (staker.clone(), bytes.clone()))
            .collect())
    }
}
