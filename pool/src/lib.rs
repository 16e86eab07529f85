//! Tidelock reward-accounting engine.
//!
//! Stakers deposit principal into a pool and earn a share of periodically
//! deposited rewards, weighted by how long their stake has matured:
//!
//! `weight = principal × (1 − e^(−age/τ))`
//!
//! - New stakes start near 0% weight
//! - At age τ: ≈63% of principal, at 3τ: ≈95%, at 5τ: ≈99%
//!
//! Rewards are distributed with a snapshot-delta accumulator scaled by the
//! pool's *maximum possible* weight (total principal), so deposits are O(1)
//! regardless of participant count; each account's debt and claimed
//! snapshots turn the global accumulator into an individual entitlement.
//!
//! The engine is a pure state machine: every operation takes the current
//! time as an input, assumes the surrounding system serializes operations
//! per pool, and moves tokens only through the two narrow capabilities in
//! [`vault`].

pub mod engine;
pub mod error;
pub mod registry;
pub mod state;
pub mod store;
pub mod testing;
pub mod vault;
pub mod weight;

pub use engine::{PoolSnapshot, StakeOutcome, StakePool, UnstakeOutcome};
pub use error::StakingError;
pub use registry::PoolRegistry;
pub use state::{Authority, PoolLedger, StakeAccount, UnstakeRequest};
pub use store::{PoolStore, StoreError};
pub use vault::{PrincipalVault, RewardCustody, TransferError};
