//! Fundamental types for the Tidelock staking ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identifiers, timestamps and pool configuration.

pub mod config;
pub mod id;
pub mod time;

pub use config::{ConfigError, PoolConfig};
pub use id::{PoolId, StakerId};
pub use time::Timestamp;
