//! End-to-end scenarios over a single pool.

use tidelock_math::WAD;
use tidelock_pool::testing::{MemoryCustody, MemoryVault};
use tidelock_pool::{PoolRegistry, StakePool, StakingError};
use tidelock_types::{PoolConfig, PoolId, StakerId, Timestamp};

fn ts(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}

struct Scenario {
    pool: StakePool,
    vault: MemoryVault,
    custody: MemoryCustody,
}

impl Scenario {
    fn with_config(config: PoolConfig) -> Self {
        Self {
            pool: StakePool::new(
                PoolId::new("scenario"),
                config,
                StakerId::new("authority"),
                ts(0),
            )
            .unwrap(),
            vault: MemoryVault::default(),
            custody: MemoryCustody::default(),
        }
    }

    fn new(tau: u64) -> Self {
        Self::with_config(PoolConfig::new(tau))
    }

    fn stake(&mut self, who: &StakerId, amount: u64, now: u64) {
        self.vault.credit(who, amount);
        self.pool
            .stake(who, amount, ts(now), &mut self.vault, &mut self.custody)
            .unwrap();
    }

    fn deposit(&mut self, amount: u64) {
        let funder = StakerId::new("funder");
        self.custody.fund(&funder, amount);
        self.pool
            .deposit_rewards(&funder, amount, &mut self.custody)
            .unwrap();
    }

    fn claim(&mut self, who: &StakerId, now: u64) -> u64 {
        match self.pool.claim_rewards(who, ts(now), &mut self.custody) {
            Ok(paid) => paid,
            Err(StakingError::NothingToClaim) => 0,
            Err(e) => panic!("claim failed: {e}"),
        }
    }
}

#[test]
fn basic_accrual_one_tau_pays_63_percent() {
    let mut s = Scenario::new(60);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000_000_000, 0);
    s.deposit(1_000_000_000);

    let claimable = s.pool.pending_rewards(&a, ts(60)).unwrap();
    let expected = 632_000_000u64;
    assert!(
        claimable.abs_diff(expected) < expected / 100,
        "claimable at τ was {claimable}, expected ≈{expected}"
    );
    assert_eq!(s.claim(&a, 60), claimable);
}

#[test]
fn maturity_curve_hits_the_canonical_points() {
    let mut s = Scenario::new(3600);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000_000, 0);

    let at = |s: &Scenario, t: u64| s.pool.maturity(&a, ts(t)).unwrap();
    let pct = |m: u128| (m * 1000 / WAD) as u64; // tenths of a percent

    assert_eq!(pct(at(&s, 0)), 0);
    let m_tau = pct(at(&s, 3600));
    assert!((628..=636).contains(&m_tau), "maturity at τ: {m_tau}‰");
    let m_3tau = pct(at(&s, 3 * 3600));
    assert!((946..=954).contains(&m_3tau), "maturity at 3τ: {m_3tau}‰");
    let m_5tau = pct(at(&s, 5 * 3600));
    assert!((988..=996).contains(&m_5tau), "maturity at 5τ: {m_5tau}‰");
}

#[test]
fn zero_amounts_are_rejected_without_mutation() {
    let mut s = Scenario::new(60);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);
    let before = s.pool.snapshot();

    assert_eq!(
        s.pool
            .stake(&a, 0, ts(1), &mut s.vault, &mut s.custody),
        Err(StakingError::ZeroAmount)
    );
    assert_eq!(
        s.pool
            .unstake(&a, 0, ts(1), &mut s.vault, &mut s.custody),
        Err(StakingError::ZeroAmount)
    );
    let funder = StakerId::new("funder");
    assert_eq!(
        s.pool.deposit_rewards(&funder, 0, &mut s.custody),
        Err(StakingError::ZeroAmount)
    );
    assert_eq!(
        s.pool.request_unstake(&a, 0, ts(1)),
        Err(StakingError::ZeroAmount)
    );
    assert_eq!(s.pool.snapshot(), before);
}

#[test]
fn lock_gates_unstaking_until_expiry() {
    let mut config = PoolConfig::new(60);
    config.lock_duration_seconds = 10;
    let mut s = Scenario::with_config(config);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);

    assert_eq!(
        s.pool
            .unstake(&a, 1_000, ts(5), &mut s.vault, &mut s.custody),
        Err(StakingError::StakeLocked { remaining_secs: 5 })
    );
    let out = s
        .pool
        .unstake(&a, 1_000, ts(11), &mut s.vault, &mut s.custody)
        .unwrap();
    assert_eq!(out.principal_returned, 1_000);
}

#[test]
fn lock_anchor_resets_on_each_stake() {
    let mut config = PoolConfig::new(60);
    config.lock_duration_seconds = 10;
    let mut s = Scenario::with_config(config);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);
    s.stake(&a, 1_000, 8);

    // The second stake re-anchored the lock at t=8.
    assert_eq!(
        s.pool
            .unstake(&a, 100, ts(12), &mut s.vault, &mut s.custody),
        Err(StakingError::StakeLocked { remaining_secs: 6 })
    );
    s.pool
        .unstake(&a, 100, ts(18), &mut s.vault, &mut s.custody)
        .unwrap();
}

#[test]
fn cooldown_flow_requests_waits_and_completes() {
    let mut config = PoolConfig::new(60);
    config.unstake_cooldown_seconds = 5;
    let mut s = Scenario::with_config(config);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);

    // Direct unstake is blocked on a cooldown pool.
    assert_eq!(
        s.pool
            .unstake(&a, 1_000, ts(1), &mut s.vault, &mut s.custody),
        Err(StakingError::CooldownRequired)
    );

    s.pool.request_unstake(&a, 600, ts(10)).unwrap();

    // No second request, no staking, while one is pending.
    assert_eq!(
        s.pool.request_unstake(&a, 100, ts(11)),
        Err(StakingError::PendingUnstakeRequestExists)
    );
    s.vault.credit(&a, 100);
    assert_eq!(
        s.pool
            .stake(&a, 100, ts(11), &mut s.vault, &mut s.custody),
        Err(StakingError::PendingUnstakeRequestExists)
    );

    // Too early.
    assert_eq!(
        s.pool
            .complete_unstake(&a, ts(13), &mut s.vault, &mut s.custody),
        Err(StakingError::CooldownNotElapsed { remaining_secs: 2 })
    );

    // Principal kept earning weight during the cooldown.
    let weight_mid = s.pool.weighted_stake(&a, ts(14)).unwrap();
    assert!(weight_mid > 0);

    let out = s
        .pool
        .complete_unstake(&a, ts(15), &mut s.vault, &mut s.custody)
        .unwrap();
    assert_eq!(out.principal_returned, 600);
    assert_eq!(out.remaining_principal, 400);
    assert_eq!(s.vault.balance_of(&a), 600);

    // The request is consumed; cancelling now fails.
    assert_eq!(
        s.pool.cancel_unstake_request(&a),
        Err(StakingError::NoPendingUnstakeRequest)
    );
}

#[test]
fn cancelled_request_allows_staking_again() {
    let mut config = PoolConfig::new(60);
    config.unstake_cooldown_seconds = 5;
    let mut s = Scenario::with_config(config);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);

    s.pool.request_unstake(&a, 1_000, ts(1)).unwrap();
    assert_eq!(s.pool.cancel_unstake_request(&a).unwrap(), 1_000);
    s.stake(&a, 500, 2);
    assert_eq!(s.pool.account(&a).unwrap().principal, 1_500);
}

#[test]
fn request_unstake_needs_a_configured_cooldown() {
    let mut s = Scenario::new(60);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);
    assert_eq!(
        s.pool.request_unstake(&a, 100, ts(1)),
        Err(StakingError::CooldownNotConfigured)
    );
}

#[test]
fn fully_unstaked_account_cannot_claim_later_deposits() {
    let mut s = Scenario::new(60);
    let a = StakerId::new("alice");
    let b = StakerId::new("bob");
    s.stake(&a, 1_000_000, 0);
    s.stake(&b, 1_000_000, 0);
    s.deposit(500_000);

    s.pool
        .unstake(&a, 1_000_000, ts(300), &mut s.vault, &mut s.custody)
        .unwrap();

    // Deposits after Alice left are Bob's alone.
    s.deposit(700_000);
    assert_eq!(s.pool.pending_rewards(&a, ts(600)).unwrap(), 0);
    assert_eq!(
        s.pool
            .claim_rewards(&a, ts(600), &mut s.custody),
        Err(StakingError::NothingToClaim)
    );
}

#[test]
fn min_stake_is_enforced_for_new_and_existing_accounts() {
    let mut config = PoolConfig::new(60);
    config.min_stake_amount = 1_000;
    let mut s = Scenario::with_config(config);
    let a = StakerId::new("alice");

    s.vault.credit(&a, 10_000);
    assert_eq!(
        s.pool
            .stake(&a, 999, ts(0), &mut s.vault, &mut s.custody),
        Err(StakingError::BelowMinimumStake {
            minimum: 1_000,
            resulting: 999
        })
    );
    s.pool
        .stake(&a, 1_000, ts(0), &mut s.vault, &mut s.custody)
        .unwrap();
    // Top-ups keeping the total above the minimum are fine.
    s.pool
        .stake(&a, 1, ts(1), &mut s.vault, &mut s.custody)
        .unwrap();
}

#[test]
fn stake_for_assigns_the_beneficiary() {
    let mut s = Scenario::new(60);
    let payer = StakerId::new("payer");
    let beneficiary = StakerId::new("beneficiary");
    s.vault.credit(&payer, 5_000);
    s.pool
        .stake_for(&payer, &beneficiary, 5_000, ts(0), &mut s.vault, &mut s.custody)
        .unwrap();

    assert!(s.pool.account(&payer).is_none());
    assert_eq!(s.pool.account(&beneficiary).unwrap().principal, 5_000);
    assert_eq!(s.vault.balance_of(&payer), 0);
}

#[test]
fn side_channel_value_is_distributed_exactly_once() {
    let mut s = Scenario::new(60);
    let a = StakerId::new("alice");
    s.stake(&a, 1_000_000, 0);

    let pool_id = s.pool.id().clone();
    s.custody.airdrop(&pool_id, 250_000);
    assert_eq!(s.pool.sync_rewards(&s.custody).unwrap(), 250_000);
    // Again: nothing new.
    assert_eq!(s.pool.sync_rewards(&s.custody).unwrap(), 0);

    // A regular deposit is pre-accounted and never re-distributed by sync.
    s.deposit(100_000);
    assert_eq!(s.pool.sync_rewards(&s.custody).unwrap(), 0);
}

#[test]
fn side_channel_value_waits_for_stakers() {
    let mut s = Scenario::new(60);
    let pool_id = s.pool.id().clone();
    s.custody.airdrop(&pool_id, 99_000);

    // Nobody staked yet: the delta stays unaccounted rather than burned.
    assert_eq!(s.pool.sync_rewards(&s.custody).unwrap(), 0);

    let a = StakerId::new("alice");
    s.stake(&a, 1_000, 0);
    assert_eq!(s.pool.sync_rewards(&s.custody).unwrap(), 99_000);

    // And it is claimable once matured.
    let claimed = s.claim(&a, 20 * 60);
    assert!(claimed > 0);
}

#[test]
fn full_cycle_leaves_only_rounding_dust() {
    let mut s = Scenario::new(60);
    let stakers: Vec<StakerId> = (0..4)
        .map(|n| StakerId::new(format!("staker-{n}")))
        .collect();
    for (i, who) in stakers.iter().enumerate() {
        s.stake(who, 1_000_000 + i as u64 * 777_777, 0);
    }
    s.deposit(10_000_000);
    s.deposit(5_000_000);

    // Everyone matures (30τ), then claims and leaves.
    let leave_at = 30 * 60;
    for who in &stakers {
        s.claim(who, leave_at);
        let principal = s.pool.account(who).unwrap().principal;
        s.pool
            .unstake(who, principal, ts(leave_at), &mut s.vault, &mut s.custody)
            .unwrap();
    }

    let residue = s.custody.custody_balance(s.pool.id());
    assert!(
        residue <= 1_000,
        "custody residue {residue} exceeds rounding tolerance"
    );

    // Conservation: paid + residue == deposited.
    let paid: u64 = stakers.iter().map(|w| s.custody.wallet_balance(w)).sum();
    assert_eq!(paid + residue, 15_000_000);
}

#[test]
fn registry_runs_the_whole_lifecycle() {
    let registry = PoolRegistry::new();
    let id = PoolId::new("lifecycle");
    let authority = StakerId::new("authority");
    registry
        .create_pool(id.clone(), PoolConfig::new(60), authority.clone(), ts(0))
        .unwrap();

    let mut vault = MemoryVault::default();
    let mut custody = MemoryCustody::default();
    let a = StakerId::new("alice");
    vault.credit(&a, 2_000);
    custody.fund(&authority, 1_000);

    registry
        .with_pool(&id, |pool| {
            pool.stake(&a, 2_000, ts(0), &mut vault, &mut custody)?;
            pool.deposit_rewards(&authority, 1_000, &mut custody)?;
            Ok(())
        })
        .unwrap();

    let pending = registry
        .with_pool(&id, |pool| pool.pending_rewards(&a, ts(600)))
        .unwrap();
    assert!(pending > 0);
}
