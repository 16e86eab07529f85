use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tidelock_pool::testing::{MemoryCustody, MemoryVault};
use tidelock_pool::StakePool;
use tidelock_types::{PoolConfig, PoolId, StakerId, Timestamp};

const TAU: u64 = 86_400;

fn make_pool_with_stakers(n: usize) -> (StakePool, MemoryVault, MemoryCustody) {
    let mut pool = StakePool::new(
        PoolId::new("bench"),
        PoolConfig::new(TAU),
        StakerId::new("authority"),
        Timestamp::new(0),
    )
    .unwrap();
    let mut vault = MemoryVault::default();
    let mut custody = MemoryCustody::default();

    for i in 0..n {
        let staker = StakerId::new(format!("staker-{i}"));
        vault.credit(&staker, 1_000_000);
        pool.stake(
            &staker,
            1_000_000,
            Timestamp::new(i as u64),
            &mut vault,
            &mut custody,
        )
        .unwrap();
    }

    let funder = StakerId::new("funder");
    custody.fund(&funder, 1_000_000_000);
    pool.deposit_rewards(&funder, 1_000_000_000, &mut custody)
        .unwrap();

    (pool, vault, custody)
}

fn bench_pending_rewards(c: &mut Criterion) {
    let mut group = c.benchmark_group("pending_rewards");
    for staker_count in [1, 100, 10_000] {
        let (pool, _vault, _custody) = make_pool_with_stakers(staker_count);
        let staker = StakerId::new("staker-0");
        let now = Timestamp::new(TAU);

        group.bench_with_input(
            BenchmarkId::new("query", staker_count),
            &staker_count,
            |b, _| {
                b.iter(|| black_box(pool.pending_rewards(black_box(&staker), black_box(now))));
            },
        );
    }
    group.finish();
}

fn bench_deposit_is_constant_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("deposit_rewards");
    for staker_count in [1, 100, 10_000] {
        let (mut pool, _vault, mut custody) = make_pool_with_stakers(staker_count);
        let funder = StakerId::new("funder");
        custody.fund(&funder, u64::MAX / 2);

        group.bench_with_input(
            BenchmarkId::new("deposit", staker_count),
            &staker_count,
            |b, _| {
                b.iter(|| pool.deposit_rewards(black_box(&funder), black_box(1_000), &mut custody));
            },
        );
    }
    group.finish();
}

fn bench_stake_unstake_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("stake_unstake");
    let (mut pool, mut vault, mut custody) = make_pool_with_stakers(100);
    let staker = StakerId::new("cycler");
    vault.credit(&staker, u64::MAX / 2);
    let now = Timestamp::new(TAU);

    group.bench_function("cycle", |b| {
        b.iter(|| {
            pool.stake(black_box(&staker), 1_000, now, &mut vault, &mut custody)
                .unwrap();
            pool.unstake(black_box(&staker), 1_000, now, &mut vault, &mut custody)
                .unwrap();
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_pending_rewards,
    bench_deposit_is_constant_time,
    bench_stake_unstake_cycle
);
criterion_main!(benches);
