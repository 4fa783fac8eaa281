use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::*;

fn tiers() -> Vec<(&'static str, GameConfig)> {
    let mut tiers: Vec<_> = Difficulty::PRESET_LEVELS
        .iter()
        .map(|&difficulty| (difficulty.name(), GameConfig::preset(difficulty)))
        .collect();
    tiers.push(("Huge", GameConfig::custom(1000, 1000, 150_000).unwrap()));
    tiers
}

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for (name, config) in tiers() {
        let start = (config.rows() / 2, config.cols() / 2);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            let mut rng = SmallRng::seed_from_u64(1);
            b.iter(|| {
                RandomMinefieldGenerator::new(&mut rng, start, SafeZone::Neighborhood)
                    .generate(black_box(config))
            })
        });
    }
    group.finish();
}

fn bench_first_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_sweep");
    for (name, config) in tiers() {
        let start = (config.rows() / 2, config.cols() / 2);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut session = GameSession::with_seed(config, seed);
                black_box(session.sweep(start))
            })
        });
    }
    group.finish();
}

fn bench_empty_flood(c: &mut Criterion) {
    let layout = MineLayout::from_mine_coords((1000, 1000), &[]).unwrap();
    c.bench_function("flood_empty_1000x1000", |b| {
        b.iter(|| {
            let mut session = GameSession::with_layout(layout.clone(), SmallRng::seed_from_u64(0));
            black_box(session.sweep((0, 0)))
        })
    });
}

criterion_group!(benches, bench_placement, bench_first_sweep, bench_empty_flood);
criterion_main!(benches);
