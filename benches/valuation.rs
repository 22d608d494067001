//! Benchmarks for bit-vector domain queries.
//!
//! Each benchmark builds a batch of domains with a range and a few pinned bits,
//! then measures one operation over a batch of random targets.
//!
//! Run with:
//! ```bash
//! cargo bench --bench valuation
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use sls_bv::bitvect::BitVect;
use sls_bv::valuation::Valuation;

fn random_bitvect(rng: &mut ChaCha8Rng, bw: usize) -> BitVect {
    let mut v = BitVect::new(bw);
    for w in v.words_mut() {
        *w = rng.random();
    }
    v.clear_overflow_bits();
    v
}

/// Generate deterministic domains of width `bw` for reproducible benchmarks.
fn random_domains(seed: u64, bw: usize, count: usize) -> Vec<Valuation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut v = Valuation::new(bw);
            let lo = random_bitvect(&mut rng, bw).to_magnitude();
            let hi = random_bitvect(&mut rng, bw).to_magnitude();
            v.add_range(lo, hi);
            for i in 0..bw {
                if rng.random_bool(0.1) {
                    let b = v.bits().get(i);
                    v.fix_bit(i, b);
                }
            }
            v.tighten();
            v
        })
        .collect()
}

fn random_targets(seed: u64, bw: usize, count: usize) -> Vec<BitVect> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| random_bitvect(&mut rng, bw)).collect()
}

// ============================================================================
// Benchmark: get_at_most
// ============================================================================

fn bench_get_at_most(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuation/get_at_most");

    for bw in [8, 64, 128, 512] {
        let domains = random_domains(42, bw, 64);
        let targets = random_targets(123, bw, 64);

        group.throughput(Throughput::Elements((domains.len() * targets.len()) as u64));
        group.bench_with_input(BenchmarkId::new("bw", bw), &(domains, targets), |b, (domains, targets)| {
            b.iter(|| {
                let mut found = 0usize;
                for v in domains.iter() {
                    for t in targets.iter() {
                        if v.get_at_most(t).is_some() {
                            found += 1;
                        }
                    }
                }
                found
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: repair + commit
// ============================================================================

fn bench_repair_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuation/repair");

    for bw in [8, 64, 128, 512] {
        let domains = random_domains(7, bw, 64);
        let targets = random_targets(8, bw, 64);

        group.throughput(Throughput::Elements((domains.len() * targets.len()) as u64));
        group.bench_with_input(BenchmarkId::new("bw", bw), &targets, |b, targets| {
            b.iter_with_setup(
                || domains.clone(),
                |mut domains| {
                    for (i, v) in domains.iter_mut().enumerate() {
                        for t in targets.iter() {
                            v.repair(i % 2 == 0, t);
                            v.commit();
                        }
                    }
                    domains
                },
            );
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: randomized proposals
// ============================================================================

fn bench_set_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuation/set_random");

    for bw in [8, 64, 128, 512] {
        let domains = random_domains(99, bw, 64);
        let targets = random_targets(100, bw, 64);

        group.throughput(Throughput::Elements((domains.len() * targets.len()) as u64));
        group.bench_with_input(BenchmarkId::new("at_most", bw), &targets, |b, targets| {
            b.iter_with_setup(
                || (domains.clone(), ChaCha8Rng::seed_from_u64(1)),
                |(mut domains, mut rng)| {
                    let mut staged = 0usize;
                    for v in domains.iter_mut() {
                        for t in targets.iter() {
                            if v.set_random_at_most(t, &mut rng) {
                                staged += 1;
                            }
                        }
                    }
                    staged
                },
            );
        });
        group.bench_with_input(BenchmarkId::new("at_least", bw), &targets, |b, targets| {
            b.iter_with_setup(
                || (domains.clone(), ChaCha8Rng::seed_from_u64(2)),
                |(mut domains, mut rng)| {
                    let mut staged = 0usize;
                    for v in domains.iter_mut() {
                        for t in targets.iter() {
                            if v.set_random_at_least(t, &mut rng) {
                                staged += 1;
                            }
                        }
                    }
                    staged
                },
            );
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: tighten
// ============================================================================

fn bench_tighten(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuation/tighten");

    for bw in [8, 64, 128, 512] {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let domains: Vec<Valuation> = (0..64)
            .map(|_| {
                let mut v = Valuation::new(bw);
                let lo = random_bitvect(&mut rng, bw).to_magnitude();
                let hi = random_bitvect(&mut rng, bw).to_magnitude();
                v.add_range(lo, hi);
                for i in 0..bw {
                    if rng.random_bool(0.2) {
                        let b = v.bits().get(i);
                        v.fix_bit(i, b);
                    }
                }
                v
            })
            .collect();

        group.throughput(Throughput::Elements(domains.len() as u64));
        group.bench_function(BenchmarkId::new("bw", bw), |b| {
            b.iter_with_setup(
                || domains.clone(),
                |mut domains| {
                    for v in domains.iter_mut() {
                        v.tighten();
                    }
                    domains
                },
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_at_most, bench_repair_commit, bench_set_random, bench_tighten);

criterion_main!(benches);
