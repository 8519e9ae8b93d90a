//! Benchmarks for pkgsearch-core: result cache and merge/rank.
//!
//! Performance targets:
//! - Cache lookup: < 10μs (runs on every keystroke)
//! - Cache insert at capacity (with eviction): < 1ms
//! - Merge and rank of 3 x 20 hits: < 100μs

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pkgsearch_core::{
    CacheEntry, PackageInfo, ParsedQuery, Registry, ResultCache, merge_and_rank,
};
use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn sample_results(registry: Registry, count: usize) -> Vec<PackageInfo> {
    (0..count)
        .map(|i| {
            PackageInfo::new(registry, format!("package-{}", i), "1.0.0")
                .with_description(Some(format!("Sample package number {}", i)))
                .with_downloads((i as u64) * 1_000)
                .with_relevance(1.0 / (i as f64 + 1.0))
        })
        .collect()
}

/// Benchmark cache lookups.
fn bench_cache_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_lookup");

    let cache = ResultCache::new();
    cache.put("react", sample_results(Registry::Npm, 15));

    group.bench_function("cache_hit", |b| {
        b.iter(|| cache.try_get(black_box("react")))
    });

    group.bench_function("cache_hit_unnormalized", |b| {
        b.iter(|| cache.try_get(black_box("  ReAcT ")))
    });

    group.bench_function("cache_miss", |b| {
        b.iter(|| cache.try_get(black_box("nonexistent")))
    });

    group.finish();
}

/// Benchmark lookups that find a stale entry and evict it.
fn bench_cache_expiry(c: &mut Criterion) {
    let results: Arc<[PackageInfo]> = sample_results(Registry::PyPi, 5).into();
    let cache = ResultCache::with_limits(Duration::from_secs(1), 100);

    c.bench_function("cache_expired_lookup", |b| {
        b.iter(|| {
            let stale = CacheEntry {
                results: Arc::clone(&results),
                created_at: Instant::now()
                    .checked_sub(Duration::from_secs(5))
                    .unwrap_or_else(Instant::now),
            };
            cache.insert_for_bench("flask", stale);
            cache.try_get(black_box("flask"))
        })
    });
}

/// Benchmark inserts below and at capacity.
fn bench_cache_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_insert");
    let results: Arc<[PackageInfo]> = sample_results(Registry::NuGet, 15).into();

    group.bench_function("below_capacity", |b| {
        let cache = ResultCache::with_limits(Duration::from_secs(600), 1_000_000);
        let mut i = 0_u64;
        b.iter(|| {
            i += 1;
            cache.put(black_box(&format!("query-{}", i)), Arc::clone(&results));
        })
    });

    for capacity in [100_usize, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("at_capacity", capacity),
            &capacity,
            |b, &capacity| {
                let cache = ResultCache::with_limits(Duration::from_secs(600), capacity);
                for i in 0..capacity {
                    cache.put(&format!("seed-{}", i), Arc::clone(&results));
                }
                let mut i = 0_u64;
                b.iter(|| {
                    i += 1;
                    cache.put(black_box(&format!("query-{}", i)), Arc::clone(&results));
                })
            },
        );
    }

    group.finish();
}

/// Benchmark cross-registry merge with overlapping names.
fn bench_merge_and_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_and_rank");

    for per_registry in [5_usize, 20, 100] {
        let batches = vec![
            sample_results(Registry::Npm, per_registry),
            sample_results(Registry::NuGet, per_registry),
            sample_results(Registry::PyPi, per_registry),
        ];

        group.bench_with_input(
            BenchmarkId::from_parameter(per_registry),
            &batches,
            |b, batches| b.iter(|| merge_and_rank(black_box(batches.clone()))),
        );
    }

    group.finish();
}

/// Benchmark query parsing.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("unfiltered", |b| {
        b.iter(|| ParsedQuery::parse(black_box("react router dom")))
    });

    group.bench_function("filtered", |b| {
        b.iter(|| ParsedQuery::parse(black_box("PIP   requests")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cache_lookup,
    bench_cache_expiry,
    bench_cache_insert,
    bench_merge_and_rank,
    bench_parse
);
criterion_main!(benches);
