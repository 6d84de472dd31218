//! Criterion benchmarks for logger_hierarchy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logger_hierarchy::prelude::*;
use std::sync::Arc;

// ============================================================================
// Registry Benchmarks
// ============================================================================

fn bench_registry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_lookup");
    group.throughput(Throughput::Elements(1));

    let registry = LoggerRegistry::new();
    registry.get("service.storage.db").unwrap();

    group.bench_function("existing", |b| {
        b.iter(|| black_box(registry.get(black_box("service.storage.db")).unwrap()));
    });

    group.bench_function("fresh_registry", |b| {
        b.iter(|| {
            let registry = LoggerRegistry::new();
            black_box(registry.get("service.storage.db").unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Level Check Benchmarks
// ============================================================================

fn bench_level_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_checks");
    group.throughput(Throughput::Elements(1));

    for depth in [1usize, 4, 8] {
        let registry = LoggerRegistry::builder().hierarchical(true).build();
        let name = (0..depth).map(|i| format!("n{}", i)).collect::<Vec<_>>().join(".");
        let logger = registry.get(&name).unwrap();

        group.bench_with_input(BenchmarkId::new("is_loggable", depth), &logger, |b, logger| {
            b.iter(|| black_box(logger.is_loggable(black_box(Level::FINE))));
        });
    }

    group.finish();
}

// ============================================================================
// Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let registry = LoggerRegistry::new();
    let logger = registry.get("bench").unwrap();

    group.bench_function("filtered_lazy", |b| {
        b.iter(|| {
            logger.log(
                Level::FINE,
                Message::lazy(|| format!("expensive {}", black_box(42))),
            )
        });
    });

    group.bench_function("no_subscribers", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    let sub = logger.subscribe();
    group.bench_function("stream_subscriber", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
            black_box(sub.try_recv())
        });
    });

    group.finish();
}

fn bench_hierarchical_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchical_fanout");
    group.throughput(Throughput::Elements(1));

    let registry = LoggerRegistry::builder().hierarchical(true).build();
    let logger = registry.get("a.b.c.d").unwrap();
    for name in ["", "a", "a.b", "a.b.c", "a.b.c.d"] {
        registry.get(name).unwrap().subscribe_with(|record| {
            black_box(record.sequence());
        });
    }

    group.bench_function("five_handlers", |b| {
        b.iter(|| logger.info(black_box("fan out")));
    });

    group.finish();
}

// ============================================================================
// Concurrent Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for thread_count in [2usize, 4] {
        group.throughput(Throughput::Elements(thread_count as u64 * 100));
        group.bench_with_input(
            BenchmarkId::new("threads", thread_count),
            &thread_count,
            |b, &threads| {
                let registry = Arc::new(LoggerRegistry::new());
                registry.root().subscribe_with(|record| {
                    black_box(record.sequence());
                });

                b.iter(|| {
                    let handles: Vec<_> = (0..threads)
                        .map(|t| {
                            let registry = Arc::clone(&registry);
                            std::thread::spawn(move || {
                                let logger = registry.get(&format!("worker{}", t)).unwrap();
                                for _ in 0..100 {
                                    logger.info("concurrent");
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_registry_lookup,
    bench_level_checks,
    bench_logging,
    bench_hierarchical_fanout,
    bench_concurrent_logging,
);

criterion_main!(benches);
