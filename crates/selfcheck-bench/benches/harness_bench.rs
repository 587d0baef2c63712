//! Instrumentation overhead benchmarks.
//!
//! Compares an instrumented utility call under a disabled harness (one flag
//! check per call site) with the same call under an enabled harness that
//! registers, reconciles and queues records.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use selfcheck_harness::diagnostics::DiagnosticsTarget;
use selfcheck_harness::{Condition, Harness, HarnessConfig, MemorySink};
use selfcheck_utility::MathUtility;

fn enabled_harness() -> Harness {
    let harness = Harness::disabled();
    harness.enable_with_sink(
        HarnessConfig::new("bench", "output.html").with_diagnostics(DiagnosticsTarget::Silent),
        Box::new(MemorySink::new()),
    );
    harness
}

fn bench_instrumented_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_even");

    let disabled = Harness::disabled();
    group.bench_function(BenchmarkId::new("disabled", "matched_input"), |b| {
        let math = MathUtility::new(&disabled);
        b.iter(|| black_box(math.is_even(black_box(2))));
    });

    let enabled = enabled_harness();
    group.bench_function(BenchmarkId::new("enabled", "matched_input"), |b| {
        let math = MathUtility::new(&enabled);
        b.iter(|| {
            let even = math.is_even(black_box(2));
            // Keep the queue from growing across iterations.
            black_box(enabled.render_report());
            even
        });
    });
    group.bench_function(BenchmarkId::new("enabled", "unmatched_input"), |b| {
        let math = MathUtility::new(&enabled);
        b.iter(|| black_box(math.is_even(black_box(7))));
    });

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let pending: &[usize] = &[1, 16, 256];
    let mut group = c.benchmark_group("log_reconcile");

    for &count in pending {
        group.bench_with_input(BenchmarkId::new("pending", count), &count, |b, &n| {
            let harness = enabled_harness();
            b.iter(|| {
                for i in 0..n {
                    let method = if i % 2 == 0 { "even" } else { "odd" };
                    harness.register_if_match(method, "x", &[Condition::new(1, 1)]);
                }
                black_box(harness.log("even", "x"));
                black_box(harness.log("odd", "x"));
                black_box(harness.render_report());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_instrumented_call, bench_reconcile);
criterion_main!(benches);
