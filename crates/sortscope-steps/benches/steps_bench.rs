//! Benchmarks for stepwise sorting
//!
//! Measures the cost of draining a generator end to end, which is dominated
//! by the per-step snapshot copy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sortscope_steps::{Algorithm, Pull};

/// Reverse-ordered input, the worst case for the quadratic algorithms.
fn descending(n: u32) -> Vec<u32> {
    (0..n).rev().collect()
}

fn drain(algo: Algorithm, input: &[u32]) -> usize {
    let mut generator = algo.generator(input);
    let mut steps = 0;
    while let Pull::Step(step) = generator.pull() {
        black_box(&step);
        steps += 1;
    }
    steps
}

/// Benchmark draining each algorithm at visualizer-sized inputs
fn bench_drain(c: &mut Criterion) {
    for algo in Algorithm::ALL {
        let mut group = c.benchmark_group(format!("drain_{algo}"));
        for &n in &[10u32, 50, 200] {
            let input = descending(n);
            group.throughput(Throughput::Elements(u64::from(n)));
            group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
                b.iter(|| drain(algo, black_box(input)))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_drain);
criterion_main!(benches);
