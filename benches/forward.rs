//! Criterion benchmarks for the forward-propagation engine.
//!
//! Run with:
//!   cargo bench
//!   cargo bench --features parallel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dendrite::network::{Calibration, Network};

fn ready_actor(state_dim: usize) -> Network {
    let mut net = Network::actor("bench_actor", state_dim, 1).unwrap();
    for idx in 1..net.num_layers() {
        let (inputs, neurons) = {
            let layer = net.layer(idx).unwrap();
            (layer.num_inputs(), layer.num_neurons())
        };
        let matrix: Vec<Vec<f32>> = (0..inputs)
            .map(|i| (0..neurons).map(|n| ((i + n) % 7) as f32 * 0.01).collect())
            .collect();
        net.set_layer_weights(idx, &matrix).unwrap();
        net.set_layer_biases(idx, &vec![0.01; neurons]).unwrap();
    }
    net.apply_calibration(&Calibration::pendulum_actor()).unwrap();
    net
}

/// Benchmark evaluate() on the actor topology with varying state widths.
fn bench_evaluate_actor(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_actor");

    for state_dim in [3usize, 8, 32, 128].iter() {
        group.throughput(Throughput::Elements(*state_dim as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(state_dim),
            state_dim,
            |b, &state_dim| {
                let mut net = ready_actor(state_dim);
                let state: Vec<f32> = (0..state_dim).map(|i| (i as f32).sin()).collect();

                b.iter(|| black_box(net.evaluate(&state).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark evaluate() on wider generic chains.
fn bench_evaluate_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_wide");

    for width in [64usize, 256, 1024].iter() {
        group.throughput(Throughput::Elements(*width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, &width| {
            let mut net = Network::new("bench_wide", &[16, width, width, 4]).unwrap();
            let state = vec![0.5f32; 16];

            b.iter(|| black_box(net.evaluate(&state).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate_actor, bench_evaluate_wide);
criterion_main!(benches);
