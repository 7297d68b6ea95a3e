use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use logfmm2d::config::FmmConfig;
use logfmm2d::engine::Engine;
use logfmm2d::particles::Particles;

fn bench_fmm_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("fmm_pipeline");
    for &order in &[2usize, 4, 6, 8] {
        let config = FmmConfig {
            n: 4000,
            box_size: 1.0,
            depth: 5,
            order,
        };
        let engine = Engine::new(config).unwrap();
        let particles = Particles::random_uniform(config.n, config.box_size, 1);
        let mut pot = vec![0.0; config.n];

        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, _| {
            b.iter(|| {
                engine.run(&particles, &mut pot).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_direct_reference(c: &mut Criterion) {
    let particles = Particles::random_uniform(2000, 1.0, 1);
    c.bench_function("all_pairs_n2000", |b| {
        b.iter(|| logfmm2d::direct::all_pairs(&particles).unwrap());
    });
}

criterion_group!(benches, bench_fmm_pipeline, bench_direct_reference);
criterion_main!(benches);
