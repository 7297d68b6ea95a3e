//! Thin driver around the `logfmm2d` core (spec.md §1 scopes argument
//! parsing, I/O, particle generation and instrumentation out of the
//! core itself; this binary supplies them).

use std::time::Instant;

use clap::Parser;
use log::info;

use logfmm2d::config::FmmConfig;
use logfmm2d::direct;
use logfmm2d::engine::Engine;
use logfmm2d::error::FmmError;
use logfmm2d::flops;
use logfmm2d::particles::Particles;
use logfmm2d::report::Report;

/// 2-D FMM evaluation of the logarithmic Coulomb potential.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of particles.
    #[arg(long, default_value_t = 16_000)]
    n: usize,

    /// Side length of the square domain.
    #[arg(long, default_value_t = 1.0)]
    box_size: f64,

    /// Quadtree depth (L).
    #[arg(long, default_value_t = 6)]
    depth: u32,

    /// Multipole/local expansion order (P).
    #[arg(long, default_value_t = 6)]
    order: usize,

    /// Seed for the particle generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), FmmError> {
    env_logger::init();
    let args = Args::parse();

    let config = FmmConfig {
        n: args.n,
        box_size: args.box_size,
        depth: args.depth,
        order: args.order,
    };

    info!(
        "generating {} particles in [0, {}) with seed {}",
        config.n, config.box_size, args.seed
    );
    let particles = Particles::random_uniform(config.n, config.box_size, args.seed);

    let engine = Engine::new(config)?;
    let mut pot = vec![0.0; config.n];

    info!(
        "running FMM pipeline (L={}, P={}, N={})",
        config.depth, config.order, config.n
    );
    let mut stats = engine.run(&particles, &mut pot)?;

    info!("running all-pairs reference");
    let t0 = Instant::now();
    let pot_direct = direct::all_pairs(&particles)?;
    stats.direct_time = t0.elapsed();
    stats.direct_flops = flops::direct_pair_flops(config.n * (config.n.saturating_sub(1)));

    let report = Report::compute(&pot, &pot_direct, &particles.q);
    println!("{report}");
    println!(
        "===== FMM & direct CPU times = {:e} {:e} =====",
        stats.fmm_time().as_secs_f64(),
        stats.direct_time.as_secs_f64()
    );
    println!(
        "===== FMM & direct CPU floating-point operations = {:e} {:e} =====",
        stats.fmm_flops, stats.direct_flops
    );
    println!(
        "===== FMM & direct CPU floating-point Gflop/s = {:e} {:e} =====",
        stats.fmm_gflops(),
        stats.direct_gflops()
    );

    Ok(())
}
