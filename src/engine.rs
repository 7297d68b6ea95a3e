//! Wires the FMM pipeline together: P2M -> M2M -> (L2L + M2L) -> leaf
//! evaluation (spec.md §2). The concrete analogue of the teacher's
//! `KiFmmLinear` + `FmmDataUniform` pairing, merged into one struct
//! since this crate has a single field-translation strategy.

use std::time::Instant;

use log::debug;

use crate::combinatorics::BinomialTable;
use crate::config::FmmConfig;
use crate::downward::downward_pass;
use crate::error::FmmError;
use crate::evaluation::evaluate_leaves;
use crate::expansion::{m2m, p2m, Expansions};
use crate::flops;
use crate::particles::Particles;
use crate::stats::Stats;
use crate::tree::{LeafBuckets, Quadtree};

pub struct Engine {
    config: FmmConfig,
    tree: Quadtree,
    binom: BinomialTable,
}

impl Engine {
    pub fn new(config: FmmConfig) -> Result<Self, FmmError> {
        config.validate()?;
        let tree = Quadtree::new(config.depth, config.box_size)?;
        let binom = BinomialTable::new(2 * config.order + 1);
        debug!(
            "engine ready: N={} L={} P={} ({} logical cores available for the rayon-parallel passes)",
            config.n,
            config.depth,
            config.order,
            num_cpus::get()
        );
        Ok(Self { config, tree, binom })
    }

    pub fn config(&self) -> &FmmConfig {
        &self.config
    }

    pub fn tree(&self) -> &Quadtree {
        &self.tree
    }

    /// Runs the full upward/downward/leaf-evaluation pipeline, writing
    /// the FMM potentials into `pot`.
    pub fn run(&self, particles: &Particles, pot: &mut [f64]) -> Result<Stats, FmmError> {
        if particles.len() != self.config.n {
            return Err(FmmError::ParticleCountMismatch {
                expected: self.config.n,
                actual: particles.len(),
            });
        }
        particles.validate(self.config.box_size)?;

        let order = self.config.order;
        let total_cells = self.tree.total_cells();
        let mut phi = Expansions::zeros(total_cells, order);
        let mut psi = Expansions::zeros(total_cells, order);
        let buckets = LeafBuckets::build(particles, &self.tree)?;

        let mut stats = Stats::default();

        let t0 = Instant::now();
        p2m(particles, &self.tree, &buckets, &mut phi);
        stats.p2m_time = t0.elapsed();
        stats.fmm_flops += flops::p2m_flops(particles.len(), order);
        debug!(
            "p2m: {} particles over {} leaves in {:?}",
            particles.len(),
            buckets.num_leaves(),
            stats.p2m_time
        );

        let t1 = Instant::now();
        m2m(&self.tree, &self.binom, &mut phi);
        stats.upward_time = t1.elapsed();
        let interior_cells = total_cells - self.tree.num_cells(self.tree.depth());
        stats.fmm_flops += flops::m2m_flops(interior_cells, order);
        debug!("m2m: {} interior cells in {:?}", interior_cells, stats.upward_time);

        let t2 = Instant::now();
        downward_pass(&self.tree, &self.binom, &phi, &mut psi);
        stats.downward_time = t2.elapsed();
        stats.fmm_flops += flops::l2l_flops(total_cells, order);
        stats.fmm_flops += flops::m2l_flops(total_cells * 27, order);
        debug!("downward pass: {} cells in {:?}", total_cells, stats.downward_time);

        let t3 = Instant::now();
        evaluate_leaves(particles, &self.tree, &buckets, &psi, pot)?;
        stats.leaf_eval_time = t3.elapsed();
        debug!("leaf evaluation in {:?}", stats.leaf_eval_time);

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::{all_pairs, energy};
    use crate::particles::Particles;
    use crate::report::Report;
    use num::Complex;

    #[test]
    fn two_particles_scenario_s1() {
        let config = FmmConfig {
            n: 2,
            box_size: 1.0,
            depth: 2,
            order: 4,
        };
        let engine = Engine::new(config).unwrap();
        let particles =
            Particles::new(vec![Complex::new(0.1, 0.1), Complex::new(0.9, 0.9)], vec![1.0, 1.0])
                .unwrap();
        let mut pot = vec![0.0; 2];
        engine.run(&particles, &mut pot).unwrap();

        let expected = (0.64_f64 + 0.64_f64).sqrt().ln();
        assert!((pot[0] - expected).abs() < 1e-6);
        assert!((pot[1] - expected).abs() < 1e-6);
    }

    #[test]
    fn three_collinear_particles_scenario_s2() {
        let config = FmmConfig {
            n: 3,
            box_size: 1.0,
            depth: 2,
            order: 6,
        };
        let engine = Engine::new(config).unwrap();
        let particles = Particles::new(
            vec![
                Complex::new(0.2, 0.5),
                Complex::new(0.5, 0.5),
                Complex::new(0.8, 0.5),
            ],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap();
        let mut pot = vec![0.0; 3];
        engine.run(&particles, &mut pot).unwrap();

        let pot_direct = all_pairs(&particles).unwrap();
        for j in 0..3 {
            let rel = ((pot[j] - pot_direct[j]) / pot_direct[j]).abs();
            assert!(rel < 1e-4, "particle {j}: fmm={} direct={}", pot[j], pot_direct[j]);
        }
    }

    #[test]
    fn single_particle_scenario_s4() {
        let config = FmmConfig {
            n: 1,
            box_size: 1.0,
            depth: 2,
            order: 4,
        };
        let engine = Engine::new(config).unwrap();
        let particles = Particles::new(vec![Complex::new(0.5, 0.5)], vec![1.0]).unwrap();
        let mut pot = vec![0.0; 1];
        engine.run(&particles, &mut pot).unwrap();
        assert_eq!(pot[0], 0.0);

        let pot_direct = all_pairs(&particles).unwrap();
        assert_eq!(pot_direct[0], 0.0);
    }

    #[test]
    fn zero_charges_scenario_s5() {
        let config = FmmConfig {
            n: 1000,
            box_size: 1.0,
            depth: 4,
            order: 5,
        };
        let engine = Engine::new(config).unwrap();
        let base = Particles::random_uniform(1000, 1.0, 77);
        let particles = Particles::new(base.z, vec![0.0; 1000]).unwrap();
        let mut pot = vec![0.0; 1000];
        engine.run(&particles, &mut pot).unwrap();
        assert!(pot.iter().all(|&p| p == 0.0));

        let pot_direct = all_pairs(&particles).unwrap();
        assert!(pot_direct.iter().all(|&p| p == 0.0));
        assert_eq!(energy(&particles.q, &pot), 0.0);
        assert_eq!(energy(&particles.q, &pot_direct), 0.0);
    }

    #[test]
    fn random_uniform_meets_accuracy_targets() {
        // A smaller stand-in for S3 (N=16000, L=6, P=6): the same
        // tolerances apply at any N large enough to exercise a full
        // multi-level interaction list.
        let config = FmmConfig {
            n: 2000,
            box_size: 1.0,
            depth: 5,
            order: 6,
        };
        let engine = Engine::new(config).unwrap();
        let particles = Particles::random_uniform(2000, 1.0, 101);
        let mut pot = vec![0.0; 2000];
        engine.run(&particles, &mut pot).unwrap();
        let pot_direct = all_pairs(&particles).unwrap();

        let report = Report::compute(&pot, &pot_direct, &particles.q);
        assert!(
            report.max_relative_potential_diff <= 1e-2,
            "max relative diff too large: {}",
            report.max_relative_potential_diff
        );
        assert!(
            report.relative_energy_error <= 1e-2,
            "relative energy error too large: {}",
            report.relative_energy_error
        );
    }

    #[test]
    fn rejects_particle_count_mismatch() {
        let config = FmmConfig {
            n: 2,
            box_size: 1.0,
            depth: 2,
            order: 4,
        };
        let engine = Engine::new(config).unwrap();
        let particles = Particles::new(vec![Complex::new(0.1, 0.1)], vec![1.0]).unwrap();
        let mut pot = vec![0.0; 1];
        let err = engine.run(&particles, &mut pot).unwrap_err();
        assert!(matches!(err, FmmError::ParticleCountMismatch { .. }));
    }
}
