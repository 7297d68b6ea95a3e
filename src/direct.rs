//! All-pairs reference evaluator (spec.md §4.7), independent of the
//! FMM pipeline and used as the ground-truth oracle for validation.

use rayon::prelude::*;

use crate::error::FmmError;
use crate::particles::Particles;

/// `pot_direct[j] = sum_{k != j} q_k * log|z_j - z_k|`, the defining
/// formula of spec.md §1. Each output entry is independent of every
/// other, so (unlike the FMM's near-field step) the outer loop
/// parallelizes over particles with no shared mutable state.
pub fn all_pairs(particles: &Particles) -> Result<Vec<f64>, FmmError> {
    let n = particles.len();
    (0..n)
        .into_par_iter()
        .map(|j| {
            let mut acc = 0.0_f64;
            for k in 0..n {
                if k == j {
                    continue;
                }
                let delta = particles.z[j] - particles.z[k];
                let r = delta.norm();
                if r <= 0.0 {
                    return Err(FmmError::CoincidentParticles { a: j, b: k, dist: r });
                }
                acc += particles.q[k] * r.ln();
            }
            Ok(acc)
        })
        .collect()
}

/// Total electrostatic energy `0.5 * sum_j q_j * pot[j]`, summed over
/// every particle (spec.md §9 notes the source's `0..N-1` bound is an
/// off-by-one; this sums the physically correct full range).
pub fn energy(q: &[f64], pot: &[f64]) -> f64 {
    0.5 * q.iter().zip(pot).map(|(qi, pi)| qi * pi).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num::Complex;

    #[test]
    fn single_pair_matches_exact_formula() {
        let particles = Particles::new(
            vec![Complex::new(0.1, 0.1), Complex::new(0.9, 0.9)],
            vec![1.0, 1.0],
        )
        .unwrap();
        let pot = all_pairs(&particles).unwrap();
        let expected = (0.64_f64 + 0.64_f64).sqrt().ln();
        assert_relative_eq!(pot[0], expected, epsilon = 1e-12);
        assert_relative_eq!(pot[1], expected, epsilon = 1e-12);
    }

    #[test]
    fn single_particle_has_zero_potential() {
        let particles = Particles::new(vec![Complex::new(0.5, 0.5)], vec![1.0]).unwrap();
        let pot = all_pairs(&particles).unwrap();
        assert_relative_eq!(pot[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_charges_give_zero_potential_and_energy() {
        let particles = Particles::random_uniform(100, 1.0, 11);
        let zero_q = Particles::new(particles.z, vec![0.0; 100]).unwrap();
        let pot = all_pairs(&zero_q).unwrap();
        assert!(pot.iter().all(|&p| p == 0.0));
        assert_eq!(energy(&zero_q.q, &pot), 0.0);
    }

    #[test]
    fn linear_in_charges() {
        let particles = Particles::random_uniform(40, 1.0, 21);
        let pot = all_pairs(&particles).unwrap();

        let scaled_q: Vec<f64> = particles.q.iter().map(|q| q * 2.5).collect();
        let scaled = Particles::new(particles.z.clone(), scaled_q).unwrap();
        let pot_scaled = all_pairs(&scaled).unwrap();

        for (p, ps) in pot.iter().zip(&pot_scaled) {
            assert_relative_eq!(ps, &(p * 2.5), epsilon = 1e-9);
        }
    }

    #[test]
    fn translation_preserves_potential_differences() {
        let particles = Particles::random_uniform(40, 1.0, 33);
        let pot = all_pairs(&particles).unwrap();

        let shifted_z: Vec<Complex<f64>> = particles
            .z
            .iter()
            .map(|z| z + Complex::new(0.02, 0.02))
            .collect();
        let shifted = Particles::new(shifted_z, particles.q.clone()).unwrap();
        let pot_shifted = all_pairs(&shifted).unwrap();

        for j in 1..particles.len() {
            let diff_before = pot[j] - pot[0];
            let diff_after = pot_shifted[j] - pot_shifted[0];
            assert_relative_eq!(diff_before, diff_after, epsilon = 1e-8);
        }
    }

    #[test]
    fn coincident_particles_are_rejected() {
        let particles = Particles::new(
            vec![Complex::new(0.4, 0.4), Complex::new(0.4, 0.4)],
            vec![1.0, 1.0],
        )
        .unwrap();
        let err = all_pairs(&particles).unwrap_err();
        assert!(matches!(err, FmmError::CoincidentParticles { .. }));
    }
}
