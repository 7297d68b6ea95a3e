//! Particle storage and generation. Pseudo-random generation is an
//! "external collaborator" concern per spec.md §1, but is provided
//! here (and used by both the CLI driver and the test/bench suite)
//! for reproducibility: the reference numerical configuration
//! (spec.md §6) needs a deterministic, seedable source.

use num::Complex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::FmmError;

#[derive(Debug, Clone)]
pub struct Particles {
    pub z: Vec<Complex<f64>>,
    pub q: Vec<f64>,
}

impl Particles {
    pub fn new(z: Vec<Complex<f64>>, q: Vec<f64>) -> Result<Self, FmmError> {
        if z.len() != q.len() {
            return Err(FmmError::MismatchedLengths {
                z_len: z.len(),
                q_len: q.len(),
            });
        }
        if z.is_empty() {
            return Err(FmmError::EmptyInput);
        }
        Ok(Self { z, q })
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Checks the §7 contract: every particle lies in `[0, box_size)^2`.
    pub fn validate(&self, box_size: f64) -> Result<(), FmmError> {
        for (j, z) in self.z.iter().enumerate() {
            if !(0.0..box_size).contains(&z.re) || !(0.0..box_size).contains(&z.im) {
                return Err(FmmError::ParticleOutOfBounds {
                    index: j,
                    x: z.re,
                    y: z.im,
                    box_size,
                });
            }
        }
        Ok(())
    }

    /// Uniform positions in `[0, box_size)^2`, charges in `[0, 1)`
    /// (spec.md §6's reference distribution), drawn from a seeded
    /// ChaCha8 stream so runs are reproducible.
    pub fn random_uniform(n: usize, box_size: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut z = Vec::with_capacity(n);
        let mut q = Vec::with_capacity(n);
        for _ in 0..n {
            let x = rng.gen_range(0.0..box_size);
            let y = rng.gen_range(0.0..box_size);
            z.push(Complex::new(x, y));
            q.push(rng.gen_range(0.0..1.0));
        }
        Self { z, q }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_uniform_stays_in_box() {
        let particles = Particles::random_uniform(500, 1.0, 42);
        assert!(particles.validate(1.0).is_ok());
        assert_eq!(particles.len(), 500);
    }

    #[test]
    fn random_uniform_is_deterministic_for_seed() {
        let a = Particles::random_uniform(64, 1.0, 7);
        let b = Particles::random_uniform(64, 1.0, 7);
        assert_eq!(a.z, b.z);
        assert_eq!(a.q, b.q);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Particles::new(vec![Complex::new(0.0, 0.0)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FmmError::MismatchedLengths { .. }));
    }

    #[test]
    fn validate_flags_out_of_range_particle() {
        let particles = Particles::new(vec![Complex::new(1.5, 0.2)], vec![1.0]).unwrap();
        let err = particles.validate(1.0).unwrap_err();
        assert!(matches!(err, FmmError::ParticleOutOfBounds { index: 0, .. }));
    }
}
