//! Error taxonomy for contract violations and setup-time failures
//! (spec.md §7). All errors are surfaced synchronously to the caller;
//! there is no in-pass recovery or retry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FmmError {
    #[error("particle {index} at position ({x}, {y}) lies outside [0, {box_size})^2")]
    ParticleOutOfBounds {
        index: usize,
        x: f64,
        y: f64,
        box_size: f64,
    },

    #[error("coincident particles {a} and {b} at distance {dist:e}")]
    CoincidentParticles { a: usize, b: usize, dist: f64 },

    #[error("tree depth must be >= 2, got {0}")]
    DepthTooSmall(u32),

    #[error("particle count must be nonzero")]
    EmptyInput,

    #[error("z and q arrays have mismatched lengths: {z_len} vs {q_len}")]
    MismatchedLengths { z_len: usize, q_len: usize },

    #[error("engine configured for {expected} particles, got {actual}")]
    ParticleCountMismatch { expected: usize, actual: usize },
}
