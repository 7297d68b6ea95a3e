//! 2-D fast multipole method evaluation of the logarithmic Coulomb
//! potential `phi(z_j) = sum_{k != j} q_k * log|z_j - z_k|` over N
//! point charges in a uniform quadtree (spec.md §1).
//!
//! The pipeline (spec.md §2) is: P2M at the leaves, an upward M2M
//! pass, a downward pass combining L2L and M2L, and leaf evaluation
//! combining local-expansion evaluation with near-field direct
//! interactions. [`direct::all_pairs`] is an independent O(N^2)
//! oracle used to validate the O(N) pipeline.

pub mod combinatorics;
pub mod complex;
pub mod config;
pub mod direct;
pub mod downward;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod expansion;
pub mod flops;
pub mod particles;
pub mod report;
pub mod stats;
pub mod tree;

pub use config::FmmConfig;
pub use engine::Engine;
pub use error::FmmError;
pub use particles::Particles;
pub use report::Report;
pub use stats::Stats;
