//! Leaf evaluation (spec.md §4.6): local-expansion evaluation at each
//! particle plus the near-field direct sum over a leaf cell and its 8
//! neighbors.

use num::Complex;

use crate::complex;
use crate::error::FmmError;
use crate::expansion::Expansions;
use crate::particles::Particles;
use crate::tree::{LeafBuckets, Quadtree};

pub fn evaluate_leaves(
    particles: &Particles,
    tree: &Quadtree,
    buckets: &LeafBuckets,
    psi: &Expansions,
    pot: &mut [f64],
) -> Result<(), FmmError> {
    let order = psi.order();
    let leaf_level = tree.depth();
    let lc = tree.cells_per_side(leaf_level) as usize;
    let leaf_offset = tree.offset(leaf_level);

    // Evaluate each particle's own cell's local expansion.
    for leaf_local in 0..buckets.num_leaves() {
        let serial = leaf_offset + leaf_local;
        let ix = (leaf_local / lc) as u32;
        let iy = (leaf_local % lc) as u32;
        let center = tree.center(leaf_level, ix, iy);
        let coeffs = psi.coeffs(serial);

        for &j in buckets.particles_in(leaf_local) {
            let d = particles.z[j] - center;
            let mut term = Complex::new(1.0, 0.0);
            let mut acc = coeffs[0];
            for a in 1..=order {
                term = complex::cmul(term, d);
                acc += complex::cmul(coeffs[a], term);
            }
            pot[j] = acc.re;
        }
    }

    // Near-field direct sum. Writes into `pot` are not partitioned by
    // leaf (a pair straddling two cells updates both entries), so this
    // loop stays sequential; see DESIGN.md for where this crate does
    // apply rayon.
    for ix in 0..lc as u32 {
        for iy in 0..lc as u32 {
            let leaf_local = ix as usize * lc + iy as usize;
            let cell_particles = buckets.particles_in(leaf_local);
            if cell_particles.is_empty() {
                continue;
            }

            for (nix, niy) in tree.neighbors(leaf_level, ix, iy) {
                let neighbor_local = nix as usize * lc + niy as usize;
                let neighbor_particles = buckets.particles_in(neighbor_local);
                if neighbor_particles.is_empty() {
                    continue;
                }

                for &j in cell_particles {
                    for &k in neighbor_particles {
                        if j < k {
                            let delta = particles.z[j] - particles.z[k];
                            let r = delta.norm();
                            if r <= 0.0 {
                                return Err(FmmError::CoincidentParticles { a: j, b: k, dist: r });
                            }
                            let log_r = r.ln();
                            pot[j] += particles.q[k] * log_r;
                            pot[k] += particles.q[j] * log_r;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
