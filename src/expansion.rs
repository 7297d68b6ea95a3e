//! Flat per-cell coefficient storage for multipole (`φ`) and local
//! (`ψ`) expansions, plus the P2M and M2M (upward-pass) operators.
//!
//! spec.md §9 recommends "a single flat array of complex\[P+1\] per
//! cell for φ and for ψ" over a tree of per-node allocations; this
//! struct is that array, one per level-concatenated cell index.

use num::Complex;

use crate::combinatorics::BinomialTable;
use crate::complex;
use crate::particles::Particles;
use crate::tree::{LeafBuckets, Quadtree};

#[derive(Debug, Clone)]
pub struct Expansions {
    order: usize,
    data: Vec<Complex<f64>>,
}

impl Expansions {
    pub fn zeros(num_cells: usize, order: usize) -> Self {
        Self {
            order,
            data: vec![Complex::new(0.0, 0.0); num_cells * (order + 1)],
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn coeffs(&self, cell: usize) -> &[Complex<f64>] {
        let w = self.order + 1;
        &self.data[cell * w..(cell + 1) * w]
    }

    pub fn coeffs_mut(&mut self, cell: usize) -> &mut [Complex<f64>] {
        let w = self.order + 1;
        &mut self.data[cell * w..(cell + 1) * w]
    }

    pub fn zero_cell(&mut self, cell: usize) {
        for c in self.coeffs_mut(cell) {
            *c = Complex::new(0.0, 0.0);
        }
    }
}

/// P2M (spec.md §4.3): forms the leaf-level multipole expansions from
/// the charges each leaf contains.
pub fn p2m(particles: &Particles, tree: &Quadtree, buckets: &LeafBuckets, phi: &mut Expansions) {
    let order = phi.order();
    let leaf_level = tree.depth();
    let lc = tree.cells_per_side(leaf_level) as usize;
    let leaf_offset = tree.offset(leaf_level);

    for leaf_local in 0..buckets.num_leaves() {
        let serial = leaf_offset + leaf_local;
        phi.zero_cell(serial);

        let ix = (leaf_local / lc) as u32;
        let iy = (leaf_local % lc) as u32;
        let center = tree.center(leaf_level, ix, iy);

        let coeffs = phi.coeffs_mut(serial);
        for &j in buckets.particles_in(leaf_local) {
            let d = particles.z[j] - center;
            let mut w = Complex::new(particles.q[j], 0.0);
            coeffs[0] += w;
            for a in 1..=order {
                w = complex::cmul(w, d);
                coeffs[a] += complex::smul(w, -1.0 / a as f64);
            }
        }
    }
}

/// M2M (spec.md §4.4): the upward pass, translating and summing each
/// cell's four children's multipoles into its own.
pub fn m2m(tree: &Quadtree, binom: &BinomialTable, phi: &mut Expansions) {
    let order = phi.order();

    for level in (0..tree.depth()).rev() {
        let lc = tree.cells_per_side(level);
        let child_level = level + 1;

        for ix in 0..lc {
            for iy in 0..lc {
                let serial = tree.serial_index(level, ix, iy);
                let center = tree.center(level, ix, iy);
                phi.zero_cell(serial);

                for dx in 0..2u32 {
                    for dy in 0..2u32 {
                        let cix = 2 * ix + dx;
                        let ciy = 2 * iy + dy;
                        let child_serial = tree.serial_index(child_level, cix, ciy);
                        let child_center = tree.center(child_level, cix, ciy);
                        let t = child_center - center;
                        let child: Vec<Complex<f64>> = phi.coeffs(child_serial).to_vec();

                        let parent = phi.coeffs_mut(serial);
                        parent[0] += child[0];

                        let mut t_pow_a = Complex::new(1.0, 0.0);
                        for a in 1..=order {
                            t_pow_a = complex::cmul(t_pow_a, t);
                            parent[a] +=
                                complex::smul(complex::cmul(child[0], t_pow_a), -1.0 / a as f64);

                            let mut t_pow_g = Complex::new(1.0, 0.0);
                            for g in 0..a {
                                if g > 0 {
                                    t_pow_g = complex::cmul(t_pow_g, t);
                                }
                                parent[a] += complex::smul(
                                    complex::cmul(child[a - g], t_pow_g),
                                    binom.get(a - 1, a - g - 1),
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
