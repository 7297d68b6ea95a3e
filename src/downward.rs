//! L2L and M2L (spec.md §4.5): the downward pass. Local expansions at
//! levels 0 and 1 are identically zero (no well-separated cells exist
//! yet); from level 2 on, each cell's local expansion is its parent's
//! L2L translation plus the M2L contributions of its interaction list.

use num::Complex;

use crate::combinatorics::BinomialTable;
use crate::complex;
use crate::expansion::Expansions;
use crate::tree::Quadtree;

pub fn downward_pass(tree: &Quadtree, binom: &BinomialTable, phi: &Expansions, psi: &mut Expansions) {
    let order = psi.order();

    for level in 0..=1u32.min(tree.depth()) {
        let lc = tree.cells_per_side(level);
        for ix in 0..lc {
            for iy in 0..lc {
                psi.zero_cell(tree.serial_index(level, ix, iy));
            }
        }
    }

    for level in 2..=tree.depth() {
        let lc = tree.cells_per_side(level);

        // (a) L2L from the parent.
        for ix in 0..lc {
            for iy in 0..lc {
                let serial = tree.serial_index(level, ix, iy);
                let (pix, piy) = Quadtree::parent_vector(ix, iy);
                let parent_serial = tree.serial_index(level - 1, pix, piy);

                let center = tree.center(level, ix, iy);
                let parent_center = tree.center(level - 1, pix, piy);
                let t = center - parent_center;

                let parent_coeffs: Vec<Complex<f64>> = psi.coeffs(parent_serial).to_vec();
                let child = psi.coeffs_mut(serial);

                for a in 0..=order {
                    let mut acc = Complex::new(0.0, 0.0);
                    let mut t_pow_g = Complex::new(1.0, 0.0);
                    for g in 0..=(order - a) {
                        if g > 0 {
                            t_pow_g = complex::cmul(t_pow_g, t);
                        }
                        acc += complex::smul(
                            complex::cmul(parent_coeffs[a + g], t_pow_g),
                            binom.get(a + g, a),
                        );
                    }
                    child[a] = acc;
                }
            }
        }

        // (b) M2L from the interaction list.
        for ix in 0..lc {
            for iy in 0..lc {
                let ilist = tree.interaction_list(level, ix, iy);
                if ilist.is_empty() {
                    continue;
                }

                let serial = tree.serial_index(level, ix, iy);
                let center = tree.center(level, ix, iy);
                let mut local_psi: Vec<Complex<f64>> = psi.coeffs(serial).to_vec();

                for (uix, uiy) in ilist {
                    let i_serial = tree.serial_index(level, uix, uiy);
                    let i_center = tree.center(level, uix, uiy);
                    let d = center - i_center;
                    debug_assert!(d.norm_sqr() > 0.0, "M2L requires well-separated cells");

                    let phi_i = phi.coeffs(i_serial);
                    let inv_d = complex::cinv(d);
                    let log_d = complex::clog(d);

                    let mut acc0 = complex::cmul(phi_i[0], log_d);
                    let mut inv_pow_b = Complex::new(1.0, 0.0);
                    for b in 1..=order {
                        inv_pow_b = complex::cmul(inv_pow_b, inv_d);
                        acc0 += complex::cmul(phi_i[b], inv_pow_b);
                    }
                    local_psi[0] += acc0;

                    let neg_inv = complex::smul(inv_d, -1.0);
                    let mut neg_inv_pow_a = Complex::new(1.0, 0.0);
                    for a in 1..=order {
                        neg_inv_pow_a = complex::cmul(neg_inv_pow_a, neg_inv);

                        let term1 =
                            complex::smul(complex::cmul(phi_i[0], neg_inv_pow_a), -1.0 / a as f64);

                        let mut inner = Complex::new(0.0, 0.0);
                        let mut inv_pow_b = Complex::new(1.0, 0.0);
                        for b in 1..=order {
                            inv_pow_b = complex::cmul(inv_pow_b, inv_d);
                            inner += complex::smul(
                                complex::cmul(phi_i[b], inv_pow_b),
                                binom.get(a + b - 1, b - 1),
                            );
                        }
                        let term2 = complex::cmul(neg_inv_pow_a, inner);

                        local_psi[a] += term1 + term2;
                    }
                }

                psi.coeffs_mut(serial).copy_from_slice(&local_psi);
            }
        }
    }
}
