//! Uniform quadtree indexing (spec.md §3, §4.4, §4.5): dense per-level
//! cell arrays addressed by a serial index, replacing any tree of
//! linked nodes (spec.md §9, "Data structure choices").

use itertools::Itertools;
use num::Complex;

use crate::error::FmmError;
use crate::particles::Particles;

/// `offset(l) = (4^l - 1) / 3`, the serial index of the first cell at
/// level `l` when levels `0..=depth` are concatenated.
#[derive(Debug, Clone)]
pub struct Quadtree {
    depth: u32,
    box_size: f64,
    offsets: Vec<usize>,
}

impl Quadtree {
    pub fn new(depth: u32, box_size: f64) -> Result<Self, FmmError> {
        if depth < 2 {
            return Err(FmmError::DepthTooSmall(depth));
        }
        let mut offsets = Vec::with_capacity(depth as usize + 1);
        let mut acc = 0usize;
        let mut cells_at_level = 1usize;
        for _ in 0..=depth {
            offsets.push(acc);
            acc += cells_at_level;
            cells_at_level *= 4;
        }
        Ok(Self {
            depth,
            box_size,
            offsets,
        })
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn box_size(&self) -> f64 {
        self.box_size
    }

    pub fn offset(&self, level: u32) -> usize {
        self.offsets[level as usize]
    }

    /// `2^level` cells along each side of the box at `level`.
    pub fn cells_per_side(&self, level: u32) -> u32 {
        1u32 << level
    }

    pub fn num_cells(&self, level: u32) -> usize {
        (self.cells_per_side(level) as usize).pow(2)
    }

    /// `BOX / 2^level`.
    pub fn side(&self, level: u32) -> f64 {
        self.box_size / self.cells_per_side(level) as f64
    }

    pub fn total_cells(&self) -> usize {
        self.offset(self.depth) + self.num_cells(self.depth)
    }

    pub fn serial_index(&self, level: u32, ix: u32, iy: u32) -> usize {
        self.offset(level) + (ix as usize) * (self.cells_per_side(level) as usize) + iy as usize
    }

    pub fn center(&self, level: u32, ix: u32, iy: u32) -> Complex<f64> {
        let r = self.side(level);
        Complex::new((ix as f64 + 0.5) * r, (iy as f64 + 0.5) * r)
    }

    /// Parent's vector index `(ix/2, iy/2)`.
    pub fn parent_vector(ix: u32, iy: u32) -> (u32, u32) {
        (ix / 2, iy / 2)
    }

    /// Leaf-level vector index `(floor(z.re * 2^L / BOX), ...)`,
    /// clamped against floating-point rounding at the upper edge.
    pub fn leaf_vector(&self, z: Complex<f64>) -> (u32, u32) {
        let lc = self.cells_per_side(self.depth);
        let r = self.side(self.depth);
        let ix = ((z.re / r) as i64).clamp(0, lc as i64 - 1) as u32;
        let iy = ((z.im / r) as i64).clamp(0, lc as i64 - 1) as u32;
        (ix, iy)
    }

    /// Nearest-neighbor cells of `(ix, iy)` at `level`, including itself
    /// (the glossary's "near-field").
    pub fn neighbors(&self, level: u32, ix: u32, iy: u32) -> Vec<(u32, u32)> {
        let lc = self.cells_per_side(level) as i64;
        let lo_x = (ix as i64 - 1).max(0);
        let hi_x = (ix as i64 + 1).min(lc - 1);
        let lo_y = (iy as i64 - 1).max(0);
        let hi_y = (iy as i64 + 1).min(lc - 1);
        (lo_x..=hi_x)
            .cartesian_product(lo_y..=hi_y)
            .map(|(ux, uy)| (ux as u32, uy as u32))
            .collect_vec()
    }

    /// Interaction list of cell `(ix, iy)` at `level >= 2` (spec.md
    /// §4.5(b)): children of the nearest neighbors of its parent that
    /// are not themselves nearest neighbors of the cell.
    pub fn interaction_list(&self, level: u32, ix: u32, iy: u32) -> Vec<(u32, u32)> {
        let lc = self.cells_per_side(level) as i64;
        let (px, py) = (ix as i64 / 2, iy as i64 / 2);
        let lo_x = (2 * (px - 1)).max(0);
        let hi_x = (2 * (px + 1) + 1).min(lc - 1);
        let lo_y = (2 * (py - 1)).max(0);
        let hi_y = (2 * (py + 1) + 1).min(lc - 1);
        (lo_x..=hi_x)
            .cartesian_product(lo_y..=hi_y)
            .filter(|&(ux, uy)| {
                let dx = (ux - ix as i64).abs();
                let dy = (uy - iy as i64).abs();
                dx.max(dy) > 1
            })
            .map(|(ux, uy)| (ux as u32, uy as u32))
            .collect_vec()
    }
}

/// Particles grouped by leaf cell, stored as a counting-sort permutation
/// with `(start, end)` spans per leaf (spec.md §9's cache-friendlier
/// alternative to the source's head/next linked list).
#[derive(Debug, Clone)]
pub struct LeafBuckets {
    starts: Vec<usize>,
    order: Vec<usize>,
}

impl LeafBuckets {
    pub fn build(particles: &Particles, tree: &Quadtree) -> Result<Self, FmmError> {
        let lc = tree.cells_per_side(tree.depth()) as usize;
        let num_leaves = lc * lc;

        let mut leaf_of = Vec::with_capacity(particles.len());
        let mut counts = vec![0usize; num_leaves];
        for (j, &z) in particles.z.iter().enumerate() {
            if !(0.0..tree.box_size()).contains(&z.re) || !(0.0..tree.box_size()).contains(&z.im) {
                return Err(FmmError::ParticleOutOfBounds {
                    index: j,
                    x: z.re,
                    y: z.im,
                    box_size: tree.box_size(),
                });
            }
            let (ix, iy) = tree.leaf_vector(z);
            let local = ix as usize * lc + iy as usize;
            counts[local] += 1;
            leaf_of.push(local);
        }

        let mut starts = vec![0usize; num_leaves + 1];
        for i in 0..num_leaves {
            starts[i + 1] = starts[i] + counts[i];
        }

        let mut cursor = starts.clone();
        let mut order = vec![0usize; particles.len()];
        for (j, &local) in leaf_of.iter().enumerate() {
            order[cursor[local]] = j;
            cursor[local] += 1;
        }

        Ok(Self { starts, order })
    }

    pub fn num_leaves(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn particles_in(&self, leaf_local: usize) -> &[usize] {
        &self.order[self.starts[leaf_local]..self.starts[leaf_local + 1]]
    }
}
