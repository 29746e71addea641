//! Perspective refinement and cell sampling.
//!
//! The initial fit uses only four reference points, so it drifts towards the
//! far corner. [`Scene::jiggle`] nudges each coefficient in turn and keeps
//! changes that make the known function patterns (timing, finders,
//! alignment) read better.

use super::Scene;
use crate::decoder::tables::alignment_pattern_positions;
use crate::models::{BitMatrix, Code};
use crate::utils::geometry::PerspectiveTransform;

/// Sample offsets within a cell for fitness scoring
const CELL_SAMPLES: [f64; 3] = [0.3, 0.5, 0.7];

/// Initial jiggle step as a fraction of each coefficient
const JIGGLE_STEP: f64 = 0.02;

impl Scene {
    /// +1 per dark sample and -1 per light sample over a 3x3 grid in cell `(x, y)`.
    ///
    /// Samples falling outside the image count for nothing.
    fn fitness_cell(&self, t: &PerspectiveTransform, x: i32, y: i32) -> i32 {
        let mut score = 0;
        for v in CELL_SAMPLES {
            for u in CELL_SAMPLES {
                let p = t.map(x as f64 + u, y as f64 + v);
                if self.contains(p) {
                    score += if self.pixel(p) != 0 { 1 } else { -1 };
                }
            }
        }
        score
    }

    /// Cell fitness summed over the square ring of radius `r` around `(cx, cy)`
    fn fitness_ring(&self, t: &PerspectiveTransform, cx: i32, cy: i32, r: i32) -> i32 {
        (0..r * 2)
            .map(|i| {
                self.fitness_cell(t, cx - r + i, cy - r)
                    + self.fitness_cell(t, cx - r, cy + r - i)
                    + self.fitness_cell(t, cx + r, cy - r + i)
                    + self.fitness_cell(t, cx + r - i, cy + r)
            })
            .sum()
    }

    /// Alignment pattern centered on `(cx, cy)`: dark, light ring, dark ring
    fn fitness_apat(&self, t: &PerspectiveTransform, cx: i32, cy: i32) -> i32 {
        self.fitness_cell(t, cx, cy) - self.fitness_ring(t, cx, cy, 1)
            + self.fitness_ring(t, cx, cy, 2)
    }

    /// Finder pattern whose top-left module is `(x, y)`
    fn fitness_capstone(&self, t: &PerspectiveTransform, x: i32, y: i32) -> i32 {
        let (x, y) = (x + 3, y + 3);
        self.fitness_cell(t, x, y) + self.fitness_ring(t, x, y, 1) - self.fitness_ring(t, x, y, 2)
            + self.fitness_ring(t, x, y, 3)
    }

    /// How well the function patterns of a `size` grid agree with the image
    pub(crate) fn fitness_all(&self, t: &PerspectiveTransform, size: usize) -> i32 {
        let n = size as i32;
        let mut score = 0;

        for i in 0..n - 14 {
            let expect = if i & 1 == 1 { 1 } else { -1 };
            score += self.fitness_cell(t, i + 7, 6) * expect;
            score += self.fitness_cell(t, 6, i + 7) * expect;
        }

        score += self.fitness_capstone(t, 0, 0);
        score += self.fitness_capstone(t, n - 7, 0);
        score += self.fitness_capstone(t, 0, n - 7);

        let version = ((size - 17) / 4) as u8;
        let positions: Vec<i32> = alignment_pattern_positions(version)
            .into_iter()
            .map(|p| p as i32)
            .collect();
        let inner = positions.len().saturating_sub(1);
        for &p in positions.iter().take(inner).skip(1) {
            score += self.fitness_apat(t, 6, p);
            score += self.fitness_apat(t, p, 6);
        }
        for &py in positions.iter().skip(1) {
            for &px in positions.iter().skip(1) {
                score += self.fitness_apat(t, px, py);
            }
        }

        score
    }

    /// Coordinate descent on the eight perspective coefficients.
    ///
    /// Each pass tries `c[j] +/- step[j]` and keeps strict improvements, then
    /// halves the steps.
    pub(crate) fn jiggle(&self, t: &mut PerspectiveTransform, size: usize) {
        let mut best = self.fitness_all(t, size);
        let mut adjust = t.c.map(|c| c * JIGGLE_STEP);

        for _ in 0..self.config.jiggle_passes {
            for i in 0..16 {
                let j = i >> 1;
                let old = t.c[j];
                t.c[j] = if i & 1 == 1 {
                    old + adjust[j]
                } else {
                    old - adjust[j]
                };

                let test = self.fitness_all(t, size);
                if test > best {
                    best = test;
                } else {
                    t.c[j] = old;
                }
            }
            adjust = adjust.map(|a| a * 0.5);
        }
        log::trace!("jiggle settled at fitness {best}");
    }

    /// Whether cell `(x, y)` is dark, sampled at its center.
    ///
    /// Samples outside the image read as light.
    pub(crate) fn read_cell(&self, t: &PerspectiveTransform, x: i32, y: i32) -> bool {
        let p = t.map(x as f64 + 0.5, y as f64 + 0.5);
        self.contains(p) && self.pixel(p) != 0
    }

    /// Sample grid `index` into a [`Code`]
    pub(crate) fn extract(&self, index: usize) -> Code {
        let grid = &self.grids[index];
        let t = &grid.transform;
        let size = grid.size;
        let n = size as f64;

        let corners = [
            t.map(0.0, 0.0),
            t.map(n, 0.0),
            t.map(n, n),
            t.map(0.0, n),
        ];
        let mut cells = BitMatrix::square(size);
        for y in 0..size {
            for x in 0..size {
                if self.read_cell(t, x as i32, y as i32) {
                    cells.set(x, y, true);
                }
            }
        }
        Code::new(corners, cells)
    }
}
