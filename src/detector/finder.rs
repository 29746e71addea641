//! Finder pattern detection.
//!
//! Each row of the label buffer is run-length scanned for the
//! dark/light/dark/light/dark sequence of a finder pattern cross-section.
//! Matching runs are confirmed against the labelled regions: the outer runs
//! must belong to one ring region enclosing a separate stone region.

use super::{Capstone, Scene};
use crate::models::Point;
use crate::utils::geometry::PerspectiveTransform;

/// Relative run widths across a finder pattern
const FINDER_RATIOS: [usize; 5] = [1, 1, 3, 1, 1];

/// Stone area as a percentage of ring area: 9 / 24 modules
const IDEAL_STONE_RATIO: f64 = 37.5;

/// Whether five run lengths match 1:1:3:1:1 within tolerance.
///
/// The unit is the average of the four thin runs; each run may deviate by
/// three quarters of a unit.
pub fn matches_finder_ratio(runs: &[usize; 5]) -> bool {
    let avg = (runs[0] + runs[1] + runs[3] + runs[4]) / 4;
    let err = avg * 3 / 4;
    runs.iter()
        .zip(FINDER_RATIOS)
        .all(|(&run, ratio)| run + err >= ratio * avg && run <= ratio * avg + err)
}

impl Scene {
    /// Scan row `y` for finder cross-sections
    pub(crate) fn finder_scan(&mut self, y: usize) {
        let row_start = y * self.width;
        let mut last_dark = false;
        let mut run_length = 0usize;
        let mut run_count = 0usize;
        let mut runs = [0usize; 5];

        for x in 0..self.width {
            let dark = self.pixels[row_start + x] != 0;

            if x > 0 && dark != last_dark {
                runs.rotate_left(1);
                runs[4] = run_length;
                run_length = 0;
                run_count += 1;

                if !dark && run_count >= 5 && matches_finder_ratio(&runs) {
                    self.test_capstone(x, y, &runs);
                }
            }

            run_length += 1;
            last_dark = dark;
        }
    }

    fn test_capstone(&mut self, x: usize, y: usize, runs: &[usize; 5]) {
        let y = y as i32;
        let at = |offset: usize| Point::new((x - offset) as i32, y);

        let ring_right = self.region_code(at(runs[4]));
        let stone = self.region_code(at(runs[4] + runs[3] + runs[2]));
        let ring_left = self.region_code(at(runs.iter().sum()));

        let (Some(ring), Some(ring_right), Some(stone)) = (ring_left, ring_right, stone) else {
            return;
        };
        if ring != ring_right || ring == stone {
            return;
        }

        let ring_region = self.region(ring);
        let stone_region = self.region(stone);
        if ring_region.capstone.is_some() || stone_region.capstone.is_some() {
            return;
        }
        if ring_region.kind != super::RegionKind::FinderCandidate {
            return;
        }

        let ratio = stone_region.count * 100 / ring_region.count;
        if !(10..=70).contains(&ratio) {
            return;
        }

        self.record_capstone(ring, stone, (ratio as f64 - IDEAL_STONE_RATIO).abs());
    }

    fn record_capstone(&mut self, ring: u32, stone: u32, proportion_error: f64) {
        if self.capstones.len() >= self.config.max_capstones {
            log::debug!("capstone cap {} reached", self.config.max_capstones);
            return;
        }

        let stone_seed = self.region(stone).seed;
        let corners = self.find_region_corners(ring, stone_seed);
        let Some(transform) = PerspectiveTransform::from_rect(&corners, 7.0, 7.0) else {
            log::trace!("degenerate capstone corners {corners:?}");
            return;
        };
        let center = transform.map(3.5, 3.5);

        let index = self.capstones.len();
        self.region_mut(ring).capstone = Some(index);
        self.region_mut(stone).capstone = Some(index);
        log::trace!("capstone {index} at {center:?}, proportion error {proportion_error}");

        self.capstones.push(Capstone {
            ring,
            stone,
            corners,
            center,
            transform,
            grid: None,
            proportion_error,
        });
    }
}
