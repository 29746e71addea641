//! Timing pattern measurement.
//!
//! The row and column of alternating modules between the finders give the
//! grid size before any perspective fit exists. After fitting, the same
//! cells are re-read to confirm the fit is sane.

use super::Scene;
use crate::decoder::tables::{MAX_VERSION, symbol_size};
use crate::models::Point;
use crate::utils::geometry::PerspectiveTransform;

impl Scene {
    /// Count light runs of two or more pixels on the line `p0 -> p1`.
    ///
    /// Walks the line with Bresenham's algorithm. `None` when either endpoint
    /// lies outside the image.
    pub(crate) fn timing_scan(&self, p0: Point, p1: Point) -> Option<usize> {
        if !self.contains(p0) || !self.contains(p1) {
            return None;
        }

        let mut n = p1.x - p0.x;
        let mut d = p1.y - p0.y;
        let x_major = n.abs() > d.abs();
        if x_major {
            std::mem::swap(&mut n, &mut d);
        }
        let minor_step = if n < 0 { -1 } else { 1 };
        let major_step = if d < 0 { -1 } else { 1 };
        let n = n.abs();
        let d = d.abs();

        let mut p = p0;
        let mut acc = 0;
        let mut run_length = 0;
        let mut count = 0;
        for _ in 0..=d {
            if !self.contains(p) {
                break;
            }
            if self.pixel(p) != 0 {
                if run_length >= 2 {
                    count += 1;
                }
                run_length = 0;
            } else {
                run_length += 1;
            }

            acc += n;
            if x_major {
                p.x += major_step;
            } else {
                p.y += major_step;
            }
            if acc >= d {
                if x_major {
                    p.y += minor_step;
                } else {
                    p.x += minor_step;
                }
                acc -= d;
            }
        }
        Some(count)
    }

    /// Grid size implied by the two timing scans, snapped to `17 + 4v`
    pub(crate) fn grid_size_from_timing(
        &self,
        hscan: Option<usize>,
        vscan: Option<usize>,
    ) -> Option<usize> {
        if let (Some(h), Some(v)) = (hscan, vscan) {
            if h.abs_diff(v) > self.config.max_timing_mismatch {
                log::debug!("rejected grid: timing scans disagree ({h} vs {v})");
                return None;
            }
        }
        let Some(scan) = hscan.max(vscan) else {
            log::debug!("rejected grid: timing endpoints outside the image");
            return None;
        };

        let estimate = scan * 2 + 13;
        let version = estimate.saturating_sub(15) / 4;
        let size = version * 4 + 17;
        if !(symbol_size(1)..=symbol_size(MAX_VERSION)).contains(&size) {
            log::debug!("rejected grid: size {size} out of range");
            return None;
        }
        Some(size)
    }

    /// Whether enough of the fitted timing cells alternate dark/light.
    ///
    /// Cells 8..size-8 of row 6 and column 6 are dark on even indices.
    pub(crate) fn validate_timing(&self, transform: &PerspectiveTransform, size: usize) -> bool {
        let mut good = 0usize;
        let mut total = 0usize;
        for i in 8..size.saturating_sub(8) {
            let expected = i % 2 == 0;
            for (x, y) in [(i, 6), (6, i)] {
                total += 1;
                if self.read_cell(transform, x as i32, y as i32) == expected {
                    good += 1;
                }
            }
        }
        if total == 0 {
            return true;
        }
        let agreement = good as f32 / total as f32;
        log::trace!("timing agreement {good}/{total}");
        agreement >= self.config.min_timing_agreement
    }
}
