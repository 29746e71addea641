//! Grouping capstones into symbol candidates.
//!
//! Seen from one capstone's own 7x7 frame, the other two finders of the
//! same symbol lie roughly along its u and v axes. Every such pair is scored
//! by how far the two distances differ and how badly the three capstones'
//! stone/ring proportions deviate; the best pair becomes a [`Grid`].

use super::{Grid, Scene};
use crate::models::Point;
use crate::utils::geometry::{PerspectiveTransform, line_intersect};

/// Neighbours must lie within this fraction of the distance off-axis
const AXIS_TOLERANCE: f64 = 0.2;

/// Pairs whose two distances differ more than this are rejected
const MAX_DISTANCE_SCORE: f64 = 2.5;

/// Timing pattern endpoints in each capstone's module frame, for the
/// bottom-left, top-left and top-right capstone
const TIMING_U: [f64; 3] = [6.5, 6.5, 0.5];
const TIMING_V: [f64; 3] = [0.5, 6.5, 6.5];

#[derive(Debug, Clone, Copy)]
struct Neighbour {
    index: usize,
    distance: f64,
}

impl Scene {
    /// Look for the best pair of free capstones to form a grid with capstone `i`
    pub(crate) fn test_grouping(&mut self, i: usize) {
        let origin = &self.capstones[i];
        if origin.grid.is_some() {
            return;
        }

        let mut along_v = Vec::new();
        let mut along_u = Vec::new();
        for (j, other) in self.capstones.iter().enumerate() {
            if i == j || other.grid.is_some() {
                continue;
            }
            let (u, v) = origin.transform.unmap(&other.center);
            let u = (u - 3.5).abs();
            let v = (v - 3.5).abs();
            if u < AXIS_TOLERANCE * v {
                along_v.push(Neighbour { index: j, distance: v });
            }
            if v < AXIS_TOLERANCE * u {
                along_u.push(Neighbour { index: j, distance: u });
            }
        }
        if along_v.is_empty() || along_u.is_empty() {
            return;
        }

        let mut best: Option<(f64, usize, usize)> = None;
        for h in &along_v {
            for v in &along_u {
                let distance_score = (1.0 - h.distance / v.distance).abs();
                if distance_score > MAX_DISTANCE_SCORE {
                    continue;
                }
                let proportion = origin.proportion_error
                    + self.capstones[h.index].proportion_error
                    + self.capstones[v.index].proportion_error;
                let score = distance_score + proportion / 100.0;
                if best.is_none_or(|(s, _, _)| score < s) {
                    best = Some((score, h.index, v.index));
                }
            }
        }

        if let Some((score, a, c)) = best {
            log::trace!("capstones {a}, {i}, {c} grouped with score {score:.3}");
            self.record_grid(a, i, c);
        }
    }

    /// Order a capstone triple clockwise and try to fit a grid to it
    fn record_grid(&mut self, mut a: usize, b: usize, mut c: usize) {
        if self.grids.len() >= self.config.max_grids {
            log::debug!("grid cap {} reached", self.config.max_grids);
            return;
        }

        let h0 = self.capstones[a].center;
        let mut hd = self.capstones[c].center.delta(&h0);
        if self.capstones[b].center.side_of(&h0, &hd) > 0 {
            std::mem::swap(&mut a, &mut c);
            hd = Point::new(-hd.x, -hd.y);
        }

        let caps = [a, b, c];
        for &k in &caps {
            self.rotate_capstone(k, h0, hd);
        }

        let Some(grid) = self.setup_grid(caps, hd) else {
            return;
        };
        let index = self.grids.len();
        for &k in &caps {
            self.capstones[k].grid = Some(index);
        }
        log::debug!("grid {index}: {0}x{0} from capstones {caps:?}", grid.size);
        self.grids.push(grid);
    }

    /// Rotate a capstone's corners so that corner 0 is the one furthest to
    /// the left of the hypotenuse `h0 + t * hd`
    fn rotate_capstone(&mut self, index: usize, h0: Point, hd: Point) {
        let cap = &mut self.capstones[index];
        let mut best = 0;
        let mut best_side = i64::MAX;
        for (j, p) in cap.corners.iter().enumerate() {
            let side = p.side_of(&h0, &hd);
            if side < best_side {
                best = j;
                best_side = side;
            }
        }
        cap.corners.rotate_left(best);
        if let Some(transform) = PerspectiveTransform::from_rect(&cap.corners, 7.0, 7.0) {
            cap.transform = transform;
        }
    }

    fn setup_grid(&mut self, caps: [usize; 3], hd: Point) -> Option<Grid> {
        let timing_ends: [Point; 3] = std::array::from_fn(|i| {
            self.capstones[caps[i]]
                .transform
                .map(TIMING_U[i], TIMING_V[i])
        });
        let hscan = self.timing_scan(timing_ends[1], timing_ends[2]);
        let vscan = self.timing_scan(timing_ends[1], timing_ends[0]);
        let size = self.grid_size_from_timing(hscan, vscan)?;

        let [a, b, c] = caps.map(|k| self.capstones[k].corners);
        let Some(mut align) = line_intersect(&a[0], &a[1], &c[0], &c[3]) else {
            log::debug!("rejected {caps:?}: capstone edges are parallel");
            return None;
        };

        let mut align_region = None;
        if size > 21 {
            align_region = self.find_alignment(caps, align);
            if let Some(label) = align_region {
                align = self.find_leftmost_to_line(label, hd);
            }
        }

        let side = (size - 7) as f64;
        let rect = [b[0], c[0], align, a[0]];
        let Some(mut transform) = PerspectiveTransform::from_rect(&rect, side, side) else {
            log::debug!("rejected {caps:?}: degenerate fit rectangle");
            return None;
        };
        self.jiggle(&mut transform, size);

        if !self.validate_timing(&transform, size) {
            log::debug!("rejected {caps:?}: timing pattern does not alternate after fit");
            return None;
        }

        Some(Grid {
            caps,
            align_region,
            align,
            hscan,
            vscan,
            size,
            transform,
        })
    }
}
