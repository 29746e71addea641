//! Lazy region labelling over the thresholded label buffer.
//!
//! Dark pixels start out as label 1. The first time the finder scan touches
//! one, the whole 4-connected region is flood filled with a fresh label and
//! its area and bounding box are recorded in the region arena.

use super::{BoundingBox, FIRST_REGION_LABEL, Region, RegionKind, Scene};
use crate::models::Point;
use crate::utils::binarization::PIXEL_DARK;
use crate::utils::memory_pool::FloodSeed;

/// Span-based flood fill replacing `from` with `to`.
///
/// `on_span(y, left, right)` is called once per filled horizontal span,
/// bounds inclusive. Uses `stack` as its work-list.
#[allow(clippy::too_many_arguments)]
pub fn flood_fill<F>(
    pixels: &mut [u32],
    width: usize,
    height: usize,
    stack: &mut Vec<FloodSeed>,
    seed: FloodSeed,
    from: u32,
    to: u32,
    mut on_span: F,
) where
    F: FnMut(usize, usize, usize),
{
    if from == to {
        return;
    }
    stack.clear();
    stack.push(seed);

    while let Some((x, y)) = stack.pop() {
        let row = &mut pixels[y * width..(y + 1) * width];
        if row[x] != from {
            continue;
        }

        let mut left = x;
        let mut right = x;
        while left > 0 && row[left - 1] == from {
            left -= 1;
        }
        while right + 1 < width && row[right + 1] == from {
            right += 1;
        }
        row[left..=right].fill(to);
        on_span(y, left, right);

        let neighbours = [y.checked_sub(1), Some(y + 1).filter(|&ny| ny < height)];
        for ny in neighbours.into_iter().flatten() {
            let row = &pixels[ny * width..(ny + 1) * width];
            let mut i = left;
            while i <= right {
                if row[i] == from {
                    stack.push((i, ny));
                    while i <= right && row[i] == from {
                        i += 1;
                    }
                } else {
                    i += 1;
                }
            }
        }
    }
}

/// Shape test for the outer ring of a finder pattern
pub fn classify(count: usize, bbox: &BoundingBox) -> RegionKind {
    let w = bbox.width() as f64;
    let h = bbox.height() as f64;
    let aspect = w / h;
    let fill = count as f64 / (w * h);
    if (0.5..=2.0).contains(&aspect) && (0.15..=0.8).contains(&fill) {
        RegionKind::FinderCandidate
    } else {
        RegionKind::Unknown
    }
}

impl Scene {
    /// Flood fill within this scene's label buffer
    pub(crate) fn fill<F>(&mut self, seed: Point, from: u32, to: u32, on_span: F)
    where
        F: FnMut(usize, usize, usize),
    {
        let mut stack = self.pool.take_flood_stack();
        flood_fill(
            &mut self.pixels,
            self.width,
            self.height,
            &mut stack,
            (seed.x as usize, seed.y as usize),
            from,
            to,
            on_span,
        );
        self.pool.return_flood_stack(stack);
    }

    /// Label of the region containing `p`, creating it on first touch.
    ///
    /// `None` for light or out-of-image pixels, and once the region cap is hit.
    pub(crate) fn region_code(&mut self, p: Point) -> Option<u32> {
        if !self.contains(p) {
            return None;
        }
        let label = self.pixel(p);
        if label >= FIRST_REGION_LABEL {
            return Some(label);
        }
        if label != PIXEL_DARK {
            return None;
        }
        if self.regions.len() >= self.config.max_regions {
            log::trace!("region cap {} reached", self.config.max_regions);
            return None;
        }

        let code = self.regions.len() as u32 + FIRST_REGION_LABEL;
        let mut count = 0usize;
        let mut bbox = BoundingBox::at(p);
        self.fill(p, PIXEL_DARK, code, |y, left, right| {
            count += right - left + 1;
            bbox.min_x = bbox.min_x.min(left as i32);
            bbox.max_x = bbox.max_x.max(right as i32);
            bbox.min_y = bbox.min_y.min(y as i32);
            bbox.max_y = bbox.max_y.max(y as i32);
        });

        self.regions.push(Region {
            seed: p,
            count,
            bbox,
            capstone: None,
            kind: classify(count, &bbox),
        });
        Some(code)
    }

    /// Four extreme points of a region, oriented by a reference point.
    ///
    /// The farthest pixel from `reference` fixes an axis; the corners are the
    /// pixels extreme along that axis, its perpendicular, and their negations.
    pub(crate) fn find_region_corners(&mut self, label: u32, reference: Point) -> [Point; 4] {
        let seed = self.region(label).seed;

        let mut far = seed;
        let mut far_dist = -1i64;
        self.fill(seed, label, PIXEL_DARK, |y, left, right| {
            for x in [left, right] {
                let p = Point::new(x as i32, y as i32);
                let d = p.distance_squared(&reference);
                if d > far_dist {
                    far_dist = d;
                    far = p;
                }
            }
        });

        let axis = far.delta(&reference);
        let (rx, ry) = (axis.x as i64, axis.y as i64);
        let project = |p: Point| {
            let (x, y) = (p.x as i64, p.y as i64);
            let up = x * rx + y * ry;
            let right = x * -ry + y * rx;
            [up, right, -up, -right]
        };

        let mut corners = [seed; 4];
        let mut scores = project(seed);
        self.fill(seed, PIXEL_DARK, label, |y, left, right| {
            for x in [left, right] {
                let p = Point::new(x as i32, y as i32);
                for (k, score) in project(p).into_iter().enumerate() {
                    if score > scores[k] {
                        scores[k] = score;
                        corners[k] = p;
                    }
                }
            }
        });
        corners
    }

    /// Pixel of a region that lies furthest to the left of direction `dir`
    pub(crate) fn find_leftmost_to_line(&mut self, label: u32, dir: Point) -> Point {
        let origin = Point::new(0, 0);
        let seed = self.region(label).seed;

        let mut best = seed;
        let mut best_side = seed.side_of(&origin, &dir);
        self.fill(seed, label, PIXEL_DARK, |_, _, _| {});
        self.fill(seed, PIXEL_DARK, label, |y, left, right| {
            for x in [left, right] {
                let p = Point::new(x as i32, y as i32);
                let side = p.side_of(&origin, &dir);
                if side < best_side {
                    best_side = side;
                    best = p;
                }
            }
        });
        best
    }
}
