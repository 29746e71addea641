//! Alignment pattern search for QR versions 2+
//!
//! The bottom-right alignment pattern sits near the intersection of the
//! outer edges of the bottom-left and top-right capstones. Starting from
//! that estimate, the search spirals outward until it hits a dark region
//! about the size of one module.

use super::Scene;
use crate::models::Point;

/// Spiral directions: right, up, left, down
const SPIRAL_DX: [i32; 4] = [1, 0, -1, 0];
const SPIRAL_DY: [i32; 4] = [0, -1, 0, 1];

impl Scene {
    /// Label of the alignment pattern's center stone, if one is found.
    pub(crate) fn find_alignment(&mut self, caps: [usize; 3], estimate: Point) -> Option<u32> {
        let module_area = self.module_area_at(caps, estimate);

        let mut p = estimate;
        let mut step = 1i64;
        let mut dir = 0usize;
        while step * step < module_area * 100 {
            for _ in 0..step {
                if let Some(label) = self.region_code(p) {
                    let count = self.region(label).count as i64;
                    if (module_area / 2..=module_area * 2).contains(&count) {
                        log::trace!("alignment region {label} at {p:?}");
                        return Some(label);
                    }
                }
                p.x += SPIRAL_DX[dir];
                p.y += SPIRAL_DY[dir];
            }
            dir = (dir + 1) % 4;
            if dir & 1 == 0 {
                step += 1;
            }
        }

        log::trace!("no alignment pattern near {estimate:?}");
        None
    }

    /// Pixel area of one module at `p`, from the neighbouring capstones'
    /// frames: the parallelogram spanned by one step along each.
    fn module_area_at(&self, caps: [usize; 3], p: Point) -> i64 {
        let bottom_left = &self.capstones[caps[0]].transform;
        let top_right = &self.capstones[caps[2]].transform;

        let (u, v) = bottom_left.unmap(&p);
        let a = bottom_left.map(u, v + 1.0);
        let (u, v) = top_right.unmap(&p);
        let c = top_right.map(u + 1.0, v);

        a.side_of(&p, &c.delta(&p)).abs()
    }
}
