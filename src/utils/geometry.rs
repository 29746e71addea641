/// Geometry utilities: perspective transforms and line intersection
use crate::models::Point;

/// Projective mapping from a `w x h` rectangle in grid space to pixel space.
///
/// Coefficients follow the usual homography layout with the last term fixed
/// at 1: `x = (c0*u + c1*v + c2) / d`, `y = (c3*u + c4*v + c5) / d`, with
/// `d = c6*u + c7*v + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerspectiveTransform {
    /// The eight free coefficients
    pub c: [f64; 8],
}

impl PerspectiveTransform {
    /// Map the rectangle `(0,0) (w,0) (w,h) (0,h)` onto `rect`
    pub fn from_rect(rect: &[Point; 4], w: f64, h: f64) -> Option<Self> {
        let src = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
        let dst = rect.map(|p| (p.x as f64, p.y as f64));
        Self::from_points(&src, &dst)
    }

    /// Create transform from 4 source points to 4 destination points
    pub fn from_points(src: &[(f64, f64); 4], dst: &[(f64, f64); 4]) -> Option<Self> {
        // Direct linear transform: two equations per correspondence
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = src[i];
            let (dx, dy) = dst[i];

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        solve_linear_system(&a, &b).map(|c| Self { c })
    }

    /// Grid coordinate to pixel, rounded half to even
    pub fn map(&self, u: f64, v: f64) -> Point {
        let (x, y) = self.map_f64(u, v);
        Point::new(x.round_ties_even() as i32, y.round_ties_even() as i32)
    }

    /// Grid coordinate to unrounded pixel coordinate
    pub fn map_f64(&self, u: f64, v: f64) -> (f64, f64) {
        let c = &self.c;
        let den = c[6] * u + c[7] * v + 1.0;
        (
            (c[0] * u + c[1] * v + c[2]) / den,
            (c[3] * u + c[4] * v + c[5]) / den,
        )
    }

    /// Pixel to grid coordinate (inverse mapping via the adjugate matrix)
    pub fn unmap(&self, p: &Point) -> (f64, f64) {
        let c = &self.c;
        let x = p.x as f64;
        let y = p.y as f64;

        let den = (c[3] * c[7] - c[4] * c[6]) * x
            + (c[1] * c[6] - c[0] * c[7]) * y
            + (c[0] * c[4] - c[1] * c[3]);
        let u = (c[4] - c[5] * c[7]) * x + (c[2] * c[7] - c[1]) * y + (c[1] * c[5] - c[2] * c[4]);
        let v = (c[5] * c[6] - c[3]) * x + (c[0] - c[2] * c[6]) * y + (c[2] * c[3] - c[0] * c[5]);

        (u / den, v / den)
    }
}

/// Solve 8x8 linear system using Gaussian elimination
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    // Forward elimination
    for i in 0..n {
        // Partial pivot
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-12 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    // Back substitution
    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

/// Intersection of line `p0-p1` with line `q0-q1`, in integer pixels.
///
/// Returns `None` for parallel lines. Division truncates towards zero.
pub fn line_intersect(p0: &Point, p1: &Point, q0: &Point, q1: &Point) -> Option<Point> {
    let a = -((p1.y - p0.y) as i64);
    let b = (p1.x - p0.x) as i64;
    let c = -((q1.y - q0.y) as i64);
    let d = (q1.x - q0.x) as i64;

    let e = a * p1.x as i64 + b * p1.y as i64;
    let f = c * q1.x as i64 + d * q1.y as i64;

    let det = a * d - b * c;
    if det == 0 {
        return None;
    }

    let x = (d * e - b * f) / det;
    let y = (-c * e + a * f) / det;
    Some(Point::new(x as i32, y as i32))
}
