/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    /// X coordinate (column)
    pub x: i32,
    /// Y coordinate (row)
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another point
    pub fn distance_squared(&self, other: &Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Component-wise difference `self - other`
    pub fn delta(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Signed projection of `self - origin` onto the left normal of `dir`.
    ///
    /// Negative values lie to the left of a line heading along `dir` in
    /// image coordinates (y grows downwards).
    pub fn side_of(&self, origin: &Point, dir: &Point) -> i64 {
        (self.x - origin.x) as i64 * -(dir.y as i64) + (self.y - origin.y) as i64 * dir.x as i64
    }
}
