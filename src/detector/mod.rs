//! QR code detection modules
//!
//! Locating symbols in a thresholded image:
//! - Region labelling (lazy span flood fill over the label buffer)
//! - Finder pattern ("capstone") detection using 1:1:3:1:1 row scanning
//! - Grouping of capstones into symbol candidates
//! - Timing and alignment pattern measurement
//! - Perspective fitting and cell sampling
//!
//! All state lives in a [`Scene`], which is reused across images so the
//! label buffer, region arena and scratch space are only allocated once.

/// Alignment pattern search for QR versions 2+
pub mod alignment;
/// Region labelling by flood fill
pub mod connected_components;
/// Capstone detection from 1:1:3:1:1 row runs
pub mod finder;
/// Capstone triples forming a symbol candidate
pub mod grouping;
/// Timing pattern measurement between capstones
pub mod timing;
/// Perspective refinement and cell sampling
pub mod transform;

use crate::config::RecognizerConfig;
use crate::models::{Code, Point};
use crate::utils::binarization::threshold_into;
use crate::utils::geometry::PerspectiveTransform;
use crate::utils::memory_pool::BufferPool;

/// First label handed out to a dark region; 0 and 1 are light and dark
pub const FIRST_REGION_LABEL: u32 = 2;

/// Shape classification of a labelled region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Anything that is not a plausible finder ring
    Unknown,
    /// Square-ish with a hollow fill, like the outer ring of a finder pattern
    FinderCandidate,
}

/// Axis-aligned bounding box in pixels, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost column
    pub min_x: i32,
    /// Topmost row
    pub min_y: i32,
    /// Rightmost column
    pub max_x: i32,
    /// Bottom row
    pub max_y: i32,
}

impl BoundingBox {
    fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// A 4-connected dark region
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Pixel the region was first reached from
    pub seed: Point,
    /// Pixel count
    pub count: usize,
    /// Extent of the region
    pub bbox: BoundingBox,
    /// Capstone this region belongs to, as ring or stone
    pub capstone: Option<usize>,
    /// Shape class
    pub kind: RegionKind,
}

/// A finder pattern: a dark ring around a dark stone
#[derive(Debug, Clone, PartialEq)]
pub struct Capstone {
    /// Label of the outer ring
    pub ring: u32,
    /// Label of the inner stone
    pub stone: u32,
    /// Outer corners of the ring, clockwise
    pub corners: [Point; 4],
    /// Center pixel
    pub center: Point,
    /// Maps the 7x7 module square onto `corners`
    pub transform: PerspectiveTransform,
    /// Grid this capstone was assigned to
    pub grid: Option<usize>,
    /// Deviation of the stone/ring area ratio from the ideal 9:24, in percent
    pub proportion_error: f64,
}

/// A symbol candidate built from three capstones
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Capstone indices: bottom-left, top-left (the corner), top-right
    pub caps: [usize; 3],
    /// Label of the alignment pattern region, when one was found
    pub align_region: Option<u32>,
    /// Bottom-right reference point used for the perspective fit
    pub align: Point,
    /// Light runs counted along the horizontal timing pattern, `None` off-image
    pub hscan: Option<usize>,
    /// Light runs counted along the vertical timing pattern, `None` off-image
    pub vscan: Option<usize>,
    /// Modules per side
    pub size: usize,
    /// Maps module coordinates onto pixels
    pub transform: PerspectiveTransform,
}

/// Per-image detection state
#[derive(Debug, Default)]
pub struct Scene {
    width: usize,
    height: usize,
    /// Label per pixel: 0 light, 1 dark, >= 2 region label
    pixels: Vec<u32>,
    regions: Vec<Region>,
    capstones: Vec<Capstone>,
    grids: Vec<Grid>,
    pool: BufferPool,
    config: RecognizerConfig,
}

impl Scene {
    /// Empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Image width of the last run
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height of the last run
    pub fn height(&self) -> usize {
        self.height
    }

    /// Regions labelled during the last run
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Capstones found during the last run
    pub fn capstones(&self) -> &[Capstone] {
        &self.capstones
    }

    /// Grids accepted during the last run
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// Thresholded pixel labels of the last run
    pub fn labels(&self) -> &[u32] {
        &self.pixels
    }

    /// Scratch buffers kept between runs
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Run detection on a greyscale image and return the located codes.
    ///
    /// `gray` must hold `width * height` bytes.
    pub fn identify(
        &mut self,
        gray: &[u8],
        width: usize,
        height: usize,
        config: &RecognizerConfig,
    ) -> Vec<Code> {
        self.reset(width, height, config);
        if width == 0 || height == 0 || gray.len() < width * height {
            return Vec::new();
        }

        threshold_into(
            gray,
            width,
            height,
            config.threshold_window_den,
            config.threshold_bias,
            self.pool.row_average(),
            &mut self.pixels,
        );

        for y in 0..height {
            self.finder_scan(y);
        }
        log::debug!(
            "{}x{}: {} regions, {} capstones",
            width,
            height,
            self.regions.len(),
            self.capstones.len()
        );

        for i in 0..self.capstones.len() {
            self.test_grouping(i);
        }
        log::debug!("{} grids accepted", self.grids.len());

        (0..self.grids.len()).map(|i| self.extract(i)).collect()
    }

    fn reset(&mut self, width: usize, height: usize, config: &RecognizerConfig) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
        self.regions.clear();
        self.capstones.clear();
        self.grids.clear();
        self.config = config.clone();
    }

    /// Whether `p` lies inside the image
    #[inline]
    pub(crate) fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Label at `p`, which must be inside the image
    #[inline]
    pub(crate) fn pixel(&self, p: Point) -> u32 {
        self.pixels[p.y as usize * self.width + p.x as usize]
    }

    pub(crate) fn region(&self, label: u32) -> &Region {
        &self.regions[(label - FIRST_REGION_LABEL) as usize]
    }

    pub(crate) fn region_mut(&mut self, label: u32) -> &mut Region {
        &mut self.regions[(label - FIRST_REGION_LABEL) as usize]
    }
}
