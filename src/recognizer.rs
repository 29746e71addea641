//! The recognizer: owns an image buffer and all detection state.
//!
//! ```no_run
//! use qrscan::Recognizer;
//!
//! let (width, height) = (640, 480);
//! let pixels = vec![255u8; width * height];
//!
//! let mut rec = Recognizer::new();
//! rec.resize(width, height)?;
//! rec.load_image(&pixels)?;
//! for code in rec.codes() {
//!     if let Ok(data) = code.decode() {
//!         println!("{:?}", data.text());
//!     }
//! }
//! # Ok::<(), qrscan::RecognizerError>(())
//! ```

use crate::config::{RecognizerConfig, env_config};
use crate::detector::{Capstone, Grid, Region, Scene};
use crate::error::RecognizerError;
use crate::models::Code;

/// Largest supported side in pixels; labels and coordinates are 32-bit
const MAX_DIMENSION: usize = i32::MAX as usize;

/// QR code recognizer for greyscale images.
///
/// Buffers are kept between images and only grow, so one recognizer should
/// be reused for a stream of frames.
#[derive(Debug, Default)]
pub struct Recognizer {
    image: Vec<u8>,
    width: usize,
    height: usize,
    scene: Scene,
    codes: Vec<Code>,
    config: RecognizerConfig,
}

impl Recognizer {
    /// Recognizer with the default configuration plus any `QRSCAN_*` overrides
    pub fn new() -> Self {
        Self::with_config(env_config().clone())
    }

    /// Recognizer with an explicit configuration
    pub fn with_config(config: RecognizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Set the image dimensions, clearing the image and any previous codes
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RecognizerError> {
        let too_large = width > MAX_DIMENSION
            || height > MAX_DIMENSION
            || width.checked_mul(height).is_none();
        if too_large {
            return Err(RecognizerError::DimensionsTooLarge { width, height });
        }

        self.width = width;
        self.height = height;
        self.image.clear();
        self.image.resize(width * height, 0);
        self.codes.clear();
        log::trace!("resized to {width}x{height}");
        Ok(())
    }

    /// Copy a `width * height` greyscale image into the recognizer
    pub fn load_image(&mut self, pixels: &[u8]) -> Result<(), RecognizerError> {
        if pixels.len() != self.image.len() {
            return Err(RecognizerError::ImageSizeMismatch {
                expected: self.image.len(),
                actual: pixels.len(),
            });
        }
        self.image.copy_from_slice(pixels);
        self.codes.clear();
        Ok(())
    }

    /// Greyscale buffer for filling in place, row-major
    pub fn image_mut(&mut self) -> &mut [u8] {
        self.codes.clear();
        &mut self.image
    }

    /// Current greyscale image
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Locate codes in the current image and return how many were found
    pub fn identify(&mut self) -> usize {
        self.codes = self
            .scene
            .identify(&self.image, self.width, self.height, &self.config);
        self.codes.len()
    }

    /// Number of codes found by the last [`Self::identify`]
    pub fn count(&self) -> usize {
        self.codes.len()
    }

    /// Code at `index`
    pub fn code(&self, index: usize) -> Result<&Code, RecognizerError> {
        self.codes.get(index).ok_or(RecognizerError::IndexOutOfRange {
            index,
            count: self.codes.len(),
        })
    }

    /// All codes found by the last [`Self::identify`]
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    /// Regions labelled by the last run
    pub fn regions(&self) -> &[Region] {
        self.scene.regions()
    }

    /// Capstones found by the last run
    pub fn capstones(&self) -> &[Capstone] {
        self.scene.capstones()
    }

    /// Grids accepted by the last run
    pub fn grids(&self) -> &[Grid] {
        self.scene.grids()
    }

    /// Thresholded labels of the last run: 0 light, anything else dark
    pub fn labels(&self) -> &[u32] {
        self.scene.labels()
    }

    /// Bytes of scratch storage held for reuse by the next `identify`
    pub fn scratch_bytes(&self) -> usize {
        self.scene.pool().reserved_bytes()
    }

    /// Deepest flood fill work-list seen so far
    pub fn flood_depth(&self) -> usize {
        self.scene.pool().peak_flood_depth()
    }
}
