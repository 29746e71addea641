//! Image processing helpers used by the detector
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Adaptive thresholding
//! - Geometry (perspective transforms, line intersection)
//! - Scratch buffer pool

/// Adaptive thresholding
pub mod binarization;
/// Perspective transforms and line intersection
pub mod geometry;
/// RGB(A) to luminance conversion
pub mod grayscale;
/// Scratch buffers reused across images
pub mod memory_pool;
