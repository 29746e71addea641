//! qrscan - QR code recognition for greyscale images
//!
//! Locates QR codes (Model 2, versions 1-40) in an 8-bit greyscale image
//! and decodes their contents, with full Reed-Solomon error correction.
//!
//! ```no_run
//! let (width, height) = (320, 240);
//! let pixels = vec![255u8; width * height];
//! for result in qrscan::scan(&pixels, width, height)? {
//!     match result.data {
//!         Ok(data) => println!("{}", String::from_utf8_lossy(&data.payload)),
//!         Err(err) => eprintln!("{}", qrscan::error_message(err.into())),
//!     }
//! }
//! # Ok::<(), qrscan::RecognizerError>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Tuning knobs and environment overrides
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (regions, finder patterns, grid fitting)
pub mod detector;
/// Error and status types
pub mod error;
/// Core data structures (Code, Data, BitMatrix, Point)
pub mod models;
/// The recognizer owning per-image state
pub mod recognizer;
/// Image loading and text dumps for command-line tools
pub mod tools;
/// Utility functions (grayscale, binarization, geometry, scratch buffers)
pub mod utils;

pub use config::RecognizerConfig;
pub use error::{DecodeError, DecodeStatus, RecognizerError};
pub use models::{BitMatrix, Code, Data, DataType, ECLevel, MaskPattern, Point};
pub use recognizer::Recognizer;

use rayon::prelude::*;

/// Decode a located code
pub fn decode(code: &Code) -> Result<Data, DecodeError> {
    decoder::qr_decoder::decode(code)
}

/// Fixed English description of a decode status
pub fn error_message(status: DecodeStatus) -> &'static str {
    status.message()
}

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// A located code together with the outcome of decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Location and sampled grid
    pub code: Code,
    /// Decoded contents, or why decoding failed
    pub data: Result<Data, DecodeError>,
}

impl ScanResult {
    fn from_code(code: &Code) -> Self {
        Self {
            code: code.clone(),
            data: decode(code),
        }
    }
}

/// Borrowed greyscale frame for batch scanning
#[derive(Debug, Clone, Copy)]
pub struct GreyImage<'a> {
    /// Row-major pixels, `width * height` bytes
    pub pixels: &'a [u8],
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

/// Locate and decode every code in one greyscale image
pub fn scan(pixels: &[u8], width: usize, height: usize) -> Result<Vec<ScanResult>, RecognizerError> {
    let mut rec = Recognizer::new();
    scan_with(&mut rec, pixels, width, height)
}

fn scan_with(
    rec: &mut Recognizer,
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<ScanResult>, RecognizerError> {
    rec.resize(width, height)?;
    rec.load_image(pixels)?;
    rec.identify();
    Ok(rec.codes().iter().map(ScanResult::from_code).collect())
}

/// Scan independent frames in parallel.
///
/// Each rayon worker owns one [`Recognizer`] and reuses it across frames.
/// A frame whose buffer does not match its dimensions yields no results.
pub fn scan_frames(frames: &[GreyImage<'_>]) -> Vec<Vec<ScanResult>> {
    frames
        .par_iter()
        .map_init(Recognizer::new, |rec, frame| {
            scan_with(rec, frame.pixels, frame.width, frame.height).unwrap_or_else(|err| {
                log::warn!("skipping frame: {err}");
                Vec::new()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(DecodeStatus::Success), "Success");
        assert_eq!(
            error_message(DecodeError::DataEcc.into()),
            "ECC failure"
        );
    }

    #[test]
    fn test_scan_frames_bad_frame() {
        let good = vec![255u8; 16 * 16];
        let frames = [
            GreyImage {
                pixels: &good,
                width: 16,
                height: 16,
            },
            GreyImage {
                pixels: &good[..10],
                width: 16,
                height: 16,
            },
        ];
        let results = scan_frames(&frames);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Vec::is_empty));
    }
}
