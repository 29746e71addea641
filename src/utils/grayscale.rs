//! Colour to greyscale conversion for callers holding RGB or RGBA frames.
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, evaluated in integers as
//! `(76*R + 150*G + 29*B) >> 8`.

use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Rows below this size are not worth splitting across threads
const PARALLEL_MIN_PIXELS: usize = 64 * 1024;

#[inline]
fn luma(px: &[u8]) -> u8 {
    let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32) >> 8;
    lum.min(255) as u8
}

/// Convert interleaved pixels with `channels` bytes each (3 or 4) into `out`.
///
/// Returns the number of pixels written, which is the smaller of the pixel
/// count in `src` and `out.len()`.
pub fn to_grayscale_into(src: &[u8], channels: usize, out: &mut [u8]) -> usize {
    debug_assert!(channels >= 3);
    let mut written = 0;
    for (dst, px) in out.iter_mut().zip(src.chunks_exact(channels)) {
        *dst = luma(px);
        written += 1;
    }
    written
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    to_grayscale_into(rgb, 3, &mut gray);
    gray
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    to_grayscale_into(rgba, 4, &mut gray);
    gray
}

fn to_grayscale_parallel(src: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if width == 0 || pixel_count < PARALLEL_MIN_PIXELS {
        to_grayscale_into(src, channels, &mut gray);
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width)
        .zip(src.par_chunks(width * channels))
        .for_each(|(row, src_row)| {
            to_grayscale_into(src_row, channels, row);
        });

    gray
}

/// Convert RGB to grayscale, splitting rows across the rayon pool
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgb, 3, width, height)
}

/// Convert RGBA to grayscale, splitting rows across the rayon pool
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgba, 4, width, height)
}
