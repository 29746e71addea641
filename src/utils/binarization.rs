//! Adaptive thresholding.
//!
//! Each row is smoothed with an exponential moving average running in both
//! directions at once. The averages carry over from one row to the next, and
//! the direction that runs "forward" alternates per row, so the threshold
//! follows slow lighting gradients in both axes. A pixel is dark when it is
//! more than `bias` percent below the local average.

use crate::models::BitMatrix;

/// Label written for light pixels
pub const PIXEL_LIGHT: u32 = 0;
/// Label written for dark pixels
pub const PIXEL_DARK: u32 = 1;

/// Default window divisor: the averaging window is `width / 8` pixels
pub const DEFAULT_WINDOW_DEN: usize = 8;
/// Default darkness bias in percent
pub const DEFAULT_BIAS: u8 = 5;

/// Threshold `gray` into `out` as [`PIXEL_LIGHT`] / [`PIXEL_DARK`] labels.
///
/// `row_average` is scratch space and is resized as needed. `out` must hold
/// at least `width * height` entries.
pub fn threshold_into(
    gray: &[u8],
    width: usize,
    height: usize,
    window_den: usize,
    bias: u8,
    row_average: &mut Vec<i64>,
    out: &mut [u32],
) {
    let pixel_count = width * height;
    if pixel_count == 0 {
        return;
    }
    debug_assert!(gray.len() >= pixel_count && out.len() >= pixel_count);

    let window = (width / window_den.max(1)).max(1) as i64;
    let bias = bias.min(100) as i64;

    // Seed both running averages from the global mean so the first row
    // does not start biased towards dark.
    let mean = (gray[..pixel_count].iter().map(|&p| p as u64).sum::<u64>() / pixel_count as u64) as i64;
    let mut avg_w = mean * window;
    let mut avg_u = mean * window;

    row_average.clear();
    row_average.resize(width, 0);

    for y in 0..height {
        let row = &gray[y * width..(y + 1) * width];
        row_average.fill(0);

        for x in 0..width {
            let (w, u) = if y & 1 == 1 {
                (x, width - 1 - x)
            } else {
                (width - 1 - x, x)
            };
            avg_w = (avg_w * (window - 1)) / window + row[w] as i64;
            avg_u = (avg_u * (window - 1)) / window + row[u] as i64;
            row_average[w] += avg_w;
            row_average[u] += avg_u;
        }

        let out_row = &mut out[y * width..(y + 1) * width];
        for x in 0..width {
            // row_average holds two window sums, hence the factor of 200
            let dark = (row[x] as i64) * 200 * window < row_average[x] * (100 - bias);
            out_row[x] = if dark { PIXEL_DARK } else { PIXEL_LIGHT };
        }
    }
}

/// Threshold a greyscale image into a [`BitMatrix`] (true = dark) with default parameters
pub fn adaptive_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    adaptive_binarize_with(gray, width, height, DEFAULT_WINDOW_DEN, DEFAULT_BIAS)
}

/// Threshold a greyscale image into a [`BitMatrix`] with explicit parameters
pub fn adaptive_binarize_with(
    gray: &[u8],
    width: usize,
    height: usize,
    window_den: usize,
    bias: u8,
) -> BitMatrix {
    let mut labels = vec![PIXEL_LIGHT; width * height];
    let mut scratch = Vec::new();
    threshold_into(gray, width, height, window_den, bias, &mut scratch, &mut labels);

    let mut binary = BitMatrix::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if labels[y * width + x] != PIXEL_LIGHT {
                binary.set(x, y, true);
            }
        }
    }
    binary
}
