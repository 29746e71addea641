//! Helpers shared by the command-line tool and benches: image loading,
//! statistics and text dumps of located and decoded codes.

use crate::models::{BitMatrix, Code, Data};
use crate::utils::grayscale::rgb_to_grayscale;
use image::GenericImageView;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn max_dim_from_env() -> Option<u32> {
    env::var("QRSCAN_MAX_DIM")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&v| v > 0)
}

/// Load an image file as greyscale bytes along with its dimensions.
///
/// Images larger than `QRSCAN_MAX_DIM` on their longest side are scaled down.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let mut img = image::open(path)?;
    if let Some(max_dim) = max_dim_from_env() {
        let (w, h) = img.dimensions();
        if w.max(h) > max_dim {
            img = img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle);
        }
    }
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    Ok((rgb_to_grayscale(rgb.as_raw(), width, height), width, height))
}

/// Write a label buffer (0 light, non-zero dark) as a black and white PNG
pub fn save_labels<P: AsRef<Path>>(
    path: P,
    labels: &[u32],
    width: usize,
    height: usize,
) -> Result<(), image::ImageError> {
    let pixels: Vec<u8> = labels
        .iter()
        .map(|&l| if l == 0 { 255 } else { 0 })
        .collect();
    image::save_buffer(
        path,
        &pixels,
        width as u32,
        height as u32,
        image::ColorType::L8,
    )
}

/// Summary statistics for greyscale data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum value
    pub min: u8,
    /// Maximum value
    pub max: u8,
    /// Average value
    pub avg: u8,
}

/// Summary statistics for a thresholded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryStats {
    /// Dark pixel count
    pub dark_pixels: usize,
    /// Total pixels
    pub total_pixels: usize,
    /// Dark pixels over total pixels
    pub dark_ratio: f64,
}

/// Compute min/max/avg for greyscale values
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats {
            min: 0,
            max: 0,
            avg: 0,
        };
    }
    let (min, max, sum) = gray.iter().fold((u8::MAX, u8::MIN, 0u64), |(lo, hi, sum), &v| {
        (lo.min(v), hi.max(v), sum + v as u64)
    });
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Dark pixel statistics for a bit matrix
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    let dark = binary.count_ones();
    let total = binary.width() * binary.height();
    BinaryStats {
        dark_pixels: dark,
        total_pixels: total,
        dark_ratio: if total == 0 {
            0.0
        } else {
            dark as f64 / total as f64
        },
    }
}

/// Text rendering of a code's module grid, one line per row
pub fn dump_cells(code: &Code) -> String {
    let mut out = String::new();
    let _ = write!(out, "    {0}x{0} cells, corners:", code.size);
    for p in &code.corners {
        let _ = write!(out, " ({},{})", p.x, p.y);
    }
    out.push('\n');

    for y in 0..code.size {
        out.push_str("    ");
        for x in 0..code.size {
            out.push_str(if code.cell(x, y) { "##" } else { "  " });
        }
        out.push('\n');
    }
    out
}

/// Text summary of decoded data
pub fn dump_data(data: &Data) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    Version: {}", data.version);
    let _ = writeln!(out, "    ECC level: {}", data.ecc_level.as_char());
    let _ = writeln!(out, "    Mask: {}", data.mask.bits());
    match data.data_type {
        Some(t) => {
            let _ = writeln!(out, "    Data type: {} ({t:?})", t.mode());
        }
        None => out.push_str("    Data type: none\n"),
    }
    let _ = writeln!(out, "    Length: {}", data.payload_len());
    let _ = writeln!(out, "    Payload: {}", String::from_utf8_lossy(&data.payload));
    if data.eci != 0 {
        let _ = writeln!(out, "    ECI: {}", data.eci);
    }
    out
}

/// Image files under `root`, recursively, sorted by path
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let is_image = path.extension().is_some_and(|ext| {
                matches!(
                    ext.to_string_lossy().to_lowercase().as_str(),
                    "png" | "jpg" | "jpeg" | "gif" | "bmp" | "pgm"
                )
            });
            if is_image {
                images.push(path);
            }
        }
    }

    images.sort();
    images
}
