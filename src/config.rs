//! Recognizer tuning knobs.
//!
//! Every field has a compiled-in default; `QRSCAN_*` environment variables
//! override them for experiments without recompiling. Unparseable values
//! fall back to the default and parsed values are clamped to a sane range.

use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Parameters of the detection pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    /// Threshold window is `width / threshold_window_den` pixels wide
    pub threshold_window_den: usize,
    /// Percentage a pixel must fall below the local mean to count as dark
    pub threshold_bias: u8,
    /// Upper bound on labelled regions per image
    pub max_regions: usize,
    /// Upper bound on finder patterns per image
    pub max_capstones: usize,
    /// Upper bound on symbol candidates per image
    pub max_grids: usize,
    /// Refinement passes over the perspective coefficients
    pub jiggle_passes: usize,
    /// Largest allowed difference between horizontal and vertical timing run counts
    pub max_timing_mismatch: usize,
    /// Fraction of timing cells that must alternate after fitting
    pub min_timing_agreement: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            threshold_window_den: 8,
            threshold_bias: 5,
            max_regions: 1 << 20,
            max_capstones: 64,
            max_grids: 16,
            jiggle_passes: 5,
            max_timing_mismatch: 2,
            min_timing_agreement: 0.75,
        }
    }
}

impl RecognizerConfig {
    /// Defaults overridden by `QRSCAN_*` environment variables
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            threshold_window_den: parse_env_usize(
                "QRSCAN_THRESHOLD_WINDOW_DEN",
                d.threshold_window_den,
            )
            .clamp(1, 64),
            threshold_bias: parse_env_u8("QRSCAN_THRESHOLD_BIAS", d.threshold_bias).min(50),
            max_regions: parse_env_usize("QRSCAN_MAX_REGIONS", d.max_regions)
                .clamp(16, u32::MAX as usize - 2),
            max_capstones: parse_env_usize("QRSCAN_MAX_CAPSTONES", d.max_capstones)
                .clamp(3, 1024),
            max_grids: parse_env_usize("QRSCAN_MAX_GRIDS", d.max_grids).clamp(1, 256),
            jiggle_passes: parse_env_usize("QRSCAN_JIGGLE_PASSES", d.jiggle_passes).min(10),
            max_timing_mismatch: parse_env_usize(
                "QRSCAN_MAX_TIMING_MISMATCH",
                d.max_timing_mismatch,
            )
            .min(88),
            min_timing_agreement: parse_env_f32(
                "QRSCAN_MIN_TIMING_AGREEMENT",
                d.min_timing_agreement,
            )
            .clamp(0.0, 1.0),
        }
    }
}

static ENV_CONFIG: OnceLock<RecognizerConfig> = OnceLock::new();

/// Environment-derived configuration, read once per process
pub(crate) fn env_config() -> &'static RecognizerConfig {
    ENV_CONFIG.get_or_init(RecognizerConfig::from_env)
}
