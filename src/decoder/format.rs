/// Format information extraction from a module grid
use super::bch::{FORMAT_MASK, correct_format};
use crate::error::DecodeError;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Copy 0 wraps the top-left finder: bit `i` sits at `(FORMAT_XS[i], FORMAT_YS[i])`
const FORMAT_XS: [usize; 15] = [8, 8, 8, 8, 8, 8, 8, 8, 7, 5, 4, 3, 2, 1, 0];
const FORMAT_YS: [usize; 15] = [0, 1, 2, 3, 4, 5, 7, 8, 8, 8, 8, 8, 8, 8, 8];

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask
    pub mask_pattern: MaskPattern,
    /// Bits corrected in the copy that was used
    pub corrected_errors: u32,
}

impl FormatInfo {
    /// Read both copies and keep the one needing fewer corrections
    pub fn extract(matrix: &BitMatrix) -> Result<Self, DecodeError> {
        let copies = Self::read_raw(matrix);
        let mut best: Option<(u16, u32)> = None;
        for candidate in copies.iter().filter_map(|&raw| correct_format(raw ^ FORMAT_MASK)) {
            if best.is_none_or(|(_, e)| candidate.1 < e) {
                best = Some(candidate);
            }
        }

        let (word, corrected_errors) = best.ok_or(DecodeError::FormatEcc)?;
        Ok(Self::from_codeword(word, corrected_errors))
    }

    /// Raw (still masked) format words: `[top-left copy, split copy]`
    pub fn read_raw(matrix: &BitMatrix) -> [u16; 2] {
        let size = matrix.width();

        let mut primary = 0u16;
        for i in (0..15).rev() {
            primary = (primary << 1) | matrix.get(FORMAT_XS[i], FORMAT_YS[i]) as u16;
        }

        // Bits 14..8 run up column 8 beside the bottom-left finder, bits 7..0
        // along row 8 under the top-right finder.
        let mut secondary = 0u16;
        for i in 0..7 {
            secondary = (secondary << 1) | matrix.get(8, size - 1 - i) as u16;
        }
        for i in 0..8 {
            secondary = (secondary << 1) | matrix.get(size - 8 + i, 8) as u16;
        }

        [primary, secondary]
    }

    fn from_codeword(word: u16, corrected_errors: u32) -> Self {
        let data = (word >> 10) as u8;
        Self {
            ec_level: ECLevel::from_format_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data),
            corrected_errors,
        }
    }
}
