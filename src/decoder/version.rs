/// Version information extraction for QR codes v7+
use super::bch::correct_version;
use crate::error::DecodeError;
use crate::models::BitMatrix;

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
pub struct VersionInfo;

impl VersionInfo {
    /// Read and correct the version number.
    ///
    /// Both blocks are tried and the one closer to a valid codeword wins,
    /// the top-right block on ties.
    pub fn extract(matrix: &BitMatrix) -> Result<u8, DecodeError> {
        let [top_right, bottom_left] = Self::read_raw(matrix);
        let candidates = [correct_version(top_right), correct_version(bottom_left)];

        candidates
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(u8, u32)>, c| match best {
                Some(b) if b.1 <= c.1 => Some(b),
                _ => Some(c),
            })
            .map(|(version, _)| version)
            .ok_or(DecodeError::VersionEcc)
    }

    /// Raw 18-bit words: `[top-right block, bottom-left block]`.
    ///
    /// Bit `i` of the top-right block is at column `size - 11 + i % 3`,
    /// row `i / 3`; the bottom-left block is its transpose.
    pub fn read_raw(matrix: &BitMatrix) -> [u32; 2] {
        let size = matrix.width();
        let mut top_right = 0u32;
        let mut bottom_left = 0u32;
        for i in (0..18).rev() {
            let a = size - 11 + i % 3;
            let b = i / 3;
            top_right = (top_right << 1) | matrix.get(a, b) as u32;
            bottom_left = (bottom_left << 1) | matrix.get(b, a) as u32;
        }
        [top_right, bottom_left]
    }
}
