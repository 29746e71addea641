//! BCH codes protecting the format and version information.
//!
//! Format information is BCH(15,5) and is corrected algebraically over GF(16).
//! Version information is BCH(18,6); with only 34 valid codewords it is
//! corrected by nearest-codeword search.

use super::galois::GF16;

/// XOR mask applied to the 15 format bits
pub const FORMAT_MASK: u16 = 0x5412;
/// Format BCH generator, x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
/// Version BCH generator, x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1f25;
/// Both codes correct up to three bit errors
pub const MAX_BIT_ERRORS: u32 = 3;

const FORMAT_SYNDROMES: usize = (MAX_BIT_ERRORS * 2) as usize;

/// Remainder of `data << shift` divided by `generator`
fn bch_remainder(data: u32, shift: u32, generator: u32) -> u32 {
    let degree = 31 - generator.leading_zeros();
    let mut rem = data << shift;
    for bit in (degree..shift + degree + 1).rev() {
        if rem & (1 << bit) != 0 {
            rem ^= generator << (bit - degree);
        }
    }
    rem
}

/// Unmasked 15-bit format codeword for 5 data bits (level bits then mask)
pub fn format_codeword(data: u8) -> u16 {
    let data = (data & 0x1f) as u32;
    ((data << 10) | bch_remainder(data, 10, FORMAT_GENERATOR)) as u16
}

/// 18-bit version codeword for versions 7-40
pub fn version_codeword(version: u8) -> u32 {
    let v = version as u32;
    (v << 12) | bch_remainder(v, 12, VERSION_GENERATOR)
}

fn format_syndromes(word: u16) -> ([u8; FORMAT_SYNDROMES], bool) {
    let mut s = [0u8; FORMAT_SYNDROMES];
    let mut nonzero = false;
    for (i, si) in s.iter_mut().enumerate() {
        for j in 0..15 {
            if word & (1 << j) != 0 {
                *si ^= GF16.exp((i + 1) * j);
            }
        }
        nonzero |= *si != 0;
    }
    (s, nonzero)
}

/// Correct an unmasked format word.
///
/// Returns the corrected word and the number of bits flipped, or `None` when
/// more than [`MAX_BIT_ERRORS`] bits are wrong.
pub fn correct_format(word: u16) -> Option<(u16, u32)> {
    let word = word & 0x7fff;
    let (syndromes, nonzero) = format_syndromes(word);
    if !nonzero {
        return Some((word, 0));
    }

    let sigma = GF16.berlekamp_massey(&syndromes);
    let errors = (sigma.len() - 1) as u32;
    if errors > MAX_BIT_ERRORS {
        return None;
    }

    // Chien search: bit i is in error when sigma(alpha^-i) == 0
    let mut corrected = word;
    let mut flips = 0;
    for i in 0..15 {
        if GF16.poly_eval(&sigma, GF16.exp(15 - i)) == 0 {
            corrected ^= 1 << i;
            flips += 1;
        }
    }

    if flips != errors || format_syndromes(corrected).1 {
        return None;
    }
    Some((corrected, flips))
}

/// Correct an 18-bit version word to the nearest valid codeword.
///
/// Returns the version and the Hamming distance to its codeword. Ties go to
/// the lower version.
pub fn correct_version(word: u32) -> Option<(u8, u32)> {
    let word = word & 0x3ffff;
    let mut best: Option<(u8, u32)> = None;
    for version in 7..=40u8 {
        let distance = (version_codeword(version) ^ word).count_ones();
        if distance <= MAX_BIT_ERRORS && best.is_none_or(|(_, d)| distance < d) {
            best = Some((version, distance));
        }
    }
    best
}
