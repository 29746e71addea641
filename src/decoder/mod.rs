//! QR code decoding modules
//!
//! Everything that happens after a code's module grid has been sampled:
//! - Error correction (Reed-Solomon over GF(256), BCH over GF(16))
//! - Format and version information extraction
//! - Unmasking and zig-zag codeword extraction
//! - Segment decoding (numeric, alphanumeric, byte, kanji, ECI)

/// BCH error correction for format and version info
pub mod bch;
/// Codeword extraction and bit reading
pub mod bitstream;
/// Format information extraction (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// GF(16) and GF(256) arithmetic
pub mod galois;
/// Segment decoders
pub mod modes;
/// Decoding pipeline from grid to payload
pub mod qr_decoder;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Block layout and alignment tables
pub mod tables;
/// Data mask removal
pub mod unmask;
/// Version information extraction (versions 7-40)
pub mod version;
