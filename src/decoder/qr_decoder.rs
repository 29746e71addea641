//! Decoding of a sampled module grid into its payload.
//!
//! The stages run in a fixed order: grid size check, format information,
//! version information (v7+), unmasking, zig-zag codeword extraction,
//! de-interleaving with Reed-Solomon correction, and segment parsing. The
//! first failing stage determines the returned error.

use crate::decoder::bitstream::BitstreamExtractor;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::modes::MAX_PAYLOAD;
use crate::decoder::tables::MAX_VERSION;
use crate::decoder::unmask::unmasked;
use crate::decoder::version::VersionInfo;
use crate::error::DecodeError;
use crate::models::{Code, Data};

mod payload;
#[cfg(test)]
mod tests;

/// Decode a located code
pub fn decode(code: &Code) -> Result<Data, DecodeError> {
    decode_with_limit(code, MAX_PAYLOAD)
}

/// Decode with an explicit payload size limit
pub fn decode_with_limit(code: &Code, limit: usize) -> Result<Data, DecodeError> {
    let result = decode_inner(code, limit);
    if let Err(err) = &result {
        log::debug!("decode of {0}x{0} grid failed: {err}", code.size);
    }
    result
}

fn decode_inner(code: &Code, limit: usize) -> Result<Data, DecodeError> {
    let size = code.size;
    if size < 21 || (size - 17) % 4 != 0 {
        return Err(DecodeError::InvalidGridSize);
    }
    if code.cells.width() < size || code.cells.height() < size {
        return Err(DecodeError::InvalidGridSize);
    }
    let version = (size - 17) / 4;
    if version > MAX_VERSION as usize {
        return Err(DecodeError::InvalidVersion);
    }
    let version = version as u8;

    let format = FormatInfo::extract(&code.cells)?;
    log::trace!(
        "format: level {} mask {} ({} bits corrected)",
        format.ec_level.as_char(),
        format.mask_pattern.bits(),
        format.corrected_errors
    );

    if version >= 7 {
        let encoded = VersionInfo::extract(&code.cells)?;
        if encoded != version {
            log::debug!("version info says {encoded}, grid size says {version}");
            return Err(DecodeError::InvalidVersion);
        }
    }

    let func = FunctionMask::new(version);
    let grid = unmasked(&code.cells, format.mask_pattern, &func);
    let raw = BitstreamExtractor::extract_codewords(&grid, &func);
    let data = payload::deinterleave_and_correct(&raw, version, format.ec_level)?;
    let segments = payload::decode_segments(&data, version, limit)?;

    Ok(Data {
        version,
        ecc_level: format.ec_level,
        mask: format.mask_pattern,
        data_type: segments.data_type,
        eci: segments.eci,
        payload: segments.payload,
    })
}
