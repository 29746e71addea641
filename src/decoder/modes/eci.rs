/// ECI designator decoder (Mode 0111)
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Reads the 1, 2 or 3 byte assignment number that follows an ECI mode indicator
pub struct EciDecoder;

impl EciDecoder {
    /// Decode an ECI assignment number (0-999999)
    pub fn decode(reader: &mut BitReader<'_>) -> Result<u32, DecodeError> {
        let first = reader.read_bits(8)?;
        if first & 0x80 == 0 {
            Ok(first)
        } else if first & 0xc0 == 0x80 {
            Ok(((first & 0x3f) << 8) | reader.read_bits(8)?)
        } else if first & 0xe0 == 0xc0 {
            Ok(((first & 0x1f) << 16) | reader.read_bits(16)?)
        } else {
            Err(DecodeError::DataUnderflow)
        }
    }
}
