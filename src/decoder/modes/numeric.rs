/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use super::PayloadWriter;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decoder for numeric segments
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `count` digits as ASCII into `out`
    pub fn decode(
        reader: &mut BitReader<'_>,
        count: usize,
        out: &mut PayloadWriter,
    ) -> Result<(), DecodeError> {
        let tail_bits = [0, 4, 7][count % 3];
        if count / 3 * 10 + tail_bits > reader.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        out.reserve(count)?;
        let mut remaining = count;

        while remaining > 0 {
            let digits = remaining.min(3);
            let bits_needed = match digits {
                3 => 10,
                2 => 7,
                _ => 4,
            };
            let mut value = reader.read_bits(bits_needed)?;

            // Out-of-range groups keep their low decimal digits
            let mut group = [0u8; 3];
            for slot in group[..digits].iter_mut().rev() {
                *slot = b'0' + (value % 10) as u8;
                value /= 10;
            }
            out.extend(&group[..digits])?;
            remaining -= digits;
        }

        Ok(())
    }
}
