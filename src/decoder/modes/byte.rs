/// Byte mode decoder (Mode 0100) for 8-bit data
use super::PayloadWriter;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decoder for byte segments. Bytes are copied verbatim; the character set
/// is whatever the active ECI (or the reader's default) says it is.
pub struct ByteDecoder;

impl ByteDecoder {
    /// Copy `count` bytes into `out`
    pub fn decode(
        reader: &mut BitReader<'_>,
        count: usize,
        out: &mut PayloadWriter,
    ) -> Result<(), DecodeError> {
        if count * 8 > reader.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        out.reserve(count)?;
        for _ in 0..count {
            let byte = reader.read_bits(8)? as u8;
            out.extend(&[byte])?;
        }
        Ok(())
    }
}
