/// Kanji mode decoder (Mode 1000)
use super::PayloadWriter;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decoder for Kanji segments.
///
/// Each character is 13 bits encoding a Shift-JIS code from either the
/// 0x8140-0x9FFC or the 0xE040-0xEBBF range. The two Shift-JIS bytes are
/// written to the payload as-is.
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `count` characters into `2 * count` Shift-JIS bytes
    pub fn decode(
        reader: &mut BitReader<'_>,
        count: usize,
        out: &mut PayloadWriter,
    ) -> Result<(), DecodeError> {
        if count * 13 > reader.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        out.reserve(count * 2)?;

        for _ in 0..count {
            let value = reader.read_bits(13)?;
            let intermediate = ((value / 0xc0) << 8) | (value % 0xc0);
            let sjis = if intermediate + 0x8140 <= 0x9ffc {
                intermediate + 0x8140
            } else {
                intermediate + 0xc140
            };
            out.extend(&[(sjis >> 8) as u8, sjis as u8])?;
        }

        Ok(())
    }
}
