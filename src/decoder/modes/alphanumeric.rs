/// Alphanumeric mode decoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
use super::PayloadWriter;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Decoder for alphanumeric segments. Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `count` characters as ASCII into `out`
    pub fn decode(
        reader: &mut BitReader<'_>,
        count: usize,
        out: &mut PayloadWriter,
    ) -> Result<(), DecodeError> {
        if count / 2 * 11 + count % 2 * 6 > reader.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        out.reserve(count)?;
        let mut remaining = count;

        while remaining >= 2 {
            let value = reader.read_bits(11)? as usize;
            let pair = [
                ALPHANUMERIC_TABLE[(value / 45) % 45],
                ALPHANUMERIC_TABLE[value % 45],
            ];
            out.extend(&pair)?;
            remaining -= 2;
        }

        if remaining == 1 {
            let value = reader.read_bits(6)? as usize;
            out.extend(&[ALPHANUMERIC_TABLE[value % 45]])?;
        }

        Ok(())
    }
}
