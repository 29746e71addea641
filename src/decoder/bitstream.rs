/// Codeword extraction from an unmasked module grid, and bit-level reading
use crate::decoder::function_mask::FunctionMask;
use crate::error::DecodeError;
use crate::models::BitMatrix;

/// Reads data modules in the standard zig-zag order
pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Collect data modules into codewords, MSB first.
    ///
    /// Columns are read in pairs from the right edge, alternating upwards
    /// and downwards, skipping the vertical timing column. Trailing bits
    /// that do not fill a byte are dropped.
    pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
        let size = func.size();
        let mut codewords = Vec::with_capacity(size * size / 8);
        let mut byte = 0u8;
        let mut filled = 0;

        let mut push = |bit: bool| {
            byte = (byte << 1) | bit as u8;
            filled += 1;
            if filled == 8 {
                codewords.push(byte);
                byte = 0;
                filled = 0;
            }
        };

        let mut upward = true;
        let mut col = size as isize - 1;
        while col > 0 {
            if col == 6 {
                col -= 1;
            }
            for step in 0..size {
                let row = if upward { size - 1 - step } else { step };
                for c in [col as usize, col as usize - 1] {
                    if !func.is_function(c, row) {
                        push(matrix.get(c, row));
                    }
                }
            }
            upward = !upward;
            col -= 2;
        }

        codewords
    }
}

/// Big-endian bit reader over a byte buffer
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Start reading at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bits left to read
    pub fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.pos)
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read `n` (at most 32) bits as an unsigned integer
    pub fn read_bits(&mut self, n: usize) -> Result<u32, DecodeError> {
        debug_assert!(n <= 32);
        if n > self.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        let mut val = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.pos >> 3] >> (7 - (self.pos & 7))) & 1;
            val = (val << 1) | bit as u32;
            self.pos += 1;
        }
        Ok(val)
    }

    /// Skip `n` bits
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::DataUnderflow);
        }
        self.pos += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::raw_data_modules;

    #[test]
    fn test_codeword_count() {
        for version in [1u8, 2, 7, 14, 40] {
            let func = FunctionMask::new(version);
            let matrix = BitMatrix::square(func.size());
            let codewords = BitstreamExtractor::extract_codewords(&matrix, &func);
            assert_eq!(codewords.len(), raw_data_modules(version) / 8);
        }
    }

    #[test]
    fn test_first_codeword_order() {
        // Version 1: the first byte occupies the bottom-right 2x4 block,
        // read right column first, bottom row first.
        let func = FunctionMask::new(1);
        let mut matrix = BitMatrix::square(21);
        matrix.set(20, 20, true); // bit 7
        matrix.set(19, 19, true); // bit 4
        matrix.set(19, 17, true); // bit 0
        let codewords = BitstreamExtractor::extract_codewords(&matrix, &func);
        assert_eq!(codewords[0], 0b1001_0001);
        assert!(codewords[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bit_reader() {
        let data = [0b1010_1100, 0b0101_0000];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(4), Ok(0b1010));
        assert_eq!(reader.read_bits(6), Ok(0b110001));
        assert_eq!(reader.position(), 10);
        assert_eq!(reader.remaining(), 6);
        assert_eq!(reader.read_bits(7), Err(DecodeError::DataUnderflow));
        assert!(reader.skip(6).is_ok());
        assert_eq!(reader.read_bits(0), Ok(0));
    }
}
