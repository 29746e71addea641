use super::payload::{char_count_bits, decode_segments, deinterleave_and_correct};
use super::*;
use crate::decoder::tables::ec_block_info;
use crate::models::{BitMatrix, DataType, ECLevel, Point};

/// MSB-first bit packer for hand-built segment streams
#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn put(&mut self, value: u32, n: usize) -> &mut Self {
        for i in (0..n).rev() {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 0x80 >> (self.len % 8);
            }
            self.len += 1;
        }
        self
    }

    fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

fn blank_code(size: usize) -> Code {
    Code::new([Point::new(0, 0); 4], BitMatrix::square(size))
}

#[test]
fn test_char_count_bits() {
    assert_eq!(char_count_bits(DataType::Numeric, 1), 10);
    assert_eq!(char_count_bits(DataType::Numeric, 10), 12);
    assert_eq!(char_count_bits(DataType::Numeric, 27), 14);
    assert_eq!(char_count_bits(DataType::Alphanumeric, 9), 9);
    assert_eq!(char_count_bits(DataType::Byte, 26), 16);
    assert_eq!(char_count_bits(DataType::Kanji, 40), 12);
}

#[test]
fn test_mixed_segments() {
    let mut w = BitWriter::default();
    w.put(1, 4).put(3, 10).put(123, 10); // numeric "123"
    w.put(2, 4).put(2, 9).put(10 * 45 + 11, 11); // alphanumeric "AB"
    w.put(4, 4).put(2, 8).put(b'h' as u32, 8).put(b'i' as u32, 8);
    w.put(0, 4);
    let segments = decode_segments(&w.finish(), 1, MAX_PAYLOAD).unwrap();
    assert_eq!(segments.payload, b"123ABhi");
    assert_eq!(segments.data_type, Some(DataType::Byte));
    assert_eq!(segments.eci, 0);
}

#[test]
fn test_eci_byte_kanji() {
    let mut w = BitWriter::default();
    w.put(7, 4).put(26, 8);
    w.put(4, 4).put(6, 8);
    for b in "héllo".bytes() {
        w.put(b as u32, 8);
    }
    w.put(8, 4).put(2, 8).put(0xd9f, 13).put(0x1aaa, 13);
    let segments = decode_segments(&w.finish(), 2, MAX_PAYLOAD).unwrap();
    assert_eq!(segments.payload, b"h\xc3\xa9llo\x93\x5f\xe4\xaa");
    assert_eq!(segments.data_type, Some(DataType::Kanji));
    assert_eq!(segments.eci, 26);
}

#[test]
fn test_structured_append_and_fnc1_are_skipped() {
    let mut w = BitWriter::default();
    w.put(3, 4).put(0x1234, 16);
    w.put(5, 4);
    w.put(9, 4).put(0xaa, 8);
    w.put(1, 4).put(1, 10).put(7, 4);
    let segments = decode_segments(&w.finish(), 1, MAX_PAYLOAD).unwrap();
    assert_eq!(segments.payload, b"7");
    assert_eq!(segments.data_type, Some(DataType::Numeric));
}

#[test]
fn test_empty_stream() {
    let segments = decode_segments(&[0, 0], 1, MAX_PAYLOAD).unwrap();
    assert!(segments.payload.is_empty());
    assert_eq!(segments.data_type, None);
}

#[test]
fn test_segment_errors() {
    let mut w = BitWriter::default();
    w.put(6, 4).put(0, 12);
    assert_eq!(
        decode_segments(&w.finish(), 1, MAX_PAYLOAD),
        Err(DecodeError::UnknownDataType)
    );

    // Byte segment announcing more bytes than follow
    let mut w = BitWriter::default();
    w.put(4, 4).put(20, 8).put(0x41, 8).put(0, 4);
    assert_eq!(
        decode_segments(&w.finish(), 1, MAX_PAYLOAD),
        Err(DecodeError::DataUnderflow)
    );

    let mut w = BitWriter::default();
    w.put(4, 4).put(3, 8).put(0x414243, 24).put(0, 4);
    assert_eq!(
        decode_segments(&w.finish(), 1, 2),
        Err(DecodeError::DataOverflow)
    );
}

#[test]
fn test_deinterleave_correction_boundary() {
    // All-zero codewords form a valid RS codeword in every block
    let info = ec_block_info(5, ECLevel::Q).unwrap();
    let clean = vec![0u8; info.total_codewords];
    let data = deinterleave_and_correct(&clean, 5, ECLevel::Q).unwrap();
    assert_eq!(data.len(), info.data_codewords());

    // Block 0 owns every fourth codeword; it tolerates ecc/2 = 9 errors
    let mut damaged = clean.clone();
    for k in 0..9 {
        damaged[k * 4] = 0x5a;
    }
    assert_eq!(deinterleave_and_correct(&damaged, 5, ECLevel::Q), Ok(data));

    damaged[36] = 0x5a;
    assert_eq!(
        deinterleave_and_correct(&damaged, 5, ECLevel::Q),
        Err(DecodeError::DataEcc)
    );
}

#[test]
fn test_invalid_grid_sizes() {
    assert_eq!(decode(&blank_code(20)).map(|_| ()), Err(DecodeError::InvalidGridSize));
    assert_eq!(decode(&blank_code(23)).map(|_| ()), Err(DecodeError::InvalidGridSize));
    assert_eq!(decode(&blank_code(181)).map(|_| ()), Err(DecodeError::InvalidVersion));
}

#[test]
fn test_blank_grid_fails_format() {
    // An all-light grid reads as format word 0x5412 after masking, which
    // is nowhere near a valid codeword.
    assert_eq!(decode(&blank_code(21)).map(|_| ()), Err(DecodeError::FormatEcc));
}
