use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{
    PayloadWriter, alphanumeric::AlphanumericDecoder, byte::ByteDecoder, eci::EciDecoder,
    kanji::KanjiDecoder, numeric::NumericDecoder,
};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::ec_block_info;
use crate::error::DecodeError;
use crate::models::{DataType, ECLevel};

const MODE_TERMINATOR: u32 = 0;
const MODE_NUMERIC: u32 = 1;
const MODE_ALPHANUMERIC: u32 = 2;
const MODE_STRUCTURED_APPEND: u32 = 3;
const MODE_BYTE: u32 = 4;
const MODE_FNC1_FIRST: u32 = 5;
const MODE_ECI: u32 = 7;
const MODE_KANJI: u32 = 8;
const MODE_FNC1_SECOND: u32 = 9;

/// Decoded segment stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segments {
    pub payload: Vec<u8>,
    pub data_type: Option<DataType>,
    pub eci: u32,
}

/// Split interleaved codewords into blocks, correct each one and
/// concatenate their data bytes.
///
/// Short blocks come first; every block gets one data byte per round until
/// the short blocks are full, then the check bytes follow round-robin.
pub(crate) fn deinterleave_and_correct(
    codewords: &[u8],
    version: u8,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let info = ec_block_info(version, ec_level).ok_or(DecodeError::InvalidVersion)?;
    if codewords.len() < info.total_codewords {
        return Err(DecodeError::DataUnderflow);
    }

    let short_len = info.short_block_data();
    let num_short_blocks = info.num_blocks - info.long_blocks();
    let block_data_len = |b: usize| {
        if b < num_short_blocks {
            short_len
        } else {
            short_len + 1
        }
    };

    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(short_len + 1 + info.ecc_per_block))
        .collect();

    let mut stream = codewords[..info.total_codewords].iter().copied();
    for i in 0..=short_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < block_data_len(b) {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data_out = Vec::with_capacity(info.data_codewords());
    for (b, block) in blocks.iter_mut().enumerate() {
        match rs.decode(block) {
            Ok(0) => {}
            Ok(fixed) => log::trace!("block {b}: corrected {fixed} codewords"),
            Err(err) => {
                log::debug!(
                    "block {b} of {} uncorrectable ({} check bytes)",
                    info.num_blocks,
                    info.ecc_per_block
                );
                return Err(err);
            }
        }
        data_out.extend_from_slice(&block[..block_data_len(b)]);
    }

    Ok(data_out)
}

/// Parse the segment stream in `data` for a symbol of the given version.
///
/// Stops at a terminator or when fewer than four bits remain. The payload
/// may not exceed `limit` bytes.
pub(crate) fn decode_segments(
    data: &[u8],
    version: u8,
    limit: usize,
) -> Result<Segments, DecodeError> {
    let mut reader = BitReader::new(data);
    let mut out = PayloadWriter::new(limit);
    let mut data_type: Option<DataType> = None;
    let mut eci = 0u32;

    while reader.remaining() >= 4 {
        let mode = reader.read_bits(4)?;
        let segment_type = match mode {
            MODE_TERMINATOR => break,
            MODE_NUMERIC => {
                let count = read_count(&mut reader, DataType::Numeric, version)?;
                NumericDecoder::decode(&mut reader, count, &mut out)?;
                DataType::Numeric
            }
            MODE_ALPHANUMERIC => {
                let count = read_count(&mut reader, DataType::Alphanumeric, version)?;
                AlphanumericDecoder::decode(&mut reader, count, &mut out)?;
                DataType::Alphanumeric
            }
            MODE_BYTE => {
                let count = read_count(&mut reader, DataType::Byte, version)?;
                ByteDecoder::decode(&mut reader, count, &mut out)?;
                DataType::Byte
            }
            MODE_KANJI => {
                let count = read_count(&mut reader, DataType::Kanji, version)?;
                KanjiDecoder::decode(&mut reader, count, &mut out)?;
                DataType::Kanji
            }
            MODE_ECI => {
                eci = EciDecoder::decode(&mut reader)?;
                continue;
            }
            MODE_STRUCTURED_APPEND => {
                // Symbol position, total and parity
                reader.skip(16)?;
                continue;
            }
            MODE_FNC1_FIRST => continue,
            MODE_FNC1_SECOND => {
                // Application indicator
                reader.skip(8)?;
                continue;
            }
            other => {
                log::debug!("unknown mode indicator {other:#06b} at bit {}", reader.position() - 4);
                return Err(DecodeError::UnknownDataType);
            }
        };
        data_type = data_type.max(Some(segment_type));
    }

    Ok(Segments {
        payload: out.into_inner(),
        data_type,
        eci,
    })
}

fn read_count(
    reader: &mut BitReader<'_>,
    data_type: DataType,
    version: u8,
) -> Result<usize, DecodeError> {
    Ok(reader.read_bits(char_count_bits(data_type, version))? as usize)
}

/// Width of the character count field for a mode and version
pub(crate) fn char_count_bits(data_type: DataType, version: u8) -> usize {
    let widths = match data_type {
        DataType::Numeric => [10, 12, 14],
        DataType::Alphanumeric => [9, 11, 13],
        DataType::Byte => [8, 16, 16],
        DataType::Kanji => [8, 10, 12],
    };
    match version {
        0..=9 => widths[0],
        10..=26 => widths[1],
        _ => widths[2],
    }
}
