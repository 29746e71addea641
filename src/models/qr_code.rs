use super::{BitMatrix, Point};
use crate::decoder::qr_decoder;
use crate::error::DecodeError;

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// Decode the two level bits of the format word (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// The two level bits as stored in the format word
    pub fn format_bits(self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the block tables (L, M, Q, H)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter name
    pub fn as_char(self) -> char {
        match self {
            ECLevel::L => 'L',
            ECLevel::M => 'M',
            ECLevel::Q => 'Q',
            ECLevel::H => 'H',
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Get mask pattern from the low three bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Numeric id (0-7)
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Check if module at row `i`, column `j` is inverted by this mask
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Segment encoding mode. Ordered so the "highest" mode seen can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    /// Digits 0-9
    Numeric = 1,
    /// 0-9, A-Z, space and `$%*+-./:`
    Alphanumeric = 2,
    /// Raw 8-bit bytes
    Byte = 4,
    /// Shift-JIS double-byte characters
    Kanji = 8,
}

impl DataType {
    /// Mode indicator value
    pub fn mode(self) -> u8 {
        self as u8
    }
}

/// A located symbol: corners, grid size and the raw (still masked) module grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// Top-left, top-right, bottom-right, bottom-left of the symbol in pixels
    pub corners: [Point; 4],
    /// Modules per side
    pub size: usize,
    /// Module grid, dark = 1
    pub cells: BitMatrix,
}

impl Code {
    /// Create a code from a sampled grid
    pub fn new(corners: [Point; 4], cells: BitMatrix) -> Self {
        Self {
            corners,
            size: cells.width(),
            cells,
        }
    }

    /// Module at column `x`, row `y`
    pub fn cell(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y)
    }

    /// Packed cell bitmap
    pub fn cell_bitmap(&self) -> &[u8] {
        self.cells.as_bytes()
    }

    /// Mirror the grid so a code seen through glass or printed reversed can be decoded.
    pub fn flip(&mut self) {
        self.cells = self.cells.transpose();
        self.corners.swap(1, 3);
    }

    /// Decode format information and payload
    pub fn decode(&self) -> Result<Data, DecodeError> {
        qr_decoder::decode(self)
    }
}

/// Decoded symbol contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    /// Version (1-40)
    pub version: u8,
    /// Error correction level
    pub ecc_level: ECLevel,
    /// Mask pattern the symbol was written with
    pub mask: MaskPattern,
    /// Highest-valued segment mode present, `None` for an empty payload
    pub data_type: Option<DataType>,
    /// Last ECI designator seen, 0 when none
    pub eci: u32,
    /// Concatenated segment bytes
    pub payload: Vec<u8>,
}

impl Data {
    /// Payload length in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Payload as UTF-8, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
