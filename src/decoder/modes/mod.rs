//! Segment decoders, one per mode indicator
//!
//! - Numeric: digits packed three to ten bits
//! - Alphanumeric: 45-symbol set packed two to eleven bits
//! - Byte: raw 8-bit data
//! - Kanji: 13-bit Shift-JIS double-byte characters
//! - ECI: extended channel designators

use crate::error::DecodeError;

pub mod alphanumeric;
pub mod byte;
pub mod eci;
pub mod kanji;
pub mod numeric;

/// Largest payload a symbol can carry, in bytes
pub const MAX_PAYLOAD: usize = 8896;

/// Append-only payload buffer with a hard size limit
#[derive(Debug)]
pub struct PayloadWriter {
    buf: Vec<u8>,
    limit: usize,
}

impl PayloadWriter {
    /// Empty writer that refuses to grow past `limit` bytes
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    /// Fail with [`DecodeError::DataOverflow`] unless `n` more bytes fit
    pub fn reserve(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.buf.len() + n > self.limit {
            return Err(DecodeError::DataOverflow);
        }
        self.buf.reserve(n);
        Ok(())
    }

    /// Append bytes already accounted for by [`Self::reserve`]
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Finished payload
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
