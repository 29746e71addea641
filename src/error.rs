//! Error types.
//!
//! Locating symbols never fails: an image without codes simply yields zero
//! of them. Errors only come from misuse of the [`crate::Recognizer`] API
//! and from decoding a located code.

/// Why a located code could not be decoded
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// Grid size is not `17 + 4 * version`
    #[error("Invalid grid size")]
    InvalidGridSize,
    /// Version outside 1-40, or version information disagreeing with the grid
    #[error("Invalid version")]
    InvalidVersion,
    /// Neither format information copy could be corrected
    #[error("Format data ECC failure")]
    FormatEcc,
    /// Neither version information block could be corrected
    #[error("Version data ECC failure")]
    VersionEcc,
    /// A Reed-Solomon block had more errors than it can correct
    #[error("ECC failure")]
    DataEcc,
    /// A segment used an unsupported mode indicator
    #[error("Unknown data type")]
    UnknownDataType,
    /// The payload outgrew the maximum payload size
    #[error("Data overflow")]
    DataOverflow,
    /// A segment announced more data than the bitstream holds
    #[error("Data underflow")]
    DataUnderflow,
}

/// Outcome of a decode attempt, in the form reported by [`crate::error_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStatus {
    /// Decoded without error
    Success,
    /// Decoding failed
    Failed(DecodeError),
}

impl DecodeStatus {
    /// Fixed English description of the status
    pub fn message(self) -> &'static str {
        match self {
            DecodeStatus::Success => "Success",
            DecodeStatus::Failed(err) => err.message(),
        }
    }
}

impl<T> From<&Result<T, DecodeError>> for DecodeStatus {
    fn from(result: &Result<T, DecodeError>) -> Self {
        match result {
            Ok(_) => DecodeStatus::Success,
            Err(err) => DecodeStatus::Failed(*err),
        }
    }
}

impl From<DecodeError> for DecodeStatus {
    fn from(err: DecodeError) -> Self {
        DecodeStatus::Failed(err)
    }
}

impl DecodeError {
    /// Same text as the `Display` impl, without allocating
    pub fn message(self) -> &'static str {
        match self {
            DecodeError::InvalidGridSize => "Invalid grid size",
            DecodeError::InvalidVersion => "Invalid version",
            DecodeError::FormatEcc => "Format data ECC failure",
            DecodeError::VersionEcc => "Version data ECC failure",
            DecodeError::DataEcc => "ECC failure",
            DecodeError::UnknownDataType => "Unknown data type",
            DecodeError::DataOverflow => "Data overflow",
            DecodeError::DataUnderflow => "Data underflow",
        }
    }
}

/// Misuse of the recognizer API
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognizerError {
    /// The pixel buffer does not match the configured dimensions
    #[error("image buffer has {actual} bytes, expected {expected}")]
    ImageSizeMismatch {
        /// `width * height`
        expected: usize,
        /// Length of the buffer passed in
        actual: usize,
    },
    /// `code(index)` called with an index past the last code
    #[error("code index {index} out of range (found {count})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of codes available
        count: usize,
    },
    /// Width or height exceed what pixel coordinates can address
    #[error("image dimensions {width}x{height} are too large")]
    DimensionsTooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
}
