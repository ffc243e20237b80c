//! Error types for JPEG XL encoding and decoding.
//!
//! Every fallible operation in the codec core returns `JxlResult<T>`. None
//! of these variants are fatal to the process; all are meant to be
//! recovered from by the caller.

use thiserror::Error;

/// Result type for JPEG XL operations.
pub type JxlResult<T> = Result<T, JxlError>;

/// Errors that can occur during JPEG XL encoding or decoding.
#[derive(Error, Debug)]
pub enum JxlError {
    #[error("invalid image dimensions: width or height is zero or exceeds 2^30")]
    InvalidImageDimensions,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid bit depth: {0} (expected 1..=32)")]
    InvalidBitDepth(u32),

    #[error("invalid orientation: {0} (expected 1..=8)")]
    InvalidOrientation(u32),

    #[error("invalid frame header: {0}")]
    InvalidFrameHeader(String),

    #[error("invalid signature: not a JPEG XL codestream or container")]
    InvalidSignature,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("empty distribution: no symbols to build a distribution from")]
    EmptyDistribution,

    #[error("all frequencies are zero")]
    AllZeroFrequencies,

    #[error("symbol {symbol} out of range for alphabet of size {alphabet_size}")]
    SymbolOutOfRange { symbol: u32, alphabet_size: u32 },

    #[error("invalid distribution sum: expected {expected}, got {got}")]
    InvalidDistributionSum { expected: u32, got: u32 },

    #[error("truncated data: input ended before decoding finished")]
    TruncatedData,

    #[error("truncated bitstream: not enough bits remained")]
    TruncatedBitstream,

    #[error("decoding failed: {0}")]
    DecodingFailed(String),

    #[error("invalid context index: {0}")]
    InvalidContext(usize),

    #[error("insufficient memory")]
    InsufficientMemory,

    #[error("region of interest extends past the frame edge")]
    ROIOutOfBounds,

    #[error("invalid extra channel: {0}")]
    InvalidExtraChannel(String),

    #[error("no eligible patches found for the requested patch configuration")]
    NoEligiblePatches,

    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
