//! # JPEG XL - Rust Reference Implementation
//!
//! This crate provides a high-level API for encoding and decoding JPEG XL images.
//!
//! ## Quick Start
//!
//! ### Decoding
//!
//! ```no_run
//! use jxl::JxlDecoder;
//!
//! let mut decoder = JxlDecoder::new();
//! let image = decoder.decode_file("input.jxl").unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```
//!
//! ### Encoding
//!
//! ```no_run
//! use jxl::{JxlEncoder, EncoderOptions, Image, Dimensions, ColorChannels, PixelType, ColorEncoding};
//!
//! let dimensions = Dimensions::new(800, 600);
//! let image = Image::new(
//!     dimensions,
//!     ColorChannels::RGB,
//!     PixelType::U8,
//!     ColorEncoding::SRGB,
//! ).unwrap();
//!
//! let options = EncoderOptions::default()
//!     .quality(90.0)
//!     .effort(7);
//!
//! let encoder = JxlEncoder::new(options);
//! encoder.encode_file(&image, "output.jxl").unwrap();
//! ```
//!
//! ## Features
//!
//! - Full JPEG XL encoding and decoding
//! - Support for multiple bit depths (8-bit, 16-bit, float)
//! - Lossless and lossy compression
//! - XYB color space support
//! - Multi-threaded processing
//! - ANS entropy coding
//!
//! ## Architecture
//!
//! This implementation is based on the official libjxl C++ reference implementation
//! and follows the ISO/IEC 18181 standard.

// Re-export core types
pub use jxl_core::{
    ColorChannels, ColorEncoding, Dimensions, Frame, Image, ImageBuffer, JxlError, JxlResult,
    Orientation, Patch, PixelType, Roi, Sample,
};

// Re-export decoder
pub use jxl_decoder::{JxlDecoder, JxlHeader};

// Re-export encoder
pub use jxl_encoder::{EncodeStats, EncoderOptions, JxlEncoder, PatchConfig, ReferenceFrameConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JPEG XL specification version this implementation targets
pub const SPEC_VERSION: &str = "ISO/IEC 18181:2022";

/// Dimensions and pixel format parsed from a codestream header, without
/// decoding any frame data.
#[derive(Debug, Clone, Copy)]
pub struct ImageHeaderInfo {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub bits_per_sample: u8,
}

/// Encode a single image, returning the encoded container bytes.
pub fn encode(image: &Image, options: EncoderOptions) -> JxlResult<Vec<u8>> {
    let encoder = JxlEncoder::new(options);
    let mut bytes = Vec::new();
    encoder.encode(image, &mut bytes)?;
    Ok(bytes)
}

/// Encode a sequence of frames -- an animation, or a sequence using
/// reference-frame delta encoding and/or patches -- returning the encoded
/// container bytes and summary statistics.
pub fn encode_frames(frames: &[Frame], options: EncoderOptions) -> JxlResult<(Vec<u8>, EncodeStats)> {
    let encoder = JxlEncoder::new(options);
    let mut bytes = Vec::new();
    let stats = encoder.encode_sequence(frames, &mut bytes)?;
    Ok((bytes, stats))
}

/// Decode a JPEG XL stream (container or naked codestream) into its frame
/// sequence. A still image decodes to a vector of one frame; the stream is
/// self-delimiting, so trailing bytes after the last frame are ignored.
pub fn decode(bytes: &[u8]) -> JxlResult<Vec<Frame>> {
    let mut decoder = JxlDecoder::new();
    decoder.decode_sequence(bytes)
}

/// Parse just the codestream header -- dimensions, channel count, bit depth
/// -- without decoding any frame data.
pub fn parse_image_header(bytes: &[u8]) -> JxlResult<ImageHeaderInfo> {
    let header = jxl_decoder::parse_header(bytes)?;
    Ok(ImageHeaderInfo {
        width: header.dimensions.width,
        height: header.dimensions.height,
        channels: header.num_channels,
        bits_per_sample: header.bit_depth,
    })
}
