//! Bitstream reading and writing for JPEG XL
//!
//! This crate provides bitstream operations and Asymmetric Numeral Systems (ANS)
//! entropy coding for JPEG XL.

pub mod ans;
pub mod bitreader;
pub mod bitwriter;
pub mod context;
pub mod huffman;

pub use ans::{
    build_distribution, decode_sequence, decode_with_contexts, encode_sequence,
    encode_with_contexts, read_byte_blob, write_byte_blob, AnsDistribution, RansDecoder,
    RansEncoder, Symbol, MAX_ALPHABET_SIZE,
};
pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
pub use context::{Context, ContextModel, FrequencyBand};
