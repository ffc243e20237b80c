//! Core types and utilities for JPEG XL implementation
//!
//! This crate provides the fundamental data structures and types used throughout
//! the JPEG XL implementation, including image metadata, pixel formats, and error types.

pub mod buffer_pool;
pub mod consts;
pub mod error;
pub mod image;
pub mod metadata;
pub mod thread_pool;
pub mod types;

pub use buffer_pool::{EncoderBufferPool, SharedEncodingPools};
pub use error::{JxlError, JxlResult};
pub use image::*;
pub use metadata::*;
pub use thread_pool::WorkerPool;
pub use types::*;

/// Bare codestream signature: the two bytes every encoded codestream starts
/// with, per SPEC_FULL.md §4.F.
pub const JXL_CODESTREAM_SIGNATURE: [u8; 2] = [0xFF, 0x0A];
