//! Color space transformations for JPEG XL
//!
//! This crate implements color space conversions, including:
//! - The reversible color transform (RCT) used by the Modular pipeline
//! - RGB <-> YCbCr (BT.601), used by the VarDCT pipeline
//! - RGB <-> XYB, an optional perceptual color space
//! - sRGB <-> Linear RGB

pub mod rct;
pub mod srgb;
pub mod xyb;
pub mod ycbcr;

pub use rct::*;
pub use srgb::*;
pub use xyb::*;
pub use ycbcr::*;
