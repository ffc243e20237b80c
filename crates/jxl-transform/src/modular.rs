//! Modular Mode - JPEG XL Lossless Compression
//!
//! Modular mode provides true lossless compression through:
//! - Integer-only operations (no lossy DCT/quantization)
//! - MED (median edge detector) predictive coding
//! - Reversible color transform and squeeze decorrelation
//! - Multi-context rANS entropy coding
//!
//! This is the production lossless path in JPEG XL.

use jxl_core::{JxlError, JxlResult};

use crate::med;

/// Modular image representation
///
/// Unlike VarDCT mode, modular mode works directly on integer pixel values
/// without lossy transforms. Channels can be of different bit depths.
#[derive(Debug, Clone)]
pub struct ModularImage {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Number of channels
    pub num_channels: usize,
    /// Bit depth per channel (can vary)
    pub bit_depths: Vec<u8>,
    /// Channel data (one Vec per channel)
    pub channels: Vec<Vec<i32>>,
}

impl ModularImage {
    /// Create a new modular image
    pub fn new(width: usize, height: usize, num_channels: usize, bit_depth: u8) -> Self {
        let pixel_count = width * height;
        let mut channels = Vec::with_capacity(num_channels);
        let mut bit_depths = Vec::with_capacity(num_channels);

        for _ in 0..num_channels {
            channels.push(vec![0i32; pixel_count]);
            bit_depths.push(bit_depth);
        }

        Self {
            width,
            height,
            num_channels,
            bit_depths,
            channels,
        }
    }

    /// Get pixel value
    pub fn get_pixel(&self, channel: usize, x: usize, y: usize) -> JxlResult<i32> {
        if channel >= self.num_channels {
            return Err(JxlError::InvalidConfiguration(format!(
                "channel {} out of range",
                channel
            )));
        }
        if x >= self.width || y >= self.height {
            return Err(JxlError::InvalidConfiguration("coordinates out of bounds".to_string()));
        }
        Ok(self.channels[channel][y * self.width + x])
    }

    /// Set pixel value
    pub fn set_pixel(&mut self, channel: usize, x: usize, y: usize, value: i32) -> JxlResult<()> {
        if channel >= self.num_channels {
            return Err(JxlError::InvalidConfiguration(format!(
                "channel {} out of range",
                channel
            )));
        }
        if x >= self.width || y >= self.height {
            return Err(JxlError::InvalidConfiguration("coordinates out of bounds".to_string()));
        }
        self.channels[channel][y * self.width + x] = value;
        Ok(())
    }

    /// Convert from float RGB/RGBA image
    pub fn from_float_image(
        rgb: &[f32],
        width: usize,
        height: usize,
        num_channels: usize,
        bit_depth: u8,
    ) -> Self {
        let mut img = Self::new(width, height, num_channels, bit_depth);
        let max_value = (1 << bit_depth) - 1;

        for i in 0..(width * height) {
            for c in 0..num_channels {
                let value = (rgb[i * num_channels + c] * max_value as f32).round() as i32;
                let clamped = value.max(0).min(max_value);
                img.channels[c][i] = clamped;
            }
        }

        img
    }

    /// Convert to float RGB/RGBA image
    pub fn to_float_image(&self) -> Vec<f32> {
        let pixel_count = self.width * self.height;
        let mut rgb = vec![0.0f32; pixel_count * self.num_channels];

        for c in 0..self.num_channels {
            let max_value = (1 << self.bit_depths[c]) - 1;
            for i in 0..pixel_count {
                rgb[i * self.num_channels + c] = self.channels[c][i] as f32 / max_value as f32;
            }
        }

        rgb
    }
}

/// Encode every channel of a modular image into per-channel residual
/// symbol streams, using the fixed MED predictor.
///
/// Each channel's valid range is derived from its bit depth.
pub fn encode_predictive(image: &ModularImage) -> Vec<Vec<u32>> {
    let mut symbols = Vec::with_capacity(image.num_channels);

    for c in 0..image.num_channels {
        let max_value = (1i32 << image.bit_depths[c]) - 1;
        symbols.push(med::encode_channel(
            &image.channels[c],
            image.width,
            image.height,
            0,
            max_value,
        ));
    }

    symbols
}

/// Decode a modular image from per-channel MED residual symbol streams.
pub fn decode_predictive(symbols: &[Vec<u32>], width: usize, height: usize, bit_depths: &[u8]) -> ModularImage {
    let num_channels = symbols.len();
    let mut image = ModularImage::new(width, height, num_channels, bit_depths.first().copied().unwrap_or(8));
    image.bit_depths = bit_depths.to_vec();

    for c in 0..num_channels {
        let max_value = (1i32 << bit_depths[c]) - 1;
        image.channels[c] = med::decode_channel(&symbols[c], width, height, 0, max_value);
    }

    image
}

/// Modular mode encoder options
#[derive(Debug, Clone)]
pub struct ModularOptions {
    /// Number of squeeze (Haar-like) decomposition levels to apply before
    /// MED prediction. 0 disables squeeze entirely.
    pub squeeze_levels: usize,
    /// Apply the reversible color transform before prediction.
    pub use_color_transform: bool,
}

impl Default for ModularOptions {
    fn default() -> Self {
        Self {
            squeeze_levels: 0,
            use_color_transform: true,
        }
    }
}
