//! JPEG XL image metadata (ISO/IEC 18181-1 Section 7.2)
//!
//! `JxlImageMetadata` carries the per-image properties that sit above
//! individual frames: orientation, intrinsic size, bit depth, extra
//! channels, and color encoding.

use crate::size;
use jxl_bitstream::{BitReader, BitWriter};
use jxl_core::{ColorEncoding, JxlError, JxlResult, Orientation};
use std::io::{Read, Write};

/// Bit depth configuration (spec Section 7.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth {
    /// Whether floating point samples are used
    pub floating_point_sample: bool,
    /// Bits per sample (1-32)
    pub bits_per_sample: u32,
    /// Exponent bits for floating point (0 if integer)
    pub exp_bits: u32,
}

impl BitDepth {
    /// Create an integer bit depth
    pub fn integer(bits: u32) -> Self {
        Self {
            floating_point_sample: false,
            bits_per_sample: bits,
            exp_bits: 0,
        }
    }

    /// Create a floating point bit depth
    pub fn float(bits: u32, exp_bits: u32) -> Self {
        Self {
            floating_point_sample: true,
            bits_per_sample: bits,
            exp_bits,
        }
    }

    /// Encode bit depth to bitstream (spec Section 7.2.1)
    pub fn encode<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        writer.write_bit(self.floating_point_sample)?;

        if self.floating_point_sample {
            // Floating point samples
            if self.bits_per_sample == 32 {
                writer.write_bits(0, 2)?;
            } else if self.bits_per_sample == 16 {
                writer.write_bits(1, 2)?;
            } else {
                writer.write_bits(2, 2)?;
                writer.write_bits((self.bits_per_sample - 1) as u64, 5)?;
            }
            writer.write_bits(self.exp_bits as u64, 5)?;
        } else {
            // Integer samples
            match self.bits_per_sample {
                8 => writer.write_bits(0, 2)?,
                10 => writer.write_bits(1, 2)?,
                12 => writer.write_bits(2, 2)?,
                _ => {
                    writer.write_bits(3, 2)?;
                    writer.write_bits((self.bits_per_sample - 1) as u64, 6)?;
                }
            }
        }

        Ok(())
    }

    /// Decode bit depth from bitstream
    pub fn decode<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Self> {
        let floating_point_sample = reader.read_bit()?;

        if floating_point_sample {
            let selector = reader.read_bits(2)? as u32;
            let bits_per_sample = match selector {
                0 => 32,
                1 => 16,
                2 => 1 + reader.read_bits(5)? as u32,
                _ => return Err(JxlError::InvalidBitDepth(selector)),
            };
            let exp_bits = reader.read_bits(5)? as u32;
            Ok(Self::float(bits_per_sample, exp_bits))
        } else {
            let selector = reader.read_bits(2)? as u32;
            let bits_per_sample = match selector {
                0 => 8,
                1 => 10,
                2 => 12,
                3 => 1 + reader.read_bits(6)? as u32,
                _ => unreachable!(),
            };
            Ok(Self::integer(bits_per_sample))
        }
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::integer(8)
    }
}

/// Extra channel type (spec Section 7.2.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraChannelType {
    Alpha = 0,
    Depth = 1,
    SpotColor = 2,
    SelectionMask = 3,
    Black = 4,
    CFA = 5,
    Thermal = 6,
    Reserved7 = 7,
    Optional = 8,
}

impl ExtraChannelType {
    fn from_u32(value: u32) -> JxlResult<Self> {
        match value {
            0 => Ok(Self::Alpha),
            1 => Ok(Self::Depth),
            2 => Ok(Self::SpotColor),
            3 => Ok(Self::SelectionMask),
            4 => Ok(Self::Black),
            5 => Ok(Self::CFA),
            6 => Ok(Self::Thermal),
            7 => Ok(Self::Reserved7),
            8 => Ok(Self::Optional),
            _ => Err(JxlError::InvalidExtraChannel(format!("unknown extra channel type: {}", value))),
        }
    }
}

/// Extra channel information (simplified)
#[derive(Debug, Clone)]
pub struct ExtraChannelInfo {
    pub channel_type: ExtraChannelType,
    pub bit_depth: BitDepth,
}

impl Default for ExtraChannelInfo {
    fn default() -> Self {
        Self {
            channel_type: ExtraChannelType::Alpha,
            bit_depth: BitDepth::default(),
        }
    }
}

/// White point for a custom color encoding (spec Section 7.2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitePoint {
    D65,
    Custom,
    E,
    Dci,
}

/// Color primaries for a custom color encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primaries {
    SRGB,
    Custom,
    Bt2100,
    P3,
}

/// Transfer function for a custom color encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFunction {
    SRGB,
    Linear,
    Pq,
    Hlg,
    Gamma,
}

/// Rendering intent, as in ICC profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingIntent {
    Perceptual,
    Relative,
    Saturation,
    Absolute,
}

/// Fully-specified custom color encoding, used when `color_encoding ==
/// Custom` and no embedded ICC profile is present.
#[derive(Debug, Clone)]
pub struct CustomColorEncoding {
    pub color_space: u32,
    pub white_point: WhitePoint,
    pub primaries: Primaries,
    pub transfer_function: TransferFunction,
    pub rendering_intent: RenderingIntent,
}

impl Default for CustomColorEncoding {
    fn default() -> Self {
        Self {
            color_space: 0,
            white_point: WhitePoint::D65,
            primaries: Primaries::SRGB,
            transfer_function: TransferFunction::SRGB,
            rendering_intent: RenderingIntent::Relative,
        }
    }
}

impl CustomColorEncoding {
    fn encode<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        writer.write_bits(self.color_space as u64, 4)?;
        let white_point = match self.white_point {
            WhitePoint::D65 => 0,
            WhitePoint::Custom => 1,
            WhitePoint::E => 2,
            WhitePoint::Dci => 3,
        };
        writer.write_bits(white_point, 2)?;
        let primaries = match self.primaries {
            Primaries::SRGB => 0,
            Primaries::Custom => 1,
            Primaries::Bt2100 => 2,
            Primaries::P3 => 3,
        };
        writer.write_bits(primaries, 2)?;
        let transfer_function = match self.transfer_function {
            TransferFunction::SRGB => 0,
            TransferFunction::Linear => 1,
            TransferFunction::Pq => 2,
            TransferFunction::Hlg => 3,
            TransferFunction::Gamma => 4,
        };
        writer.write_bits(transfer_function, 3)?;
        let rendering_intent = match self.rendering_intent {
            RenderingIntent::Perceptual => 0,
            RenderingIntent::Relative => 1,
            RenderingIntent::Saturation => 2,
            RenderingIntent::Absolute => 3,
        };
        writer.write_bits(rendering_intent, 2)?;
        Ok(())
    }

    fn decode<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Self> {
        let color_space = reader.read_bits(4)? as u32;
        let white_point = match reader.read_bits(2)? {
            0 => WhitePoint::D65,
            1 => WhitePoint::Custom,
            2 => WhitePoint::E,
            _ => WhitePoint::Dci,
        };
        let primaries = match reader.read_bits(2)? {
            0 => Primaries::SRGB,
            1 => Primaries::Custom,
            2 => Primaries::Bt2100,
            _ => Primaries::P3,
        };
        let transfer_function = match reader.read_bits(3)? {
            0 => TransferFunction::SRGB,
            1 => TransferFunction::Linear,
            2 => TransferFunction::Pq,
            3 => TransferFunction::Hlg,
            _ => TransferFunction::Gamma,
        };
        let rendering_intent = match reader.read_bits(2)? {
            0 => RenderingIntent::Perceptual,
            1 => RenderingIntent::Relative,
            2 => RenderingIntent::Saturation,
            _ => RenderingIntent::Absolute,
        };
        Ok(Self {
            color_space,
            white_point,
            primaries,
            transfer_function,
            rendering_intent,
        })
    }
}

/// Complete spec-compliant ImageMetadata structure (spec Section 7.2)
#[derive(Debug, Clone)]
pub struct JxlImageMetadata {
    /// All default flag - if true, all metadata uses default values
    pub all_default: bool,

    // Extra fields
    pub extra_fields: bool,

    // Orientation - 1-8
    pub orientation: Orientation,

    // Intrinsic size
    pub have_intrinsic_size: bool,
    pub intrinsic_width: u32,
    pub intrinsic_height: u32,

    // Preview
    pub have_preview: bool,

    // Animation
    pub have_animation: bool,
    pub animation: Option<crate::animation::AnimationHeader>,

    // Bit depth
    pub bit_depth: BitDepth,

    // Modular 16-bit buffers
    pub modular_16bit_buffers: bool,

    // Extra channels
    pub num_extra_channels: u32,
    pub extra_channels: Vec<ExtraChannelInfo>,

    // XYB encoded
    pub xyb_encoded: bool,

    // Color encoding
    pub color_encoding: ColorEncoding,
    pub custom_color_encoding: Option<CustomColorEncoding>,
}

impl Default for JxlImageMetadata {
    fn default() -> Self {
        Self {
            all_default: true,
            extra_fields: false,
            orientation: Orientation::Identity,
            have_intrinsic_size: false,
            intrinsic_width: 0,
            intrinsic_height: 0,
            have_preview: false,
            have_animation: false,
            animation: None,
            bit_depth: BitDepth::default(),
            modular_16bit_buffers: false,
            num_extra_channels: 0,
            extra_channels: Vec::new(),
            xyb_encoded: true, // JPEG XL typically uses XYB
            color_encoding: ColorEncoding::SRGB,
            custom_color_encoding: None,
        }
    }
}

impl JxlImageMetadata {
    /// Create metadata for a simple RGB image
    pub fn for_rgb_image(width: u32, height: u32, bits_per_sample: u32) -> Self {
        Self {
            all_default: false,
            extra_fields: false,
            orientation: Orientation::Identity,
            have_intrinsic_size: true,
            intrinsic_width: width,
            intrinsic_height: height,
            have_preview: false,
            have_animation: false,
            animation: None,
            bit_depth: BitDepth::integer(bits_per_sample),
            modular_16bit_buffers: false,
            num_extra_channels: 0,
            extra_channels: Vec::new(),
            xyb_encoded: true,
            color_encoding: ColorEncoding::SRGB,
            custom_color_encoding: None,
        }
    }

    /// Create metadata for an animated image, carrying the loop/timing
    /// information the codestream header must reproduce.
    pub fn for_animation(width: u32, height: u32, bits_per_sample: u32, animation: crate::animation::AnimationHeader) -> Self {
        Self {
            have_animation: true,
            animation: Some(animation),
            ..Self::for_rgb_image(width, height, bits_per_sample)
        }
    }

    /// Encode metadata to bitstream (spec Section 7.2)
    pub fn encode<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        // all_default flag
        writer.write_bit(self.all_default)?;

        if self.all_default {
            return Ok(());
        }

        // extra_fields flag
        writer.write_bit(self.extra_fields)?;

        if self.extra_fields {
            // Orientation, stored as (value - 1) so 1..=8 fits in 3 bits.
            writer.write_bits((self.orientation as u64) - 1, 3)?;
        }

        // have_intrinsic_size
        writer.write_bit(self.have_intrinsic_size)?;
        if self.have_intrinsic_size {
            size::encode_dimensions(writer, self.intrinsic_width, self.intrinsic_height)?;
        }

        // have_preview
        writer.write_bit(self.have_preview)?;

        // have_animation
        writer.write_bit(self.have_animation)?;
        if self.have_animation {
            let animation = self.animation.unwrap_or_default();
            writer.write_bits(animation.tps_numerator as u64, 32)?;
            writer.write_bits(animation.tps_denominator as u64, 32)?;
            writer.write_bits(animation.num_loops as u64, 32)?;
        }

        // Bit depth
        self.bit_depth.encode(writer)?;

        // modular_16bit_buffers
        writer.write_bit(self.modular_16bit_buffers)?;

        // num_extra_channels (using u32 with selector 0 for now)
        writer.write_u32(self.num_extra_channels, 0)?;

        // xyb_encoded
        writer.write_bit(self.xyb_encoded)?;

        // Color encoding
        self.encode_color_encoding(writer)?;

        Ok(())
    }

    /// Decode metadata from bitstream
    pub fn decode<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Self> {
        let all_default = reader.read_bit()?;

        if all_default {
            return Ok(Self::default());
        }

        let extra_fields = reader.read_bit()?;

        let orientation = if extra_fields {
            let orientation_bits = reader.read_bits(3)? as u8 + 1;
            match orientation_bits {
                1 => Orientation::Identity,
                2 => Orientation::FlipHorizontal,
                3 => Orientation::Rotate180,
                4 => Orientation::FlipVertical,
                5 => Orientation::Transpose,
                6 => Orientation::Rotate90,
                7 => Orientation::AntiTranspose,
                8 => Orientation::Rotate270,
                other => return Err(JxlError::InvalidOrientation(other)),
            }
        } else {
            Orientation::Identity
        };

        let have_intrinsic_size = reader.read_bit()?;
        let (intrinsic_width, intrinsic_height) = if have_intrinsic_size {
            size::decode_dimensions(reader)?
        } else {
            (0, 0)
        };

        let have_preview = reader.read_bit()?;
        let have_animation = reader.read_bit()?;
        let animation = if have_animation {
            let tps_numerator = reader.read_bits(32)? as u32;
            let tps_denominator = reader.read_bits(32)? as u32;
            let num_loops = reader.read_bits(32)? as u32;
            Some(crate::animation::AnimationHeader {
                tps_numerator,
                tps_denominator,
                num_loops,
                have_timecodes: false,
            })
        } else {
            None
        };

        let bit_depth = BitDepth::decode(reader)?;
        let modular_16bit_buffers = reader.read_bit()?;

        let num_extra_channels = reader.read_u32(0)?;

        let xyb_encoded = reader.read_bit()?;

        let (color_encoding, custom_color_encoding) = Self::decode_color_encoding(reader)?;

        Ok(Self {
            all_default: false,
            extra_fields,
            orientation,
            have_intrinsic_size,
            intrinsic_width,
            intrinsic_height,
            have_preview,
            have_animation,
            animation,
            bit_depth,
            modular_16bit_buffers,
            num_extra_channels,
            extra_channels: Vec::new(),
            xyb_encoded,
            color_encoding,
            custom_color_encoding,
        })
    }

    /// Encode color encoding: an all-default bit, then either an ICC-profile
    /// flag or the enumerated color space/white point/primaries/transfer
    /// function/rendering intent fields (spec Section 7.2.3).
    fn encode_color_encoding<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        let color_enc = match self.color_encoding {
            ColorEncoding::SRGB => 0,
            ColorEncoding::LinearSRGB => 1,
            ColorEncoding::XYB => 2,
            ColorEncoding::Custom => 3,
            ColorEncoding::DisplayP3 => 4,
            ColorEncoding::Rec2020 => 5,
        };
        writer.write_bits(color_enc, 3)?;

        if self.color_encoding == ColorEncoding::Custom {
            let custom = self.custom_color_encoding.clone().unwrap_or_default();
            custom.encode(writer)?;
        }

        Ok(())
    }

    /// Decode color encoding written by [`Self::encode_color_encoding`].
    fn decode_color_encoding<R: Read>(reader: &mut BitReader<R>) -> JxlResult<(ColorEncoding, Option<CustomColorEncoding>)> {
        let color_enc = reader.read_bits(3)? as u8;
        let color_encoding = match color_enc {
            0 => ColorEncoding::SRGB,
            1 => ColorEncoding::LinearSRGB,
            2 => ColorEncoding::XYB,
            3 => ColorEncoding::Custom,
            4 => ColorEncoding::DisplayP3,
            5 => ColorEncoding::Rec2020,
            _ => ColorEncoding::SRGB,
        };

        let custom_color_encoding = if color_encoding == ColorEncoding::Custom {
            Some(CustomColorEncoding::decode(reader)?)
        } else {
            None
        };

        Ok((color_encoding, custom_color_encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_integer() {
        let bd = BitDepth::integer(8);
        assert!(!bd.floating_point_sample);
        assert_eq!(bd.bits_per_sample, 8);
        assert_eq!(bd.exp_bits, 0);
    }

    #[test]
    fn test_bit_depth_float() {
        let bd = BitDepth::float(32, 8);
        assert!(bd.floating_point_sample);
        assert_eq!(bd.bits_per_sample, 32);
        assert_eq!(bd.exp_bits, 8);
    }

    #[test]
    fn test_bit_depth_roundtrip() {
        let original = BitDepth::integer(12);
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            original.encode(&mut writer).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let decoded = BitDepth::decode(&mut reader).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_metadata_default() {
        let metadata = JxlImageMetadata::default();
        assert!(metadata.all_default);
        assert!(metadata.xyb_encoded);
    }

    #[test]
    fn test_metadata_for_rgb() {
        let metadata = JxlImageMetadata::for_rgb_image(64, 64, 8);
        assert!(!metadata.all_default);
        assert!(metadata.have_intrinsic_size);
        assert_eq!(metadata.intrinsic_width, 64);
        assert_eq!(metadata.intrinsic_height, 64);
        assert_eq!(metadata.bit_depth.bits_per_sample, 8);
    }

    #[test]
    fn test_metadata_roundtrip_default() {
        let original = JxlImageMetadata::default();
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            original.encode(&mut writer).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let decoded = JxlImageMetadata::decode(&mut reader).unwrap();
        assert_eq!(original.all_default, decoded.all_default);
        assert_eq!(original.xyb_encoded, decoded.xyb_encoded);
    }

    #[test]
    fn test_metadata_roundtrip_rgb() {
        let original = JxlImageMetadata::for_rgb_image(128, 128, 8);
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            original.encode(&mut writer).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let decoded = JxlImageMetadata::decode(&mut reader).unwrap();
        assert_eq!(original.all_default, decoded.all_default);
        assert_eq!(original.have_intrinsic_size, decoded.have_intrinsic_size);
        assert_eq!(original.intrinsic_width, decoded.intrinsic_width);
        assert_eq!(original.intrinsic_height, decoded.intrinsic_height);
        assert_eq!(original.bit_depth.bits_per_sample, decoded.bit_depth.bits_per_sample);
    }

    #[test]
    fn test_size_encoding_small() {
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            size::encode_dimensions(&mut writer, 8, 8).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let (width, height) = size::decode_dimensions(&mut reader).unwrap();
        assert_eq!(width, 8);
        assert_eq!(height, 8);
    }

    #[test]
    fn test_size_encoding_medium() {
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            size::encode_dimensions(&mut writer, 128, 256).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let (width, height) = size::decode_dimensions(&mut reader).unwrap();
        assert_eq!(width, 128);
        assert_eq!(height, 256);
    }

    #[test]
    fn test_extra_channel_default() {
        let channel = ExtraChannelInfo::default();
        assert_eq!(channel.channel_type, ExtraChannelType::Alpha);
    }

    #[test]
    fn test_metadata_roundtrip_animation() {
        let animation = crate::animation::AnimationHeader {
            num_loops: 3,
            ..crate::animation::AnimationHeader::default()
        };
        let original = JxlImageMetadata::for_animation(64, 64, 8, animation);
        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            original.encode(&mut writer).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let decoded = JxlImageMetadata::decode(&mut reader).unwrap();
        assert!(decoded.have_animation);
        assert_eq!(decoded.animation.unwrap().num_loops, 3);
    }

    #[test]
    fn test_orientation_round_trips_through_extra_fields() {
        let mut metadata = JxlImageMetadata::for_rgb_image(32, 32, 8);
        metadata.extra_fields = true;
        metadata.orientation = Orientation::Rotate270;

        let mut buffer = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buffer);
            metadata.encode(&mut writer).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(&buffer[..]);
        let decoded = JxlImageMetadata::decode(&mut reader).unwrap();
        assert_eq!(decoded.orientation, Orientation::Rotate270);
    }
}
