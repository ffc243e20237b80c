//! JPEG XL Frame Headers
//!
//! Frame headers describe individual frames in the image/animation and
//! control encoding parameters: type, encoding mode, progressive passes,
//! blending, and restoration filters.

use jxl_bitstream::{BitReader, BitWriter};
use jxl_core::*;
use std::io::{Read, Write};

/// Frame type determines decoding requirements and reference frame behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// Regular frame (most common)
    RegularFrame = 0,
    /// LF (Low Frequency) frame - DC-only for progressive decoding
    LFFrame = 1,
    /// Reference frame - not displayed, used for future frame references
    ReferenceFrame = 2,
    /// Skip progressive - signals decoder can skip progressive passes
    SkipProgressive = 3,
}

impl FrameType {
    pub fn from_u8(value: u8) -> JxlResult<Self> {
        match value {
            0 => Ok(FrameType::RegularFrame),
            1 => Ok(FrameType::LFFrame),
            2 => Ok(FrameType::ReferenceFrame),
            3 => Ok(FrameType::SkipProgressive),
            _ => Err(JxlError::InvalidFrameHeader(format!("invalid frame type: {}", value))),
        }
    }
}

/// Frame blend mode, used when compositing a frame onto the canvas built
/// up by earlier frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace previous frame
    Replace,
    /// Blend with previous frame using alpha
    Blend,
    /// Alpha blend with a specific reference source
    AlphaBlend,
    /// Multiply with previous frame
    Multiply,
}

impl BlendMode {
    pub fn to_bits(&self) -> u8 {
        match self {
            BlendMode::Replace => 0,
            BlendMode::Blend => 1,
            BlendMode::AlphaBlend => 2,
            BlendMode::Multiply => 3,
        }
    }

    pub fn from_bits(bits: u8) -> JxlResult<Self> {
        match bits {
            0 => Ok(BlendMode::Replace),
            1 => Ok(BlendMode::Blend),
            2 => Ok(BlendMode::AlphaBlend),
            3 => Ok(BlendMode::Multiply),
            _ => Err(JxlError::DecodingFailed(format!("invalid blend mode: {}", bits))),
        }
    }
}

/// Blending information for animation frames
#[derive(Debug, Clone)]
pub struct BlendingInfo {
    /// Blend mode used when compositing this frame
    pub mode: BlendMode,
    /// Alpha channel to use for blending (if applicable)
    pub alpha_channel: u8,
    /// Whether to clamp values after blending
    pub clamp: bool,
    /// Source for blending (0 = previous frame, 1-3 = reference frames)
    pub source: u8,
}

impl Default for BlendingInfo {
    fn default() -> Self {
        Self {
            mode: BlendMode::Replace,
            alpha_channel: 0,
            clamp: false,
            source: 0,
        }
    }
}

/// Progressive rendering passes configuration
#[derive(Debug, Clone)]
pub struct Passes {
    /// Number of passes (1 = non-progressive)
    pub num_passes: u8,
    /// Number of downsampling levels
    pub num_ds: u8,
    /// Shift for each pass
    pub shift: Vec<u8>,
    /// Downsampling for each pass
    pub downsample: Vec<u8>,
    /// Last pass index for each downsampling level
    pub last_pass: Vec<u8>,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            num_passes: 1,
            num_ds: 0,
            shift: vec![0],
            downsample: vec![1],
            last_pass: vec![0],
        }
    }
}

/// JPEG XL Frame Header
///
/// Comprehensive frame header supporting all production JPEG XL features:
/// frame types (regular, LF, reference, skip progressive), animation
/// (duration, blending), progressive rendering, restoration filters, and
/// reference-frame bookkeeping.
#[derive(Debug, Clone)]
pub struct FrameHeader {
    /// Frame type
    pub frame_type: FrameType,

    /// Encoding (0 = VarDCT, 1 = Modular)
    pub encoding: u8,

    /// Butteraugli-like distance used to build the VarDCT quantization
    /// tables for this frame (0.0 for Modular frames, where it is unused).
    pub distance: f32,

    /// Index of this frame within its animation sequence (0 for still images)
    pub frame_index: u32,

    /// Crop rectangle origin and size, relative to the canvas. A frame with
    /// `crop_width == 0` covers the full canvas (no explicit crop encoded).
    pub crop_x0: i32,
    pub crop_y0: i32,
    pub crop_width: u32,
    pub crop_height: u32,

    /// Flags for quick feature detection
    pub flags: u64,

    /// Whether all default values are used (allows header compression)
    pub all_default: bool,

    /// Frame duration for animation (in ticks)
    pub duration: u32,

    /// Timecode for animation synchronization
    pub timecode: u32,

    /// Frame name (for multi-frame images)
    pub name: Option<String>,

    /// Whether this is the last frame
    pub is_last: bool,

    /// Save frame as reference for future frames (0 = don't save, 1-3 = slot)
    pub save_as_reference: u8,

    /// Blending information for animation
    pub blending: BlendingInfo,

    /// Progressive passes configuration
    pub passes: Passes,

    /// Group size shift (log2 of group size / 256)
    pub group_size_shift: u8,

    /// X quantization multiplier
    pub x_qm_scale: u8,

    /// B quantization multiplier
    pub b_qm_scale: u8,

    /// Number of LF groups (for progressive decoding)
    pub num_lf_groups: u32,

    /// Restoration filter flags
    pub restoration_filter: RestorationFilter,

    /// Extensions for future features
    pub extensions: u64,

    /// Frame is self-contained (doesn't reference others)
    pub can_be_referenced: bool,

    /// Reference-pool handle this frame was delta-encoded against, if any
    /// (see `flags` bit 0x04; `jxl-encoder`/`jxl-decoder`'s orchestrators).
    pub reference_frame_index: Option<u32>,

    /// Patch descriptors copied verbatim from a reference frame instead of
    /// being re-encoded (see `flags` bit 0x08).
    pub patches: Vec<Patch>,
}

/// Restoration filters for post-processing
#[derive(Debug, Clone)]
pub struct RestorationFilter {
    /// Gabor-like filter enabled
    pub gab: bool,
    /// EPF (Edge-Preserving Filter) enabled
    pub epf: bool,
    /// Extensions
    pub extensions: u64,
}

impl Default for RestorationFilter {
    fn default() -> Self {
        Self {
            gab: false,
            epf: false,
            extensions: 0,
        }
    }
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self {
            frame_type: FrameType::RegularFrame,
            encoding: 0, // VarDCT
            distance: 1.0,
            frame_index: 0,
            crop_x0: 0,
            crop_y0: 0,
            crop_width: 0,
            crop_height: 0,
            flags: 0,
            all_default: true,
            duration: 0,
            timecode: 0,
            name: None,
            is_last: true,
            save_as_reference: 0,
            blending: BlendingInfo::default(),
            passes: Passes::default(),
            group_size_shift: 1,
            x_qm_scale: 2,
            b_qm_scale: 2,
            num_lf_groups: 1,
            restoration_filter: RestorationFilter::default(),
            extensions: 0,
            can_be_referenced: false,
            reference_frame_index: None,
            patches: Vec::new(),
        }
    }
}

impl FrameHeader {
    /// Create a simple frame header for still images
    pub fn simple_still_image() -> Self {
        Self::default()
    }

    /// Create a frame header for an animation keyframe
    pub fn keyframe(frame_index: u32, duration: u32) -> Self {
        Self {
            frame_index,
            duration,
            all_default: false,
            can_be_referenced: true,
            is_last: false,
            ..Self::default()
        }
    }

    /// Create a frame header for an animation delta frame, blended with a
    /// previously decoded frame.
    pub fn delta_frame(frame_index: u32, duration: u32, blend_mode: BlendMode) -> Self {
        Self {
            frame_index,
            duration,
            all_default: false,
            is_last: false,
            blending: BlendingInfo {
                mode: blend_mode,
                ..BlendingInfo::default()
            },
            ..Self::default()
        }
    }

    /// Create a frame header for a frame cropped to a sub-rectangle of the
    /// canvas (used by patches and partial-update delta frames).
    pub fn cropped(frame_index: u32, x0: i32, y0: i32, width: u32, height: u32) -> Self {
        Self {
            frame_index,
            crop_x0: x0,
            crop_y0: y0,
            crop_width: width,
            crop_height: height,
            flags: 0x02,
            all_default: false,
            ..Self::default()
        }
    }

    /// Create a progressive frame header
    pub fn progressive_frame(num_passes: u8) -> Self {
        Self {
            passes: Passes {
                num_passes,
                ..Passes::default()
            },
            all_default: false,
            ..Self::default()
        }
    }

    /// Mark this frame as delta-encoded against a reference-pool handle.
    pub fn with_reference(mut self, reference_frame_index: u32) -> Self {
        self.reference_frame_index = Some(reference_frame_index);
        self.flags |= 0x04;
        self.all_default = false;
        self
    }

    /// Attach patch descriptors copied from a reference frame.
    pub fn with_patches(mut self, patches: Vec<Patch>) -> Self {
        if !patches.is_empty() {
            self.flags |= 0x08;
        }
        self.patches = patches;
        self.all_default = false;
        self
    }

    /// Parse frame header from bitstream
    pub fn parse<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Self> {
        let mut header = Self::default();

        header.all_default = reader.read_bit()?;
        if header.all_default {
            return Ok(header);
        }

        let frame_type = reader.read_bits(2)? as u8;
        header.frame_type = FrameType::from_u8(frame_type)?;

        header.encoding = reader.read_bit()? as u8;
        header.flags = reader.read_bits(32)?;
        header.distance = f32::from_bits(reader.read_bits(32)? as u32);

        if !header.is_last || header.duration > 0 {
            header.duration = reader.read_bits(32)? as u32;
        }

        if (header.flags & 0x02) != 0 {
            header.crop_x0 = reader.read_bits(32)? as i32;
            header.crop_y0 = reader.read_bits(32)? as i32;
            header.crop_width = reader.read_bits(32)? as u32;
            header.crop_height = reader.read_bits(32)? as u32;
        }

        if (header.flags & 0x01) != 0 {
            let name_len = reader.read_bits(8)? as usize;
            let mut name_bytes = vec![0u8; name_len];
            for byte in &mut name_bytes {
                *byte = reader.read_bits(8)? as u8;
            }
            header.name = Some(String::from_utf8_lossy(&name_bytes).to_string());
        }

        if (header.flags & 0x04) != 0 {
            header.reference_frame_index = Some(reader.read_bits(32)? as u32);
        }

        if (header.flags & 0x08) != 0 {
            let patch_count = reader.read_bits(32)? as usize;
            let mut patches = Vec::with_capacity(patch_count);
            for _ in 0..patch_count {
                let dest_x = reader.read_bits(32)? as u32;
                let dest_y = reader.read_bits(32)? as u32;
                let width = reader.read_bits(32)? as u32;
                let height = reader.read_bits(32)? as u32;
                let reference_index = reader.read_bits(32)? as usize;
                let src_x = reader.read_bits(32)? as u32;
                let src_y = reader.read_bits(32)? as u32;
                patches.push(Patch {
                    dest_x,
                    dest_y,
                    width,
                    height,
                    reference_index,
                    src_x,
                    src_y,
                });
            }
            header.patches = patches;
        }

        Ok(header)
    }

    /// Write frame header to bitstream
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        writer.write_bit(self.all_default)?;
        if self.all_default {
            return Ok(());
        }

        writer.write_bits(self.frame_type as u64, 2)?;
        writer.write_bit(self.encoding != 0)?;
        writer.write_bits(self.flags & 0xFFFFFFFF, 32)?;
        writer.write_bits(self.distance.to_bits() as u64, 32)?;

        if !self.is_last || self.duration > 0 {
            writer.write_bits(self.duration as u64, 32)?;
        }

        if (self.flags & 0x02) != 0 {
            writer.write_bits(self.crop_x0 as u32 as u64, 32)?;
            writer.write_bits(self.crop_y0 as u32 as u64, 32)?;
            writer.write_bits(self.crop_width as u64, 32)?;
            writer.write_bits(self.crop_height as u64, 32)?;
        }

        if (self.flags & 0x01) != 0 {
            let name = self.name.as_deref().unwrap_or("");
            let name_bytes = name.as_bytes();
            writer.write_bits(name_bytes.len() as u64, 8)?;
            for &byte in name_bytes {
                writer.write_bits(byte as u64, 8)?;
            }
        }

        if let Some(reference_frame_index) = self.reference_frame_index {
            writer.write_bits(reference_frame_index as u64, 32)?;
        }

        if !self.patches.is_empty() {
            writer.write_bits(self.patches.len() as u64, 32)?;
            for patch in &self.patches {
                writer.write_bits(patch.dest_x as u64, 32)?;
                writer.write_bits(patch.dest_y as u64, 32)?;
                writer.write_bits(patch.width as u64, 32)?;
                writer.write_bits(patch.height as u64, 32)?;
                writer.write_bits(patch.reference_index as u64, 32)?;
                writer.write_bits(patch.src_x as u64, 32)?;
                writer.write_bits(patch.src_y as u64, 32)?;
            }
        }

        Ok(())
    }

    /// Validate frame header consistency
    pub fn validate(&self) -> JxlResult<()> {
        if self.frame_type == FrameType::LFFrame && self.num_lf_groups == 0 {
            return Err(JxlError::InvalidFrameHeader(
                "LF frame must have num_lf_groups > 0".to_string(),
            ));
        }

        if self.passes.num_passes == 0 {
            return Err(JxlError::InvalidFrameHeader("num_passes must be > 0".to_string()));
        }

        if self.encoding > 1 {
            return Err(JxlError::InvalidFrameHeader(format!("invalid encoding: {}", self.encoding)));
        }

        Ok(())
    }
}
