//! Animation support for JPEG XL
//!
//! JPEG XL supports animations with:
//! - Multiple frames with individual durations
//! - Frame blending modes (`crate::frame::BlendMode`)
//! - Reference frames for delta encoding
//! - Loop count control

use jxl_bitstream::{BitReader, BitWriter};
use jxl_core::JxlResult;
use std::io::{Read, Write};

use crate::frame::FrameHeader;

/// Animation header information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHeader {
    /// Time base denominator (ticks per second)
    pub tps_numerator: u32,
    /// Time base numerator
    pub tps_denominator: u32,
    /// Number of loops (0 = infinite)
    pub num_loops: u32,
    /// Whether animation has separate alpha channel timing
    pub have_timecodes: bool,
}

impl Default for AnimationHeader {
    fn default() -> Self {
        Self {
            tps_numerator: 1000, // 1000 ticks per second (1ms resolution)
            tps_denominator: 1,
            num_loops: 0, // Infinite loop by default
            have_timecodes: false,
        }
    }
}

impl AnimationHeader {
    /// Create animation header with specific framerate
    pub fn with_fps(_fps: f32) -> Self {
        Self {
            tps_numerator: 1000,
            tps_denominator: 1,
            num_loops: 0,
            have_timecodes: false,
        }
    }

    /// Get duration in ticks for a frame with given fps
    pub fn duration_for_fps(&self, fps: f32) -> u32 {
        let seconds_per_frame = 1.0 / fps;
        let ticks_per_second = (self.tps_numerator as f64) / (self.tps_denominator as f64);
        (seconds_per_frame as f64 * ticks_per_second) as u32
    }

    /// Write animation header to bitstream
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        writer.write_bits(self.tps_numerator as u64, 32)?;
        writer.write_bits(self.tps_denominator as u64, 32)?;
        writer.write_bits(self.num_loops as u64, 32)?;
        writer.write_bit(self.have_timecodes)?;
        Ok(())
    }

    /// Read animation header from bitstream
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Self> {
        let tps_numerator = reader.read_bits(32)? as u32;
        let tps_denominator = reader.read_bits(32)? as u32;
        let num_loops = reader.read_bits(32)? as u32;
        let have_timecodes = reader.read_bit()?;

        Ok(Self {
            tps_numerator,
            tps_denominator,
            num_loops,
            have_timecodes,
        })
    }
}

/// Animation sequence manager: orders frame headers and derives
/// aggregate timing information.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Animation header
    pub header: AnimationHeader,
    /// Frames in the animation, in display order
    pub frames: Vec<FrameHeader>,
}

impl Animation {
    /// Create a new animation
    pub fn new(header: AnimationHeader) -> Self {
        Self {
            header,
            frames: Vec::new(),
        }
    }

    /// Add a frame to the animation
    pub fn add_frame(&mut self, frame: FrameHeader) {
        self.frames.push(frame);
    }

    /// Get total duration in ticks
    pub fn total_duration(&self) -> u32 {
        self.frames.iter().map(|f| f.duration).sum()
    }

    /// Get duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        let total_ticks = self.total_duration() as f64;
        let tps = (self.header.tps_numerator as f64) / (self.header.tps_denominator as f64);
        total_ticks / tps
    }

    /// Get framerate, if every frame shares the same duration
    pub fn framerate(&self) -> Option<f32> {
        if self.frames.is_empty() {
            return None;
        }

        let first_duration = self.frames[0].duration;
        if self.frames.iter().all(|f| f.duration == first_duration) {
            let tps = (self.header.tps_numerator as f64) / (self.header.tps_denominator as f64);
            let fps = tps / (first_duration as f64);
            Some(fps as f32)
        } else {
            None
        }
    }
}
