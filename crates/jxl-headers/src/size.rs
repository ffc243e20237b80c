//! Frame dimension encoding shared by the codestream header and image
//! metadata (ISO/IEC 18181-1 Section 7.3).
//!
//! One "small" bit selects a compact 8-bit encoding; otherwise a 2-bit
//! selector picks a width of 9, 13, 18, or 30 bits. All values are stored
//! as `value - 1`, so the representable range is `[1, 2^width]`.

use jxl_bitstream::{BitReader, BitWriter};
use jxl_core::{JxlError, JxlResult};
use std::io::{Read, Write};

/// Largest dimension value this encoding can represent.
pub const MAX_DIMENSION: u32 = 1 << 30;

const SELECTOR_WIDTHS: [u32; 4] = [9, 13, 18, 30];

fn selector_for(value_minus_one: u32) -> JxlResult<u8> {
    for (selector, &width) in SELECTOR_WIDTHS.iter().enumerate() {
        if width >= 32 || value_minus_one < (1u64 << width) as u32 {
            return Ok(selector as u8);
        }
    }
    Err(JxlError::InvalidDimensions {
        width: value_minus_one.saturating_add(1),
        height: 0,
    })
}

fn encode_one<W: Write>(writer: &mut BitWriter<W>, value: u32) -> JxlResult<()> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(JxlError::InvalidDimensions { width: value, height: value });
    }
    let v = value - 1;
    if v < 256 {
        writer.write_bit(true)?;
        writer.write_bits(v as u64, 8)?;
        return Ok(());
    }
    writer.write_bit(false)?;
    let selector = selector_for(v)?;
    writer.write_bits(selector as u64, 2)?;
    let width = SELECTOR_WIDTHS[selector as usize] as usize;
    writer.write_bits(v as u64, width)?;
    Ok(())
}

fn decode_one<R: Read>(reader: &mut BitReader<R>) -> JxlResult<u32> {
    let small = reader.read_bit()?;
    if small {
        let v = reader.read_bits(8)? as u32;
        return Ok(v + 1);
    }
    let selector = reader.read_bits(2)? as usize;
    let width = SELECTOR_WIDTHS[selector] as usize;
    let v = reader.read_bits(width)? as u32;
    let value = v
        .checked_add(1)
        .ok_or_else(|| JxlError::InvalidDimensions { width: v, height: v })?;
    if value > MAX_DIMENSION {
        return Err(JxlError::InvalidDimensions { width: value, height: value });
    }
    Ok(value)
}

/// Encode a `(width, height)` pair: one shared "small" bit covering both
/// dimensions (both must fit in 8 bits for the small path to apply), per
/// the codestream size header.
pub fn encode_dimensions<W: Write>(writer: &mut BitWriter<W>, width: u32, height: u32) -> JxlResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(JxlError::InvalidDimensions { width, height });
    }
    let small = width <= 256 && height <= 256;
    writer.write_bit(small)?;
    if small {
        writer.write_bits((width - 1) as u64, 8)?;
        writer.write_bits((height - 1) as u64, 8)?;
        return Ok(());
    }
    for value in [width, height] {
        let v = value - 1;
        let selector = selector_for(v)?;
        writer.write_bits(selector as u64, 2)?;
        let bit_width = SELECTOR_WIDTHS[selector as usize] as usize;
        writer.write_bits(v as u64, bit_width)?;
    }
    Ok(())
}

/// Decode a `(width, height)` pair written by [`encode_dimensions`].
pub fn decode_dimensions<R: Read>(reader: &mut BitReader<R>) -> JxlResult<(u32, u32)> {
    let small = reader.read_bit()?;
    if small {
        let w = reader.read_bits(8)? as u32 + 1;
        let h = reader.read_bits(8)? as u32 + 1;
        return Ok((w, h));
    }
    let mut values = [0u32; 2];
    for value in &mut values {
        let selector = reader.read_bits(2)? as usize;
        let width = SELECTOR_WIDTHS[selector] as usize;
        let v = reader.read_bits(width)? as u32;
        *value = v
            .checked_add(1)
            .ok_or_else(|| JxlError::InvalidDimensions { width: v, height: v })?;
    }
    let (w, h) = (values[0], values[1]);
    if w > MAX_DIMENSION || h > MAX_DIMENSION {
        return Err(JxlError::InvalidDimensions { width: w, height: h });
    }
    Ok((w, h))
}

/// Encode a single standalone size value (used by image metadata's
/// intrinsic-size fields, distinct from the paired codestream header).
pub fn encode_size<W: Write>(writer: &mut BitWriter<W>, value: u32) -> JxlResult<()> {
    encode_one(writer, value)
}

/// Decode a single standalone size value written by [`encode_size`].
pub fn decode_size<R: Read>(reader: &mut BitReader<R>) -> JxlResult<u32> {
    decode_one(reader)
}
