//! Bitstream reader implementation.
//!
//! Mirrors `BitWriter`: LSB-first bit order within each byte, matching
//! SPEC_FULL.md §4.A exactly.

use jxl_core::{JxlError, JxlResult};
use std::io::Read;

/// A bitstream reader for reading individual bits from a byte stream.
pub struct BitReader<R: Read> {
    reader: R,
    buffer: u64,
    bits_in_buffer: usize,
    bits_consumed: usize,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            bits_consumed: 0,
        }
    }

    /// Read up to 64 bits from the stream.
    pub fn read_bits(&mut self, num_bits: usize) -> JxlResult<u64> {
        if num_bits > 64 {
            return Err(JxlError::InvalidConfiguration(
                "cannot read more than 64 bits at once".to_string(),
            ));
        }

        while self.bits_in_buffer < num_bits {
            let mut byte = [0u8; 1];
            if self.reader.read(&mut byte)? == 0 {
                return Err(JxlError::TruncatedBitstream);
            }
            self.buffer |= (byte[0] as u64) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
        }

        let mask = if num_bits == 64 {
            u64::MAX
        } else {
            (1u64 << num_bits) - 1
        };
        let result = self.buffer & mask;
        self.buffer >>= num_bits;
        self.bits_in_buffer -= num_bits;
        self.bits_consumed += num_bits;

        Ok(result)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> JxlResult<bool> {
        self.read_bits(1).map(|b| b != 0)
    }

    /// Read `n` raw bytes (must be byte-aligned).
    pub fn read_bytes(&mut self, n: usize) -> JxlResult<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_bits(8)? as u8);
        }
        Ok(out)
    }

    /// Read a variable-length integer (u32), Exp-Golomb-style, matching
    /// `BitWriter::write_u32`.
    pub fn read_u32(&mut self, selector: u32) -> JxlResult<u32> {
        let max_direct = (1u64 << selector) - 1;
        let n = self.read_bits(selector as usize)?;
        if n < max_direct {
            Ok(n as u32)
        } else {
            let extra_bits = self.read_bits(4)? as u32;
            let extra_value = self.read_bits(extra_bits as usize)? as u32;
            Ok(max_direct as u32 + extra_value)
        }
    }

    /// Skip to the next byte boundary of the overall bit position (not
    /// merely the read-ahead buffer).
    pub fn align_to_byte(&mut self) -> JxlResult<()> {
        let misalignment = self.bits_consumed % 8;
        if misalignment > 0 {
            self.read_bits(8 - misalignment)?;
        }
        Ok(())
    }
}
