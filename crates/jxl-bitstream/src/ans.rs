//! Asymmetric Numeral Systems (rANS) entropy coder.
//!
//! Implements the byte-stream rANS variant described in SPEC_FULL.md §4.B:
//! a 4096-slot normalized distribution table, reverse-order symbol
//! encoding, and a multi-context wrapper that threads a single state
//! machine through a sequence of (symbol, context) pairs so the whole
//! sequence emits one interleaved byte stream.

use crate::bitreader::BitReader;
use crate::bitwriter::BitWriter;
use jxl_core::{JxlError, JxlResult};
use std::io::{Read, Write};

/// log2 of the distribution table size.
pub const LOG_TAB_SIZE: u32 = 12;
/// Distribution table size ("tabSize"). Every distribution's frequencies
/// sum to exactly this value.
pub const TAB_SIZE: u32 = 1 << LOG_TAB_SIZE;
/// Lower bound of the renormalization interval.
pub const STATE_LOWER: u32 = 1 << 16;
/// Upper bound of the renormalization interval.
pub const STATE_UPPER: u64 = 1 << 31;
/// Initial encoder/decoder state.
pub const STATE_INIT: u32 = STATE_LOWER;
/// Largest alphabet size a single distribution may hold.
pub const MAX_ALPHABET_SIZE: usize = 4096;

/// A coded symbol: an index into a distribution's alphabet.
pub type Symbol = u32;

/// A normalized ANS distribution: frequency table, cumulative table, and a
/// per-slot decode lookup.
#[derive(Debug, Clone)]
pub struct AnsDistribution {
    freq: Vec<u32>,
    cum: Vec<u32>,
    lut: Vec<(Symbol, u32, u32)>,
}

impl AnsDistribution {
    /// Build a normalized distribution from raw (unnormalized) frequency
    /// counts, per SPEC_FULL.md §4.B's distribution-construction algorithm.
    pub fn from_frequencies(raw: &[u32]) -> JxlResult<Self> {
        build_distribution(raw)
    }

    /// A uniform distribution over `n` symbols, used as the well-formed
    /// fallback for contexts that saw no training data.
    pub fn uniform(n: usize) -> JxlResult<Self> {
        build_distribution(&vec![1u32; n.max(1)])
    }

    pub fn alphabet_size(&self) -> usize {
        self.freq.len()
    }

    pub fn frequency(&self, symbol: Symbol) -> JxlResult<u32> {
        self.freq
            .get(symbol as usize)
            .copied()
            .ok_or(JxlError::SymbolOutOfRange {
                symbol,
                alphabet_size: self.alphabet_size() as u32,
            })
    }

    pub fn cumulative(&self, symbol: Symbol) -> JxlResult<u32> {
        self.cum
            .get(symbol as usize)
            .copied()
            .ok_or(JxlError::SymbolOutOfRange {
                symbol,
                alphabet_size: self.alphabet_size() as u32,
            })
    }

    fn lookup(&self, slot: u32) -> (Symbol, u32, u32) {
        self.lut[slot as usize]
    }

    /// Serialize in uncompressed form: 2-byte alphabet size, mode byte 0,
    /// then each frequency as a 2-byte little-endian value.
    pub fn serialize_uncompressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.freq.len() * 2);
        out.extend_from_slice(&(self.freq.len() as u16).to_le_bytes());
        out.push(0);
        for &f in &self.freq {
            out.extend_from_slice(&(f as u16).to_le_bytes());
        }
        out
    }

    /// Serialize with zero-run RLE: 2-byte alphabet size, mode byte 1, then
    /// a stream of 2-byte tokens — a nonzero frequency consumes one
    /// alphabet slot, a zero token `(0, run_length)` consumes `run_length`
    /// slots.
    pub fn serialize_rle(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.freq.len());
        out.extend_from_slice(&(self.freq.len() as u16).to_le_bytes());
        out.push(1);
        let mut i = 0;
        while i < self.freq.len() {
            if self.freq[i] == 0 {
                let start = i;
                while i < self.freq.len() && self.freq[i] == 0 {
                    i += 1;
                }
                let run = (i - start) as u16;
                out.extend_from_slice(&0u16.to_le_bytes());
                out.extend_from_slice(&run.to_le_bytes());
            } else {
                out.extend_from_slice(&(self.freq[i] as u16).to_le_bytes());
                i += 1;
            }
        }
        out
    }

    /// Serialize using whichever of the two encodings is smaller.
    pub fn serialize_smallest(&self) -> Vec<u8> {
        let uncompressed = self.serialize_uncompressed();
        let rle = self.serialize_rle();
        if rle.len() < uncompressed.len() {
            rle
        } else {
            uncompressed
        }
    }

    /// Deserialize a distribution produced by either `serialize_uncompressed`
    /// or `serialize_rle`.
    pub fn deserialize(data: &[u8]) -> JxlResult<Self> {
        if data.len() < 3 {
            return Err(JxlError::TruncatedData);
        }
        let alphabet_size = u16::from_le_bytes([data[0], data[1]]) as usize;
        let mode = data[2];
        let mut freq = Vec::with_capacity(alphabet_size);
        let mut pos = 3;
        match mode {
            0 => {
                for _ in 0..alphabet_size {
                    if pos + 2 > data.len() {
                        return Err(JxlError::TruncatedData);
                    }
                    freq.push(u16::from_le_bytes([data[pos], data[pos + 1]]) as u32);
                    pos += 2;
                }
            }
            1 => {
                while freq.len() < alphabet_size {
                    if pos + 2 > data.len() {
                        return Err(JxlError::TruncatedData);
                    }
                    let value = u16::from_le_bytes([data[pos], data[pos + 1]]);
                    pos += 2;
                    if value == 0 {
                        if pos + 2 > data.len() {
                            return Err(JxlError::TruncatedData);
                        }
                        let run = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
                        pos += 2;
                        freq.extend(std::iter::repeat(0u32).take(run));
                    } else {
                        freq.push(value as u32);
                    }
                }
            }
            other => {
                return Err(JxlError::InvalidDistributionSum {
                    expected: TAB_SIZE,
                    got: other as u32,
                })
            }
        }
        from_normalized_frequencies(freq)
    }
}

/// Build and normalize a distribution from raw counts (steps 1-4 of
/// SPEC_FULL.md §4.B).
pub fn build_distribution(raw: &[u32]) -> JxlResult<AnsDistribution> {
    let n = raw.len();
    if n == 0 {
        return Err(JxlError::EmptyDistribution);
    }
    let total: u64 = raw.iter().map(|&r| r as u64).sum();
    if total == 0 {
        return Err(JxlError::AllZeroFrequencies);
    }
    if n > MAX_ALPHABET_SIZE {
        return Err(JxlError::InvalidConfiguration(format!(
            "alphabet size {n} exceeds the maximum of {MAX_ALPHABET_SIZE}"
        )));
    }

    let mut freq: Vec<i64> = raw
        .iter()
        .map(|&r| {
            if r == 0 {
                0
            } else {
                let scaled = (r as f64) * (TAB_SIZE as f64) / (total as f64);
                (scaled.round() as i64).max(1)
            }
        })
        .collect();

    loop {
        let sum: i64 = freq.iter().sum();
        let delta = sum - TAB_SIZE as i64;
        if delta == 0 {
            break;
        }
        if delta > 0 {
            let mut best: Option<usize> = None;
            for i in 0..n {
                let min_allowed = if raw[i] > 0 { 1 } else { 0 };
                if freq[i] > min_allowed && best.map_or(true, |b| freq[i] > freq[b]) {
                    best = Some(i);
                }
            }
            let idx = best.expect("distribution normalization ran out of room to shrink");
            freq[idx] -= 1;
        } else {
            let mut best: Option<usize> = None;
            for i in 0..n {
                if best.map_or(true, |b| freq[i] > freq[b]) {
                    best = Some(i);
                }
            }
            let idx = best.expect("nonempty distribution always has a largest entry");
            freq[idx] += 1;
        }
    }

    let freq: Vec<u32> = freq.into_iter().map(|f| f as u32).collect();
    from_normalized_frequencies(freq)
}

fn from_normalized_frequencies(freq: Vec<u32>) -> JxlResult<AnsDistribution> {
    let sum: u32 = freq.iter().sum();
    if sum != TAB_SIZE {
        return Err(JxlError::InvalidDistributionSum {
            expected: TAB_SIZE,
            got: sum,
        });
    }
    let mut cum = Vec::with_capacity(freq.len() + 1);
    cum.push(0u32);
    for &f in &freq {
        cum.push(cum.last().unwrap() + f);
    }
    let mut lut = vec![(0u32, 0u32, 0u32); TAB_SIZE as usize];
    for (symbol, (&f, window)) in freq.iter().zip(cum.windows(2)).enumerate() {
        let (start, end) = (window[0], window[1]);
        for slot in start..end {
            lut[slot as usize] = (symbol as Symbol, f, start);
        }
    }
    Ok(AnsDistribution { freq, cum, lut })
}

/// A single-state rANS encoder. Symbols must be fed in the reverse of their
/// intended decode order (see `encode_sequence`/`encode_with_contexts`).
pub struct RansEncoder {
    state: u32,
    emitted: Vec<u8>,
}

impl Default for RansEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RansEncoder {
    pub fn new() -> Self {
        Self {
            state: STATE_INIT,
            emitted: Vec::new(),
        }
    }

    pub fn encode_symbol(&mut self, symbol: Symbol, dist: &AnsDistribution) -> JxlResult<()> {
        let freq = dist.frequency(symbol)?;
        if freq == 0 {
            return Err(JxlError::SymbolOutOfRange {
                symbol,
                alphabet_size: dist.alphabet_size() as u32,
            });
        }
        let cum = dist.cumulative(symbol)?;

        let threshold = (freq as u64) * (STATE_UPPER / TAB_SIZE as u64);
        while self.state as u64 >= threshold {
            self.emitted.push((self.state & 0xFF) as u8);
            self.state >>= 8;
        }
        self.state = (self.state / freq) * TAB_SIZE + (self.state % freq) + cum;
        Ok(())
    }

    /// Finalize the stream: reverse the renormalization bytes (so the
    /// decoder can read them forward) and append the final state as four
    /// little-endian bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut out = self.emitted;
        out.reverse();
        out.extend_from_slice(&self.state.to_le_bytes());
        out
    }
}

/// Encode a full symbol sequence under one distribution. Internally feeds
/// symbols to the encoder in reverse order, per SPEC_FULL.md §4.B.
pub fn encode_sequence(symbols: &[Symbol], dist: &AnsDistribution) -> JxlResult<Vec<u8>> {
    let mut enc = RansEncoder::new();
    for &s in symbols.iter().rev() {
        enc.encode_symbol(s, dist)?;
    }
    Ok(enc.finish())
}

/// Decode `count` symbols coded under one distribution.
pub fn decode_sequence(data: &[u8], count: usize, dist: &AnsDistribution) -> JxlResult<Vec<Symbol>> {
    let mut dec = RansDecoder::new(data)?;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(dec.decode_symbol(dist)?);
    }
    Ok(out)
}

/// A single-state rANS decoder.
pub struct RansDecoder<'a> {
    state: u32,
    data: &'a [u8],
    pos: usize,
}

impl<'a> RansDecoder<'a> {
    pub fn new(data: &'a [u8]) -> JxlResult<Self> {
        if data.len() < 4 {
            return Err(JxlError::TruncatedData);
        }
        let split = data.len() - 4;
        let state = u32::from_le_bytes(data[split..].try_into().unwrap());
        Ok(Self {
            state,
            data: &data[..split],
            pos: 0,
        })
    }

    pub fn decode_symbol(&mut self, dist: &AnsDistribution) -> JxlResult<Symbol> {
        let slot = self.state % TAB_SIZE;
        let (symbol, freq, cum) = dist.lookup(slot);
        self.state = freq * (self.state / TAB_SIZE) + slot - cum;
        while self.state < STATE_LOWER {
            if self.pos >= self.data.len() {
                return Err(JxlError::TruncatedData);
            }
            self.state = (self.state << 8) | self.data[self.pos] as u32;
            self.pos += 1;
        }
        Ok(symbol)
    }
}

/// Encode a sequence of (symbol, context) pairs as one interleaved byte
/// stream: a single ANS state machine threads through every symbol in
/// reverse order, picking the distribution for each symbol from its
/// context index.
pub fn encode_with_contexts(
    symbols_and_contexts: &[(Symbol, usize)],
    distributions: &[AnsDistribution],
) -> JxlResult<Vec<u8>> {
    let mut enc = RansEncoder::new();
    for &(symbol, context) in symbols_and_contexts.iter().rev() {
        let dist = distributions
            .get(context)
            .ok_or(JxlError::InvalidContext(context))?;
        enc.encode_symbol(symbol, dist)?;
    }
    Ok(enc.finish())
}

/// Decode a sequence previously produced by `encode_with_contexts`, given
/// the same per-symbol context sequence.
pub fn decode_with_contexts(
    data: &[u8],
    contexts: &[usize],
    distributions: &[AnsDistribution],
) -> JxlResult<Vec<Symbol>> {
    let mut dec = RansDecoder::new(data)?;
    let mut out = Vec::with_capacity(contexts.len());
    for &context in contexts {
        let dist = distributions
            .get(context)
            .ok_or(JxlError::InvalidContext(context))?;
        out.push(dec.decode_symbol(dist)?);
    }
    Ok(out)
}

/// Write a 32-bit length followed by that many bytes. The framing used to
/// embed a serialized [`AnsDistribution`] or a [`RansEncoder`]-produced
/// stream inside a bit-oriented codestream.
pub fn write_byte_blob<W: Write>(writer: &mut BitWriter<W>, data: &[u8]) -> JxlResult<()> {
    writer.write_bits(data.len() as u64, 32)?;
    for &byte in data {
        writer.write_bits(byte as u64, 8)?;
    }
    Ok(())
}

/// Read a byte blob written by [`write_byte_blob`].
pub fn read_byte_blob<R: Read>(reader: &mut BitReader<R>) -> JxlResult<Vec<u8>> {
    let len = reader.read_bits(32)? as usize;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        data.push(reader.read_bits(8)? as u8);
    }
    Ok(data)
}
