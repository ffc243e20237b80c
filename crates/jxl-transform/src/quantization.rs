//! Quantization for the VarDCT lossy pipeline.
//!
//! Quantization step sizes are derived from a single `distance` parameter
//! (smaller distance, finer quantization) rather than a JPEG-style quality
//! percentage, and scale up with coefficient frequency so high-frequency
//! detail is quantized more coarsely than the DC/low-frequency bands.

use jxl_core::consts::BLOCK_SIZE;

use crate::adaptive_quant::AdaptiveQuantMap;

/// Per-coefficient quantization step sizes for an 8x8 block, in zigzag-free
/// (row-major, `v*8+u`) order.
pub type QuantTable = [f32; 64];

/// Luma coefficients grow `alpha` per unit of `(u+v)` frequency distance
/// from DC. Chroma is scaled up from luma since human vision is less
/// sensitive to chroma detail.
const LUMA_ALPHA: f32 = 0.05;
const CHROMA_SCALE: f32 = 1.5;

/// `baseQuant = max(1.0, distance * 8.0)`.
pub fn base_quant_step(distance: f32) -> f32 {
    (distance * 8.0).max(1.0)
}

/// Build the luma quantization table for a given distance.
pub fn generate_luma_quant_table(distance: f32) -> QuantTable {
    let base = base_quant_step(distance);
    let mut table = [0.0f32; 64];
    for v in 0..8 {
        for u in 0..8 {
            table[v * 8 + u] = base * (1.0 + (u + v) as f32 * LUMA_ALPHA);
        }
    }
    table
}

/// Build the chroma quantization table for a given distance: luma scaled
/// by `CHROMA_SCALE`.
pub fn generate_chroma_quant_table(distance: f32) -> QuantTable {
    let mut table = generate_luma_quant_table(distance);
    for q in table.iter_mut() {
        *q *= CHROMA_SCALE;
    }
    table
}

/// Build both the luma and chroma quantization tables for a distance.
pub fn generate_quant_tables(distance: f32) -> (QuantTable, QuantTable) {
    (generate_luma_quant_table(distance), generate_chroma_quant_table(distance))
}

/// Per-channel quantization tables for an XYB-encoded frame: `X` and `B-Y`
/// carry chroma-like detail, `Y` carries luma.
pub struct XybQuantTables {
    pub x_table: QuantTable,
    pub y_table: QuantTable,
    pub b_table: QuantTable,
}

/// Build XYB-tuned quantization tables for a distance.
pub fn generate_xyb_quant_tables(distance: f32) -> XybQuantTables {
    let (luma, chroma) = generate_quant_tables(distance);
    XybQuantTables { x_table: chroma, y_table: luma, b_table: chroma }
}

/// Map a JPEG-style quality percentage (0-100, higher is better) to the
/// butteraugli-like `distance` parameter the quantization tables expect
/// (smaller distance, finer quantization), following libjxl's `cjxl`
/// quality heuristic.
pub fn quality_to_distance(quality: f32) -> f32 {
    let quality = quality.clamp(0.0, 100.0);
    if quality >= 100.0 {
        0.0
    } else if quality >= 30.0 {
        0.1 + (100.0 - quality) * 0.09
    } else {
        6.4 + (30.0 - quality) * (25.0 - 6.4) / 30.0
    }
}

/// Quantize one block's coefficients, scaling the table by a per-block
/// activity multiplier (1.0 = no adjustment).
pub fn quantize(coeffs: &[f32; 64], quant_table: &QuantTable, activity_scale: f32, output: &mut [i32; 64]) {
    for i in 0..64 {
        let step = (quant_table[i] * activity_scale).max(1.0);
        output[i] = (coeffs[i] / step).round() as i32;
    }
}

/// Dequantize one block's coefficients.
pub fn dequantize(coeffs: &[i32; 64], quant_table: &QuantTable, activity_scale: f32, output: &mut [f32; 64]) {
    for i in 0..64 {
        let step = (quant_table[i] * activity_scale).max(1.0);
        output[i] = coeffs[i] as f32 * step;
    }
}

/// Quantize a full channel of DCT coefficients block by block, without
/// per-block activity adjustment (`activity_scale` fixed at 1.0).
pub fn quantize_channel(dct_coeffs: &[f32], width: usize, height: usize, quant_table: &QuantTable, output: &mut Vec<i32>) {
    output.clear();
    output.resize(width * height, 0);

    let mut block = [0.0f32; 64];
    let mut quant_block = [0i32; 64];

    for block_y in (0..height).step_by(BLOCK_SIZE) {
        for block_x in (0..width).step_by(BLOCK_SIZE) {
            let rows = BLOCK_SIZE.min(height - block_y);
            let cols = BLOCK_SIZE.min(width - block_x);
            for y in 0..rows {
                for x in 0..cols {
                    block[y * BLOCK_SIZE + x] = dct_coeffs[(block_y + y) * width + (block_x + x)];
                }
            }

            quantize(&block, quant_table, 1.0, &mut quant_block);

            for y in 0..rows {
                for x in 0..cols {
                    output[(block_y + y) * width + (block_x + x)] = quant_block[y * BLOCK_SIZE + x];
                }
            }
        }
    }
}

/// Dequantize a full channel of coefficients block by block.
pub fn dequantize_channel(quantized: &[i32], width: usize, height: usize, quant_table: &QuantTable, output: &mut Vec<f32>) {
    output.clear();
    output.resize(width * height, 0.0);

    let mut block = [0i32; 64];
    let mut deq_block = [0.0f32; 64];

    for block_y in (0..height).step_by(BLOCK_SIZE) {
        for block_x in (0..width).step_by(BLOCK_SIZE) {
            let rows = BLOCK_SIZE.min(height - block_y);
            let cols = BLOCK_SIZE.min(width - block_x);
            for y in 0..rows {
                for x in 0..cols {
                    block[y * BLOCK_SIZE + x] = quantized[(block_y + y) * width + (block_x + x)];
                }
            }

            dequantize(&block, quant_table, 1.0, &mut deq_block);

            for y in 0..rows {
                for x in 0..cols {
                    output[(block_y + y) * width + (block_x + x)] = deq_block[y * BLOCK_SIZE + x];
                }
            }
        }
    }
}

/// Quantize a full channel using a per-block activity multiplier looked up
/// from `aq_map`, clamped to `[0.5, 2.0]` there.
pub fn quantize_channel_adaptive(
    dct_coeffs: &[f32],
    width: usize,
    height: usize,
    quant_table: &QuantTable,
    aq_map: &AdaptiveQuantMap,
    output: &mut Vec<i32>,
) {
    output.clear();
    output.resize(width * height, 0);

    let mut block = [0.0f32; 64];
    let mut quant_block = [0i32; 64];

    for (by, block_y) in (0..height).step_by(BLOCK_SIZE).enumerate() {
        for (bx, block_x) in (0..width).step_by(BLOCK_SIZE).enumerate() {
            let rows = BLOCK_SIZE.min(height - block_y);
            let cols = BLOCK_SIZE.min(width - block_x);
            for y in 0..rows {
                for x in 0..cols {
                    block[y * BLOCK_SIZE + x] = dct_coeffs[(block_y + y) * width + (block_x + x)];
                }
            }

            let scale = aq_map.get_scale(bx, by);
            quantize(&block, quant_table, scale, &mut quant_block);

            for y in 0..rows {
                for x in 0..cols {
                    output[(block_y + y) * width + (block_x + x)] = quant_block[y * BLOCK_SIZE + x];
                }
            }
        }
    }
}

/// Dequantize a full channel using a per-block activity multiplier.
pub fn dequantize_channel_adaptive(
    quantized: &[i32],
    width: usize,
    height: usize,
    quant_table: &QuantTable,
    aq_map: &AdaptiveQuantMap,
    output: &mut Vec<f32>,
) {
    output.clear();
    output.resize(width * height, 0.0);

    let mut block = [0i32; 64];
    let mut deq_block = [0.0f32; 64];

    for (by, block_y) in (0..height).step_by(BLOCK_SIZE).enumerate() {
        for (bx, block_x) in (0..width).step_by(BLOCK_SIZE).enumerate() {
            let rows = BLOCK_SIZE.min(height - block_y);
            let cols = BLOCK_SIZE.min(width - block_x);
            for y in 0..rows {
                for x in 0..cols {
                    block[y * BLOCK_SIZE + x] = quantized[(block_y + y) * width + (block_x + x)];
                }
            }

            let scale = aq_map.get_scale(bx, by);
            dequantize(&block, quant_table, scale, &mut deq_block);

            for y in 0..rows {
                for x in 0..cols {
                    output[(block_y + y) * width + (block_x + x)] = deq_block[y * BLOCK_SIZE + x];
                }
            }
        }
    }
}
