//! DCT (Discrete Cosine Transform) implementation

use std::f32::consts::PI;

/// 8x8 DCT-II (forward transform)
pub fn dct8x8_forward(input: &[f32; 64], output: &mut [f32; 64]) {
    const N: usize = 8;

    for u in 0..N {
        for v in 0..N {
            let mut sum = 0.0;
            for x in 0..N {
                for y in 0..N {
                    let px = input[y * N + x];
                    let cu = if u == 0 { 1.0 / 2.0f32.sqrt() } else { 1.0 };
                    let cv = if v == 0 { 1.0 / 2.0f32.sqrt() } else { 1.0 };

                    sum += px
                        * (((2 * x + 1) as f32 * u as f32 * PI) / (2.0 * N as f32)).cos()
                        * (((2 * y + 1) as f32 * v as f32 * PI) / (2.0 * N as f32)).cos()
                        * cu
                        * cv;
                }
            }
            output[v * N + u] = sum * 2.0 / N as f32;
        }
    }
}

/// 8x8 DCT-III (inverse transform)
pub fn dct8x8_inverse(input: &[f32; 64], output: &mut [f32; 64]) {
    const N: usize = 8;

    for x in 0..N {
        for y in 0..N {
            let mut sum = 0.0;
            for u in 0..N {
                for v in 0..N {
                    let coeff = input[v * N + u];
                    let cu = if u == 0 { 1.0 / 2.0f32.sqrt() } else { 1.0 };
                    let cv = if v == 0 { 1.0 / 2.0f32.sqrt() } else { 1.0 };

                    sum += coeff
                        * cu
                        * cv
                        * (((2 * x + 1) as f32 * u as f32 * PI) / (2.0 * N as f32)).cos()
                        * (((2 * y + 1) as f32 * v as f32 * PI) / (2.0 * N as f32)).cos();
                }
            }
            output[y * N + x] = sum * 2.0 / N as f32;
        }
    }
}

/// Fill an 8x8 block from `channel`, repeating the last valid row/column
/// to pad blocks that cross the image's right or bottom edge. This keeps
/// the DCT input fully defined (no stale data from a reused buffer)
/// without altering the image's low-frequency content much.
fn extract_block_padded(channel: &[f32], width: usize, height: usize, block_x: usize, block_y: usize, block: &mut [f32; 64]) {
    for y in 0..8 {
        let src_y = (block_y + y).min(height - 1);
        for x in 0..8 {
            let src_x = (block_x + x).min(width - 1);
            block[y * 8 + x] = channel[src_y * width + src_x];
        }
    }
}

/// Write back only the in-bounds portion of a transformed 8x8 block.
fn store_block_cropped(output: &mut [f32], width: usize, height: usize, block_x: usize, block_y: usize, block: &[f32; 64]) {
    let rows = 8.min(height - block_y);
    let cols = 8.min(width - block_x);
    for y in 0..rows {
        for x in 0..cols {
            output[(block_y + y) * width + (block_x + x)] = block[y * 8 + x];
        }
    }
}

/// Apply DCT to a channel
pub fn dct_channel(channel: &[f32], width: usize, height: usize, output: &mut [f32]) {
    assert_eq!(channel.len(), width * height);
    assert_eq!(output.len(), width * height);

    let mut block = [0.0f32; 64];
    let mut transformed = [0.0f32; 64];

    for block_y in (0..height).step_by(8) {
        for block_x in (0..width).step_by(8) {
            extract_block_padded(channel, width, height, block_x, block_y, &mut block);
            dct8x8_forward(&block, &mut transformed);
            store_block_cropped(output, width, height, block_x, block_y, &transformed);
        }
    }
}

/// Apply inverse DCT to a channel
pub fn idct_channel(channel: &[f32], width: usize, height: usize, output: &mut [f32]) {
    assert_eq!(channel.len(), width * height);
    assert_eq!(output.len(), width * height);

    let mut block = [0.0f32; 64];
    let mut transformed = [0.0f32; 64];

    for block_y in (0..height).step_by(8) {
        for block_x in (0..width).step_by(8) {
            extract_block_padded(channel, width, height, block_x, block_y, &mut block);
            dct8x8_inverse(&block, &mut transformed);
            store_block_cropped(output, width, height, block_x, block_y, &transformed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_block_has_energy_only_in_dc() {
        let input = [5.0f32; 64];
        let mut output = [0.0f32; 64];
        dct8x8_forward(&input, &mut output);
        assert!((output[0] - 40.0).abs() < 1e-3);
        for &coeff in &output[1..] {
            assert!(coeff.abs() < 1e-3);
        }
    }

    #[test]
    fn forward_inverse_round_trip() {
        let mut input = [0.0f32; 64];
        for (i, v) in input.iter_mut().enumerate() {
            *v = (i * 3 % 17) as f32 - 8.0;
        }
        let mut freq = [0.0f32; 64];
        dct8x8_forward(&input, &mut freq);
        let mut back = [0.0f32; 64];
        dct8x8_inverse(&freq, &mut back);
        for i in 0..64 {
            assert!((input[i] - back[i]).abs() < 1e-2, "mismatch at {}", i);
        }
    }

    #[test]
    fn channel_round_trip_on_non_multiple_of_8_dimensions() {
        let width = 10;
        let height = 9;
        let channel: Vec<f32> = (0..width * height).map(|i| (i % 23) as f32 - 11.0).collect();
        let mut freq = vec![0.0f32; width * height];
        dct_channel(&channel, width, height, &mut freq);
        let mut back = vec![0.0f32; width * height];
        idct_channel(&freq, width, height, &mut back);
        for i in 0..width * height {
            assert!((channel[i] - back[i]).abs() < 1e-1, "mismatch at {}", i);
        }
    }

    #[test]
    fn edge_block_padding_does_not_leak_stale_buffer_state() {
        // A prior call with a very different value must not bleed into a
        // partial trailing block's padding.
        let width = 9;
        let height = 8;
        let channel = vec![200.0f32; width * height];
        let mut freq = vec![0.0f32; width * height];
        dct_channel(&channel, width, height, &mut freq);
        let mut back = vec![0.0f32; width * height];
        idct_channel(&freq, width, height, &mut back);
        for &v in &back {
            assert!((v - 200.0).abs() < 1e-1);
        }
    }
}
