//! Squeeze: a Haar-like reversible multi-resolution decomposition used
//! ahead of MED prediction in the Modular pipeline.

/// One step of the reversible pair transform: `(a, b) -> (low, diff)`.
/// `low = floor((a+b)/2)` (floor toward negative infinity), `diff = a-b`.
pub fn forward_pair(a: i32, b: i32) -> (i32, i32) {
    let low = (a + b).div_euclid(2);
    let diff = a - b;
    (low, diff)
}

/// Inverse of `forward_pair`: recovers `(a, b)` from `(low, diff)`.
pub fn inverse_pair(low: i32, diff: i32) -> (i32, i32) {
    let a = low + ceil_div_2(diff);
    let b = a - diff;
    (a, b)
}

fn ceil_div_2(v: i32) -> i32 {
    if v >= 0 {
        (v + 1) / 2
    } else {
        -((-v) / 2)
    }
}

/// Which axis a squeeze step operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqueezeOrientation {
    Horizontal,
    Vertical,
}

/// A single recorded squeeze step, replayed in reverse by the decoder.
#[derive(Debug, Clone, Copy)]
pub struct SqueezeStep {
    pub orientation: SqueezeOrientation,
    pub region_width: usize,
    pub region_height: usize,
}

/// A channel after forward squeezing: the low-pass/residual buffer plus
/// the sequence of steps needed to invert it.
#[derive(Debug, Clone)]
pub struct SqueezedChannel {
    pub data: Vec<i32>,
    pub width: usize,
    pub height: usize,
    pub steps: Vec<SqueezeStep>,
}

/// One horizontal pass over the first `region_width` columns of each of
/// the first `region_height` rows: pairs `(x, x+1)` become
/// `(low, diff)`, low-pass packed into the left half, diffs into the
/// right half. An odd trailing column passes through unchanged.
fn squeeze_horizontal(data: &mut [i32], width: usize, region_width: usize, region_height: usize) {
    let mut row_buf = vec![0i32; region_width];
    for y in 0..region_height {
        let row_start = y * width;
        row_buf.copy_from_slice(&data[row_start..row_start + region_width]);

        let pairs = region_width / 2;
        for i in 0..pairs {
            let (low, diff) = forward_pair(row_buf[2 * i], row_buf[2 * i + 1]);
            data[row_start + i] = low;
            data[row_start + pairs + i] = diff;
        }
        if region_width % 2 == 1 {
            data[row_start + region_width - 1] = row_buf[region_width - 1];
        }
    }
}

fn unsqueeze_horizontal(data: &mut [i32], width: usize, region_width: usize, region_height: usize) {
    let mut row_buf = vec![0i32; region_width];
    for y in 0..region_height {
        let row_start = y * width;
        row_buf.copy_from_slice(&data[row_start..row_start + region_width]);

        let pairs = region_width / 2;
        for i in 0..pairs {
            let low = row_buf[i];
            let diff = row_buf[pairs + i];
            let (a, b) = inverse_pair(low, diff);
            data[row_start + 2 * i] = a;
            data[row_start + 2 * i + 1] = b;
        }
        if region_width % 2 == 1 {
            data[row_start + region_width - 1] = row_buf[region_width - 1];
        }
    }
}

fn squeeze_vertical(data: &mut [i32], width: usize, region_width: usize, region_height: usize) {
    let mut col_buf = vec![0i32; region_height];
    for x in 0..region_width {
        for y in 0..region_height {
            col_buf[y] = data[y * width + x];
        }
        let pairs = region_height / 2;
        for i in 0..pairs {
            let (low, diff) = forward_pair(col_buf[2 * i], col_buf[2 * i + 1]);
            data[i * width + x] = low;
            data[(pairs + i) * width + x] = diff;
        }
        if region_height % 2 == 1 {
            data[(region_height - 1) * width + x] = col_buf[region_height - 1];
        }
    }
}

fn unsqueeze_vertical(data: &mut [i32], width: usize, region_width: usize, region_height: usize) {
    let mut col_buf = vec![0i32; region_height];
    for x in 0..region_width {
        for y in 0..region_height {
            col_buf[y] = data[y * width + x];
        }
        let pairs = region_height / 2;
        for i in 0..pairs {
            let low = col_buf[i];
            let diff = col_buf[pairs + i];
            let (a, b) = inverse_pair(low, diff);
            data[2 * i * width + x] = a;
            data[(2 * i + 1) * width + x] = b;
        }
        if region_height % 2 == 1 {
            data[(region_height - 1) * width + x] = col_buf[region_height - 1];
        }
    }
}

/// Forward squeeze a channel for up to `max_levels` levels (default 3 in
/// the caller), shrinking the active region by half each step until
/// either dimension reaches 1.
pub fn forward_squeeze(channel: &[i32], width: usize, height: usize, max_levels: usize) -> SqueezedChannel {
    let mut data = channel.to_vec();
    let mut steps = Vec::new();
    let (mut region_w, mut region_h) = (width, height);

    for _ in 0..max_levels {
        if region_w <= 1 || region_h <= 1 {
            break;
        }
        squeeze_horizontal(&mut data, width, region_w, region_h);
        steps.push(SqueezeStep {
            orientation: SqueezeOrientation::Horizontal,
            region_width: region_w,
            region_height: region_h,
        });
        region_w = region_w.div_ceil(2);

        if region_w <= 1 || region_h <= 1 {
            break;
        }
        squeeze_vertical(&mut data, width, region_w, region_h);
        steps.push(SqueezeStep {
            orientation: SqueezeOrientation::Vertical,
            region_width: region_w,
            region_height: region_h,
        });
        region_h = region_h.div_ceil(2);
    }

    SqueezedChannel {
        data,
        width,
        height,
        steps,
    }
}

/// Invert `forward_squeeze`, replaying its recorded steps in reverse.
pub fn inverse_squeeze(squeezed: &SqueezedChannel) -> Vec<i32> {
    let mut data = squeezed.data.clone();
    for step in squeezed.steps.iter().rev() {
        match step.orientation {
            SqueezeOrientation::Horizontal => {
                unsqueeze_horizontal(&mut data, squeezed.width, step.region_width, step.region_height)
            }
            SqueezeOrientation::Vertical => {
                unsqueeze_vertical(&mut data, squeezed.width, step.region_width, step.region_height)
            }
        }
    }
    data
}
