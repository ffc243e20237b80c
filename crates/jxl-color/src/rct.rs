//! Reversible Color Transform (RCT): an integer-exact RGB<->YCoCg-like
//! mapping used by the Modular pipeline.

use jxl_core::JxlResult;

/// Chroma values are biased by this much before 16-bit storage so the
/// signed Co/Cg range fits an unsigned representation.
pub const CHROMA_OFFSET: i32 = 32768;

/// Forward RCT: RGB -> (Y, Co, Cg), operating on interleaved channel
/// triples. Channels beyond the first three (e.g. alpha) are left alone
/// by the caller; this function only ever sees exactly three planes.
pub fn forward_rct(rgb: &[i32], ycocg: &mut [i32]) {
    assert_eq!(rgb.len(), ycocg.len());
    assert_eq!(rgb.len() % 3, 0);

    for i in (0..rgb.len()).step_by(3) {
        let r = rgb[i];
        let g = rgb[i + 1];
        let b = rgb[i + 2];

        let co = r - b;
        let t = b + (co >> 1);
        let cg = g - t;
        let y = t + (cg >> 1);

        ycocg[i] = y;
        ycocg[i + 1] = co + CHROMA_OFFSET;
        ycocg[i + 2] = cg + CHROMA_OFFSET;
    }
}

/// Inverse RCT: (Y, Co, Cg) -> RGB. Exact dual of `forward_rct`.
pub fn inverse_rct(ycocg: &[i32], rgb: &mut [i32]) {
    assert_eq!(rgb.len(), ycocg.len());
    assert_eq!(rgb.len() % 3, 0);

    for i in (0..ycocg.len()).step_by(3) {
        let y = ycocg[i];
        let co = ycocg[i + 1] - CHROMA_OFFSET;
        let cg = ycocg[i + 2] - CHROMA_OFFSET;

        let t = y - (cg >> 1);
        let g = cg + t;
        let b = t - (co >> 1);
        let r = b + co;

        rgb[i] = r;
        rgb[i + 1] = g;
        rgb[i + 2] = b;
    }
}

/// Apply the RCT to an image's channel planes in place, skipping channels
/// that aren't RGB (fewer than 3 channels, or anything past channel 2 —
/// alpha is never color-transformed).
pub fn forward_rct_planes(channels: &mut [Vec<i32>]) -> JxlResult<()> {
    if channels.len() < 3 {
        return Ok(());
    }
    let len = channels[0].len();
    let mut interleaved = Vec::with_capacity(len * 3);
    for i in 0..len {
        interleaved.push(channels[0][i]);
        interleaved.push(channels[1][i]);
        interleaved.push(channels[2][i]);
    }
    let mut out = vec![0i32; interleaved.len()];
    forward_rct(&interleaved, &mut out);
    for i in 0..len {
        channels[0][i] = out[i * 3];
        channels[1][i] = out[i * 3 + 1];
        channels[2][i] = out[i * 3 + 2];
    }
    Ok(())
}

/// Inverse of `forward_rct_planes`.
pub fn inverse_rct_planes(channels: &mut [Vec<i32>]) -> JxlResult<()> {
    if channels.len() < 3 {
        return Ok(());
    }
    let len = channels[0].len();
    let mut interleaved = Vec::with_capacity(len * 3);
    for i in 0..len {
        interleaved.push(channels[0][i]);
        interleaved.push(channels[1][i]);
        interleaved.push(channels[2][i]);
    }
    let mut out = vec![0i32; interleaved.len()];
    inverse_rct(&interleaved, &mut out);
    for i in 0..len {
        channels[0][i] = out[i * 3];
        channels[1][i] = out[i * 3 + 1];
        channels[2][i] = out[i * 3 + 2];
    }
    Ok(())
}
