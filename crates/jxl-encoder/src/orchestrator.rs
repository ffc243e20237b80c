//! Multi-frame orchestration on top of the single-frame encoder: animation
//! timing, reference-frame delta encoding, and patch (rectangular region
//! copy) detection.

use crate::JxlEncoder;
use jxl_bitstream::BitWriter;
use jxl_core::*;
use jxl_headers::{BlendMode, Container, FrameHeader, JxlImageMetadata};
use jxl_transform::quality_to_distance;
use std::io::{Cursor, Write};

/// Reference-frame delta-encoding configuration for a multi-frame sequence.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceFrameConfig {
    /// Encode a full keyframe every `keyframe_interval`-th frame; every other
    /// frame is a delta against the best-matching pool entry.
    pub keyframe_interval: u32,
    /// Size of the FIFO reference pool.
    pub max_reference_frames: usize,
    /// Minimum mean similarity a pool entry must have to be used as a
    /// reference; frames with no sufficiently similar entry fall back to a
    /// keyframe.
    pub similarity_threshold: f32,
}

impl Default for ReferenceFrameConfig {
    fn default() -> Self {
        Self {
            keyframe_interval: 1,
            max_reference_frames: consts::DEFAULT_MAX_REFERENCE_FRAMES,
            similarity_threshold: 0.9,
        }
    }
}

/// Patch (rectangular region copy) detection configuration.
#[derive(Debug, Clone, Copy)]
pub struct PatchConfig {
    pub enabled: bool,
    /// Fail the encode if no legal non-overlapping patch can be found for a
    /// delta frame, rather than falling back to encoding the region whole.
    pub required: bool,
    pub min_patch_size: u32,
    pub max_patch_size: u32,
    pub block_size: u32,
    pub max_patches_per_frame: usize,
    pub similarity_threshold: f32,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            required: false,
            min_patch_size: 16,
            max_patch_size: 256,
            block_size: 16,
            max_patches_per_frame: 8,
            similarity_threshold: 0.9,
        }
    }
}

/// Summary statistics returned by `JxlEncoder::encode_sequence`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeStats {
    pub frame_count: usize,
    pub keyframe_count: usize,
    pub delta_frame_count: usize,
    pub patch_count: usize,
    pub total_bytes: usize,
}

impl JxlEncoder {
    /// Encode a sequence of frames (a still image is a sequence of one) as
    /// an animated JPEG XL codestream, with reference-frame delta encoding
    /// and patch detection applied per the encoder's configured
    /// `reference_frames`/`patches` options.
    pub fn encode_sequence<W: Write>(&self, frames: &[Frame], mut writer: W) -> JxlResult<EncodeStats> {
        let first = frames
            .first()
            .ok_or_else(|| JxlError::InvalidConfiguration("frame sequence must contain at least one frame".to_string()))?;

        let width = first.image.width();
        let height = first.image.height();
        for frame in frames {
            if frame.image.width() != width || frame.image.height() != height {
                return Err(JxlError::InvalidConfiguration(
                    "every frame in a sequence must share the same dimensions".to_string(),
                ));
            }
        }

        let reference_config = self.reference_config();
        let patch_config = self.patch_config();
        let mut pool = ReferenceFramePool::new(reference_config.max_reference_frames);
        let mut stats = EncodeStats::default();

        let mut codestream = Vec::new();
        {
            let mut bit_writer = BitWriter::new(Cursor::new(&mut codestream));
            bit_writer.write_bits(0x0AFF, 16)?;

            let bits_per_sample = match first.image.pixel_type {
                PixelType::U8 => 8,
                PixelType::U16 => 16,
                PixelType::F16 => 16,
                PixelType::F32 => 32,
            };
            let animation = self.animation_header();
            let mut metadata = JxlImageMetadata::for_animation(width, height, bits_per_sample, animation);
            metadata.num_extra_channels = (first.image.channel_count() - 3) as u32;
            metadata.color_encoding = first.image.color_encoding;
            metadata.encode(&mut bit_writer)?;

            let use_modular = self.is_modular();
            let distance = quality_to_distance(self.quality());

            for (index, frame) in frames.iter().enumerate() {
                let is_last = index + 1 == frames.len();
                let force_keyframe = reference_config.keyframe_interval == 0
                    || index as u32 % reference_config.keyframe_interval.max(1) == 0
                    || pool.is_empty();

                let mut residual = frame.image.clone();
                let mut reference_handle = None;
                let mut patches = Vec::new();

                if !force_keyframe {
                    if let Some((handle, reference_image)) =
                        best_reference(&pool, &frame.image, reference_config.similarity_threshold)
                    {
                        if patch_config.enabled {
                            patches = detect_patches(&frame.image, reference_image, handle, &patch_config)?;
                            zero_patches(&mut residual, &patches);
                        }
                        residual = delta_image(&residual, reference_image)?;
                        reference_handle = Some(handle);
                    }
                }

                let mut frame_header = match reference_handle {
                    Some(handle) => {
                        FrameHeader::delta_frame(index as u32, frame.duration_ms, BlendMode::Replace).with_reference(handle as u32)
                    }
                    None => FrameHeader::keyframe(index as u32, frame.duration_ms),
                };
                if !patches.is_empty() {
                    frame_header = frame_header.with_patches(patches.clone());
                }
                if frame.name.is_some() {
                    frame_header.name = frame.name.clone();
                    frame_header.flags |= 0x01;
                }
                frame_header.is_last = is_last;
                frame_header.encoding = if use_modular { 1 } else { 0 };
                frame_header.distance = distance;
                frame_header.all_default = false;
                frame_header.write(&mut bit_writer)?;

                if use_modular {
                    self.encode_frame_modular(&residual, &mut bit_writer)?;
                } else {
                    self.encode_frame_vardct(&residual, distance, self.roi(), &mut bit_writer)?;
                }

                if reference_handle.is_none() {
                    pool.push(frame.image.clone());
                    stats.keyframe_count += 1;
                } else {
                    stats.delta_frame_count += 1;
                }
                stats.patch_count += patches.len();
                stats.frame_count += 1;
            }

            bit_writer.flush()?;
        }

        let container = Container::with_codestream(codestream);
        let mut container_bytes = Vec::new();
        container.write(&mut container_bytes)?;
        stats.total_bytes = container_bytes.len();
        writer.write_all(&container_bytes)?;

        Ok(stats)
    }

    fn reference_config(&self) -> ReferenceFrameConfig {
        self.options.reference_frames.unwrap_or_default()
    }

    fn patch_config(&self) -> PatchConfig {
        self.options.patches.unwrap_or_default()
    }

    fn animation_header(&self) -> jxl_headers::AnimationHeader {
        self.options.animation.unwrap_or_default()
    }

    fn is_modular(&self) -> bool {
        self.options.lossless || self.options.modular_mode
    }

    fn quality(&self) -> f32 {
        self.options.quality
    }

    fn roi(&self) -> Option<&Roi> {
        self.options.region_of_interest.as_ref()
    }
}

/// Pick the pool entry with highest mean similarity to `target`, if any
/// entry clears `threshold`.
fn best_reference<'a>(
    pool: &'a ReferenceFramePool,
    target: &Image,
    threshold: f32,
) -> Option<(usize, &'a Image)> {
    pool.iter()
        .filter(|(_, candidate)| candidate.width() == target.width() && candidate.height() == target.height())
        .map(|(handle, candidate)| (handle, candidate, similarity(target, candidate)))
        .filter(|&(_, _, score)| score >= threshold)
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(handle, candidate, _)| (handle, candidate))
}

/// Mean per-sample similarity in `[0, 1]`, 1.0 being pixel-identical.
fn similarity(a: &Image, b: &Image) -> f32 {
    match (&a.buffer, &b.buffer) {
        (ImageBuffer::U8(ad), ImageBuffer::U8(bd)) if !ad.is_empty() && ad.len() == bd.len() => {
            let sum: u64 = ad
                .iter()
                .zip(bd.iter())
                .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs() as u64)
                .sum();
            1.0 - (sum as f32 / ad.len() as f32) / 255.0
        }
        _ => 0.0,
    }
}

/// Signed pixel difference centered at 128, restricted to 8-bit images (the
/// same restriction Modular-mode lossless encoding carries).
fn delta_image(current: &Image, reference: &Image) -> JxlResult<Image> {
    let (cur, reference_data) = match (&current.buffer, &reference.buffer) {
        (ImageBuffer::U8(cur), ImageBuffer::U8(reference_data)) => (cur, reference_data),
        _ => {
            return Err(JxlError::UnsupportedFeature(
                "reference-frame delta encoding currently supports 8-bit images only".to_string(),
            ))
        }
    };
    if cur.len() != reference_data.len() {
        return Err(JxlError::InvalidConfiguration(
            "reference frame does not match the current frame's layout".to_string(),
        ));
    }

    let mut out = current.clone();
    if let ImageBuffer::U8(ref mut data) = out.buffer {
        for (i, value) in data.iter_mut().enumerate() {
            let diff = cur[i] as i32 - reference_data[i] as i32 + 128;
            *value = diff.clamp(0, 255) as u8;
        }
    }
    Ok(out)
}

/// Zero every pixel covered by `patches`; their content will be reproduced
/// on the decode side by copying straight from the reference frame instead.
fn zero_patches(image: &mut Image, patches: &[Patch]) {
    let width = image.width() as usize;
    let channels = image.channel_count();
    if let ImageBuffer::U8(ref mut data) = image.buffer {
        for patch in patches {
            for y in 0..patch.height as usize {
                for x in 0..patch.width as usize {
                    let idx = ((patch.dest_y as usize + y) * width + (patch.dest_x as usize + x)) * channels;
                    for c in 0..channels {
                        data[idx + c] = 0;
                    }
                }
            }
        }
    }
}

/// Bounded local-search block matching: for each `block_size`-aligned
/// destination block, search a small neighborhood of the reference image
/// for the best-matching source block. Unlike same-position matching, this
/// finds content that has merely moved (scrolled, panned) between frames,
/// which a plain delta frame cannot exploit.
fn detect_patches(current: &Image, reference: &Image, reference_index: usize, config: &PatchConfig) -> JxlResult<Vec<Patch>> {
    let width = current.width() as usize;
    let height = current.height() as usize;
    let patch_size = config
        .block_size
        .max(config.min_patch_size)
        .min(config.max_patch_size)
        .max(1) as usize;

    let candidates = match (&current.buffer, &reference.buffer) {
        (ImageBuffer::U8(cur), ImageBuffer::U8(refb))
            if cur.len() == refb.len()
                && reference.width() as usize == width
                && reference.height() as usize == height
                && width >= patch_size
                && height >= patch_size =>
        {
            let channels = current.channel_count();
            const SEARCH_RADIUS: i64 = 32;
            let step = (patch_size / 2).max(1);

            let mut found = Vec::new();
            let mut dest_y = 0usize;
            while dest_y + patch_size <= height {
                let mut dest_x = 0usize;
                while dest_x + patch_size <= width {
                    if let Some((src_x, src_y, score)) = best_match(
                        cur, refb, width, channels, dest_x, dest_y, patch_size, SEARCH_RADIUS, step,
                    ) {
                        if score >= config.similarity_threshold {
                            found.push(Patch {
                                dest_x: dest_x as u32,
                                dest_y: dest_y as u32,
                                width: patch_size as u32,
                                height: patch_size as u32,
                                reference_index,
                                src_x: src_x as u32,
                                src_y: src_y as u32,
                            });
                        }
                    }
                    dest_x += patch_size;
                }
                dest_y += patch_size;
            }
            found
        }
        _ => Vec::new(),
    };

    let mut ranked = candidates;
    ranked.sort_by(|a, b| b.area().cmp(&a.area()));

    let mut selected: Vec<Patch> = Vec::new();
    for candidate in ranked {
        if selected.iter().any(|p| p.overlaps(&candidate)) {
            continue;
        }
        selected.push(candidate);
        if selected.len() >= config.max_patches_per_frame {
            break;
        }
    }

    if config.required && selected.is_empty() {
        return Err(JxlError::NoEligiblePatches);
    }

    Ok(selected)
}

#[allow(clippy::too_many_arguments)]
fn best_match(
    current: &[u8],
    reference: &[u8],
    width: usize,
    channels: usize,
    dest_x: usize,
    dest_y: usize,
    patch_size: usize,
    radius: i64,
    step: usize,
) -> Option<(usize, usize, f32)> {
    let height = reference.len() / channels / width;
    let max_x = (width - patch_size) as i64;
    let max_y = (height - patch_size) as i64;
    let x0 = (dest_x as i64 - radius).max(0);
    let x1 = (dest_x as i64 + radius).min(max_x);
    let y0 = (dest_y as i64 - radius).max(0);
    let y1 = (dest_y as i64 + radius).min(max_y);

    let mut best: Option<(usize, usize, f32)> = None;
    let mut sy = y0;
    while sy <= y1 {
        let mut sx = x0;
        while sx <= x1 {
            let score = region_similarity(current, reference, width, channels, dest_x, dest_y, sx as usize, sy as usize, patch_size);
            let improves = match best {
                Some((_, _, b)) => score > b,
                None => true,
            };
            if improves {
                best = Some((sx as usize, sy as usize, score));
            }
            sx += step as i64;
        }
        sy += step as i64;
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn region_similarity(
    current: &[u8],
    reference: &[u8],
    width: usize,
    channels: usize,
    dest_x: usize,
    dest_y: usize,
    src_x: usize,
    src_y: usize,
    patch_size: usize,
) -> f32 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for y in 0..patch_size {
        for x in 0..patch_size {
            let dest_idx = ((dest_y + y) * width + (dest_x + x)) * channels;
            let src_idx = ((src_y + y) * width + (src_x + x)) * channels;
            for c in 0..channels {
                sum += (current[dest_idx + c] as i32 - reference[src_idx + c] as i32).unsigned_abs() as u64;
                count += 1;
            }
        }
    }
    if count == 0 {
        return 0.0;
    }
    1.0 - (sum as f32 / count as f32) / 255.0
}
