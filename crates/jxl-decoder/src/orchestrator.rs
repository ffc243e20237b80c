//! Multi-frame orchestration on top of the single-frame decoder: reads an
//! animated codestream frame by frame until `is_last`, reconstructing
//! reference-frame deltas and patches along the way.

use crate::JxlDecoder;
use jxl_bitstream::BitReader;
use jxl_core::*;
use jxl_headers::{Container, FrameHeader, JxlHeader, JxlImageMetadata, CODESTREAM_SIGNATURE};
use std::io::{Cursor, Read};

impl JxlDecoder {
    /// Decode a (possibly animated) JPEG XL stream into its constituent
    /// frames. A single still image decodes to a vector of one frame.
    pub fn decode_sequence<R: Read>(&mut self, mut reader: R) -> JxlResult<Vec<Frame>> {
        let mut input_data = Vec::new();
        reader.read_to_end(&mut input_data)?;

        let codestream = if input_data.starts_with(&jxl_headers::CONTAINER_SIGNATURE) {
            let container = Container::read(&mut Cursor::new(&input_data))?;
            container.extract_codestream()?
        } else {
            input_data
        };

        let mut bit_reader = BitReader::new(Cursor::new(&codestream));

        let sig0 = bit_reader.read_bits(8)? as u8;
        let sig1 = bit_reader.read_bits(8)? as u8;
        if sig0 != CODESTREAM_SIGNATURE[0] || sig1 != CODESTREAM_SIGNATURE[1] {
            return Err(JxlError::InvalidSignature);
        }

        let metadata = JxlImageMetadata::decode(&mut bit_reader)?;
        let dimensions = if metadata.have_intrinsic_size {
            Dimensions::new(metadata.intrinsic_width, metadata.intrinsic_height)
        } else {
            return Err(JxlError::InvalidHeader("Missing image dimensions".to_string()));
        };

        let header = JxlHeader {
            version: 0,
            dimensions,
            bit_depth: metadata.bit_depth.bits_per_sample as u8,
            num_channels: 3 + metadata.num_extra_channels as usize,
            color_encoding: metadata.color_encoding,
            orientation: metadata.orientation,
            is_animation: metadata.have_animation,
            have_preview: metadata.have_preview,
        };
        self.header = Some(header);

        let pixel_type = if metadata.bit_depth.bits_per_sample <= 8 {
            PixelType::U8
        } else if metadata.bit_depth.bits_per_sample <= 16 {
            PixelType::U16
        } else {
            PixelType::F32
        };

        let num_channels = 3 + metadata.num_extra_channels as usize;
        let channels = match num_channels {
            1 => ColorChannels::Gray,
            2 => ColorChannels::GrayAlpha,
            3 => ColorChannels::RGB,
            4 => ColorChannels::RGBA,
            _ => {
                return Err(JxlError::UnsupportedFeature(format!(
                    "{} channels not supported",
                    num_channels
                )))
            }
        };

        // The encoder side always uses the default pool capacity for
        // reference-frame handles (see `jxl-encoder`'s orchestrator); a
        // custom `max_reference_frames` larger than the default is not
        // currently round-trippable.
        let mut pool = ReferenceFramePool::new(consts::DEFAULT_MAX_REFERENCE_FRAMES);
        let mut frames = Vec::new();

        loop {
            let frame_header = FrameHeader::parse(&mut bit_reader)?;

            let mut image = Image::new(dimensions, channels, pixel_type, metadata.color_encoding)?;
            if frame_header.encoding == 1 {
                self.decode_frame_modular(&mut bit_reader, &mut image)?;
            } else {
                self.decode_frame_vardct(&mut bit_reader, &mut image, frame_header.distance)?;
            }

            let reconstructed = match frame_header.reference_frame_index {
                Some(handle) => {
                    let reference = pool.get(handle as usize).ok_or_else(|| {
                        JxlError::InvalidFrameHeader(format!(
                            "reference frame handle {} not found in pool",
                            handle
                        ))
                    })?;
                    let mut rebuilt = reconstruct_delta(&image, reference)?;
                    if !frame_header.patches.is_empty() {
                        apply_patches(&mut rebuilt, &frame_header.patches, reference)?;
                    }
                    rebuilt
                }
                None => image,
            };

            if frame_header.reference_frame_index.is_none() {
                pool.push(reconstructed.clone());
            }

            let is_last = frame_header.is_last;
            frames.push(Frame {
                image: reconstructed,
                duration_ms: frame_header.duration,
                name: frame_header.name.clone(),
            });

            if is_last {
                break;
            }
        }

        Ok(frames)
    }
}

/// Undo `jxl-encoder`'s orchestrator's delta encoding: add the reference
/// pixel back to the decoded residual, centered at 128. Restricted to 8-bit
/// images, symmetric to the encode side.
fn reconstruct_delta(residual: &Image, reference: &Image) -> JxlResult<Image> {
    let (res, reference_data) = match (&residual.buffer, &reference.buffer) {
        (ImageBuffer::U8(res), ImageBuffer::U8(reference_data)) => (res, reference_data),
        _ => {
            return Err(JxlError::UnsupportedFeature(
                "reference-frame delta decoding currently supports 8-bit images only".to_string(),
            ))
        }
    };
    if res.len() != reference_data.len() {
        return Err(JxlError::InvalidConfiguration(
            "reference frame does not match the decoded residual's layout".to_string(),
        ));
    }

    let mut out = residual.clone();
    if let ImageBuffer::U8(ref mut data) = out.buffer {
        for (i, value) in data.iter_mut().enumerate() {
            let reconstructed = res[i] as i32 - 128 + reference_data[i] as i32;
            *value = reconstructed.clamp(0, 255) as u8;
        }
    }
    Ok(out)
}

/// Overwrite each patch's destination rectangle with its source content
/// copied from the reference frame, undoing the zeroing `jxl-encoder`'s
/// orchestrator applies before delta-encoding.
fn apply_patches(image: &mut Image, patches: &[Patch], reference: &Image) -> JxlResult<()> {
    let width = image.width() as usize;
    let channels = image.channel_count();
    let ref_width = reference.width() as usize;
    let ref_channels = reference.channel_count();

    match (&mut image.buffer, &reference.buffer) {
        (ImageBuffer::U8(dest), ImageBuffer::U8(src)) => {
            for patch in patches {
                for y in 0..patch.height as usize {
                    for x in 0..patch.width as usize {
                        let dest_idx = ((patch.dest_y as usize + y) * width + (patch.dest_x as usize + x)) * channels;
                        let src_idx = ((patch.src_y as usize + y) * ref_width + (patch.src_x as usize + x)) * ref_channels;
                        for c in 0..channels.min(ref_channels) {
                            dest[dest_idx + c] = src[src_idx + c];
                        }
                    }
                }
            }
            Ok(())
        }
        _ => Err(JxlError::UnsupportedFeature(
            "patch application currently supports 8-bit images only".to_string(),
        )),
    }
}
