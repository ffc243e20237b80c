//! JPEG XL decoder implementation

pub mod orchestrator;
pub mod progressive;

use jxl_bitstream::{AnsDistribution, BitReader};
use jxl_color::{inverse_rct_planes, linear_f32_to_srgb_u8, xyb_to_rgb};
use jxl_core::*;
use jxl_headers::{Container, FrameHeader, JxlImageMetadata, CODESTREAM_SIGNATURE};
use jxl_transform::{
    decode_predictive, dequantize_channel, dequantize_channel_adaptive, generate_xyb_quant_tables,
    idct_channel, inv_zigzag_scan_channel, merge_dc_ac, reconstruct_ac, AdaptiveQuantMap,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

pub use progressive::{ProgressiveConfig, ProgressiveDecoder, ProgressivePass, ScanConfiguration};
pub use jxl_headers::JxlHeader;

/// Parse just the codestream (or container-wrapped codestream) header,
/// without decoding any frame data. Used by callers that only need image
/// dimensions/format up front (see `jxl::parse_image_header`).
pub fn parse_header<R: Read>(mut reader: R) -> JxlResult<JxlHeader> {
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

    Ok(JxlHeader {
        version: 0,
        dimensions,
        bit_depth: metadata.bit_depth.bits_per_sample as u8,
        num_channels: 3 + metadata.num_extra_channels as usize,
        color_encoding: metadata.color_encoding,
        orientation: metadata.orientation,
        is_animation: metadata.have_animation,
        have_preview: metadata.have_preview,
    })
}

/// JPEG XL decoder
pub struct JxlDecoder {
    header: Option<JxlHeader>,
}

impl JxlDecoder {
    pub fn new() -> Self {
        Self { header: None }
    }

    /// Decode a JPEG XL file from a path
    pub fn decode_file<P: AsRef<Path>>(&mut self, path: P) -> JxlResult<Image> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        self.decode(reader)
    }

    /// Decode from a reader (supports both container and naked codestream)
    pub fn decode<R: Read>(&mut self, mut reader: R) -> JxlResult<Image> {
        // Step 1: Read input into buffer to support container detection
        let mut input_data = Vec::new();
        reader.read_to_end(&mut input_data)?;

        // Step 2: Try to parse as container format first
        let codestream = if input_data.starts_with(&jxl_headers::CONTAINER_SIGNATURE) {
            // Parse as container and extract codestream
            let container = Container::read(&mut Cursor::new(&input_data))?;
            container.extract_codestream()?
        } else {
            // Use data directly as naked codestream
            input_data
        };

        // Step 3: Parse header from codestream
        let mut bit_reader = BitReader::new(Cursor::new(&codestream));

        // Read and verify signature (JPEG XL spec Section 3.1)
        let sig0 = bit_reader.read_bits(8)? as u8;
        let sig1 = bit_reader.read_bits(8)? as u8;
        if sig0 != CODESTREAM_SIGNATURE[0] || sig1 != CODESTREAM_SIGNATURE[1] {
            return Err(JxlError::InvalidSignature);
        }

        // Parse spec-compliant metadata
        let metadata = JxlImageMetadata::decode(&mut bit_reader)?;

        // Extract dimensions from metadata
        let dimensions = if metadata.have_intrinsic_size {
            Dimensions::new(metadata.intrinsic_width, metadata.intrinsic_height)
        } else {
            return Err(JxlError::InvalidHeader("Missing image dimensions".to_string()));
        };

        // Create legacy header for compatibility
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
        self.header = Some(header.clone());

        // Determine pixel type based on bit depth
        let pixel_type = if metadata.bit_depth.bits_per_sample <= 8 {
            PixelType::U8
        } else if metadata.bit_depth.bits_per_sample <= 16 {
            PixelType::U16
        } else {
            PixelType::F32
        };

        // Determine channels
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

        // Create image buffer
        let mut image = Image::new(
            dimensions,
            channels,
            pixel_type,
            metadata.color_encoding,
        )?;

        // Parse the frame header to learn which pipeline encoded this frame.
        let frame_header = FrameHeader::parse(&mut bit_reader)?;

        // Decode frame data
        if frame_header.encoding == 1 {
            self.decode_frame_modular(&mut bit_reader, &mut image)?;
        } else {
            self.decode_frame_vardct(&mut bit_reader, &mut image, frame_header.distance)?;
        }

        Ok(image)
    }

    /// Lossless Modular-mode frame decoding: per-channel ANS-decoded MED
    /// residual streams, reconstructed to exact integer planes, with the
    /// reversible color transform inverted for RGB(A) images. Restricted
    /// to 8-bit samples, symmetric to `jxl-encoder`'s encode side.
    fn decode_frame_modular<R: Read>(&self, reader: &mut BitReader<R>, image: &mut Image) -> JxlResult<()> {
        let header = self.header.as_ref().unwrap();
        let width = header.dimensions.width as usize;
        let height = header.dimensions.height as usize;
        let num_channels = header.num_channels;

        if header.bit_depth != 8 {
            return Err(JxlError::UnsupportedFeature(
                "modular (lossless) decoding currently supports 8-bit-per-channel images only"
                    .to_string(),
            ));
        }

        let pixel_count = width * height;
        let mut symbol_streams = Vec::with_capacity(num_channels);
        for _ in 0..num_channels {
            let dist = AnsDistribution::deserialize(&jxl_bitstream::read_byte_blob(reader)?)?;
            let rans_data = jxl_bitstream::read_byte_blob(reader)?;
            symbol_streams.push(jxl_bitstream::decode_sequence(&rans_data, pixel_count, &dist)?);
        }

        let mut modular_image = decode_predictive(&symbol_streams, width, height, &vec![8u8; num_channels]);

        inverse_rct_planes(&mut modular_image.channels)?;

        if let ImageBuffer::U8(ref mut buffer) = image.buffer {
            for i in 0..pixel_count {
                for (c, plane) in modular_image.channels.iter().enumerate() {
                    buffer[i * num_channels + c] = plane[i].clamp(0, 255) as u8;
                }
            }
        }

        Ok(())
    }

    fn decode_frame_vardct<R: Read>(&self, reader: &mut BitReader<R>, image: &mut Image, distance: f32) -> JxlResult<()> {
        let header = self.header.as_ref().unwrap();

        // Full decoding pipeline:
        // 1. Decode quantized coefficients from bitstream
        // 2. Dequantize coefficients
        // 3. Apply inverse DCT
        // 4. Convert XYB to RGB color space
        // 5. Convert linear RGB to sRGB
        // 6. Convert to target pixel format

        let width = header.dimensions.width as usize;
        let height = header.dimensions.height as usize;
        let num_channels = header.num_channels;

        // Only support RGB/RGBA for now
        if num_channels < 3 {
            return Err(JxlError::UnsupportedFeature(
                "Only RGB/RGBA images are currently supported".to_string(),
            ));
        }

        // Step 1: Decode quantized coefficients, using the distance carried
        // in this frame's header rather than a fixed assumption.
        let (quantized, aq_map) = self.decode_coefficients(reader, width, height)?;

        // Step 2: Dequantize with XYB-tuned tables (parallel)
        // Use per-channel dequantization matching encoder
        let xyb_tables = generate_xyb_quant_tables(distance);
        let quant_tables = [&xyb_tables.x_table, &xyb_tables.y_table, &xyb_tables.b_table];

        let dct_coeffs: Vec<Vec<f32>> = quantized
            .par_iter()
            .zip(quant_tables.par_iter())
            .map(|(quantized_channel, quant_table)| {
                let mut dct_coeff = Vec::new();
                match &aq_map {
                    Some(map) => dequantize_channel_adaptive(quantized_channel, width, height, quant_table, map, &mut dct_coeff),
                    None => dequantize_channel(quantized_channel, width, height, quant_table, &mut dct_coeff),
                }
                dct_coeff
            })
            .collect();

        // Step 3: Apply inverse DCT (parallel)
        // CRITICAL: Unscale after IDCT to convert back to 0-1 range
        // Encoder scales XYB by 255 before DCT, so we must divide by 255 after IDCT
        const XYB_SCALE: f32 = 255.0;

        let xyb: Vec<Vec<f32>> = dct_coeffs
            .par_iter()
            .map(|dct_coeff| {
                let mut xyb_channel = vec![0.0; width * height];
                idct_channel(dct_coeff, width, height, &mut xyb_channel);
                // Unscale back to 0-1 range for XYB to RGB conversion
                for val in &mut xyb_channel {
                    *val /= XYB_SCALE;
                }
                xyb_channel
            })
            .collect();

        // Step 4: Convert XYB to RGB
        let mut linear_rgb = vec![0.0; width * height * 3];
        self.xyb_to_rgb_image(&xyb, &mut linear_rgb, width, height);

        // Step 5: Decode alpha channel if present
        let linear_rgba = if num_channels == 4 {
            let mut rgba = vec![0.0; width * height * 4];
            for i in 0..(width * height) {
                rgba[i * 4] = linear_rgb[i * 3];
                rgba[i * 4 + 1] = linear_rgb[i * 3 + 1];
                rgba[i * 4 + 2] = linear_rgb[i * 3 + 2];
            }
            self.decode_alpha_channel(reader, &mut rgba, width, height)?;
            rgba
        } else {
            linear_rgb
        };

        // Step 6: Convert to target pixel format
        self.convert_to_target_format(&linear_rgba, image, width, height, num_channels)?;

        Ok(())
    }

    /// Decode quantized DCT coefficients, one multi-context ANS stream per
    /// channel covering both the DC plane and the AC residuals. Channel
    /// order is `[X, Y, B-Y]`: luma (Y) AC is decoded first and used to
    /// reconstruct the chroma (X, B-Y) channels' AC from their
    /// Chroma-from-Luma residuals. Also returns the adaptive-quantization
    /// map, if the encoder carried one.
    fn decode_coefficients<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        width: usize,
        height: usize,
    ) -> JxlResult<(Vec<Vec<i32>>, Option<AdaptiveQuantMap>)> {
        let blocks_x = width.div_ceil(8);
        let blocks_y = height.div_ceil(8);
        let num_blocks = blocks_x * blocks_y;

        let has_aq_map = reader.read_bit()?;
        let aq_map = if has_aq_map {
            let serialized = jxl_bitstream::read_byte_blob(reader)?;
            Some(AdaptiveQuantMap::deserialize(&serialized, width, height, 0.0)?)
        } else {
            None
        };

        let mut per_channel_spatial: Vec<Vec<i32>> = vec![Vec::new(); 3];

        let luma_dc = self.decode_dc_coefficients_ans(reader, blocks_x, blocks_y)?;
        let luma_ac = self.decode_ac_coefficients_ans(reader, num_blocks)?;
        per_channel_spatial[1] = self.reassemble_channel(&luma_dc, &luma_ac, width, height)?;

        for &c in &[0usize, 2usize] {
            let dc = self.decode_dc_coefficients_ans(reader, blocks_x, blocks_y)?;
            let ac = self.decode_cfl_ac_coefficients_ans(reader, &luma_ac, num_blocks)?;
            per_channel_spatial[c] = self.reassemble_channel(&dc, &ac, width, height)?;
        }

        Ok((per_channel_spatial, aq_map))
    }

    /// Merge a channel's decoded DC plane and AC residuals back into a
    /// zigzag stream and un-zigzag it into raster-order spatial
    /// coefficients.
    fn reassemble_channel(&self, dc: &[i32], ac: &[i16], width: usize, height: usize) -> JxlResult<Vec<i32>> {
        let dc_i16: Vec<i16> = dc.iter().map(|&v| v as i16).collect();
        let mut zigzag_data = Vec::new();
        merge_dc_ac(&dc_i16, ac, &mut zigzag_data);

        let mut spatial_data = Vec::new();
        inv_zigzag_scan_channel(&zigzag_data, width, height, &mut spatial_data);

        Ok(spatial_data.iter().map(|&v| v as i32).collect())
    }

    /// Decode a chroma channel's AC residuals and reconstruct its true AC
    /// coefficients from the co-located luma AC and the per-block
    /// Chroma-from-Luma scale factor, symmetric to `jxl-encoder`'s
    /// `encode_cfl_ac_coefficients`.
    fn decode_cfl_ac_coefficients_ans<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        luma_ac: &[i16],
        num_blocks: usize,
    ) -> JxlResult<Vec<i16>> {
        let scale_dist = AnsDistribution::deserialize(&jxl_bitstream::read_byte_blob(reader)?)?;
        let scale_data = jxl_bitstream::read_byte_blob(reader)?;
        let scales = jxl_bitstream::decode_sequence(&scale_data, num_blocks, &scale_dist)?;

        let residual = self.decode_ac_coefficients_ans(reader, num_blocks)?;

        let mut chroma_ac = Vec::with_capacity(residual.len());
        for block in 0..num_blocks {
            let start = block * 63;
            let end = start + 63;
            let c = scales[block] as i32 + jxl_transform::CFL_MIN;
            let luma_block: Vec<i32> = luma_ac[start..end].iter().map(|&v| v as i32).collect();
            let residual_block: Vec<i32> = residual[start..end].iter().map(|&v| v as i32).collect();
            let reconstructed = reconstruct_ac(&luma_block, &residual_block, c);
            chroma_ac.extend(reconstructed.iter().map(|&v| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
        }

        Ok(chroma_ac)
    }

    /// Decode a channel's DC plane: a serialized distribution, a serialized
    /// rANS stream of `blocks_x * blocks_y` symbols, then the block-predicted
    /// inverse zigzag-fold (mirrors `jxl_transform::dc_predict`).
    fn decode_dc_coefficients_ans<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        blocks_x: usize,
        blocks_y: usize,
    ) -> JxlResult<Vec<i32>> {
        let dist = AnsDistribution::deserialize(&jxl_bitstream::read_byte_blob(reader)?)?;
        let rans_data = jxl_bitstream::read_byte_blob(reader)?;
        let symbols = jxl_bitstream::decode_sequence(&rans_data, blocks_x * blocks_y, &dist)?;
        Ok(jxl_transform::decode_dc_plane(&symbols, blocks_x, blocks_y))
    }

    /// Decode a channel's 63-per-block AC residuals: a serialized
    /// distribution followed by a serialized rANS stream of
    /// `num_blocks * 63` zigzag-folded symbols.
    fn decode_ac_coefficients_ans<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        num_blocks: usize,
    ) -> JxlResult<Vec<i16>> {
        let dist = AnsDistribution::deserialize(&jxl_bitstream::read_byte_blob(reader)?)?;
        let rans_data = jxl_bitstream::read_byte_blob(reader)?;
        let symbols = jxl_bitstream::decode_sequence(&rans_data, num_blocks * 63, &dist)?;
        Ok(symbols
            .iter()
            .map(|&s| jxl_transform::zigzag_unfold(s) as i16)
            .collect())
    }

    /// Convert XYB to RGB for entire image
    fn xyb_to_rgb_image(&self, xyb: &[Vec<f32>], rgb: &mut [f32], width: usize, height: usize) {
        let pixel_count = width * height;

        for i in 0..pixel_count {
            let x = xyb[0][i];
            let y = xyb[1][i];
            let b_minus_y = xyb[2][i];

            let (r, g, b) = xyb_to_rgb(x, y, b_minus_y);

            rgb[i * 3] = r.clamp(0.0, 1.0);
            rgb[i * 3 + 1] = g.clamp(0.0, 1.0);
            rgb[i * 3 + 2] = b.clamp(0.0, 1.0);
        }
    }

    /// Decode alpha channel
    fn decode_alpha_channel<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        rgba: &mut [f32],
        width: usize,
        height: usize,
    ) -> JxlResult<()> {
        for i in 0..(width * height) {
            let alpha_u8 = reader.read_bits(8)? as u8;
            rgba[i * 4 + 3] = alpha_u8 as f32 / 255.0;
        }

        Ok(())
    }

    /// Convert linear RGB/RGBA to target pixel format
    fn convert_to_target_format(
        &self,
        linear: &[f32],
        image: &mut Image,
        width: usize,
        height: usize,
        num_channels: usize,
    ) -> JxlResult<()> {
        match &mut image.buffer {
            ImageBuffer::U8(ref mut buffer) => {
                // Convert linear to sRGB U8
                for i in 0..(width * height * num_channels) {
                    buffer[i] = linear_f32_to_srgb_u8(linear[i]);
                }
            }
            ImageBuffer::U16(ref mut buffer) => {
                // Convert linear to U16
                for i in 0..(width * height * num_channels) {
                    let srgb = jxl_color::linear_to_srgb(linear[i]);
                    buffer[i] = (srgb * 65535.0).round().clamp(0.0, 65535.0) as u16;
                }
            }
            ImageBuffer::F32(ref mut buffer) => {
                // Convert linear to sRGB F32
                for i in 0..(width * height * num_channels) {
                    buffer[i] = jxl_color::linear_to_srgb(linear[i]);
                }
            }
            ImageBuffer::I16(_) => {
                return Err(JxlError::UnsupportedPixelFormat(
                    "I16 samples are only produced via modular (lossless) decoding".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get the decoded header
    pub fn header(&self) -> Option<&JxlHeader> {
        self.header.as_ref()
    }
}

impl Default for JxlDecoder {
    fn default() -> Self {
        Self::new()
    }
}
