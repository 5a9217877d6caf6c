//! Output encoding.
//!
//! PNG output uses fixed compression settings so the same composite always
//! produces byte-identical files. JPEG output uses a fixed quality of 99.
//! The whole file is encoded in memory and written in one call, so a failed
//! encode never leaves a partial file behind.

use std::io::Write;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::naming::OutputFormat;
use crate::packing::CompositeBuffer;

/// JPEG quality used for every JPEG output.
pub const JPEG_QUALITY: u8 = 99;

/// Errors from encoding or writing the packed texture.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("JPEG encoding error: {0}")]
    Jpeg(#[from] image::ImageError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Create config optimized for file size.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

/// A packed texture that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Size of the written file in bytes.
    pub size: u64,
    /// BLAKE3 hash of the written bytes, hex encoded.
    pub hash: String,
}

/// Write the composite as 8-bit RGB PNG to any writer.
pub fn write_png_to_writer<W: Write>(
    buffer: &CompositeBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), EncodeError> {
    check_dimensions(buffer)?;

    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(buffer.data())?;
    png_writer.finish()?;

    Ok(())
}

/// Write the composite as RGB JPEG at [`JPEG_QUALITY`] to any writer.
pub fn write_jpeg_to_writer<W: Write>(buffer: &CompositeBuffer, mut writer: W) -> Result<(), EncodeError> {
    check_dimensions(buffer)?;

    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.encode(
        buffer.data(),
        buffer.width,
        buffer.height,
        ExtendedColorType::Rgb8,
    )?;
    writer.flush()?;

    Ok(())
}

/// Encode the composite in `format` into memory.
pub fn encode_to_vec(
    buffer: &CompositeBuffer,
    format: OutputFormat,
    config: &PngConfig,
) -> Result<Vec<u8>, EncodeError> {
    let mut data = Vec::new();
    match format {
        OutputFormat::Png => write_png_to_writer(buffer, &mut data, config)?,
        OutputFormat::Jpg => write_jpeg_to_writer(buffer, &mut data)?,
    }
    Ok(data)
}

/// Encode the composite and write it to `path`.
pub fn write_composite(
    buffer: &CompositeBuffer,
    path: &Path,
    format: OutputFormat,
    config: &PngConfig,
) -> Result<WrittenFile, EncodeError> {
    let data = encode_to_vec(buffer, format, config)?;
    std::fs::write(path, &data)?;

    let size = std::fs::metadata(path)?.len();
    log::debug!("wrote {} bytes to {}", size, path.display());

    Ok(WrittenFile {
        size,
        hash: hash_bytes(&data),
    })
}

/// Compute the BLAKE3 hash of encoded data.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

fn check_dimensions(buffer: &CompositeBuffer) -> Result<(), EncodeError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(EncodeError::InvalidDimensions(format!(
            "{}x{} image cannot be encoded",
            buffer.width, buffer.height
        )));
    }
    Ok(())
}
