//! Channel packing of validated source maps into a single RGB texture.
//!
//! Each role owns one channel of the output:
//!
//! | channel | role |
//! |---|---|
//! | R (0) | ambient occlusion |
//! | G (1) | roughness |
//! | B (2) | metallicity |
//!
//! Roles without a loaded map leave their channel at zero. Only the first
//! channel of a multi-channel source is read.
//!
//! # Example
//!
//! ```
//! use ormpack_texture::naming::MapRole;
//! use ormpack_texture::packing::pack_orm;
//! use ormpack_texture::source::SourceImage;
//! use ormpack_texture::validate::validate_sources;
//!
//! let roughness = SourceImage::from_raw(MapRole::Roughness, "m_Roughness.png", 2, 1, 1, vec![7, 9]);
//! let sources = vec![roughness];
//! let dims = validate_sources(&sources).unwrap();
//! let packed = pack_orm(&sources, dims).unwrap();
//! assert_eq!(packed.data(), &[0, 7, 0, 0, 9, 0]);
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceImage;
use crate::validate::Dimensions;

/// Channels in the packed output.
pub const OUTPUT_CHANNELS: usize = 3;

/// Errors that can occur during channel packing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    /// The output buffer could not be allocated.
    #[error("could not allocate memory for a {width}x{height} ORM buffer")]
    Allocation { width: u32, height: u32 },

    /// A source's size or pixel data does not fit the buffer.
    #[error(
        "source map {} ({}x{}, {} channel(s), {} bytes) does not fit a {}x{} ORM buffer",
        .path.display(), .source_width, .source_height, .channels, .len, .width, .height
    )]
    SourceShape {
        path: PathBuf,
        source_width: u32,
        source_height: u32,
        channels: u8,
        len: usize,
        width: u32,
        height: u32,
    },
}

/// Packed `[AO, roughness, metallicity]` pixels, 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeBuffer {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl CompositeBuffer {
    /// Allocate a zeroed buffer of `width * height * 3` bytes.
    pub fn zeroed(width: u32, height: u32) -> Result<Self, PackingError> {
        let alloc_err = PackingError::Allocation { width, height };

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(OUTPUT_CHANNELS))
            .ok_or_else(|| alloc_err.clone())?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| alloc_err)?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Interleaved RGB bytes, row stride `width * 3`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one channel of one pixel.
    pub fn get(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.data[self.offset(x, y) + channel]
    }

    /// Extract a whole channel as a single-channel image.
    pub fn channel(&self, channel: usize) -> Vec<u8> {
        self.data
            .iter()
            .skip(channel)
            .step_by(OUTPUT_CHANNELS)
            .copied()
            .collect()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        OUTPUT_CHANNELS * (y as usize * self.width as usize + x as usize)
    }

    /// Copy the first channel of `source` into the channel owned by its role.
    ///
    /// The column index advances by the source's channel count, so a source
    /// with `n > 1` channels only fills every n-th column; the others keep
    /// their previous value. The source must match the buffer's size and hold
    /// at least `width * height * channels` bytes.
    pub fn copy_first_channel(&mut self, source: &SourceImage) -> Result<(), PackingError> {
        self.check_fits(source)?;

        let channel = source.role.channel_index();
        let n = usize::from(source.channels);
        let width = source.width as usize;

        for y in 0..source.height as usize {
            for x in (0..width).step_by(n) {
                let pixel = y * width + x;
                self.data[OUTPUT_CHANNELS * pixel + channel] = source.pixels[n * pixel];
            }
        }
        Ok(())
    }

    fn check_fits(&self, source: &SourceImage) -> Result<(), PackingError> {
        let needed = (source.width as usize)
            .checked_mul(source.height as usize)
            .and_then(|n| n.checked_mul(usize::from(source.channels)));

        let fits = source.channels > 0
            && source.width == self.width
            && source.height == self.height
            && needed.is_some_and(|n| source.pixels.len() >= n);

        if fits {
            Ok(())
        } else {
            Err(PackingError::SourceShape {
                path: source.path.clone(),
                source_width: source.width,
                source_height: source.height,
                channels: source.channels,
                len: source.pixels.len(),
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Pack validated sources into a new composite buffer.
///
/// `sources` should have passed [`validate_sources`](crate::validate::validate_sources)
/// and `dims` should be its result. A source that does not fit `dims` is
/// reported as [`PackingError::SourceShape`].
pub fn pack_orm(sources: &[SourceImage], dims: Dimensions) -> Result<CompositeBuffer, PackingError> {
    let mut buffer = CompositeBuffer::zeroed(dims.width, dims.height)?;

    for source in sources {
        log::debug!(
            "packing {} into channel {}",
            source.role,
            source.role.channel_index()
        );
        buffer.copy_first_channel(source)?;
    }

    Ok(buffer)
}
