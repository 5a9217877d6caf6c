//! Loading source maps from disk.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use thiserror::Error;

use crate::naming::MapRole;

/// A decoded source map with 8 bits per channel, interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// Channels per pixel (1 = gray, 2 = gray+alpha, 3 = RGB, 4 = RGBA).
    pub channels: u8,
    pub pixels: Vec<u8>,
    pub path: PathBuf,
    pub role: MapRole,
}

impl SourceImage {
    /// Build a source from raw interleaved 8-bit pixels.
    pub fn from_raw(
        role: MapRole,
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
            path: path.into(),
            role,
        }
    }

    fn from_dynamic(role: MapRole, path: &Path, image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, pixels) = match image.color().channel_count() {
            1 => (1, image.into_luma8().into_raw()),
            2 => (2, image.into_luma_alpha8().into_raw()),
            3 => (3, image.into_rgb8().into_raw()),
            _ => (4, image.into_rgba8().into_raw()),
        };
        Self::from_raw(role, path, width, height, channels, pixels)
    }
}

/// A present file that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),
}

/// Result of looking up one role's file.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file existed and decoded.
    Loaded(SourceImage),
    /// No file at the derived path.
    Missing,
    /// The file existed but could not be decoded; the role is treated as absent.
    DecodeFailed(DecodeError),
}

impl LoadOutcome {
    /// The loaded image, if any.
    pub fn into_image(self) -> Option<SourceImage> {
        match self {
            LoadOutcome::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

/// Load the map for `role` at `path`.
///
/// Absence is not an error. The container format is sniffed from the file
/// contents, falling back to the extension. No decoder allocation limit is
/// applied, so large maps load as long as memory allows.
pub fn load_source(path: &Path, role: MapRole) -> LoadOutcome {
    if !path.exists() {
        log::debug!("no {} map at {}", role, path.display());
        return LoadOutcome::Missing;
    }

    match decode(path) {
        Ok(image) => {
            let source = SourceImage::from_dynamic(role, path, image);
            log::debug!(
                "loaded {} map {} ({}x{}, {} channel(s))",
                role,
                path.display(),
                source.width,
                source.height,
                source.channels
            );
            LoadOutcome::Loaded(source)
        }
        Err(e) => {
            log::warn!("could not read image {}: {}", path.display(), e);
            LoadOutcome::DecodeFailed(e)
        }
    }
}

fn decode(path: &Path) -> Result<DynamicImage, DecodeError> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    Ok(reader.decode()?)
}
