//! Validation of loaded source maps.
//!
//! Every participating map must share the first loaded map's width, height
//! and channel count, and that channel count must be 1, 2 or 3.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceImage;

/// Smallest accepted channel count.
pub const MIN_CHANNELS: u8 = 1;
/// Largest accepted channel count.
pub const MAX_CHANNELS: u8 = 3;

/// Which property of a source map disagrees with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    Width,
    Height,
    ChannelCount,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MismatchKind::Width => "width",
            MismatchKind::Height => "height",
            MismatchKind::ChannelCount => "channel count",
        })
    }
}

/// One property of one map that differs from the first loaded map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub kind: MismatchKind,
    pub found: u32,
    pub expected: u32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image {} has wrong {}: {} vs {}",
            self.path.display(),
            self.kind,
            self.found,
            self.expected
        )
    }
}

/// Terminal validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no images: none of the AO, roughness or metalness maps could be loaded")]
    NoInput,

    #[error("image channels must be 1, 2, or 3. Got: {0}")]
    ChannelRange(u8),

    #[error("{} source image mismatch(es):\n{}", .0.len(), format_mismatches(.0))]
    DimensionMismatch(Vec<Mismatch>),
}

fn format_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Common shape of all validated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// Check that `sources` can be packed together.
///
/// The first entry is the reference. All mismatches are collected before
/// failing.
pub fn validate_sources(sources: &[SourceImage]) -> Result<Dimensions, ValidationError> {
    let first = sources.first().ok_or(ValidationError::NoInput)?;

    if !(MIN_CHANNELS..=MAX_CHANNELS).contains(&first.channels) {
        return Err(ValidationError::ChannelRange(first.channels));
    }

    let mut mismatches = Vec::new();
    for image in &sources[1..] {
        let checks = [
            (MismatchKind::Width, image.width, first.width),
            (MismatchKind::Height, image.height, first.height),
            (
                MismatchKind::ChannelCount,
                u32::from(image.channels),
                u32::from(first.channels),
            ),
        ];
        for (kind, found, expected) in checks {
            if found != expected {
                mismatches.push(Mismatch {
                    path: image.path.clone(),
                    kind,
                    found,
                    expected,
                });
            }
        }
    }

    if !mismatches.is_empty() {
        return Err(ValidationError::DimensionMismatch(mismatches));
    }

    Ok(Dimensions {
        width: first.width,
        height: first.height,
        channels: first.channels,
    })
}
