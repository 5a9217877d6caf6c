//! The ORM compositing pipeline: derive paths, load, validate, pack, encode.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encode::{write_composite, EncodeError, PngConfig};
use crate::naming::{MapRole, OutputFormat, SiblingPaths, COLOR_MARKER};
use crate::packing::{pack_orm, PackingError, OUTPUT_CHANNELS};
use crate::source::{load_source, LoadOutcome, SourceImage};
use crate::validate::{validate_sources, ValidationError};

/// Errors that abort compositing. Nothing is written when one is returned.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Packing(#[from] PackingError),

    #[error("failed writing ORM image to {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

/// Non-fatal problems found while compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeWarning {
    /// The base file name has no `_Color` marker, so every derived source
    /// path is the input path itself.
    MissingColorMarker { path: PathBuf },
    /// A sibling existed but could not be decoded; its channel stays zero.
    DecodeFailed { path: PathBuf, reason: String },
}

impl fmt::Display for ComposeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeWarning::MissingColorMarker { path } => write!(
                f,
                "file name of {} has no '{}' marker; every source path equals the input path",
                path.display(),
                COLOR_MARKER
            ),
            ComposeWarning::DecodeFailed { path, reason } => {
                write!(f, "could not read image {}, reason: {}", path.display(), reason)
            }
        }
    }
}

/// What happened to one role's source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded {
        width: u32,
        height: u32,
        channels: u8,
    },
    Missing,
    DecodeFailed {
        reason: String,
    },
}

/// One role's source path and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub role: MapRole,
    pub path: PathBuf,
    pub status: SourceStatus,
}

/// Summary of a written ORM texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeReport {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Size of the written file in bytes.
    pub file_size: u64,
    /// BLAKE3 hash of the written file.
    pub hash: String,
}

/// Inputs of one compositing run.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub base_path: PathBuf,
    pub format: OutputFormat,
    pub png: PngConfig,
}

impl ComposeRequest {
    pub fn new(base_path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            base_path: base_path.into(),
            format,
            png: PngConfig::default(),
        }
    }
}

/// Everything a run produced, whether or not it succeeded.
#[derive(Debug)]
pub struct ComposeOutcome {
    /// Per-role lookup results, in AO, roughness, metalness order.
    pub sources: Vec<SourceReport>,
    pub warnings: Vec<ComposeWarning>,
    pub result: Result<ComposeReport, ComposeError>,
}

/// Sources that were found, plus a per-role account of the lookup.
#[derive(Debug)]
pub struct LoadedSources {
    pub images: Vec<SourceImage>,
    pub reports: Vec<SourceReport>,
}

/// Load every role's sibling in AO, roughness, metalness order.
pub fn load_siblings(paths: &SiblingPaths) -> LoadedSources {
    let mut images = Vec::new();
    let mut reports = Vec::new();

    for role in MapRole::ALL {
        let path = paths.source(role);
        let status = match load_source(path, role) {
            LoadOutcome::Loaded(image) => {
                let status = SourceStatus::Loaded {
                    width: image.width,
                    height: image.height,
                    channels: image.channels,
                };
                images.push(image);
                status
            }
            LoadOutcome::Missing => SourceStatus::Missing,
            LoadOutcome::DecodeFailed(e) => SourceStatus::DecodeFailed {
                reason: e.to_string(),
            },
        };
        reports.push(SourceReport {
            role,
            path: path.to_path_buf(),
            status,
        });
    }

    LoadedSources { images, reports }
}

/// Run the whole pipeline, keeping the source lookup and warnings alongside
/// the result.
pub fn run_pipeline(request: &ComposeRequest) -> ComposeOutcome {
    let paths = SiblingPaths::derive(&request.base_path, request.format);
    log::debug!("derived output path {}", paths.output.display());

    let mut warnings = Vec::new();
    if !paths.has_color_marker {
        let warning = ComposeWarning::MissingColorMarker {
            path: request.base_path.clone(),
        };
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let LoadedSources { images, reports } = load_siblings(&paths);
    for report in &reports {
        if let SourceStatus::DecodeFailed { reason } = &report.status {
            warnings.push(ComposeWarning::DecodeFailed {
                path: report.path.clone(),
                reason: reason.clone(),
            });
        }
    }

    let result = pack_and_write(&paths, request, images);

    ComposeOutcome {
        sources: reports,
        warnings,
        result,
    }
}

/// Run the whole pipeline for `request`.
pub fn compose(request: &ComposeRequest) -> Result<ComposeReport, ComposeError> {
    run_pipeline(request).result
}

/// Convenience wrapper taking a base path and a format.
pub fn compose_path(base_path: &Path, format: OutputFormat) -> Result<ComposeReport, ComposeError> {
    compose(&ComposeRequest::new(base_path, format))
}

fn pack_and_write(
    paths: &SiblingPaths,
    request: &ComposeRequest,
    images: Vec<SourceImage>,
) -> Result<ComposeReport, ComposeError> {
    let dims = validate_sources(&images)?;
    let buffer = pack_orm(&images, dims)?;
    drop(images);

    let written = write_composite(&buffer, &paths.output, request.format, &request.png).map_err(
        |source| ComposeError::Encode {
            path: paths.output.clone(),
            source,
        },
    )?;

    Ok(ComposeReport {
        output_path: paths.output.clone(),
        format: request.format,
        width: dims.width,
        height: dims.height,
        channels: OUTPUT_CHANNELS as u8,
        file_size: written.size,
        hash: written.hash,
    })
}
