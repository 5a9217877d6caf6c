//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag so scripts and asset pipelines can
//! consume the result of a packing run without scraping colored text.

use serde::{Deserialize, Serialize};

use ormpack_texture::{ComposeError, ComposeWarning, PackingError, SourceReport, SourceStatus, ValidationError};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Output format token is not `jpg` or `png`
    pub const UNSUPPORTED_FORMAT: &str = "ORM_001";
    /// None of the sibling maps could be loaded
    pub const NO_INPUT: &str = "ORM_002";
    /// First loaded map has a channel count outside 1..=3
    pub const CHANNEL_RANGE: &str = "ORM_003";
    /// A map disagrees with the first map in width, height or channels
    pub const DIMENSION_MISMATCH: &str = "ORM_004";
    /// Output buffer could not be allocated
    pub const ALLOCATION: &str = "ORM_005";
    /// Output could not be encoded or written
    pub const ENCODE: &str = "ORM_006";
    /// A loaded map does not fit the output buffer it is packed into
    pub const SOURCE_SHAPE: &str = "ORM_007";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// A sibling map exists but could not be decoded
    pub const DECODE_FAILED: &str = "ORM_W001";
    /// Input file name has no `_Color` marker
    pub const MISSING_COLOR_MARKER: &str = "ORM_W002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "ORM_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Suggestion for fixing the error (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            suggestion: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Convert a pipeline error into one or more JSON errors.
    ///
    /// A dimension mismatch yields one entry per mismatching property.
    pub fn from_compose_error(err: &ComposeError) -> Vec<Self> {
        match err {
            ComposeError::Validation(ValidationError::NoInput) => vec![JsonError::new(
                error_codes::NO_INPUT,
                err.to_string(),
            )
            .with_suggestion(
                "Place _AmbientOcclusion, _Roughness or _Metalness maps next to the _Color file",
            )],
            ComposeError::Validation(ValidationError::ChannelRange(_)) => {
                vec![JsonError::new(error_codes::CHANNEL_RANGE, err.to_string())]
            }
            ComposeError::Validation(ValidationError::DimensionMismatch(mismatches)) => mismatches
                .iter()
                .map(|m| {
                    JsonError::new(error_codes::DIMENSION_MISMATCH, m.to_string())
                        .with_file(m.path.display().to_string())
                })
                .collect(),
            ComposeError::Packing(PackingError::Allocation { .. }) => {
                vec![JsonError::new(error_codes::ALLOCATION, err.to_string())]
            }
            ComposeError::Packing(PackingError::SourceShape { path, .. }) => vec![JsonError::new(
                error_codes::SOURCE_SHAPE,
                err.to_string(),
            )
            .with_file(path.display().to_string())],
            ComposeError::Encode { path, .. } => vec![JsonError::new(
                error_codes::ENCODE,
                err.to_string(),
            )
            .with_file(path.display().to_string())],
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "ORM_W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// File the warning refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this warning.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&ComposeWarning> for JsonWarning {
    fn from(warning: &ComposeWarning) -> Self {
        let (code, path) = match warning {
            ComposeWarning::DecodeFailed { path, .. } => (warning_codes::DECODE_FAILED, path),
            ComposeWarning::MissingColorMarker { path } => {
                (warning_codes::MISSING_COLOR_MARKER, path)
            }
        };
        JsonWarning::new(code, warning.to_string()).with_file(path.display().to_string())
    }
}

/// One role's source map in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonSource {
    /// Role name (`ao`, `roughness`, `metalness`)
    pub role: String,
    /// Derived path of the map
    pub path: String,
    /// `loaded`, `missing` or `decode_failed`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
}

impl From<&SourceReport> for JsonSource {
    fn from(report: &SourceReport) -> Self {
        let mut entry = JsonSource {
            role: report.role.as_str().to_string(),
            path: report.path.display().to_string(),
            status: String::new(),
            width: None,
            height: None,
            channels: None,
        };
        match &report.status {
            SourceStatus::Loaded {
                width,
                height,
                channels,
            } => {
                entry.status = "loaded".to_string();
                entry.width = Some(*width);
                entry.height = Some(*height);
                entry.channels = Some(*channels);
            }
            SourceStatus::Missing => entry.status = "missing".to_string(),
            SourceStatus::DecodeFailed { .. } => entry.status = "decode_failed".to_string(),
        }
        entry
    }
}

/// Details of the written ORM texture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackResult {
    /// Path of the written file
    pub output_path: String,
    /// `png` or `jpg`
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Size of the written file in bytes
    pub file_size: u64,
    /// BLAKE3 hash of the written file
    pub hash: String,
}

/// JSON output for a packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOutput {
    /// Whether an ORM texture was written
    pub success: bool,
    /// Errors that aborted the run
    pub errors: Vec<JsonError>,
    /// Non-fatal problems
    pub warnings: Vec<JsonWarning>,
    /// Per-role source lookup
    pub sources: Vec<JsonSource>,
    /// The written texture (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PackResult>,
}

impl PackOutput {
    /// Creates a successful pack output.
    pub fn success(result: PackResult, sources: Vec<JsonSource>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            sources,
            result: Some(result),
        }
    }

    /// Creates a failed pack output.
    pub fn failure(errors: Vec<JsonError>, sources: Vec<JsonSource>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            sources,
            result: None,
        }
    }
}
