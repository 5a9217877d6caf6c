//! Sibling file naming.
//!
//! A material folder holds its maps side by side, named after a shared stem:
//!
//! ```text
//! Metal007_2K_Color.jpg
//! Metal007_2K_AmbientOcclusion.jpg
//! Metal007_2K_Roughness.jpg
//! Metal007_2K_Metalness.jpg
//! ```
//!
//! Given the `_Color` file, the other maps and the packed `_ORM` output are
//! found by replacing the marker in the file name. The substitution works on
//! the raw file name bytes, so names that are not valid UTF-8 keep their
//! bytes on Unix.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Marker substring that identifies the base color map.
pub const COLOR_MARKER: &str = "_Color";

/// Marker substituted into the output file name.
pub const ORM_MARKER: &str = "_ORM";

/// The role a source map plays in the packed texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapRole {
    /// Ambient occlusion, packed into red.
    AmbientOcclusion,
    /// Roughness, packed into green.
    Roughness,
    /// Metallicity, packed into blue.
    Metallicity,
}

impl MapRole {
    /// All roles in load order.
    pub const ALL: [MapRole; 3] = [
        MapRole::AmbientOcclusion,
        MapRole::Roughness,
        MapRole::Metallicity,
    ];

    /// File name marker that replaces `_Color` for this role.
    pub fn marker(self) -> &'static str {
        match self {
            MapRole::AmbientOcclusion => "_AmbientOcclusion",
            MapRole::Roughness => "_Roughness",
            MapRole::Metallicity => "_Metalness",
        }
    }

    /// Destination channel index in the packed texture.
    pub fn channel_index(self) -> usize {
        match self {
            MapRole::AmbientOcclusion => 0,
            MapRole::Roughness => 1,
            MapRole::Metallicity => 2,
        }
    }

    /// Short lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            MapRole::AmbientOcclusion => "ao",
            MapRole::Roughness => "roughness",
            MapRole::Metallicity => "metalness",
        }
    }
}

impl fmt::Display for MapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container format of the packed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless 8-bit RGB PNG.
    Png,
    /// Baseline JPEG at a fixed high quality.
    Jpg,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Unsupported output format token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("output format must be either jpg or png, got '{0}'")]
pub struct FormatError(pub String);

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(OutputFormat::Png),
            "jpg" => Ok(OutputFormat::Jpg),
            other => Err(FormatError(other.to_string())),
        }
    }
}

/// Every path derived from one `_Color` base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingPaths {
    pub ambient_occlusion: PathBuf,
    pub roughness: PathBuf,
    pub metalness: PathBuf,
    pub output: PathBuf,
    /// False when the base file name had no `_Color` marker, in which case
    /// every source path equals the base path.
    pub has_color_marker: bool,
}

impl SiblingPaths {
    /// Derive sibling and output paths for `base`.
    pub fn derive(base: &Path, format: OutputFormat) -> Self {
        let file_name = base
            .file_name()
            .map(OsStr::as_encoded_bytes)
            .unwrap_or_default();
        let has_color_marker = find_marker(file_name).is_some();

        let sibling = |marker: &str| base.with_file_name(os_string(replace_marker(file_name, marker)));

        let orm_name = replace_extension(&replace_marker(file_name, ORM_MARKER), format.extension());

        Self {
            ambient_occlusion: sibling(MapRole::AmbientOcclusion.marker()),
            roughness: sibling(MapRole::Roughness.marker()),
            metalness: sibling(MapRole::Metallicity.marker()),
            output: base.with_file_name(os_string(orm_name)),
            has_color_marker,
        }
    }

    /// Source path for a role.
    pub fn source(&self, role: MapRole) -> &Path {
        match role {
            MapRole::AmbientOcclusion => &self.ambient_occlusion,
            MapRole::Roughness => &self.roughness,
            MapRole::Metallicity => &self.metalness,
        }
    }
}

fn find_marker(name: &[u8]) -> Option<usize> {
    let marker = COLOR_MARKER.as_bytes();
    name.windows(marker.len()).position(|w| w == marker)
}

/// Replace the first `_Color` in `name`; a name without it is returned as is.
fn replace_marker(name: &[u8], marker: &str) -> Vec<u8> {
    match find_marker(name) {
        Some(idx) => [&name[..idx], marker.as_bytes(), &name[idx + COLOR_MARKER.len()..]].concat(),
        None => name.to_vec(),
    }
}

/// Swap everything after the last dot for `ext`, or append it if there is no dot.
fn replace_extension(name: &[u8], ext: &str) -> Vec<u8> {
    let stem = match name.iter().rposition(|&b| b == b'.') {
        Some(idx) => &name[..idx],
        None => name,
    };
    [stem, b".".as_slice(), ext.as_bytes()].concat()
}

#[cfg(unix)]
fn os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

// Only ASCII markers are spliced in, so valid names stay valid; names that
// were not valid Unicode are converted lossily here.
#[cfg(not(unix))]
fn os_string(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_jpg_base_png_output() {
        let paths = SiblingPaths::derive(Path::new("dir/Mat_Color.jpg"), OutputFormat::Png);

        assert_eq!(paths.ambient_occlusion, PathBuf::from("dir/Mat_AmbientOcclusion.jpg"));
        assert_eq!(paths.roughness, PathBuf::from("dir/Mat_Roughness.jpg"));
        assert_eq!(paths.metalness, PathBuf::from("dir/Mat_Metalness.jpg"));
        assert_eq!(paths.output, PathBuf::from("dir/Mat_ORM.png"));
        assert!(paths.has_color_marker);
    }

    #[test]
    fn test_derive_keeps_source_extension() {
        let paths = SiblingPaths::derive(Path::new("a/b/Tiles_2K-PNG_Color.png"), OutputFormat::Jpg);

        assert_eq!(paths.roughness, PathBuf::from("a/b/Tiles_2K-PNG_Roughness.png"));
        assert_eq!(paths.output, PathBuf::from("a/b/Tiles_2K-PNG_ORM.jpg"));
    }

    #[test]
    fn test_derive_without_directory() {
        let paths = SiblingPaths::derive(Path::new("Mat_Color.jpg"), OutputFormat::Png);

        assert_eq!(paths.metalness, PathBuf::from("Mat_Metalness.jpg"));
        assert_eq!(paths.output, PathBuf::from("Mat_ORM.png"));
    }

    #[test]
    fn test_only_first_marker_is_replaced() {
        let paths = SiblingPaths::derive(Path::new("x_Color_Color.png"), OutputFormat::Png);

        assert_eq!(paths.ambient_occlusion, PathBuf::from("x_AmbientOcclusion_Color.png"));
        assert_eq!(paths.output, PathBuf::from("x_ORM_Color.png"));
    }

    #[test]
    fn test_missing_marker_is_a_noop() {
        let base = Path::new("dir/Mat_Albedo.png");
        let paths = SiblingPaths::derive(base, OutputFormat::Jpg);

        assert!(!paths.has_color_marker);
        assert_eq!(paths.ambient_occlusion, base);
        assert_eq!(paths.roughness, base);
        assert_eq!(paths.metalness, base);
        assert_eq!(paths.output, PathBuf::from("dir/Mat_Albedo.jpg"));
    }

    #[test]
    fn test_extension_appended_when_absent() {
        let paths = SiblingPaths::derive(Path::new("dir/Mat_Color"), OutputFormat::Png);

        assert_eq!(paths.roughness, PathBuf::from("dir/Mat_Roughness"));
        assert_eq!(paths.output, PathBuf::from("dir/Mat_ORM.png"));
    }

    #[test]
    fn test_only_last_dot_is_the_extension() {
        let paths = SiblingPaths::derive(Path::new("v1.2_Color.tex.jpg"), OutputFormat::Png);
        assert_eq!(paths.output, PathBuf::from("v1.2_ORM.tex.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_derive_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let base = Path::new(OsStr::from_bytes(b"dir/Mat\xff_Color.png"));
        let paths = SiblingPaths::derive(base, OutputFormat::Jpg);

        assert!(paths.has_color_marker);
        assert_eq!(
            paths.roughness.as_os_str().as_bytes(),
            b"dir/Mat\xff_Roughness.png".as_slice()
        );
        assert_eq!(
            paths.output.as_os_str().as_bytes(),
            b"dir/Mat\xff_ORM.jpg".as_slice()
        );
    }

    #[test]
    fn test_source_lookup_by_role() {
        let paths = SiblingPaths::derive(Path::new("m_Color.png"), OutputFormat::Png);
        for role in MapRole::ALL {
            let name = paths.source(role).to_string_lossy().into_owned();
            assert!(name.contains(role.marker()), "{} should contain {}", name, role.marker());
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("jpg".parse::<OutputFormat>(), Ok(OutputFormat::Jpg));
        assert_eq!("jpeg".parse::<OutputFormat>(), Err(FormatError("jpeg".to_string())));
        assert!("PNG".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_error_message() {
        let err = FormatError("tga".to_string());
        assert!(err.to_string().contains("jpg or png"));
        assert!(err.to_string().contains("tga"));
    }

    #[test]
    fn test_role_channel_indices() {
        assert_eq!(MapRole::AmbientOcclusion.channel_index(), 0);
        assert_eq!(MapRole::Roughness.channel_index(), 1);
        assert_eq!(MapRole::Metallicity.channel_index(), 2);
    }
}
