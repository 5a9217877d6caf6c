//! ORM Texture Compositing
//!
//! This crate packs the ambient occlusion, roughness and metalness maps of a
//! material into a single 3-channel "ORM" texture, the layout used by glTF
//! and most real-time PBR shaders:
//!
//! - **Red**: ambient occlusion
//! - **Green**: roughness
//! - **Blue**: metallicity
//!
//! Source maps are found next to a `_Color` map by name. Missing maps leave
//! their channel at zero; maps that disagree in size or channel count abort
//! the run before anything is written.
//!
//! # Example
//!
//! ```no_run
//! use ormpack_texture::{compose, ComposeRequest, OutputFormat};
//!
//! let request = ComposeRequest::new("materials/Metal007_Color.jpg", OutputFormat::Png);
//! let report = compose(&request).unwrap();
//! println!("wrote {}x{} to {}", report.width, report.height, report.output_path.display());
//! ```

pub mod compositor;
pub mod encode;
pub mod naming;
pub mod packing;
pub mod source;
pub mod validate;

// Re-export main types for convenience
pub use compositor::{
    compose, compose_path, run_pipeline, ComposeError, ComposeOutcome, ComposeReport, ComposeRequest,
    ComposeWarning, SourceReport, SourceStatus,
};
pub use encode::{EncodeError, PngConfig, WrittenFile, JPEG_QUALITY};
pub use naming::{FormatError, MapRole, OutputFormat, SiblingPaths};
pub use packing::{pack_orm, CompositeBuffer, PackingError};
pub use source::{load_source, DecodeError, LoadOutcome, SourceImage};
pub use validate::{validate_sources, Dimensions, Mismatch, MismatchKind, ValidationError};
