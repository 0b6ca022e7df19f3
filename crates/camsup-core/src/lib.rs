//! camsup-core: Core library for the camera support table generator
//!
//! This library provides functionality to:
//! - Extract partial camera facts from the four upstream dataset formats
//!   (RawSpeed's cameras.xml, darktable's imageio_libraw.c, the wb_presets
//!   and noiseprofiles JSON files, and the rawspeed-dng CSV overlay)
//! - Merge them into one registry keyed by normalized camera identity,
//!   applying the fixed source-precedence rules
//! - Compute aggregate statistics over the merged registry
//! - Render the registry as a Markdown or tab-separated table

pub mod error;
pub mod libraw;
pub mod overlay;
pub mod pipeline;
pub mod presets;
pub mod rawspeed;
pub mod registry;
pub mod render;
pub mod stats;

pub use error::{Error, Result};
pub use pipeline::{build_registry, MergeOptions, SourceSet};
pub use registry::{CameraKey, CameraRecord, Decoder, Registry};
pub use render::{render, Field, HeaderTemplates, OutputFormat, RenderOptions};
pub use stats::{generate as generate_stats, Stats};
