//! The merge pipeline: runs every extractor against the shared registry in
//! the fixed precedence order.
//!
//! Order is the precedence contract: cameras.xml seeds the registry, the
//! LibRaw map overrides decoders for its entries, the preset datasets may
//! introduce `Unknown` cameras but never touch a real decoder, and the
//! overlay upgrades already-known cameras last.

use crate::error::Result;
use crate::registry::Registry;
use crate::{libraw, overlay, presets, rawspeed};

/// One raw byte payload per logical source, already retrieved by the caller
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    /// cameras.xml
    pub rawspeed: Vec<u8>,
    /// imageio_libraw.c; `None` disables the LibRaw pass entirely
    pub libraw: Option<Vec<u8>>,
    /// wb_presets.json
    pub wb_presets: Vec<u8>,
    /// noiseprofiles.json
    pub noise_profiles: Vec<u8>,
    /// rawspeed-dng.csv
    pub overlay: Vec<u8>,
}

/// Include/exclude flags shared by the pipeline, statistics and renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Keep cameras with a non-empty RawSpeed support status
    pub include_unsupported: bool,
    /// Count and render cameras only known through preset datasets
    pub include_unknown: bool,
}

/// Build the merged registry from the source payloads
pub fn build_registry(sources: &SourceSet, options: MergeOptions) -> Result<Registry> {
    let mut registry = Registry::new();

    rawspeed::load(&mut registry, &sources.rawspeed, options.include_unsupported)?;

    if let Some(ref libraw_data) = sources.libraw {
        libraw::load(&mut registry, libraw_data)?;
    }

    presets::load_wb_presets(&mut registry, &sources.wb_presets)?;
    presets::load_noise_profiles(&mut registry, &sources.noise_profiles)?;

    overlay::load(&mut registry, &sources.overlay)?;

    Ok(registry)
}
