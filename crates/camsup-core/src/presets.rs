//! Flat preset-dataset extractors for wb_presets.json and noiseprofiles.json
//!
//! Both datasets share the same shape (makers, each with a model list) and
//! the same merge rule: they can introduce a camera as `Unknown` but can
//! never assert a real decoding path, so an existing decoder is left alone.

use crate::error::{Error, Result};
use crate::registry::{CameraKey, Decoder, Registry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MakerEntry {
    maker: String,
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    model: String,
}

#[derive(Debug, Deserialize)]
struct WbPresetsFile {
    wb_presets: Vec<MakerEntry>,
}

#[derive(Debug, Deserialize)]
struct NoiseProfilesFile {
    noiseprofiles: Vec<MakerEntry>,
}

/// Which record boolean a preset dataset contributes
#[derive(Debug, Clone, Copy)]
enum PresetKind {
    WbPresets,
    NoiseProfiles,
}

impl PresetKind {
    fn source_name(self) -> &'static str {
        match self {
            PresetKind::WbPresets => "wb_presets.json",
            PresetKind::NoiseProfiles => "noiseprofiles.json",
        }
    }
}

/// Fold the white-balance preset dataset into the registry
pub fn load_wb_presets(registry: &mut Registry, data: &[u8]) -> Result<()> {
    let kind = PresetKind::WbPresets;
    let file: WbPresetsFile = serde_json::from_slice(data).map_err(|e| Error::Json {
        source_name: kind.source_name().to_string(),
        source: e,
    })?;
    fold(registry, &file.wb_presets, kind);
    Ok(())
}

/// Fold the noise-profile dataset into the registry
pub fn load_noise_profiles(registry: &mut Registry, data: &[u8]) -> Result<()> {
    let kind = PresetKind::NoiseProfiles;
    let file: NoiseProfilesFile = serde_json::from_slice(data).map_err(|e| Error::Json {
        source_name: kind.source_name().to_string(),
        source: e,
    })?;
    fold(registry, &file.noiseprofiles, kind);
    Ok(())
}

fn fold(registry: &mut Registry, makers: &[MakerEntry], kind: PresetKind) {
    for maker in makers {
        for model in &maker.models {
            let key = CameraKey::new(&maker.maker, &model.model);
            let is_new = registry.get(&key).is_none();

            let record = registry.upsert(&maker.maker, &model.model);
            if is_new {
                // Camera isn't present in cameras.xml or imageio_libraw.c
                record.decoder = Decoder::Unknown;
                record.add_debug(&format!("Source: {}", kind.source_name()));
            } else if record.decoder == Decoder::Unset {
                record.add_debug(&format!("{}: No decoder", kind.source_name()));
            }

            match kind {
                PresetKind::WbPresets => record.wb_presets = true,
                PresetKind::NoiseProfiles => record.noise_profiles = true,
            }
        }
    }
}
