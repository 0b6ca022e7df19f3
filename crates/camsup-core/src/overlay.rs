//! Overlay extractor for rawspeed-dng.csv
//!
//! The overlay dataset is a strict subset annotation: it upgrades cameras
//! that are already in the registry (typically DNG-only models that the
//! preset datasets introduced as `Unknown`) to RawSpeed support. A row whose
//! camera is absent from the registry is a fatal error, not a skip.

use crate::error::{Error, Result};
use crate::registry::{CameraKey, Decoder, Registry};

const SOURCE_NAME: &str = "rawspeed-dng.csv";

/// Fold the maker/model rows of the overlay dataset into the registry
pub fn load(registry: &mut Registry, data: &[u8]) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(data);

    for result in reader.records() {
        let record = result.map_err(|e| Error::Csv {
            source_name: SOURCE_NAME.to_string(),
            source: e,
        })?;

        let maker = record.get(0).unwrap_or_default();
        let model = record.get(1).unwrap_or_default();

        if maker == "Maker" && model == "Model" {
            continue;
        }

        let key = CameraKey::new(maker, model);
        let camera = registry
            .get_mut(&key)
            .ok_or_else(|| Error::OverlayUnknownCamera {
                maker: maker.to_string(),
                model: model.to_string(),
            })?;

        camera.decoder = Decoder::RawSpeed;
        camera.add_debug("rawspeed-dng: Decoder set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrades_known_camera_to_rawspeed() {
        let mut registry = Registry::new();
        {
            let record = registry.upsert("Acme", "X100");
            record.decoder = Decoder::Unknown;
        }

        load(&mut registry, b"Maker,Model\nAcme,X100\n").unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X100")).unwrap();
        assert_eq!(record.decoder, Decoder::RawSpeed);
        assert!(record
            .debug
            .contains(&"rawspeed-dng: Decoder set".to_string()));
    }

    #[test]
    fn test_unknown_camera_is_fatal() {
        let mut registry = Registry::new();
        let err = load(&mut registry, b"Maker,Model\nAcme,Ghost\n").unwrap_err();
        assert!(matches!(err, Error::OverlayUnknownCamera { .. }));
    }

    #[test]
    fn test_header_row_skipped() {
        let mut registry = Registry::new();
        registry.upsert("Acme", "X100");
        // Only the header and one matching row; must not fail on the header
        load(&mut registry, b"Maker,Model\nAcme,X100\n").unwrap();
        assert_eq!(registry.len(), 1);
    }
}
