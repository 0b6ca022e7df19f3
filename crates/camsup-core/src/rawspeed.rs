//! Structured-dataset extractor for RawSpeed's cameras.xml
//!
//! Walks `<Camera>` entries, taking identity from the nested `<ID>` element
//! when present and from the `<Camera>` attributes otherwise. Every entry
//! contributes a decoding mode to `formats`; an empty `supported` attribute
//! marks the camera as decodable through RawSpeed.

use crate::error::{Error, Result};
use crate::registry::{Decoder, Registry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const SOURCE_NAME: &str = "cameras.xml";

/// One `<Camera>` entry accumulated during the event walk
#[derive(Debug, Default)]
struct CameraEntry {
    attr_maker: String,
    attr_model: String,
    id_maker: String,
    id_model: String,
    has_id: bool,
    mode: String,
    supported: String,
    /// (id attribute, element text) per `<Alias>`
    aliases: Vec<(String, String)>,
}

/// Parse the cameras.xml payload and fold every entry into the registry.
///
/// Entries with a non-empty `supported` attribute are excluded from the
/// registry unless `include_unsupported` is set, in which case they are kept
/// without a decoder.
pub fn load(registry: &mut Registry, data: &[u8], include_unsupported: bool) -> Result<()> {
    let text = std::str::from_utf8(data).map_err(|e| Error::InvalidUtf8 {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut entry: Option<CameraEntry> = None;
    let mut in_alias = false;
    let mut alias_id = String::new();
    let mut alias_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Camera" => entry = Some(read_camera_attrs(e)),
                b"ID" => {
                    if let Some(ref mut entry) = entry {
                        entry.has_id = true;
                        for attr in e.attributes().flatten() {
                            let value = String::from_utf8_lossy(&attr.value).to_string();
                            match attr.key.as_ref() {
                                b"make" => entry.id_maker = value,
                                b"model" => entry.id_model = value,
                                _ => {}
                            }
                        }
                    }
                }
                b"Alias" => {
                    in_alias = true;
                    alias_id.clear();
                    alias_text.clear();
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"id" {
                            alias_id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"Camera" => {
                    // Childless entry, commit straight away
                    commit(registry, read_camera_attrs(e), include_unsupported);
                }
                b"ID" => {
                    if let Some(ref mut entry) = entry {
                        entry.has_id = true;
                        for attr in e.attributes().flatten() {
                            let value = String::from_utf8_lossy(&attr.value).to_string();
                            match attr.key.as_ref() {
                                b"make" => entry.id_maker = value,
                                b"model" => entry.id_model = value,
                                _ => {}
                            }
                        }
                    }
                }
                b"Alias" => {
                    // Self-closing alias carries its value in the id attribute
                    if let Some(ref mut entry) = entry {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"id" {
                                entry.aliases.push((
                                    String::from_utf8_lossy(&attr.value).to_string(),
                                    String::new(),
                                ));
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_alias => {
                alias_text = String::from_utf8_lossy(e.as_ref()).to_string();
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"Alias" => {
                    in_alias = false;
                    if let Some(ref mut entry) = entry {
                        entry.aliases.push((alias_id.clone(), alias_text.clone()));
                    }
                }
                b"Camera" => {
                    if let Some(entry) = entry.take() {
                        commit(registry, entry, include_unsupported);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml {
                    source_name: SOURCE_NAME.to_string(),
                    source: e,
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn read_camera_attrs(e: &BytesStart<'_>) -> CameraEntry {
    let mut entry = CameraEntry::default();
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"make" => entry.attr_maker = value,
            b"model" => entry.attr_model = value,
            b"mode" => entry.mode = value,
            b"supported" => entry.supported = value,
            _ => {}
        }
    }
    entry
}

/// Fold one completed `<Camera>` entry into the registry
fn commit(registry: &mut Registry, entry: CameraEntry, include_unsupported: bool) {
    let mut debug: Vec<String> = Vec::new();

    let (maker, model) = if entry.has_id {
        (entry.id_maker, entry.id_model)
    } else {
        if entry.attr_model.is_empty() {
            debug.push("cameras.xml: No Model in Camera element".to_string());
        }
        (entry.attr_maker, entry.attr_model)
    };

    if !entry.supported.is_empty() && !include_unsupported {
        return;
    }

    let record = registry.upsert(&maker, &model);

    for (id, text) in &entry.aliases {
        if id.is_empty() {
            // Sometimes <Alias> doesn't have an id attribute, so use the text
            // instead, stripping the maker prefix
            let alias = text
                .strip_prefix(&format!("{} ", maker))
                .unwrap_or(text)
                .to_string();
            debug.push("cameras.xml: No id in Alias".to_string());
            record.add_alias(&alias);
        } else {
            record.add_alias(id);
        }
    }

    if entry.mode.is_empty() {
        record.add_format("default");
    } else {
        record.add_format(&entry.mode);
    }

    record.rs_supported = entry.supported;
    if record.rs_supported.is_empty() {
        record.decoder = Decoder::RawSpeed;
    }

    for note in &debug {
        record.add_debug(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CameraKey;

    const BASIC: &str = r#"
        <Cameras>
          <Camera make="Acme" model="X100">
            <ID make="Acme" model="X100">Acme X100</ID>
          </Camera>
        </Cameras>"#;

    #[test]
    fn test_supported_entry_gets_rawspeed_decoder() {
        let mut registry = Registry::new();
        load(&mut registry, BASIC.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X100")).unwrap();
        assert_eq!(record.maker, "Acme");
        assert_eq!(record.model, "X100");
        assert_eq!(record.decoder, Decoder::RawSpeed);
        assert_eq!(record.formats, vec!["default"]);
        assert_eq!(record.rs_supported, "");
    }

    #[test]
    fn test_identity_from_camera_attributes_without_id() {
        let xml = r#"<Cameras><Camera make="Acme" model="X200" mode="sRaw"/></Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X200")).unwrap();
        assert_eq!(record.formats, vec!["sRaw"]);
    }

    #[test]
    fn test_missing_model_is_diagnosed_not_fatal() {
        let xml = r#"<Cameras><Camera make="Acme"/></Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "")).unwrap();
        assert!(record
            .debug
            .contains(&"cameras.xml: No Model in Camera element".to_string()));
    }

    #[test]
    fn test_alias_from_id_attribute() {
        let xml = r#"
            <Cameras>
              <Camera make="Acme" model="X100">
                <Aliases><Alias id="X100 Mark I">Acme X100 Mark I</Alias></Aliases>
              </Camera>
            </Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X100")).unwrap();
        assert_eq!(record.aliases, vec!["X100 Mark I"]);
        assert!(record.debug.is_empty());
    }

    #[test]
    fn test_alias_text_fallback_strips_maker_and_diagnoses() {
        let xml = r#"
            <Cameras>
              <Camera make="Acme" model="X100">
                <Aliases><Alias>Acme X100 Mark I</Alias></Aliases>
              </Camera>
            </Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X100")).unwrap();
        assert_eq!(record.aliases, vec!["X100 Mark I"]);
        assert!(record
            .debug
            .contains(&"cameras.xml: No id in Alias".to_string()));
    }

    #[test]
    fn test_unsupported_entry_excluded_by_default() {
        let xml =
            r#"<Cameras><Camera make="Acme" model="X300" supported="no-samples"/></Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unsupported_entry_kept_without_decoder_when_included() {
        let xml =
            r#"<Cameras><Camera make="Acme" model="X300" supported="no-samples"/></Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), true).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X300")).unwrap();
        assert_eq!(record.decoder, Decoder::Unset);
        assert_eq!(record.rs_supported, "no-samples");
    }

    #[test]
    fn test_multiple_modes_accumulate_as_set() {
        let xml = r#"
            <Cameras>
              <Camera make="Acme" model="X100" mode="sRaw"/>
              <Camera make="Acme" model="X100" mode="mRaw"/>
              <Camera make="Acme" model="X100" mode="sRaw"/>
            </Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X100")).unwrap();
        assert_eq!(record.formats, vec!["mRaw", "sRaw"]);
    }

    #[test]
    fn test_malformed_entry_does_not_abort_remaining() {
        let xml = r#"
            <Cameras>
              <Camera/>
              <Camera make="Acme" model="X100"/>
            </Cameras>"#;
        let mut registry = Registry::new();
        load(&mut registry, xml.as_bytes(), false).unwrap();
        assert!(registry.get(&CameraKey::new("Acme", "X100")).is_some());
    }
}
