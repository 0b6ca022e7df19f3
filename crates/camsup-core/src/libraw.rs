//! Semi-structured extractor for darktable's imageio_libraw.c
//!
//! The LibRaw camera list lives in a C array literal. This is a narrow,
//! line-anchored convention, so a small line-oriented state machine is enough:
//! ignore everything until the array opener, collect the quoted literal from
//! each known field assignment, commit one camera per closing brace, stop at
//! the array terminator.

use crate::error::{Error, Result};
use crate::registry::{Decoder, Registry};
use regex::Regex;

const SOURCE_NAME: &str = "imageio_libraw.c";

const BLOCK_OPEN: &str = "const model_map_t modelMap[] = {";
const BLOCK_CLOSE: &str = "};";

/// Scan the C source payload for the LibRaw model map and fold every entry
/// into the registry. A matched key gets `Decoder::LibRaw` unconditionally,
/// overwriting whatever an earlier source recorded.
///
/// Never finding the array opener is a fatal error: the source is unusable,
/// not merely empty.
pub fn load(registry: &mut Registry, data: &[u8]) -> Result<()> {
    let text = std::str::from_utf8(data).map_err(|e| Error::InvalidUtf8 {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;

    // Unwrap is fine, the pattern is a literal
    let quoted = Regex::new(r#""(.+)""#).unwrap();

    let mut in_block = false;
    let mut maker = String::new();
    let mut model = String::new();
    let mut alias = String::new();

    for line in text.lines() {
        if line.contains(BLOCK_OPEN) {
            in_block = true;
            continue;
        } else if !in_block {
            continue;
        } else if line.contains(BLOCK_CLOSE) {
            break;
        }

        let found = quoted
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        if line.contains(".clean_make =") {
            maker = found;
        } else if line.contains(".clean_model =") {
            model = found;
        } else if line.contains(".clean_alias =") {
            alias = found;
        }

        if line.contains("},") {
            let record = registry.upsert(&maker, &model);
            if alias != model {
                record.add_alias(&alias);
            }
            record.decoder = Decoder::LibRaw;
        }
    }

    if !in_block {
        return Err(Error::LibrawBlockNotFound {
            source_name: SOURCE_NAME.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CameraKey;

    const FIXTURE: &str = r#"
// some unrelated code
static int foo = 0;

const model_map_t modelMap[] = {
  { .exif_make = "ACME",
    .exif_model = "X-500",
    .clean_make = "Acme",
    .clean_model = "X500",
    .clean_alias = "X500 Deluxe",
  },
  { .exif_make = "ACME",
    .exif_model = "X-600",
    .clean_make = "Acme",
    .clean_model = "X600",
    .clean_alias = "X600",
  },
};

void after(void) {}
"#;

    #[test]
    fn test_parses_entries_and_sets_libraw() {
        let mut registry = Registry::new();
        load(&mut registry, FIXTURE.as_bytes()).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X500")).unwrap();
        assert_eq!(record.decoder, Decoder::LibRaw);
        assert_eq!(record.aliases, vec!["X500 Deluxe"]);
    }

    #[test]
    fn test_alias_equal_to_model_not_recorded() {
        let mut registry = Registry::new();
        load(&mut registry, FIXTURE.as_bytes()).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X600")).unwrap();
        assert!(record.aliases.is_empty());
    }

    #[test]
    fn test_overwrites_existing_decoder() {
        let mut registry = Registry::new();
        {
            let record = registry.upsert("Acme", "X500");
            record.decoder = Decoder::RawSpeed;
        }
        load(&mut registry, FIXTURE.as_bytes()).unwrap();

        let record = registry.get(&CameraKey::new("Acme", "X500")).unwrap();
        assert_eq!(record.decoder, Decoder::LibRaw);
    }

    #[test]
    fn test_missing_block_marker_is_fatal() {
        let mut registry = Registry::new();
        let err = load(&mut registry, b"int main(void) { return 0; }").unwrap_err();
        assert!(matches!(err, Error::LibrawBlockNotFound { .. }));
    }

    #[test]
    fn test_stops_at_block_close() {
        let source = r#"
const model_map_t modelMap[] = {
  { .clean_make = "Acme",
    .clean_model = "X500",
    .clean_alias = "X500",
  },
};
  { .clean_make = "Bogus",
    .clean_model = "Nope",
    .clean_alias = "Nope",
  },
"#;
        let mut registry = Registry::new();
        load(&mut registry, source.as_bytes()).unwrap();
        assert!(registry.get(&CameraKey::new("Bogus", "Nope")).is_none());
        assert_eq!(registry.len(), 1);
    }
}
