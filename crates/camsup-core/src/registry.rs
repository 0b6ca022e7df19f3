//! Core registry types: camera identity, records and the merged registry

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Normalized camera identity.
///
/// Maker and model are lowercased at construction so that sources which
/// disagree on capitalization merge into the same record. The derived
/// ordering (maker first, then model) is what the renderer relies on for
/// maker-grouped output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CameraKey {
    pub maker: String,
    pub model: String,
}

impl CameraKey {
    /// Build a key from display maker/model strings
    pub fn new(maker: &str, model: &str) -> Self {
        Self {
            maker: maker.to_lowercase(),
            model: model.to_lowercase(),
        }
    }
}

/// Which decoding path (if any) supports a camera, and which source said so
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoder {
    /// No known decoding path: unsupported or merely referenced
    #[default]
    Unset,
    /// Supported through the RawSpeed decoder
    RawSpeed,
    /// Supported through the LibRaw fallback decoder
    LibRaw,
    /// Referenced by a preset dataset only; supportability unknown
    Unknown,
}

impl Decoder {
    /// True for the decoder provenances that count as supported
    pub fn is_supported(self) -> bool {
        matches!(self, Decoder::RawSpeed | Decoder::LibRaw)
    }
}

impl std::fmt::Display for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decoder::Unset => write!(f, ""),
            Decoder::RawSpeed => write!(f, "RawSpeed"),
            Decoder::LibRaw => write!(f, "LibRaw"),
            Decoder::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Everything the datasets collectively know about one camera
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Display maker string; last source to match the key wins
    pub maker: String,
    /// Display model string; last source to match the key wins
    pub model: String,
    /// Alternate model names, sorted, deduplicated case-insensitively
    pub aliases: Vec<String>,
    /// RawSpeed decoding modes, sorted and deduplicated
    pub formats: Vec<String>,
    /// True once the white-balance preset dataset matched this key
    pub wb_presets: bool,
    /// True once the noise-profile dataset matched this key
    pub noise_profiles: bool,
    /// RawSpeed support-status attribute, verbatim; empty means supported
    pub rs_supported: String,
    /// Decoder provenance
    pub decoder: Decoder,
    /// Diagnostic notes accumulated while merging, sorted and deduplicated
    pub debug: Vec<String>,
}

impl CameraRecord {
    /// Add an alias unless it duplicates an existing one or the model name
    /// itself (both compared case-insensitively). Keeps the list sorted.
    pub fn add_alias(&mut self, alias: &str) {
        if alias.is_empty() || alias.eq_ignore_ascii_case(&self.model) {
            return;
        }
        if self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
            return;
        }
        self.aliases.push(alias.to_string());
        self.aliases.sort();
    }

    /// Add a decoding mode tag, keeping the list sorted and deduplicated
    pub fn add_format(&mut self, format: &str) {
        if self.formats.iter().any(|f| f == format) {
            return;
        }
        self.formats.push(format.to_string());
        self.formats.sort();
    }

    /// Append a diagnostic note, keeping the list sorted and deduplicated
    /// (case-insensitively, like aliases)
    pub fn add_debug(&mut self, note: &str) {
        if self.debug.iter().any(|d| d.eq_ignore_ascii_case(note)) {
            return;
        }
        self.debug.push(note.to_string());
        self.debug.sort();
    }
}

/// The merged camera registry, keyed by normalized identity.
///
/// Records are created on first contact by whichever extractor sees the key
/// first, mutated in place by every later extractor, and never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    cameras: BTreeMap<CameraKey, CameraRecord>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// True if no source has contributed a record yet
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Look up a record by key
    pub fn get(&self, key: &CameraKey) -> Option<&CameraRecord> {
        self.cameras.get(key)
    }

    /// Mutable lookup by key
    pub fn get_mut(&mut self, key: &CameraKey) -> Option<&mut CameraRecord> {
        self.cameras.get_mut(key)
    }

    /// Get the record for a key, creating a default one on first contact.
    /// The display maker/model are refreshed either way, so the last source
    /// in pipeline order wins.
    pub fn upsert(&mut self, maker: &str, model: &str) -> &mut CameraRecord {
        let key = CameraKey::new(maker, model);
        let record = match self.cameras.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(CameraRecord::default()),
        };
        record.maker = maker.to_string();
        record.model = model.to_string();
        record
    }

    /// Iterate records in key order (maker, then model, case-folded)
    pub fn iter(&self) -> impl Iterator<Item = (&CameraKey, &CameraRecord)> {
        self.cameras.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_folds_case() {
        assert_eq!(CameraKey::new("Canon", "EOS 5D"), CameraKey::new("CANON", "eos 5d"));
    }

    #[test]
    fn test_key_orders_by_maker_then_model() {
        let a = CameraKey::new("Canon", "Z");
        let b = CameraKey::new("Nikon", "A");
        assert!(a < b);

        let c = CameraKey::new("Canon", "A100");
        let d = CameraKey::new("Canon", "X200");
        assert!(c < d);
    }

    #[test]
    fn test_upsert_refreshes_display_strings() {
        let mut registry = Registry::new();
        registry.upsert("CANON", "EOS 5D");
        let record = registry.upsert("Canon", "EOS 5D");
        assert_eq!(record.maker, "Canon");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_alias_skips_model_and_duplicates() {
        let mut record = CameraRecord {
            model: "X100".to_string(),
            ..Default::default()
        };
        record.add_alias("X100");
        assert!(record.aliases.is_empty());

        record.add_alias("FinePix X100");
        record.add_alias("FINEPIX X100");
        assert_eq!(record.aliases, vec!["FinePix X100"]);
    }

    #[test]
    fn test_add_alias_keeps_sorted() {
        let mut record = CameraRecord::default();
        record.add_alias("Zeta");
        record.add_alias("Alpha");
        assert_eq!(record.aliases, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_add_debug_dedups() {
        let mut record = CameraRecord::default();
        record.add_debug("note");
        record.add_debug("note");
        assert_eq!(record.debug.len(), 1);
    }

    #[test]
    fn test_decoder_supported() {
        assert!(Decoder::RawSpeed.is_supported());
        assert!(Decoder::LibRaw.is_supported());
        assert!(!Decoder::Unknown.is_supported());
        assert!(!Decoder::Unset.is_supported());
    }
}
