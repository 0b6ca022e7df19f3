//! Aggregate statistics over the merged registry

use crate::pipeline::MergeOptions;
use crate::registry::{Decoder, Registry};

/// Counts and integer percentages over the filtered registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub cameras: usize,
    pub aliases: usize,
    pub rawspeed: usize,
    pub rawspeed_percent: i64,
    pub libraw: usize,
    pub libraw_percent: i64,
    pub supported: usize,
    pub supported_percent: i64,
    pub unknown: usize,
    pub unknown_percent: i64,
    pub unsupported: usize,
    pub unsupported_percent: i64,
    pub wb_presets: usize,
    pub wb_presets_percent: i64,
    pub noise_profiles: usize,
    pub noise_profiles_percent: i64,
}

/// Integer percentage of `count` in `total`, rounded half away from zero.
/// Defined as 0 when the total is 0.
pub fn percent(count: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as i64
}

/// Whether a record survives the include/exclude filters. The renderer uses
/// the same predicate, so output rows and statistics always agree.
pub fn included(decoder: Decoder, options: MergeOptions) -> bool {
    match decoder {
        Decoder::Unset => options.include_unsupported,
        Decoder::Unknown => options.include_unknown,
        Decoder::RawSpeed | Decoder::LibRaw => true,
    }
}

/// Single pass over the final registry under the active filters
pub fn generate(registry: &Registry, options: MergeOptions) -> Stats {
    let mut s = Stats::default();

    for (_, record) in registry.iter() {
        if !included(record.decoder, options) {
            continue;
        }

        match record.decoder {
            Decoder::Unset => s.unsupported += 1,
            Decoder::Unknown => s.unknown += 1,
            Decoder::RawSpeed => {
                s.rawspeed += 1;
                s.supported += 1;
            }
            Decoder::LibRaw => {
                s.libraw += 1;
                s.supported += 1;
            }
        }

        s.aliases += record.aliases.len();
        if record.wb_presets {
            s.wb_presets += 1;
        }
        if record.noise_profiles {
            s.noise_profiles += 1;
        }
        s.cameras += 1;
    }

    s.rawspeed_percent = percent(s.rawspeed, s.cameras);
    s.libraw_percent = percent(s.libraw, s.cameras);
    s.supported_percent = percent(s.supported, s.cameras);
    s.unknown_percent = percent(s.unknown, s.cameras);
    s.unsupported_percent = percent(s.unsupported, s.cameras);
    s.wb_presets_percent = percent(s.wb_presets, s.cameras);
    s.noise_profiles_percent = percent(s.noise_profiles, s.cameras);

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(records: &[(&str, &str, Decoder, bool, bool)]) -> Registry {
        let mut registry = Registry::new();
        for &(maker, model, decoder, wb, noise) in records {
            let record = registry.upsert(maker, model);
            record.decoder = decoder;
            record.wb_presets = wb;
            record.noise_profiles = noise;
        }
        registry
    }

    #[test]
    fn test_default_filter_skips_unknown_and_unset() {
        let registry = registry_with(&[
            ("Acme", "A", Decoder::RawSpeed, true, false),
            ("Acme", "B", Decoder::LibRaw, false, true),
            ("Acme", "C", Decoder::Unknown, true, true),
            ("Acme", "D", Decoder::Unset, false, false),
        ]);

        let s = generate(&registry, MergeOptions::default());
        assert_eq!(s.cameras, 2);
        assert_eq!(s.rawspeed, 1);
        assert_eq!(s.libraw, 1);
        assert_eq!(s.supported, 2);
        assert_eq!(s.unknown, 0);
        assert_eq!(s.unsupported, 0);
        assert_eq!(s.wb_presets, 1);
        assert_eq!(s.noise_profiles, 1);
    }

    #[test]
    fn test_include_flags_extend_totals() {
        let registry = registry_with(&[
            ("Acme", "A", Decoder::RawSpeed, false, false),
            ("Acme", "C", Decoder::Unknown, false, false),
            ("Acme", "D", Decoder::Unset, false, false),
        ]);

        let options = MergeOptions {
            include_unsupported: true,
            include_unknown: true,
        };
        let s = generate(&registry, options);
        assert_eq!(s.cameras, 3);
        assert_eq!(s.unknown, 1);
        assert_eq!(s.unsupported, 1);
        assert_eq!(s.rawspeed_percent, 33);
    }

    #[test]
    fn test_zero_total_yields_zero_percentages() {
        let registry = Registry::new();
        let s = generate(&registry, MergeOptions::default());
        assert_eq!(s.cameras, 0);
        assert_eq!(s.rawspeed_percent, 0);
        assert_eq!(s.wb_presets_percent, 0);
        assert_eq!(s.noise_profiles_percent, 0);
    }

    #[test]
    fn test_percent_rounds_half_away_from_zero() {
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(0, 5), 0);
    }

    #[test]
    fn test_alias_sum() {
        let mut registry = Registry::new();
        {
            let record = registry.upsert("Acme", "A");
            record.decoder = Decoder::RawSpeed;
            record.add_alias("Alpha");
            record.add_alias("Beta");
        }
        let s = generate(&registry, MergeOptions::default());
        assert_eq!(s.aliases, 2);
    }
}
