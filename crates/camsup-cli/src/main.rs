//! camera-support CLI
//!
//! Merges the darktable camera support datasets into one registry and renders
//! it as a Markdown or tab-separated table, optionally with statistics.

mod fetch;

use camsup_core::{
    build_registry, generate_stats, render, Field, HeaderTemplates, MergeOptions, OutputFormat,
    RenderOptions, SourceSet, Stats,
};
use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

const RAWSPEED_URL: &str =
    "https://raw.githubusercontent.com/darktable-org/rawspeed/develop/data/cameras.xml";
const RAWSPEED_DNG_URL: &str =
    "https://raw.githubusercontent.com/Donatzsky/darktable-camera-support/main/rawspeed-dng.csv";
const LIBRAW_URL: &str =
    "https://raw.githubusercontent.com/darktable-org/darktable/master/src/imageio/imageio_libraw.c";
const WB_PRESETS_URL: &str =
    "https://raw.githubusercontent.com/darktable-org/darktable/master/data/wb_presets.json";
const NOISE_PROFILES_URL: &str =
    "https://raw.githubusercontent.com/darktable-org/darktable/master/data/noiseprofiles.json";

#[derive(Parser)]
#[command(name = "camera-support")]
#[command(about = "Generate a camera support table from the darktable datasets", long_about = None)]
#[command(version)]
struct Cli {
    /// 'cameras.xml' location (URL or local path)
    #[arg(long, default_value = RAWSPEED_URL)]
    rawspeed: String,

    /// 'rawspeed-dng.csv' location
    #[arg(long = "rawspeed-dng", default_value = RAWSPEED_DNG_URL)]
    rawspeed_dng: String,

    /// 'imageio_libraw.c' location. If empty, LibRaw cameras will not be
    /// included
    #[arg(long, default_value = LIBRAW_URL)]
    libraw: String,

    /// 'wb_presets.json' location
    #[arg(long = "wb-presets", default_value = WB_PRESETS_URL)]
    wb_presets: String,

    /// 'noiseprofiles.json' location
    #[arg(long = "noise-profiles", default_value = NOISE_PROFILES_URL)]
    noise_profiles: String,

    /// Print statistics. Semicolon-delimited list of: stdout, table, text
    #[arg(long)]
    stats: Option<String>,

    /// Output format: md, tsv or none
    #[arg(long, default_value = "md")]
    format: String,

    /// Template pair for header fields with statistics, as
    /// "no-percent;with-percent". Placeholders: {label}, {count}, {percent}
    #[arg(long = "th-format-str")]
    th_format_str: Option<String>,

    /// Segment tables by maker, adding a header at the given level (1-6)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=6))]
    segments: u8,

    /// Semicolon-delimited list of fields to print, or one of:
    /// all, all-debug, no-maker
    #[arg(long)]
    fields: Option<String>,

    /// Text to use for boolean fields, as "true;false"
    #[arg(long)]
    bools: Option<String>,

    /// Escape Markdown characters in Model and Aliases fields
    #[arg(long)]
    escape: bool,

    /// Include cameras with unknown support status. Also affects statistics
    #[arg(long)]
    unknown: bool,

    /// Include unsupported cameras. Also affects statistics
    #[arg(long)]
    unsupported: bool,

    /// Output file; stdout when omitted
    output: Option<PathBuf>,
}

/// Which statistics sinks were requested via --stats
#[derive(Debug, Clone, Copy, Default)]
struct StatsFlags {
    stdout: bool,
    table: bool,
    text: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let stats_flags = parse_stats_flags(cli.stats.as_deref())?;
    let render_options = build_render_options(&cli, stats_flags)?;
    let merge_options = MergeOptions {
        include_unsupported: cli.unsupported,
        include_unknown: cli.unknown,
    };

    let sources = SourceSet {
        rawspeed: fetch::get_data(&cli.rawspeed)?,
        libraw: if cli.libraw.is_empty() {
            None
        } else {
            Some(fetch::get_data(&cli.libraw)?)
        },
        wb_presets: fetch::get_data(&cli.wb_presets)?,
        noise_profiles: fetch::get_data(&cli.noise_profiles)?,
        overlay: fetch::get_data(&cli.rawspeed_dng)?,
    };

    let registry = build_registry(&sources, merge_options)?;
    let stats = generate_stats(&registry, merge_options);

    if let Some(output) = render(&registry, &stats, merge_options, &render_options)? {
        match cli.output {
            Some(ref path) => fs::write(path, output)?,
            None => print!("{}", output),
        }
    }

    if stats_flags.stdout {
        if cli.output.is_none() && render_options.format != OutputFormat::None {
            println!();
        }
        print_stats(&stats, merge_options);
    }

    Ok(())
}

fn parse_stats_flags(arg: Option<&str>) -> Result<StatsFlags, Box<dyn Error>> {
    let mut flags = StatsFlags::default();
    let Some(arg) = arg else {
        return Ok(flags);
    };

    for part in arg.to_lowercase().split(';') {
        match part {
            "stdout" => flags.stdout = true,
            "table" => flags.table = true,
            "text" => flags.text = true,
            other => return Err(format!("invalid --stats argument: \"{}\"", other).into()),
        }
    }
    Ok(flags)
}

fn build_render_options(cli: &Cli, stats_flags: StatsFlags) -> Result<RenderOptions, Box<dyn Error>> {
    let format: OutputFormat = cli.format.parse()?;

    let mut options = RenderOptions {
        format,
        segments: cli.segments as usize,
        escape: cli.escape,
        stats_table: stats_flags.table,
        stats_text: stats_flags.text,
        ..Default::default()
    };

    if let Some(ref fields) = cli.fields {
        options.fields = parse_fields(fields);
    }

    if let Some(ref bools) = cli.bools {
        let (yes, no) = split_pair(bools)
            .ok_or_else(|| format!("--bools must contain one semicolon: \"{}\"", bools))?;
        options.bools = (yes.to_string(), no.to_string());
    }

    if let Some(ref templates) = cli.th_format_str {
        let (plain, with_percent) = split_pair(templates).ok_or_else(|| {
            format!("--th-format-str must contain one semicolon: \"{}\"", templates)
        })?;
        options.templates = HeaderTemplates {
            plain: plain.to_string(),
            with_percent: with_percent.to_string(),
        };
        options.templates.validate()?;
    }

    Ok(options)
}

/// Expand the field-list shorthands and parse the names, ignoring unknown ones
fn parse_fields(arg: &str) -> Vec<Field> {
    let expanded = match arg {
        "all" => "maker;model;aliases;wbpresets;noiseprofiles;decoder;rssupported;formats",
        "all-debug" => "maker;model;aliases;wbpresets;noiseprofiles;decoder;rssupported;formats;debug",
        "no-maker" => "model;aliases;wbpresets;noiseprofiles;decoder",
        other => other,
    };

    expanded
        .to_lowercase()
        .split(';')
        .filter_map(Field::parse)
        .collect()
}

/// Split a "left;right" argument containing exactly one semicolon
fn split_pair(arg: &str) -> Option<(&str, &str)> {
    if arg.matches(';').count() != 1 {
        return None;
    }
    arg.split_once(';')
}

fn print_stats(stats: &Stats, merge_options: MergeOptions) {
    println!("Cameras:\t {:4}", stats.cameras);
    println!("  RawSpeed:\t {:4}  {:3}%", stats.rawspeed, stats.rawspeed_percent);
    println!("  LibRaw:\t {:4}  {:3}%", stats.libraw, stats.libraw_percent);
    if merge_options.include_unknown || merge_options.include_unsupported {
        println!("  Supported:\t {:4}  {:3}%", stats.supported, stats.supported_percent);
    }
    if merge_options.include_unknown {
        println!("  Unknown:\t {:4}  {:3}%", stats.unknown, stats.unknown_percent);
    }
    if merge_options.include_unsupported {
        println!("  Unsupported:\t {:4}  {:3}%", stats.unsupported, stats.unsupported_percent);
    }
    println!("Aliases:\t {:4}", stats.aliases);
    println!("WB Presets:\t {:4}  {:3}%", stats.wb_presets, stats.wb_presets_percent);
    println!("Noise Profiles:\t {:4}  {:3}%", stats.noise_profiles, stats.noise_profiles_percent);
}
