//! Report renderer: Markdown and TSV table construction
//!
//! Rows are built from the registry under the same filter the statistics
//! aggregator uses, sorted by camera key. Markdown output pads every cell to
//! the widest value in its column, can segment the table per maker with its
//! own heading and header row, and can fold per-segment sub-totals into the
//! header cells through caller-supplied templates.

use crate::error::{Error, Result};
use crate::pipeline::MergeOptions;
use crate::registry::Registry;
use crate::stats::{self, Stats};
use std::collections::HashMap;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Md,
    Tsv,
    /// Suppress rendering entirely; statistics may still be reported
    None,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md" => Ok(OutputFormat::Md),
            "tsv" => Ok(OutputFormat::Tsv),
            "none" => Ok(OutputFormat::None),
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }
}

/// A renderable camera field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Maker,
    Model,
    Aliases,
    Formats,
    WbPresets,
    NoiseProfiles,
    RsSupported,
    Decoder,
    Debug,
}

impl Field {
    /// Parse a field name; unknown names yield `None` and are ignored
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "maker" => Some(Field::Maker),
            "model" => Some(Field::Model),
            "aliases" => Some(Field::Aliases),
            "formats" => Some(Field::Formats),
            "wbpresets" => Some(Field::WbPresets),
            "noiseprofiles" => Some(Field::NoiseProfiles),
            "rssupported" => Some(Field::RsSupported),
            "decoder" => Some(Field::Decoder),
            "debug" => Some(Field::Debug),
            _ => None,
        }
    }

    /// Column header label
    pub fn label(self) -> &'static str {
        match self {
            Field::Maker => "Maker",
            Field::Model => "Model",
            Field::Aliases => "Aliases",
            Field::Formats => "Formats",
            Field::WbPresets => "WB Presets",
            Field::NoiseProfiles => "Noise Profile",
            Field::RsSupported => "RawSpeed Support",
            Field::Decoder => "Decoder",
            Field::Debug => "Debug",
        }
    }
}

/// Header-cell templates for table statistics mode.
///
/// `plain` is used for count-only cells (`model`), `with_percent` for the
/// boolean columns. Placeholders: `{label}`, `{count}`, `{percent}`.
#[derive(Debug, Clone)]
pub struct HeaderTemplates {
    pub plain: String,
    pub with_percent: String,
}

impl Default for HeaderTemplates {
    fn default() -> Self {
        Self {
            plain: "{label} ({count})".to_string(),
            with_percent: "{label} ({count} / {percent}%)".to_string(),
        }
    }
}

impl HeaderTemplates {
    /// Reject templates missing their required placeholders
    pub fn validate(&self) -> Result<()> {
        for (template, placeholders) in [
            (&self.plain, &["{label}", "{count}"][..]),
            (&self.with_percent, &["{label}", "{count}", "{percent}"][..]),
        ] {
            for placeholder in placeholders {
                if !template.contains(placeholder) {
                    return Err(Error::InvalidTemplate {
                        template: template.clone(),
                        message: format!("missing {} placeholder", placeholder),
                    });
                }
            }
        }
        Ok(())
    }

    fn plain_cell(&self, label: &str, count: usize) -> String {
        self.plain
            .replace("{label}", label)
            .replace("{count}", &count.to_string())
    }

    fn percent_cell(&self, label: &str, count: usize, percent: i64) -> String {
        self.with_percent
            .replace("{label}", label)
            .replace("{count}", &count.to_string())
            .replace("{percent}", &percent.to_string())
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Fields to print, in order
    pub fields: Vec<Field>,
    /// Display tokens for boolean fields: (true, false)
    pub bools: (String, String),
    /// Escape Markdown characters in model and alias cells
    pub escape: bool,
    /// Heading level for per-maker segmentation; 0 disables
    pub segments: usize,
    /// Substitute sub-totals into header cells
    pub stats_table: bool,
    /// Prepend a natural-language statistics sentence
    pub stats_text: bool,
    pub templates: HeaderTemplates,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Md,
            fields: vec![
                Field::Maker,
                Field::Model,
                Field::Aliases,
                Field::WbPresets,
                Field::NoiseProfiles,
                Field::Decoder,
            ],
            bools: ("Yes".to_string(), "No".to_string()),
            escape: false,
            segments: 0,
            stats_table: false,
            stats_text: false,
            templates: HeaderTemplates::default(),
        }
    }
}

/// One output row. The maker is carried alongside the cells because
/// segmentation needs it even when `maker` is not a requested field.
#[derive(Debug, Clone)]
pub struct Row {
    pub maker: String,
    pub cells: Vec<String>,
}

/// Escape the fixed Markdown character set
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '*' | '_' | '{' | '}' | '[' | ']' | '<' | '>' | '(' | ')' | '#' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Build display rows from the registry, filtered like the statistics pass
/// and ordered by camera key
pub fn prepare_rows(
    registry: &Registry,
    merge_options: MergeOptions,
    options: &RenderOptions,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(registry.len());

    for (_, record) in registry.iter() {
        if !stats::included(record.decoder, merge_options) {
            continue;
        }

        let cells = options
            .fields
            .iter()
            .map(|&field| match field {
                Field::Maker => record.maker.clone(),
                Field::Model => {
                    if options.escape {
                        escape_markdown(&record.model)
                    } else {
                        record.model.clone()
                    }
                }
                Field::Aliases => {
                    let joined = record.aliases.join(", ");
                    if options.escape {
                        escape_markdown(&joined)
                    } else {
                        joined
                    }
                }
                Field::Formats => record.formats.join(", "),
                Field::WbPresets => bool_cell(record.wb_presets, options),
                Field::NoiseProfiles => bool_cell(record.noise_profiles, options),
                Field::RsSupported => record.rs_supported.clone(),
                Field::Decoder => record.decoder.to_string(),
                Field::Debug => record.debug.join(", "),
            })
            .collect();

        rows.push(Row {
            maker: record.maker.clone(),
            cells,
        });
    }

    rows
}

fn bool_cell(value: bool, options: &RenderOptions) -> String {
    if value {
        options.bools.0.clone()
    } else {
        options.bools.1.clone()
    }
}

/// Render the registry to the configured format. Returns `None` for
/// `OutputFormat::None`.
pub fn render(
    registry: &Registry,
    stats: &Stats,
    merge_options: MergeOptions,
    options: &RenderOptions,
) -> Result<Option<String>> {
    if options.format == OutputFormat::None {
        return Ok(None);
    }

    let rows = prepare_rows(registry, merge_options, options);
    match options.format {
        OutputFormat::Md => generate_md(&rows, stats, options).map(Some),
        OutputFormat::Tsv => Ok(Some(generate_tsv(&rows, options))),
        OutputFormat::None => unreachable!(),
    }
}

/// Per-segment sub-totals for header statistics
#[derive(Debug, Default)]
struct SegmentSums {
    models: usize,
    wb: usize,
    noise: usize,
}

/// Build header cell variants: one per maker when segmented with table
/// statistics, otherwise a single shared variant
fn build_header_fields(rows: &[Row], options: &RenderOptions) -> HashMap<String, Vec<String>> {
    let mut header_fields: HashMap<String, Vec<String>> = HashMap::new();

    if !options.stats_table {
        let cells: Vec<String> = options.fields.iter().map(|f| f.label().to_string()).collect();
        header_fields.insert("nostats".to_string(), cells);
        return header_fields;
    }

    let mut sums = SegmentSums::default();
    for (i, row) in rows.iter().enumerate() {
        for (&field, cell) in options.fields.iter().zip(&row.cells) {
            match field {
                Field::Model => sums.models += 1,
                Field::WbPresets if *cell == options.bools.0 => sums.wb += 1,
                Field::NoiseProfiles if *cell == options.bools.0 => sums.noise += 1,
                _ => {}
            }
        }

        let is_last = i == rows.len() - 1;
        let segment_ends = options.segments != 0
            && rows.get(i + 1).is_some_and(|next| next.maker != row.maker);

        if is_last || segment_ends {
            let wb_percent = stats::percent(sums.wb, sums.models);
            let noise_percent = stats::percent(sums.noise, sums.models);

            let cells: Vec<String> = options
                .fields
                .iter()
                .map(|&field| match field {
                    Field::Model => options.templates.plain_cell(field.label(), sums.models),
                    Field::WbPresets => {
                        options
                            .templates
                            .percent_cell(field.label(), sums.wb, wb_percent)
                    }
                    Field::NoiseProfiles => {
                        options
                            .templates
                            .percent_cell(field.label(), sums.noise, noise_percent)
                    }
                    _ => field.label().to_string(),
                })
                .collect();

            let key = if options.segments == 0 {
                "fulltable".to_string()
            } else {
                row.maker.clone()
            };
            header_fields.insert(key, cells);

            sums = SegmentSums::default();
        }
    }

    header_fields
}

/// Render a Markdown table
pub fn generate_md(rows: &[Row], stats: &Stats, options: &RenderOptions) -> Result<String> {
    options.templates.validate()?;

    let header_fields = build_header_fields(rows, options);

    // Widest value in each column, across every header variant and row, so
    // table cells line up nicely
    let mut col_widths = vec![0usize; options.fields.len()];
    for cells in header_fields.values() {
        for (i, cell) in cells.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }

    let separator_cells: Vec<String> = col_widths.iter().map(|&w| "-".repeat(w)).collect();
    let row_separator = table_row(&separator_cells, &col_widths);

    let mut out = String::new();

    if options.stats_text {
        out.push_str(&format!(
            "In total **{}** cameras are supported, of which **{} ({}%)** have white balance presets and **{} ({}%)** have noise profiles.\n\n",
            stats.supported,
            stats.wb_presets,
            stats.wb_presets_percent,
            stats.noise_profiles,
            stats.noise_profiles_percent,
        ));
    }

    let heading = "#".repeat(options.segments);

    let mut maker_prev = "";
    for (i, row) in rows.iter().enumerate() {
        if i == 0 && options.segments == 0 {
            out.push_str(&table_row(
                header_cells(&header_fields, &row.maker, options),
                &col_widths,
            ));
            out.push_str(&row_separator);
        }

        if options.segments != 0 && row.maker != maker_prev {
            out.push_str(&format!("\n{} {}\n\n", heading, row.maker));
            out.push_str(&table_row(
                header_cells(&header_fields, &row.maker, options),
                &col_widths,
            ));
            out.push_str(&row_separator);
        }

        out.push_str(&table_row(&row.cells, &col_widths));
        maker_prev = &row.maker;
    }

    Ok(out)
}

/// Pick the header variant for a maker's segment (or the shared one)
fn header_cells<'a>(
    header_fields: &'a HashMap<String, Vec<String>>,
    maker: &str,
    options: &RenderOptions,
) -> &'a [String] {
    let key = if !options.stats_table {
        "nostats"
    } else if options.segments == 0 {
        "fulltable"
    } else {
        maker
    };
    &header_fields[key]
}

/// One pipe-delimited table row with padded cells
fn table_row(cells: &[String], col_widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let pad = col_widths[i].saturating_sub(cell.chars().count());
        out.push_str("| ");
        out.push_str(cell);
        out.push_str(&" ".repeat(pad + 1));
        if i == cells.len() - 1 {
            out.push_str("|\n");
        }
    }
    out
}

/// Render a tab-separated table: header labels, then one line per row
pub fn generate_tsv(rows: &[Row], options: &RenderOptions) -> String {
    let headers: Vec<&str> = options.fields.iter().map(|f| f.label()).collect();

    let mut out = String::new();
    out.push_str(&headers.join("\t"));
    out.push('\n');
    for row in rows {
        out.push_str(&row.cells.join("\t"));
        out.push('\n');
    }

    out
}
