use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use scorefill_core::models::score::ScoreRecord;
use scorefill_core::models::template::TemplateGender;
use scorefill_export::docx::read_document;
use scorefill_export::pipeline::{
    GenerationContext, GenerationSummary, SourceDocument, TemplateDocument, generate,
};
use scorefill_instruments::extract::extract_records;
use scorefill_instruments::manual::{ManualEntry, parse_entries_json};
use scorefill_instruments::{all_instruments, get_instrument};

use crate::config::ScorefillConfig;

/// Parse a `--source` value of the form `instrument=path`.
pub fn parse_source(s: &str) -> Result<(String, PathBuf), String> {
    let (instrument, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <instrument>=<path>, got '{s}'"))?;
    let instrument = instrument.trim();
    if instrument.is_empty() || path.trim().is_empty() {
        return Err(format!("expected <instrument>=<path>, got '{s}'"));
    }
    Ok((instrument.to_string(), PathBuf::from(path.trim())))
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub sources: Vec<(String, PathBuf)>,
    pub scores: Vec<ManualEntry>,
    pub scores_file: Option<PathBuf>,
    pub gender: TemplateGender,
    pub output: PathBuf,
}

fn read(path: &Path) -> eyre::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))
}

pub fn run_generate(
    config: &ScorefillConfig,
    request: GenerateRequest,
) -> eyre::Result<GenerationSummary> {
    if config.sections.is_empty() {
        return Err(eyre::eyre!(
            "no template sections configured; add \"sections\" to the config file"
        ));
    }

    let templates = config
        .template_paths(request.gender)
        .iter()
        .map(|p| TemplateDocument::load(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ctx = GenerationContext::new(templates, config.fill_options());
    ctx.schema_overrides = config.schema_overrides.clone();

    for (instrument_id, path) in &request.sources {
        ctx.sources.push(SourceDocument {
            instrument_id: instrument_id.clone(),
            name: path.display().to_string(),
            bytes: read(path)?,
        });
    }

    if let Some(file) = &request.scores_file {
        let json = std::fs::read_to_string(file)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", file.display()))?;
        ctx.manual_entries.extend(parse_entries_json(&json)?);
    }
    ctx.manual_entries.extend(request.scores);

    info!(
        request_id = %ctx.request_id,
        gender = %request.gender,
        sources = ctx.sources.len(),
        manual = ctx.manual_entries.len(),
        "starting generation"
    );
    let summary = generate(&mut ctx)?;

    let bytes = ctx
        .output()
        .ok_or_else(|| eyre::eyre!("generation produced no output"))?;
    std::fs::write(&request.output, bytes)?;
    info!(path = %request.output.display(), bytes = bytes.len(), "report written");

    Ok(summary)
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDump {
    pub index: usize,
    pub rows: Vec<Vec<String>>,
}

/// What the extractor sees in one score report.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub instrument: String,
    pub table_count: usize,
    pub tables: Vec<TableDump>,
    pub records: Vec<ScoreRecord>,
}

pub fn inspect(
    config: &ScorefillConfig,
    instrument_id: &str,
    path: &Path,
) -> eyre::Result<Inspection> {
    let instrument = get_instrument(instrument_id)
        .ok_or_else(|| eyre::eyre!("unknown instrument: {instrument_id}"))?;
    let schema = config
        .schema_overrides
        .get(instrument.id())
        .or_else(|| instrument.schema())
        .ok_or_else(|| eyre::eyre!("{} scores are entered manually", instrument.name()))?;

    let document = read_document(&path.display().to_string(), &read(path)?)?;
    let grids: Vec<Vec<Vec<String>>> = document.tables().map(|t| t.grid()).collect();
    let tables = schema
        .table_indices(grids.len())
        .into_iter()
        .filter_map(|index| {
            grids.get(index).map(|rows| TableDump {
                index,
                rows: rows.clone(),
            })
        })
        .collect();

    Ok(Inspection {
        instrument: instrument.id().to_string(),
        table_count: grids.len(),
        tables,
        records: extract_records(&document, schema),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentInfo {
    pub id: String,
    pub name: String,
    /// "report" for extracted instruments, "manual" for hand-entered ones.
    pub source: &'static str,
    pub subtests: Vec<String>,
}

pub fn list_instruments() -> Vec<InstrumentInfo> {
    all_instruments()
        .iter()
        .map(|i| InstrumentInfo {
            id: i.id().to_string(),
            name: i.name().to_string(),
            source: if i.schema().is_some() { "report" } else { "manual" },
            subtests: i.subtests().iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}
