//! End-to-end report generation: extract scores from uploaded reports,
//! fill each template section, and concatenate the sections.

use std::collections::BTreeMap;
use std::path::Path;

use jiff::Timestamp;
use serde::Serialize;
use tracing::{info, info_span};
use uuid::Uuid;

use scorefill_core::document::Document;
use scorefill_core::models::lookup::LookupMap;
use scorefill_instruments::error::InstrumentError;
use scorefill_instruments::extract::extract_records;
use scorefill_instruments::get_instrument;
use scorefill_instruments::manual::{EntryWarning, ManualEntry, records_from_entries};
use scorefill_instruments::schema::ExtractionSchema;

use crate::docx::{DocxReport, read_document};
use crate::error::ExportError;
use crate::options::FillOptions;
use crate::resolve::resolve_document;
use crate::sanitize::{SanitizeSummary, sanitize_document};
use crate::superscript::superscript_document;

/// An uploaded score report tagged with the instrument that produced it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub instrument_id: String,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One template section of the combined report.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl TemplateDocument {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExportError::TemplateNotFound(path.display().to_string()),
            _ => ExportError::Io(e),
        })?;
        Ok(Self {
            name: path.display().to_string(),
            bytes,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub substitutions: usize,
    pub superscripts: usize,
    #[serde(flatten)]
    pub sanitize: SanitizeSummary,
}

/// Fill one document in place: resolve placeholders, superscript ordinal
/// suffixes, then prune and highlight what could not be filled.
pub fn fill_document(
    document: &mut Document,
    lookup: &LookupMap,
    options: &FillOptions,
) -> FillReport {
    let substitutions = resolve_document(document, lookup);
    let superscripts = if options.superscript_ordinals {
        superscript_document(document)
    } else {
        0
    };
    let sanitize = sanitize_document(document, options.highlight);
    FillReport {
        substitutions,
        superscripts,
        sanitize,
    }
}

/// State for one generation request.
#[derive(Debug)]
pub struct GenerationContext {
    pub request_id: Uuid,
    pub started_at: Timestamp,
    pub sources: Vec<SourceDocument>,
    pub manual_entries: Vec<ManualEntry>,
    pub templates: Vec<TemplateDocument>,
    pub options: FillOptions,
    /// Replace an instrument's built-in extraction schema, by instrument id.
    pub schema_overrides: BTreeMap<String, ExtractionSchema>,
    output: Option<Vec<u8>>,
}

impl GenerationContext {
    pub fn new(templates: Vec<TemplateDocument>, options: FillOptions) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started_at: Timestamp::now(),
            sources: Vec::new(),
            manual_entries: Vec::new(),
            templates,
            options,
            schema_overrides: BTreeMap::new(),
            output: None,
        }
    }

    /// The generated DOCX, once [`generate`] has succeeded.
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<Vec<u8>> {
        self.output
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub request_id: Uuid,
    pub started_at: Timestamp,
    pub records: usize,
    pub lookup_keys: usize,
    pub warnings: Vec<EntryWarning>,
    pub sections: Vec<FillReport>,
}

/// Build the merged lookup from every source report and manual entry.
/// Manual entries come last, so they win over extracted values.
pub fn build_lookup(
    ctx: &GenerationContext,
) -> Result<(LookupMap, usize, Vec<EntryWarning>), ExportError> {
    let mut lookup = LookupMap::new();
    let mut record_count = 0;

    for source in &ctx.sources {
        let instrument = get_instrument(&source.instrument_id)
            .ok_or_else(|| InstrumentError::UnknownInstrument(source.instrument_id.clone()))?;
        let schema = ctx
            .schema_overrides
            .get(instrument.id())
            .or_else(|| instrument.schema())
            .ok_or_else(|| InstrumentError::NoTableSchema(instrument.id().to_string()))?;

        let document = read_document(&source.name, &source.bytes)?;
        let records = extract_records(&document, schema);
        info!(
            instrument = instrument.id(),
            source = %source.name,
            records = records.len(),
            "extracted source report"
        );
        record_count += records.len();
        lookup.extend_records(&records);
    }

    let (manual, warnings) = records_from_entries(&ctx.manual_entries)?;
    record_count += manual.len();
    lookup.extend_records(&manual);

    Ok((lookup, record_count, warnings))
}

/// Run a full generation. On success the combined DOCX is stored on the
/// context and a summary is returned.
pub fn generate(ctx: &mut GenerationContext) -> Result<GenerationSummary, ExportError> {
    let span = info_span!("generate", request_id = %ctx.request_id);
    let _enter = span.enter();

    if ctx.templates.is_empty() {
        return Err(ExportError::NoTemplates);
    }

    let (lookup, records, warnings) = build_lookup(ctx)?;
    info!(records, keys = lookup.len(), "built lookup");

    let mut combined: Option<DocxReport> = None;
    let mut sections = Vec::with_capacity(ctx.templates.len());
    for template in &ctx.templates {
        let mut report = DocxReport::from_bytes(&template.name, &template.bytes)?;
        let filled = fill_document(&mut report.document, &lookup, &ctx.options);
        info!(
            template = %template.name,
            substitutions = filled.substitutions,
            "filled section"
        );
        sections.push(filled);

        match combined.as_mut() {
            Some(head) => head.append(report),
            None => combined = Some(report),
        }
    }

    let bytes = combined.ok_or(ExportError::NoTemplates)?.into_bytes()?;
    info!(bytes = bytes.len(), "generated report");
    ctx.output = Some(bytes);

    Ok(GenerationSummary {
        request_id: ctx.request_id,
        started_at: ctx.started_at,
        records,
        lookup_keys: lookup.len(),
        warnings,
        sections,
    })
}
