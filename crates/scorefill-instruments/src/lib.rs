//! scorefill-instruments
//!
//! Assessment instrument definitions, percentile scoring, and score
//! extraction. Pure data and text processing, no file-format dependency.

pub mod error;
pub mod extract;
pub mod instruments;
pub mod manual;
pub mod schema;
pub mod scoring;

use scorefill_core::document::Document;
use scorefill_core::models::score::ScoreRecord;

use manual::{EntryWarning, ManualEntry};
use schema::ExtractionSchema;

/// Trait implemented by each supported assessment instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "wiat4", "beery").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "WIAT-4").
    fn name(&self) -> &str;

    /// Where this instrument's score report keeps its percentiles.
    /// `None` means scores are entered by hand.
    fn schema(&self) -> Option<&ExtractionSchema> {
        None
    }

    /// Score names the instrument reports, letters and spaces only.
    fn subtests(&self) -> &[&'static str] {
        &[]
    }

    /// Check manual entries addressed to this instrument.
    fn validate_entries(&self, entries: &[ManualEntry]) -> Vec<EntryWarning> {
        let mut warnings = Vec::new();
        for entry in entries.iter().filter(|e| e.instrument == self.id()) {
            let name = extract::sanitize_name(&entry.name);
            let known = self.subtests();
            if !known.is_empty() && !known.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                warnings.push(EntryWarning {
                    instrument_id: self.id().to_string(),
                    name: name.clone(),
                    message: format!("{}: '{}' is not a known score name", self.name(), name),
                });
            }
            if scoring::parse_percentile(&entry.percentile).is_none() {
                warnings.push(EntryWarning {
                    instrument_id: self.id().to_string(),
                    name: name.clone(),
                    message: format!(
                        "{}: percentile '{}' for {} is not numeric and will be marked missing",
                        self.name(),
                        entry.percentile,
                        name,
                    ),
                });
            }
        }
        warnings
    }

    /// Extract records from an uploaded report using this instrument's
    /// built-in schema. Manual-entry instruments extract nothing.
    fn extract(&self, document: &Document) -> Vec<ScoreRecord> {
        match self.schema() {
            Some(schema) => extract::extract_records(document, schema),
            None => Vec::new(),
        }
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::wiat4::Wiat4),
        Box::new(instruments::wisc5::Wisc5),
        Box::new(instruments::champ::Champ),
        Box::new(instruments::beery::Beery),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}
