//! Hand-entered scores for instruments without an uploadable report.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

use scorefill_core::models::score::{RawScore, ScoreRecord};

use crate::error::InstrumentError;
use crate::extract::sanitize_name;
use crate::get_instrument;
use crate::scoring::derive_record;

/// One manually entered score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub instrument: String,
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub percentile: String,
}

/// A non-fatal problem with a manual entry.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct EntryWarning {
    pub instrument_id: String,
    pub name: String,
    pub message: String,
}

impl FromStr for ManualEntry {
    type Err = InstrumentError;

    /// Parses `instrument:Name=percentile`, e.g. `champ:Lists=37`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InstrumentError::InvalidEntry(s.to_string());
        let (instrument, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (name, percentile) = rest.rsplit_once('=').ok_or_else(invalid)?;
        if instrument.trim().is_empty() || name.trim().is_empty() {
            return Err(invalid());
        }
        Ok(ManualEntry {
            instrument: instrument.trim().to_string(),
            name: name.trim().to_string(),
            percentile: percentile.trim().to_string(),
        })
    }
}

/// Parse a JSON list of entries. Percentiles may be strings or numbers.
pub fn parse_entries_json(json: &str) -> Result<Vec<ManualEntry>, InstrumentError> {
    Ok(serde_json::from_str(json)?)
}

/// Turn manual entries into records, validating each against its
/// instrument. Unknown instrument ids are an error; everything else
/// degrades to a warning. Later entries for the same name replace
/// earlier ones.
pub fn records_from_entries(
    entries: &[ManualEntry],
) -> Result<(Vec<ScoreRecord>, Vec<EntryWarning>), InstrumentError> {
    let mut records: Vec<ScoreRecord> = Vec::new();
    let mut warnings = Vec::new();

    for entry in entries {
        let instrument = get_instrument(&entry.instrument)
            .ok_or_else(|| InstrumentError::UnknownInstrument(entry.instrument.clone()))?;

        for warning in instrument.validate_entries(std::slice::from_ref(entry)) {
            warn!(instrument = %warning.instrument_id, name = %warning.name, "{warning}");
            warnings.push(warning);
        }

        let name = sanitize_name(&entry.name);
        if name.is_empty() {
            continue;
        }
        let record = derive_record(&RawScore {
            name,
            percentile: entry.percentile.clone(),
        });
        match records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    Ok((records, warnings))
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Value::deserialize(deserializer)? {
        Value::Text(s) => s,
        Value::Number(n) => n.to_string(),
    })
}
