use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Marker written in place of any value that could not be derived.
/// Template rows containing it are pruned; stray occurrences are highlighted.
pub const MISSING_MARKER: &str = "#";

/// Intermediate "not available" value produced by scoring before it is
/// rewritten to [`MISSING_MARKER`].
pub const NOT_AVAILABLE: &str = "-";

/// The per-score fields a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreField {
    Classification,
    Percentile,
    /// Percentile with its ordinal suffix, e.g. "73rd".
    #[serde(rename = "Percentile*")]
    PercentileOrdinal,
}

impl ScoreField {
    pub const ALL: [ScoreField; 3] = [
        ScoreField::Classification,
        ScoreField::Percentile,
        ScoreField::PercentileOrdinal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreField::Classification => "Classification",
            ScoreField::Percentile => "Percentile",
            ScoreField::PercentileOrdinal => "Percentile*",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoreField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// Lookup key for one field of a named score: `"<name> <field>"`.
pub fn lookup_key(name: &str, field: ScoreField) -> String {
    format!("{name} {field}")
}

/// The literal token a template uses for `key`: `"{{key}}"`.
pub fn placeholder(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// A (name, raw percentile) pair as read from a source table or entered
/// by hand, before any derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScore {
    pub name: String,
    pub percentile: String,
}

/// A fully derived score, ready to be flattened into a lookup map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub percentile: String,
    pub classification: String,
    #[serde(rename = "percentile*")]
    pub percentile_ordinal: String,
}

impl ScoreRecord {
    pub fn value(&self, field: ScoreField) -> &str {
        match field {
            ScoreField::Classification => &self.classification,
            ScoreField::Percentile => &self.percentile,
            ScoreField::PercentileOrdinal => &self.percentile_ordinal,
        }
    }

    /// `(lookup key, display value)` for each field.
    pub fn entries(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        ScoreField::ALL
            .into_iter()
            .map(|field| (lookup_key(&self.name, field), self.value(field)))
    }
}
