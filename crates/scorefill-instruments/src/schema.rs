use serde::{Deserialize, Serialize};

/// Tables narrower than this are never read.
pub const MIN_COLUMNS: usize = 5;

/// Which tables of a source report carry scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSelection {
    /// Zero-based table indices, visited in the listed order.
    Indices(Vec<usize>),
    All,
}

/// Positional columns holding the score name and its percentile rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub name: usize,
    pub percentile: usize,
}

/// Column layout for one specific table that deviates from the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOverride {
    pub table: usize,
    pub columns: ColumnLayout,
}

/// How the first row of a table is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Row 0 is a header only when the table has more than one row;
    /// a single-row table is read as data.
    #[default]
    DropWhenMultiRow,
    /// Row 0 is always a header; single-row tables are skipped.
    Required,
}

/// Declarative description of where a report variant keeps its scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    pub tables: TableSelection,
    pub columns: ColumnLayout,
    #[serde(default)]
    pub overrides: Vec<TableOverride>,
    #[serde(default)]
    pub header: HeaderPolicy,
}

impl ExtractionSchema {
    pub fn columns_for(&self, table: usize) -> ColumnLayout {
        self.overrides
            .iter()
            .find(|o| o.table == table)
            .map(|o| o.columns)
            .unwrap_or(self.columns)
    }

    /// Indices to visit for a document with `table_count` tables. Indices
    /// past the end are dropped.
    pub fn table_indices(&self, table_count: usize) -> Vec<usize> {
        match &self.tables {
            TableSelection::Indices(indices) => indices
                .iter()
                .copied()
                .filter(|&i| i < table_count)
                .collect(),
            TableSelection::All => (0..table_count).collect(),
        }
    }
}
