//! Field extraction from score tables.
//!
//! Reads the designated tables of a source report as plain text grids,
//! selects the name and percentile columns named by an
//! [`ExtractionSchema`], and derives one [`ScoreRecord`] per distinct name.

use std::collections::HashSet;

use tracing::{debug, info};

use scorefill_core::document::Document;
use scorefill_core::models::score::{RawScore, ScoreRecord};

use crate::schema::{ColumnLayout, ExtractionSchema, HeaderPolicy, MIN_COLUMNS};
use crate::scoring::derive_record;

/// Keep ASCII letters and whitespace only, then trim.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Read one table grid. Returns `None` when the table is skipped for
/// missing a header or lacking the required columns.
pub fn extract_table(
    grid: &[Vec<String>],
    columns: ColumnLayout,
    header: HeaderPolicy,
) -> Option<Vec<RawScore>> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let body = match header {
        HeaderPolicy::DropWhenMultiRow if grid.len() > 1 => &grid[1..],
        HeaderPolicy::DropWhenMultiRow => grid,
        HeaderPolicy::Required if grid.len() > 1 => &grid[1..],
        HeaderPolicy::Required => return None,
    };

    if width < MIN_COLUMNS || columns.name >= width || columns.percentile >= width {
        return None;
    }

    let cell = |row: &Vec<String>, idx: usize| row.get(idx).cloned().unwrap_or_default();
    Some(
        body.iter()
            .map(|row| RawScore {
                name: sanitize_name(&cell(row, columns.name)),
                percentile: cell(row, columns.percentile),
            })
            .collect(),
    )
}

/// Collect (name, percentile) pairs from every designated table, in
/// table order. Missing or undersized tables contribute nothing.
pub fn extract_pairs(document: &Document, schema: &ExtractionSchema) -> Vec<RawScore> {
    let tables: Vec<_> = document.tables().collect();
    let mut pairs = Vec::new();

    for idx in schema.table_indices(tables.len()) {
        let grid = tables[idx].grid();
        match extract_table(&grid, schema.columns_for(idx), schema.header) {
            Some(rows) => {
                debug!(table = idx, rows = rows.len(), "extracted score rows");
                pairs.extend(rows);
            }
            None => debug!(
                table = idx,
                rows = grid.len(),
                "skipping table without the expected header or columns"
            ),
        }
    }

    pairs
}

/// Drop empty names and keep only the first occurrence of each name.
pub fn dedupe_by_name(pairs: Vec<RawScore>) -> Vec<RawScore> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|p| !p.name.is_empty() && seen.insert(p.name.clone()))
        .collect()
}

pub fn derive_records(pairs: &[RawScore]) -> Vec<ScoreRecord> {
    pairs.iter().map(derive_record).collect()
}

/// Full extraction: pairs → dedupe → derived records.
pub fn extract_records(document: &Document, schema: &ExtractionSchema) -> Vec<ScoreRecord> {
    let pairs = extract_pairs(document, schema);
    let found = pairs.len();
    let unique = dedupe_by_name(pairs);
    info!(found, unique = unique.len(), "extracted scores");
    derive_records(&unique)
}
