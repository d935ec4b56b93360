//! Post-fill cleanup: prune table rows that could not be filled and flag
//! any leftover tokens for the reviewer.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::info;

use scorefill_core::document::{Document, HighlightColor, Paragraph, Row, Table};
use scorefill_core::models::score::MISSING_MARKER;

static UNRESOLVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeSummary {
    pub missing_rows: usize,
    pub unresolved_rows: usize,
    pub highlighted_runs: usize,
}

fn delete_rows_where(document: &mut Document, pred: impl Fn(&Row) -> bool) -> usize {
    let mut removed = 0;
    document.for_each_table_mut(&mut |table: &mut Table| {
        let doomed: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| pred(row))
            .map(|(idx, _)| idx)
            .collect();
        removed += table.remove_rows(doomed);
    });
    removed
}

/// Delete every row with a cell whose trimmed text is exactly the missing
/// marker.
pub fn delete_missing_rows(document: &mut Document) -> usize {
    delete_rows_where(document, |row| {
        row.cells.iter().any(|c| c.text().trim() == MISSING_MARKER)
    })
}

/// Delete every row with a cell still holding a `{{...}}` token.
pub fn delete_unresolved_rows(document: &mut Document) -> usize {
    delete_rows_where(document, |row| {
        row.cells.iter().any(|c| UNRESOLVED.is_match(&c.text()))
    })
}

/// Highlight every run overlapping a `{{...}}` token or a missing marker
/// in the paragraph's concatenated text. Returns the number of runs marked.
pub fn highlight_paragraph(paragraph: &mut Paragraph, color: HighlightColor) -> usize {
    let text = paragraph.text();
    let spans: Vec<(usize, usize)> = UNRESOLVED
        .find_iter(&text)
        .map(|m| (m.start(), m.end()))
        .chain(text.match_indices(MISSING_MARKER).map(|(i, m)| (i, i + m.len())))
        .collect();
    if spans.is_empty() {
        return 0;
    }

    let mut marked = 0;
    let mut pos = 0;
    for run in paragraph.runs_mut() {
        let end = pos + run.text.len();
        if spans.iter().any(|&(start, stop)| start < end && stop > pos) {
            run.format.highlight = Some(color);
            marked += 1;
        }
        pos = end;
    }
    marked
}

pub fn highlight_unresolved(document: &mut Document, color: HighlightColor) -> usize {
    let mut marked = 0;
    document.for_each_paragraph_mut(&mut |p| marked += highlight_paragraph(p, color));
    marked
}

/// Row deletion for missing markers, then for unresolved tokens, then the
/// highlighting pass over whatever survives.
pub fn sanitize_document(document: &mut Document, color: HighlightColor) -> SanitizeSummary {
    let summary = SanitizeSummary {
        missing_rows: delete_missing_rows(document),
        unresolved_rows: delete_unresolved_rows(document),
        highlighted_runs: highlight_unresolved(document, color),
    };
    info!(
        missing_rows = summary.missing_rows,
        unresolved_rows = summary.unresolved_rows,
        highlighted_runs = summary.highlighted_runs,
        "sanitized document"
    );
    summary
}
