//! Placeholder resolution across formatting runs.
//!
//! A `{{key}}` token in a template is frequently split by the word
//! processor over several runs (spell-check boundaries, partial edits).
//! Resolution works on a growing window of concatenated run text and writes
//! the substituted text back over the same runs, so run count, order and
//! formatting are untouched.
//!
//! When several keys occur in one window they are all substituted, one key
//! at a time in lookup order, rather than only the first key found.
//!
//! Write-back can leave the opening braces of a later token in an earlier
//! run of the window, so the scan restarts at the run holding the last
//! unclosed `{{` (or a trailing `{`).

use tracing::info;

use scorefill_core::document::{Document, Paragraph, Run};
use scorefill_core::models::lookup::LookupMap;
use scorefill_core::models::score::placeholder;

/// Prepared `(token, value)` pairs in lookup order.
pub struct Placeholders<'a> {
    tokens: Vec<(String, &'a str)>,
}

impl<'a> Placeholders<'a> {
    pub fn new(lookup: &'a LookupMap) -> Self {
        Self {
            tokens: lookup
                .iter()
                .map(|(key, value)| (placeholder(key), value))
                .collect(),
        }
    }

    fn any_in(&self, text: &str) -> bool {
        self.tokens.iter().any(|(token, _)| text.contains(token.as_str()))
    }

    /// Replace every occurrence of every token present in `text`, one key
    /// at a time in lookup order. Returns the new text and the number of
    /// replaced occurrences.
    fn substitute(&self, text: &str) -> (String, usize) {
        let mut out = text.to_string();
        let mut count = 0;
        for (token, value) in &self.tokens {
            let hits = out.matches(token.as_str()).count();
            if hits > 0 {
                out = out.replace(token.as_str(), value);
                count += hits;
            }
        }
        (out, count)
    }
}

/// Write `text` back over `runs`: every run but the last receives exactly
/// as many characters as it held before; the last takes the remainder.
fn redistribute(runs: &mut [Run], text: &str) {
    let Some((last, head)) = runs.split_last_mut() else {
        return;
    };
    let mut chars = text.chars();
    for run in head {
        let len = run.char_len();
        run.text = chars.by_ref().take(len).collect();
    }
    last.text = chars.collect();
}

/// Index into `runs` of the run holding the start of a token that `text`
/// opens but does not close. `text` is the runs' concatenation.
fn open_token_run(runs: &[Run], text: &str) -> Option<usize> {
    let byte = match text.rfind("{{") {
        Some(pos) if !text[pos..].contains("}}") => pos,
        _ if text.ends_with('{') => text.len() - 1,
        _ => return None,
    };

    let mut offset = text[..byte].chars().count();
    for (k, run) in runs.iter().enumerate() {
        let len = run.char_len();
        if offset < len {
            return Some(k);
        }
        offset -= len;
    }
    runs.len().checked_sub(1)
}

/// Resolve placeholders within one run sequence. Returns the number of
/// substituted occurrences.
pub fn resolve_runs(runs: &mut [Run], placeholders: &Placeholders<'_>) -> usize {
    let mut substituted = 0;
    let mut i = 0;
    let mut restarted = None;

    while i < runs.len() {
        let mut window = String::new();
        let mut matched = None;
        for j in i..runs.len() {
            window.push_str(&runs[j].text);
            if placeholders.any_in(&window) {
                matched = Some(j);
                break;
            }
        }

        let Some(j) = matched else {
            i += 1;
            continue;
        };

        let (replaced, count) = placeholders.substitute(&window);
        redistribute(&mut runs[i..=j], &replaced);
        substituted += count;

        // Restarting at the same index is allowed once.
        i = match open_token_run(&runs[i..=j], &replaced).map(|k| i + k) {
            Some(start) if start > i || restarted != Some(i) => {
                restarted = Some(start);
                start
            }
            _ => j + 1,
        };
    }

    substituted
}

pub fn resolve_paragraph(paragraph: &mut Paragraph, placeholders: &Placeholders<'_>) -> usize {
    if !paragraph.text().contains("{{") {
        return 0;
    }
    resolve_runs(paragraph.runs_mut(), placeholders)
}

/// Resolve every placeholder in body and table-cell paragraphs.
pub fn resolve_document(document: &mut Document, lookup: &LookupMap) -> usize {
    let placeholders = Placeholders::new(lookup);
    let mut substituted = 0;
    document.for_each_paragraph_mut(&mut |p| {
        substituted += resolve_paragraph(p, &placeholders);
    });
    info!(keys = lookup.len(), substituted, "resolved placeholders");
    substituted
}
