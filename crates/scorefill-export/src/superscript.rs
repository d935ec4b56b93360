//! Ordinal suffix superscripting ("73rd" → "73" + superscript "rd").

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use scorefill_core::document::{Document, Paragraph, Run};

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(st|nd|rd|th)").expect("ordinal pattern is valid")
});

/// Split a run around every ordinal match. Returns `None` when the run
/// has no match and should be kept as is.
fn split_run(run: &Run) -> Option<Vec<Run>> {
    let mut pieces = Vec::new();
    let mut last_end = 0;

    for caps in ORDINAL.captures_iter(&run.text) {
        let (Some(whole), Some(number), Some(suffix)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last_end {
            pieces.push(plain(run, &run.text[last_end..whole.start()]));
        }
        pieces.push(plain(run, number.as_str()));
        let mut sup = run.derive(suffix.as_str());
        sup.format.superscript = true;
        pieces.push(sup);
        last_end = whole.end();
    }

    if pieces.is_empty() {
        return None;
    }
    if last_end < run.text.len() {
        pieces.push(plain(run, &run.text[last_end..]));
    }
    if let Some(tail) = pieces.last_mut() {
        tail.inline = run.inline;
    }
    Some(pieces)
}

fn plain(source: &Run, text: &str) -> Run {
    let mut run = source.derive(text);
    run.format.superscript = false;
    run
}

/// Rebuild a paragraph's runs with ordinal suffixes split out and
/// superscripted. Returns the number of suffixes found.
pub fn superscript_paragraph(paragraph: &mut Paragraph) -> usize {
    if !paragraph.runs().iter().any(|r| ORDINAL.is_match(&r.text)) {
        return 0;
    }

    let mut found = 0;
    let mut rebuilt = Vec::with_capacity(paragraph.runs().len() + 2);
    for run in paragraph.runs() {
        match split_run(run) {
            Some(pieces) => {
                found += pieces.iter().filter(|p| p.format.superscript).count();
                rebuilt.extend(pieces);
            }
            None => rebuilt.push(run.clone()),
        }
    }
    rebuilt.retain(|r| !r.text.is_empty() || r.inline.is_some());

    paragraph.replace_runs(rebuilt);
    found
}

/// Superscript ordinal suffixes in body and table-cell paragraphs.
pub fn superscript_document(document: &mut Document) -> usize {
    let mut found = 0;
    document.for_each_paragraph_mut(&mut |p| {
        found += superscript_paragraph(p);
    });
    info!(suffixes = found, "superscripted ordinal suffixes");
    found
}
