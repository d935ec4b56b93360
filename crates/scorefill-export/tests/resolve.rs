use scorefill_core::document::{Document, Paragraph, Run, Table, Row, Cell};
use scorefill_core::models::lookup::LookupMap;
use scorefill_export::resolve::{Placeholders, resolve_document, resolve_paragraph, resolve_runs};

fn lookup(pairs: &[(&str, &str)]) -> LookupMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn runs(texts: &[&str]) -> Vec<Run> {
    texts.iter().map(|t| Run::new(*t)).collect()
}

fn texts(runs: &[Run]) -> Vec<&str> {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[test]
fn token_split_across_three_runs_is_resolved() {
    let map = lookup(&[("Reading Comprehension Percentile", "73")]);
    let mut r = runs(&["Score: {{Read", "ing Comprehension Perc", "entile}} end"]);

    let n = resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(n, 1);
    assert_eq!(r.len(), 3);
    assert_eq!(r.iter().map(|r| r.text.as_str()).collect::<String>(), "Score: 73 end");
}

#[test]
fn leading_runs_keep_their_lengths() {
    let map = lookup(&[("Spelling Classification", "Average")]);
    let mut r = runs(&["A ", "{{Spelling Classification}}", " tail"]);

    resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(texts(&r), vec!["A ", "Average", " tail"]);
}

#[test]
fn formatting_stays_with_its_run() {
    let map = lookup(&[("Spelling Percentile", "37")]);
    let mut r = vec![
        Run::new("Label: ").bold(),
        Run::new("{{Spelling Percentile}}").italic(),
    ];

    resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(r[0].text, "Label: ");
    assert_eq!(r[0].format.bold, Some(true));
    assert_eq!(r[1].text, "37");
    assert_eq!(r[1].format.italic, Some(true));
}

#[test]
fn several_tokens_in_one_run() {
    let map = lookup(&[("A Percentile", "10"), ("B Percentile", "20")]);
    let mut p = Paragraph::with_text("{{A Percentile}} and {{B Percentile}}");

    let n = resolve_paragraph(&mut p, &Placeholders::new(&map));

    assert_eq!(n, 2);
    assert_eq!(p.text(), "10 and 20");
}

#[test]
fn second_token_starting_in_resolved_run() {
    let map = lookup(&[("A Percentile", "1"), ("B Percentile", "2")]);
    let mut r = runs(&["{{A Percentile}} {{B", " Percentile}}"]);

    let n = resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(n, 2);
    assert_eq!(r.iter().map(|r| r.text.as_str()).collect::<String>(), "1 2");
}

#[test]
fn opening_braces_split_by_write_back() {
    let map = lookup(&[("A", "a"), ("B", "b")]);
    let mut r = runs(&["{{A", "}} {{B", "}}"]);

    let n = resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(n, 2);
    assert_eq!(r.iter().map(|r| r.text.as_str()).collect::<String>(), "a b");
}

#[test]
fn single_brace_left_at_window_end() {
    let map = lookup(&[("A", "a"), ("B", "b")]);
    let mut r = runs(&["{{A}} {", "{B}}"]);

    let n = resolve_runs(&mut r, &Placeholders::new(&map));

    assert_eq!(n, 2);
    assert_eq!(r.iter().map(|r| r.text.as_str()).collect::<String>(), "a b");
}

#[test]
fn stray_open_brace_does_not_loop() {
    let map = lookup(&[("A", "a")]);
    let mut r = runs(&["{{A}} {", " plain"]);

    assert_eq!(resolve_runs(&mut r, &Placeholders::new(&map)), 1);
    assert_eq!(r.iter().map(|r| r.text.as_str()).collect::<String>(), "a { plain");
}

#[test]
fn ordinal_key_is_distinct_from_plain_percentile() {
    let map = lookup(&[
        ("Spelling Percentile", "37"),
        ("Spelling Percentile*", "37th"),
    ]);
    let mut p = Paragraph::with_text("{{Spelling Percentile}} / {{Spelling Percentile*}}");

    resolve_paragraph(&mut p, &Placeholders::new(&map));

    assert_eq!(p.text(), "37 / 37th");
}

#[test]
fn unknown_tokens_are_left_alone() {
    let map = lookup(&[("Spelling Percentile", "37")]);
    let mut p = Paragraph::from_runs(runs(&["{{Math ", "Fluency Percentile}}"]));

    let n = resolve_paragraph(&mut p, &Placeholders::new(&map));

    assert_eq!(n, 0);
    assert_eq!(texts(p.runs()), vec!["{{Math ", "Fluency Percentile}}"]);
}

#[test]
fn resolving_twice_changes_nothing() {
    let map = lookup(&[("Spelling Percentile", "37")]);
    let mut p = Paragraph::from_runs(runs(&["x {{Spell", "ing Percentile}} y"]));

    let placeholders = Placeholders::new(&map);
    resolve_paragraph(&mut p, &placeholders);
    let once = p.clone();
    let n = resolve_paragraph(&mut p, &placeholders);

    assert_eq!(n, 0);
    assert_eq!(p, once);
}

#[test]
fn document_resolution_reaches_table_cells() {
    let map = lookup(&[("Spelling Classification", "Low Average")]);
    let cell = Cell::new().add_paragraph(Paragraph::with_text("{{Spelling Classification}}"));
    let mut doc = Document::new()
        .add_paragraph(Paragraph::with_text("Body {{Spelling Classification}}"))
        .add_table(Table::new(vec![Row::new(vec![cell])]));

    let n = resolve_document(&mut doc, &map);

    assert_eq!(n, 2);
    assert_eq!(doc.plain_text(), "Body Low Average\nLow Average");
}

#[test]
fn empty_lookup_is_a_no_op() {
    let map = LookupMap::new();
    let mut doc = Document::new().add_paragraph(Paragraph::with_text("{{Anything}}"));
    let before = doc.clone();

    assert_eq!(resolve_document(&mut doc, &map), 0);
    assert_eq!(doc, before);
}
