use scorefill_core::document::{Document, Paragraph, Row, Table};
use scorefill_instruments::extract::{
    dedupe_by_name, extract_pairs, extract_records, extract_table, sanitize_name,
};
use scorefill_instruments::get_instrument;
use scorefill_instruments::schema::{
    ColumnLayout, ExtractionSchema, HeaderPolicy, TableSelection,
};
use scorefill_core::models::score::RawScore;

fn table(rows: &[&[&str]]) -> Table {
    Table::new(rows.iter().map(|r| Row::from_texts(r)).collect())
}

fn filler() -> Table {
    table(&[&["cover"]])
}

const HEADER5: &[&str] = &["Subtest", "Raw", "SS", "CI", "PR"];

fn wiat_doc() -> Document {
    Document::new()
        .add_paragraph(Paragraph::with_text("Score Report"))
        .add_table(filler())
        .add_table(filler())
        .add_table(table(&[
            HEADER5,
            &["Reading Comprehension", "31", "109", "100-118", "73"],
            &["Word Reading (WR)", "40", "95", "89-101", "37"],
        ]))
        .add_table(table(&[
            HEADER5,
            &["Reading Comprehension", "0", "0", "0", "1"],
            &["Spelling", "-", "-", "-", "-"],
        ]))
}

#[test]
fn sanitize_name_keeps_letters_and_spaces() {
    assert_eq!(sanitize_name(" Word Reading (WR)² "), "Word Reading WR");
    assert_eq!(sanitize_name("Math-Fluency: Addition"), "MathFluency Addition");
    assert_eq!(sanitize_name("123"), "");
}

#[test]
fn wiat_extraction_reads_column_four_and_dedupes() {
    let wiat = get_instrument("wiat4").unwrap();
    let records = wiat.extract(&wiat_doc());

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Reading Comprehension", "Word Reading WR", "Spelling"]);

    let reading = &records[0];
    assert_eq!(reading.percentile, "73");
    assert_eq!(reading.classification, "Average");
    assert_eq!(reading.percentile_ordinal, "73rd");

    let spelling = &records[2];
    assert_eq!(spelling.percentile, "#");
    assert_eq!(spelling.classification, "#");
}

#[test]
fn single_row_table_is_data_when_header_optional() {
    let grid = vec![vec![
        "Math Fluency".to_string(),
        String::new(),
        String::new(),
        String::new(),
        "42".to_string(),
    ]];
    let rows = extract_table(
        &grid,
        ColumnLayout {
            name: 0,
            percentile: 4,
        },
        HeaderPolicy::DropWhenMultiRow,
    )
    .unwrap();
    assert_eq!(
        rows,
        vec![RawScore {
            name: "Math Fluency".to_string(),
            percentile: "42".to_string(),
        }]
    );

    let required = extract_table(
        &grid,
        ColumnLayout {
            name: 0,
            percentile: 4,
        },
        HeaderPolicy::Required,
    );
    assert!(required.is_none());
}

#[test]
fn narrow_tables_are_skipped() {
    let doc = Document::new().add_table(table(&[
        &["Subtest", "Raw", "PR"],
        &["Spelling", "12", "50"],
    ]));
    let schema = ExtractionSchema {
        tables: TableSelection::All,
        columns: ColumnLayout {
            name: 0,
            percentile: 2,
        },
        overrides: vec![],
        header: HeaderPolicy::DropWhenMultiRow,
    };
    assert!(extract_pairs(&doc, &schema).is_empty());
}

#[test]
fn missing_table_indices_are_ignored() {
    let doc = Document::new().add_table(filler());
    let wiat = get_instrument("wiat4").unwrap();
    assert!(wiat.extract(&doc).is_empty());
}

#[test]
fn wisc_sixth_table_uses_column_four() {
    let header6: &[&str] = &["Scale", "Subtest", "Raw", "Scaled", "PR", "Extra"];
    let mut doc = Document::new();
    for _ in 0..5 {
        doc = doc.add_table(table(&[&["only one row"]]));
    }
    doc = doc
        .add_table(table(&[
            &["Scale", "Subtest", "Raw", "Scaled", "PR"],
            &["VC", "Similarities", "20", "11", "63"],
        ]))
        .add_table(table(&[
            header6,
            &["VC", "Vocabulary", "25", "12", "ignored", "75"],
            &["FSIQ", "Full Scale IQ", "-", "104", "x", "61"],
        ]))
        .add_table(table(&[
            &["Scale", "Subtest", "Raw", "Scaled", "PR"],
            &["WM", "Digit Span", "22", "10", "50"],
        ]));

    let wisc = get_instrument("wisc5").unwrap();
    let records = wisc.extract(&doc);
    let pairs: Vec<_> = records
        .iter()
        .map(|r| (r.name.as_str(), r.percentile.as_str()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Similarities", "63"),
            ("Vocabulary", "75"),
            ("Full Scale IQ", "61"),
        ]
    );
}

#[test]
fn dedupe_drops_empty_names_and_later_duplicates() {
    let pairs = vec![
        RawScore {
            name: "Spelling".to_string(),
            percentile: "50".to_string(),
        },
        RawScore {
            name: String::new(),
            percentile: "10".to_string(),
        },
        RawScore {
            name: "Spelling".to_string(),
            percentile: "99".to_string(),
        },
    ];
    let unique = dedupe_by_name(pairs);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].percentile, "50");
}

#[test]
fn schema_round_trips_through_json_config() {
    let json = r#"{
        "tables": {"indices": [2, 4, 9]},
        "columns": {"name": 0, "percentile": 4}
    }"#;
    let schema: ExtractionSchema = serde_json::from_str(json).unwrap();
    assert_eq!(schema.tables, TableSelection::Indices(vec![2, 4, 9]));
    assert_eq!(schema.header, HeaderPolicy::DropWhenMultiRow);
    // Only table 2 exists among the listed indices.
    assert_eq!(extract_records(&wiat_doc(), &schema).len(), 2);
}
