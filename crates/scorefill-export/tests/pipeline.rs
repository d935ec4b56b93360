use std::io::Cursor;

use docx_rs::{Docx, Paragraph as DocxParagraph, Run as DocxRun, Table as DocxTable, TableCell, TableRow};

use scorefill_core::document::{Document, HighlightColor, Paragraph, Row, Run, Table};
use scorefill_core::models::lookup::LookupMap;
use scorefill_core::models::score::RawScore;
use scorefill_export::docx::DocxReport;
use scorefill_export::error::ExportError;
use scorefill_export::options::FillOptions;
use scorefill_export::pipeline::{
    GenerationContext, SourceDocument, TemplateDocument, fill_document, generate,
};
use scorefill_instruments::manual::ManualEntry;
use scorefill_instruments::scoring::derive_record;

fn lookup_for(scores: &[(&str, &str)]) -> LookupMap {
    let mut lookup = LookupMap::new();
    let records: Vec<_> = scores
        .iter()
        .map(|(name, pr)| {
            derive_record(&RawScore {
                name: name.to_string(),
                percentile: pr.to_string(),
            })
        })
        .collect();
    lookup.extend_records(&records);
    lookup
}

fn template() -> Document {
    Document::new()
        .add_paragraph(Paragraph::from_runs(vec![
            Run::new("Reading comprehension fell at the {{Reading Compre"),
            Run::new("hension Percentile*}} percentile ("),
            Run::new("{{Reading Comprehension Classification}}"),
            Run::new(")."),
        ]))
        .add_table(Table::new(vec![
            Row::from_texts(&["Subtest", "PR", "Range"]),
            Row::from_texts(&[
                "Reading Comprehension",
                "{{Reading Comprehension Percentile}}",
                "{{Reading Comprehension Classification}}",
            ]),
            Row::from_texts(&["Spelling", "{{Spelling Percentile}}", "{{Spelling Classification}}"]),
            Row::from_texts(&["Math Fluency", "{{Math Fluency Percentile}}", "x"]),
        ]))
}

#[test]
fn fill_resolves_superscripts_and_prunes() {
    let lookup = lookup_for(&[("Reading Comprehension", "73"), ("Spelling", "-")]);
    let mut doc = template();

    let report = fill_document(&mut doc, &lookup, &FillOptions::default());

    assert_eq!(report.substitutions, 6);
    assert_eq!(report.sanitize.missing_rows, 1);
    assert_eq!(report.sanitize.unresolved_rows, 1);

    let Some(scorefill_core::document::Block::Paragraph(intro)) = doc.blocks.first() else {
        panic!("first block should be the intro paragraph");
    };
    assert_eq!(
        intro.text(),
        "Reading comprehension fell at the 73rd percentile (Average)."
    );
    let rd = intro.runs().iter().find(|r| r.text == "rd").unwrap();
    assert!(rd.format.superscript);

    let table = doc.tables().next().unwrap();
    assert_eq!(
        table.grid(),
        vec![
            vec!["Subtest", "PR", "Range"],
            vec!["Reading Comprehension", "73", "Average"],
        ]
    );
}

#[test]
fn superscripting_can_be_turned_off() {
    let lookup = lookup_for(&[("Reading Comprehension", "73")]);
    let mut doc = template();
    let options = FillOptions {
        superscript_ordinals: false,
        ..FillOptions::default()
    };

    let report = fill_document(&mut doc, &lookup, &options);

    assert_eq!(report.superscripts, 0);
    let mut any_raised = false;
    doc.for_each_paragraph(&mut |p| {
        any_raised |= p.runs().iter().any(|r| r.format.superscript);
    });
    assert!(!any_raised);
}

fn pack(docx: Docx) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    buf.into_inner()
}

fn text_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(DocxParagraph::new().add_run(DocxRun::new().add_text(text)))
}

fn docx_table(rows: &[&[&str]]) -> DocxTable {
    DocxTable::new(
        rows.iter()
            .map(|r| TableRow::new(r.iter().map(|t| text_cell(t)).collect()))
            .collect(),
    )
}

fn wiat_report() -> Vec<u8> {
    let header: &[&str] = &["Subtest", "Raw", "SS", "CI", "PR"];
    pack(
        Docx::new()
            .add_table(docx_table(&[&["Examinee"]]))
            .add_table(docx_table(&[&["Examiner"]]))
            .add_table(docx_table(&[
                header,
                &["Reading Comprehension", "31", "109", "100-118", "73"],
                &["Spelling", "-", "-", "-", "-"],
            ])),
    )
}

fn wiat_template() -> Vec<u8> {
    pack(
        Docx::new()
            .add_paragraph(DocxParagraph::new().add_run(
                DocxRun::new().add_text("Reading: {{Reading Comprehension Percentile*}}"),
            ))
            .add_paragraph(
                DocxParagraph::new().add_run(DocxRun::new().add_text("{{Unknown Field}}")),
            )
            .add_table(docx_table(&[
                &["Subtest", "Range"],
                &["Reading Comprehension", "{{Reading Comprehension Classification}}"],
                &["Spelling", "{{Spelling Classification}}"],
            ])),
    )
}

fn champ_template() -> Vec<u8> {
    pack(Docx::new().add_paragraph(
        DocxParagraph::new().add_run(DocxRun::new().add_text("Lists: {{Lists Classification}}")),
    ))
}

#[test]
fn docx_round_trip_keeps_text() {
    let bytes = wiat_template();

    let report = DocxReport::from_bytes("template.docx", &bytes).unwrap();
    let expected = report.document.plain_text();
    let reread = DocxReport::from_bytes("again.docx", &report.into_bytes().unwrap()).unwrap();

    assert_eq!(reread.document.plain_text(), expected);
    assert_eq!(reread.document.tables().count(), 1);
}

#[test]
fn generate_fills_and_concatenates_sections() {
    let mut ctx = GenerationContext::new(
        vec![
            TemplateDocument {
                name: "wiat.docx".into(),
                bytes: wiat_template(),
            },
            TemplateDocument {
                name: "champ.docx".into(),
                bytes: champ_template(),
            },
        ],
        FillOptions::default(),
    );
    ctx.sources.push(SourceDocument {
        instrument_id: "wiat4".into(),
        name: "wiat-report.docx".into(),
        bytes: wiat_report(),
    });
    ctx.manual_entries.push("champ:Lists=12".parse::<ManualEntry>().unwrap());

    let summary = generate(&mut ctx).unwrap();
    assert_eq!(summary.sections.len(), 2);
    assert_eq!(summary.records, 3);

    let output = DocxReport::from_bytes("out.docx", ctx.output().unwrap()).unwrap();
    let text = output.document.plain_text();
    assert!(text.contains("Reading: 73rd"), "{text}");
    assert!(text.contains("Average"), "{text}");
    assert!(text.contains("Lists: Low Average"), "{text}");
    assert!(!text.contains("Spelling"), "{text}");
    assert_eq!(text.matches("{{").count(), 1, "{text}");

    let mut runs = Vec::new();
    output
        .document
        .for_each_paragraph(&mut |p| runs.extend(p.runs().iter().cloned()));

    let rd = runs.iter().find(|r| r.text == "rd").unwrap();
    assert!(rd.format.superscript);
    assert!(runs.iter().filter(|r| r.text.ends_with("73")).all(|r| !r.format.superscript));

    let leftover = runs.iter().find(|r| r.text == "{{Unknown Field}}").unwrap();
    assert_eq!(leftover.format.highlight, Some(HighlightColor::Yellow));
    assert!(runs
        .iter()
        .filter(|r| r.text.starts_with("Lists"))
        .all(|r| r.format.highlight.is_none()));
}

#[test]
fn generate_without_templates_fails() {
    let mut ctx = GenerationContext::new(Vec::new(), FillOptions::default());

    assert!(matches!(generate(&mut ctx), Err(ExportError::NoTemplates)));
    assert!(ctx.output().is_none());
}

#[test]
fn unknown_source_instrument_is_an_error() {
    let mut ctx = GenerationContext::new(
        vec![TemplateDocument {
            name: "t.docx".into(),
            bytes: champ_template(),
        }],
        FillOptions::default(),
    );
    ctx.sources.push(SourceDocument {
        instrument_id: "nope".into(),
        name: "x.docx".into(),
        bytes: wiat_report(),
    });

    assert!(matches!(generate(&mut ctx), Err(ExportError::Instrument(_))));
}

#[test]
fn garbage_bytes_are_a_read_error() {
    let err = DocxReport::from_bytes("junk.docx", b"not a zip").err().unwrap();
    assert!(matches!(err, ExportError::DocxRead { .. }));
}
