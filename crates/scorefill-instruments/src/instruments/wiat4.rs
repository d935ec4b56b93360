use crate::Instrument;
use crate::schema::{ColumnLayout, ExtractionSchema, HeaderPolicy, TableSelection};

/// WIAT-4: Wechsler Individual Achievement Test, Fourth Edition.
/// Score report tables 3 through 11 list each subtest or composite in
/// column 0 and its percentile rank in column 4.
pub struct Wiat4;

impl Instrument for Wiat4 {
    fn id(&self) -> &str {
        "wiat4"
    }

    fn name(&self) -> &str {
        "WIAT-4"
    }

    fn schema(&self) -> Option<&ExtractionSchema> {
        static SCHEMA: std::sync::LazyLock<ExtractionSchema> =
            std::sync::LazyLock::new(|| ExtractionSchema {
                tables: TableSelection::Indices((2..=10).collect()),
                columns: ColumnLayout {
                    name: 0,
                    percentile: 4,
                },
                overrides: vec![],
                header: HeaderPolicy::DropWhenMultiRow,
            });
        Some(&*SCHEMA)
    }

    fn subtests(&self) -> &[&'static str] {
        &[
            "Total Achievement",
            "Reading",
            "Written Expression",
            "Mathematics",
            "Basic Reading",
            "Decoding",
            "Reading Fluency",
            "Math Fluency",
            "Listening Comprehension",
            "Oral Expression",
            "Word Reading",
            "Pseudoword Decoding",
            "Reading Comprehension",
            "Orthographic Fluency",
            "Decoding Fluency",
            "Oral Reading Fluency",
            "Spelling",
            "Sentence Composition",
            "Essay Composition",
            "Alphabet Writing Fluency",
            "Sentence Writing Fluency",
            "Math Problem Solving",
            "Numerical Operations",
            "Math Fluency Addition",
            "Math Fluency Subtraction",
            "Math Fluency Multiplication",
            "Receptive Vocabulary",
            "Oral Discourse Comprehension",
            "Expressive Vocabulary",
            "Oral Word Fluency",
            "Sentence Repetition",
            "Phonemic Proficiency",
        ]
    }
}
