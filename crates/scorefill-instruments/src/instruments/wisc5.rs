use crate::Instrument;
use crate::schema::{ColumnLayout, ExtractionSchema, HeaderPolicy, TableOverride, TableSelection};

/// WISC-V: Wechsler Intelligence Scale for Children, Fifth Edition.
/// Every table with a header row is read; names sit in column 1 and
/// percentiles in column 5, except the sixth table (index 5), whose layout
/// is one column narrower and keeps percentiles in column 4.
pub struct Wisc5;

impl Instrument for Wisc5 {
    fn id(&self) -> &str {
        "wisc5"
    }

    fn name(&self) -> &str {
        "WISC-V"
    }

    fn schema(&self) -> Option<&ExtractionSchema> {
        static SCHEMA: std::sync::LazyLock<ExtractionSchema> =
            std::sync::LazyLock::new(|| ExtractionSchema {
                tables: TableSelection::All,
                columns: ColumnLayout {
                    name: 1,
                    percentile: 5,
                },
                overrides: vec![TableOverride {
                    table: 5,
                    columns: ColumnLayout {
                        name: 1,
                        percentile: 4,
                    },
                }],
                header: HeaderPolicy::Required,
            });
        Some(&*SCHEMA)
    }

    fn subtests(&self) -> &[&'static str] {
        &[
            "Full Scale IQ",
            "Verbal Comprehension",
            "Visual Spatial",
            "Fluid Reasoning",
            "Working Memory",
            "Processing Speed",
            "General Ability",
            "Cognitive Proficiency",
            "Similarities",
            "Vocabulary",
            "Information",
            "Comprehension",
            "Block Design",
            "Visual Puzzles",
            "Matrix Reasoning",
            "Figure Weights",
            "Picture Concepts",
            "Arithmetic",
            "Digit Span",
            "Picture Span",
            "Letter Number Sequencing",
            "Coding",
            "Symbol Search",
            "Cancellation",
        ]
    }
}
