//! In-memory rich-text document model.
//!
//! A [`Document`] is an ownership tree: body blocks hold paragraphs and
//! tables, paragraphs hold formatting runs, tables hold rows of cells which
//! in turn hold blocks. Storage-format details the fill engine never looks at
//! (paragraph properties, table grids, drawings inside runs, unsupported body
//! elements) are referenced through opaque [`NativeId`] handles owned by the
//! storage adapter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque handle into the storage adapter's side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeId(pub u32);

/// Highlight marker colors understood by word processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightColor {
    #[default]
    Yellow,
    Green,
    Cyan,
    Magenta,
    Red,
}

impl HighlightColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Cyan => "cyan",
            HighlightColor::Magenta => "magenta",
            HighlightColor::Red => "red",
        }
    }
}

impl FromStr for HighlightColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(HighlightColor::Yellow),
            "green" => Ok(HighlightColor::Green),
            "cyan" => Ok(HighlightColor::Cyan),
            "magenta" => Ok(HighlightColor::Magenta),
            "red" => Ok(HighlightColor::Red),
            other => Err(CoreError::UnknownHighlight(other.to_string())),
        }
    }
}

/// Character-level formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Underline style (e.g. "single", "double").
    pub underline: Option<String>,
    /// Font size in half-points, as OOXML stores it.
    pub size: Option<usize>,
    pub font_family: Option<String>,
    /// Explicit RGB color such as "1F3864".
    pub color: Option<String>,
    pub superscript: bool,
    pub highlight: Option<HighlightColor>,
}

/// A contiguous span of text sharing one format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
    /// Storage-level run properties this run was read with.
    pub properties: Option<NativeId>,
    /// Non-text inline content (drawings, fields) emitted after the text.
    pub inline: Option<NativeId>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn format(mut self, format: RunFormat) -> Self {
        self.format = format;
        self
    }

    pub fn bold(mut self) -> Self {
        self.format.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.format.italic = Some(true);
        self
    }

    /// Length in characters, which is how run boundaries are measured.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// A new run with this run's format and storage properties but without
    /// its inline attachments.
    pub fn derive(&self, text: impl Into<String>) -> Run {
        Run {
            text: text.into(),
            format: self.format.clone(),
            properties: self.properties,
            inline: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    runs: Vec<Run>,
    pub native: Option<NativeId>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs, native: None }
    }

    /// A paragraph holding a single unformatted run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::from_runs(vec![Run::new(text)])
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Mutable access to the runs. The slice form keeps run count fixed;
    /// use [`Paragraph::replace_runs`] to restructure.
    pub fn runs_mut(&mut self) -> &mut [Run] {
        &mut self.runs
    }

    /// Swap the whole run list in one step, returning the old runs.
    pub fn replace_runs(&mut self, runs: Vec<Run>) -> Vec<Run> {
        std::mem::replace(&mut self.runs, runs)
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub blocks: Vec<Block>,
    pub native: Option<NativeId>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new().add_paragraph(Paragraph::with_text(text))
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.blocks.push(Block::Paragraph(paragraph));
        self
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Text of the cell's own paragraphs joined by newlines. Nested tables
    /// do not contribute.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub native: Option<NativeId>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            native: None,
        }
    }

    /// Convenience constructor: one single-paragraph cell per string.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::new(texts.iter().map(|t| Cell::with_text(t.as_ref())).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
    pub native: Option<NativeId>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, native: None }
    }

    /// Trimmed cell texts, row by row.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.text().trim().to_string()).collect())
            .collect()
    }

    /// Remove the rows at `indices`, highest index first so earlier
    /// positions stay valid. Returns how many rows were removed.
    pub fn remove_rows(&mut self, mut indices: Vec<usize>) -> usize {
        indices.sort_unstable();
        indices.dedup();
        let mut removed = 0;
        for idx in indices.into_iter().rev() {
            if idx < self.rows.len() {
                self.rows.remove(idx);
                removed += 1;
            }
        }
        removed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Body element the engine does not model; re-emitted by the adapter.
    Opaque(NativeId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.blocks.push(Block::Paragraph(paragraph));
        self
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.blocks.push(Block::Table(table));
        self
    }

    /// Top-level tables in body order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Visit every paragraph: body paragraphs and paragraphs inside table
    /// cells, at any nesting depth, in document order.
    pub fn for_each_paragraph_mut(&mut self, f: &mut impl FnMut(&mut Paragraph)) {
        visit_paragraphs_mut(&mut self.blocks, f);
    }

    pub fn for_each_paragraph(&self, f: &mut impl FnMut(&Paragraph)) {
        visit_paragraphs(&self.blocks, f);
    }

    /// Visit every table, outer tables before the tables nested in them.
    /// Nested tables are reached through the rows that remain after `f`.
    pub fn for_each_table_mut(&mut self, f: &mut impl FnMut(&mut Table)) {
        visit_tables_mut(&mut self.blocks, f);
    }

    /// Append `other`'s top-level body elements after this document's.
    pub fn append(&mut self, other: Document) {
        self.blocks.extend(other.blocks);
    }

    /// Shift every native handle by `offset`, used when merging the
    /// adapter side tables of two documents.
    pub fn offset_native_ids(&mut self, offset: u32) {
        offset_blocks(&mut self.blocks, offset);
    }

    /// All paragraph texts in document order, one per line.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.for_each_paragraph(&mut |p| lines.push(p.text()));
        lines.join("\n")
    }
}

fn visit_paragraphs_mut(blocks: &mut [Block], f: &mut impl FnMut(&mut Paragraph)) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => f(p),
            Block::Table(t) => {
                for row in &mut t.rows {
                    for cell in &mut row.cells {
                        visit_paragraphs_mut(&mut cell.blocks, f);
                    }
                }
            }
            Block::Opaque(_) => {}
        }
    }
}

fn visit_paragraphs(blocks: &[Block], f: &mut impl FnMut(&Paragraph)) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => f(p),
            Block::Table(t) => {
                for row in &t.rows {
                    for cell in &row.cells {
                        visit_paragraphs(&cell.blocks, f);
                    }
                }
            }
            Block::Opaque(_) => {}
        }
    }
}

fn visit_tables_mut(blocks: &mut [Block], f: &mut impl FnMut(&mut Table)) {
    for block in blocks {
        if let Block::Table(t) = block {
            f(t);
            for row in &mut t.rows {
                for cell in &mut row.cells {
                    visit_tables_mut(&mut cell.blocks, f);
                }
            }
        }
    }
}

fn shift(id: &mut Option<NativeId>, offset: u32) {
    if let Some(NativeId(n)) = id {
        *n += offset;
    }
}

fn offset_blocks(blocks: &mut [Block], offset: u32) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => {
                shift(&mut p.native, offset);
                for run in &mut p.runs {
                    shift(&mut run.properties, offset);
                    shift(&mut run.inline, offset);
                }
            }
            Block::Table(t) => {
                shift(&mut t.native, offset);
                for row in &mut t.rows {
                    shift(&mut row.native, offset);
                    for cell in &mut row.cells {
                        shift(&mut cell.native, offset);
                        offset_blocks(&mut cell.blocks, offset);
                    }
                }
            }
            Block::Opaque(NativeId(n)) => *n += offset,
        }
    }
}
