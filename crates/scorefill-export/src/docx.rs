//! DOCX storage adapter.
//!
//! Reading lifts body paragraphs, tables, rows, cells and runs into the
//! [`Document`] model. Everything the model does not carry (paragraph and
//! table properties, run properties, drawings and fields inside runs,
//! section breaks and other body elements) is kept in a side table and
//! referenced by [`NativeId`]. Writing walks the model and re-attaches
//! those pieces, so an unchanged template round-trips with its layout.

use std::io::Cursor;

use docx_rs::{
    DocumentChild, Docx, Paragraph as DocxParagraph, ParagraphChild, Run as DocxRun, RunChild,
    RunFonts, RunProperty, Table as DocxTable, TableCell as DocxCell, TableCellContent,
    TableChild, TableRow as DocxRow, TableRowChild, VertAlignType, read_docx,
};
use serde_json::Value;
use tracing::debug;

use scorefill_core::document::{
    Block, Cell, Document, HighlightColor, NativeId, Paragraph, Row, Run, RunFormat, Table,
};

use crate::error::ExportError;

#[derive(Debug, Clone)]
enum Native {
    /// Paragraph with its runs taken out; other children stay.
    Paragraph(DocxParagraph),
    /// Table with its rows taken out.
    Table(DocxTable),
    /// Row with its cells taken out.
    Row(DocxRow),
    /// Cell with its content taken out.
    Cell(DocxCell),
    RunProperty(RunProperty),
    /// Run children that are neither text nor tabs.
    Inline(Vec<RunChild>),
    Body(DocumentChild),
    CellContent(TableCellContent),
}

/// A DOCX file opened for filling.
pub struct DocxReport {
    base: Docx,
    natives: Vec<Native>,
    pub document: Document,
}

impl DocxReport {
    /// Wrap a model-only document in an empty DOCX package.
    pub fn new(document: Document) -> Self {
        Self {
            base: Docx::new(),
            natives: Vec::new(),
            document,
        }
    }

    /// Parse DOCX bytes. `name` is only used in error messages.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, ExportError> {
        let mut base = read_docx(bytes).map_err(|e| ExportError::DocxRead {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let mut reader = Reader::default();
        let blocks = std::mem::take(&mut base.document.children)
            .into_iter()
            .map(|child| reader.body_child(child))
            .collect();

        debug!(name, natives = reader.natives.len(), "read docx");
        Ok(Self {
            base,
            natives: reader.natives,
            document: Document { blocks },
        })
    }

    /// Append another report's body after this one's. Package-level parts
    /// (styles, numbering, media) of `other` are not merged.
    pub fn append(&mut self, other: DocxReport) {
        let offset = self.natives.len() as u32;
        let mut document = other.document;
        document.offset_native_ids(offset);
        self.natives.extend(other.natives);
        self.document.append(document);
    }

    /// Serialize back to DOCX bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, ExportError> {
        let DocxReport {
            mut base,
            natives,
            document,
        } = self;

        let writer = Writer { natives: &natives };
        base.document.children = document
            .blocks
            .iter()
            .filter_map(|block| writer.body_child(block))
            .collect();

        let mut buf = Cursor::new(Vec::new());
        base.build()
            .pack(&mut buf)
            .map_err(|e| ExportError::Docx(e.to_string()))?;

        Ok(buf.into_inner())
    }
}

/// Read only the model of a DOCX file, e.g. a score report.
pub fn read_document(name: &str, bytes: &[u8]) -> Result<Document, ExportError> {
    Ok(DocxReport::from_bytes(name, bytes)?.document)
}

#[derive(Default)]
struct Reader {
    natives: Vec<Native>,
}

impl Reader {
    fn stash(&mut self, native: Native) -> NativeId {
        let id = NativeId(self.natives.len() as u32);
        self.natives.push(native);
        id
    }

    fn body_child(&mut self, child: DocumentChild) -> Block {
        match child {
            DocumentChild::Paragraph(p) => Block::Paragraph(self.paragraph(*p)),
            DocumentChild::Table(t) => Block::Table(self.table(*t)),
            other => Block::Opaque(self.stash(Native::Body(other))),
        }
    }

    fn paragraph(&mut self, mut paragraph: DocxParagraph) -> Paragraph {
        let mut runs = Vec::new();
        let mut retained = Vec::new();
        for child in std::mem::take(&mut paragraph.children) {
            match child {
                ParagraphChild::Run(run) => runs.push(self.run(*run)),
                other => retained.push(other),
            }
        }
        paragraph.children = retained;

        let mut out = Paragraph::from_runs(runs);
        out.native = Some(self.stash(Native::Paragraph(paragraph)));
        out
    }

    fn run(&mut self, run: DocxRun) -> Run {
        let mut text = String::new();
        let mut inline = Vec::new();
        for child in run.children {
            match child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                other => inline.push(other),
            }
        }

        let format = read_format(&run.run_property);
        let properties = Some(self.stash(Native::RunProperty(run.run_property)));
        let inline = if inline.is_empty() {
            None
        } else {
            Some(self.stash(Native::Inline(inline)))
        };

        Run {
            text,
            format,
            properties,
            inline,
        }
    }

    #[allow(irrefutable_let_patterns)]
    fn table(&mut self, mut table: DocxTable) -> Table {
        let mut rows = Vec::new();
        for child in std::mem::take(&mut table.rows) {
            if let TableChild::TableRow(row) = child {
                rows.push(self.row(row));
            }
        }
        Table {
            rows,
            native: Some(self.stash(Native::Table(table))),
        }
    }

    #[allow(irrefutable_let_patterns)]
    fn row(&mut self, mut row: DocxRow) -> Row {
        let mut cells = Vec::new();
        for child in std::mem::take(&mut row.cells) {
            if let TableRowChild::TableCell(cell) = child {
                cells.push(self.cell(cell));
            }
        }
        Row {
            cells,
            native: Some(self.stash(Native::Row(row))),
        }
    }

    fn cell(&mut self, mut cell: DocxCell) -> Cell {
        let mut blocks = Vec::new();
        for content in std::mem::take(&mut cell.children) {
            let block = match content {
                TableCellContent::Paragraph(p) => Block::Paragraph(self.paragraph(p)),
                TableCellContent::Table(t) => Block::Table(self.table(t)),
                other => Block::Opaque(self.stash(Native::CellContent(other))),
            };
            blocks.push(block);
        }
        Cell {
            blocks,
            native: Some(self.stash(Native::Cell(cell))),
        }
    }
}

struct Writer<'a> {
    natives: &'a [Native],
}

impl Writer<'_> {
    fn native(&self, id: Option<NativeId>) -> Option<&Native> {
        id.and_then(|NativeId(n)| self.natives.get(n as usize))
    }

    fn body_child(&self, block: &Block) -> Option<DocumentChild> {
        match block {
            Block::Paragraph(p) => Some(DocumentChild::Paragraph(Box::new(self.paragraph(p)))),
            Block::Table(t) => Some(DocumentChild::Table(Box::new(self.table(t)))),
            Block::Opaque(id) => match self.native(Some(*id)) {
                Some(Native::Body(child)) => Some(child.clone()),
                _ => {
                    debug!(id = id.0, "dropping element with no body form");
                    None
                }
            },
        }
    }

    fn cell_content(&self, block: &Block) -> Option<TableCellContent> {
        match block {
            Block::Paragraph(p) => Some(TableCellContent::Paragraph(self.paragraph(p))),
            Block::Table(t) => Some(TableCellContent::Table(self.table(t))),
            Block::Opaque(id) => match self.native(Some(*id)) {
                Some(Native::CellContent(content)) => Some(content.clone()),
                _ => {
                    debug!(id = id.0, "dropping element with no cell form");
                    None
                }
            },
        }
    }

    fn paragraph(&self, paragraph: &Paragraph) -> DocxParagraph {
        let mut out = match self.native(paragraph.native) {
            Some(Native::Paragraph(p)) => p.clone(),
            _ => DocxParagraph::new(),
        };
        let retained = std::mem::take(&mut out.children);
        for run in paragraph.runs() {
            out = out.add_run(self.run(run));
        }
        out.children.extend(retained);
        out
    }

    fn run(&self, run: &Run) -> DocxRun {
        let mut out = DocxRun::new();
        if let Some(Native::RunProperty(props)) = self.native(run.properties) {
            out.run_property = props.clone();
        }
        let base = read_format(&out.run_property);
        out = apply_format(out, &base, &run.format);

        for (idx, segment) in run.text.split('\t').enumerate() {
            if idx > 0 {
                out = out.add_tab();
            }
            if !segment.is_empty() {
                out = out.add_text(segment);
            }
        }

        if let Some(Native::Inline(children)) = self.native(run.inline) {
            out.children.extend(children.iter().cloned());
        }
        out
    }

    fn table(&self, table: &Table) -> DocxTable {
        let rows: Vec<DocxRow> = table.rows.iter().map(|r| self.row(r)).collect();
        match self.native(table.native) {
            Some(Native::Table(t)) => {
                let mut out = t.clone();
                out.rows = rows.into_iter().map(TableChild::TableRow).collect();
                out
            }
            _ => DocxTable::new(rows),
        }
    }

    fn row(&self, row: &Row) -> DocxRow {
        let cells: Vec<DocxCell> = row.cells.iter().map(|c| self.cell(c)).collect();
        match self.native(row.native) {
            Some(Native::Row(r)) => {
                let mut out = r.clone();
                out.cells = cells.into_iter().map(TableRowChild::TableCell).collect();
                out
            }
            _ => DocxRow::new(cells),
        }
    }

    fn cell(&self, cell: &Cell) -> DocxCell {
        let mut out = match self.native(cell.native) {
            Some(Native::Cell(c)) => c.clone(),
            _ => DocxCell::new(),
        };
        out.children = cell
            .blocks
            .iter()
            .filter_map(|b| self.cell_content(b))
            .collect();
        out
    }
}

/// Pull the attributes the model tracks out of serialized run properties.
fn read_format(props: &RunProperty) -> RunFormat {
    let Ok(json) = serde_json::to_value(props) else {
        return RunFormat::default();
    };
    let field = |names: &[&str]| names.iter().find_map(|n| json.get(*n)).map(unwrap_val);

    RunFormat {
        bold: field(&["bold", "b"]).and_then(Value::as_bool),
        italic: field(&["italic", "i"]).and_then(Value::as_bool),
        underline: field(&["underline", "u"])
            .and_then(Value::as_str)
            .filter(|u| *u != "none")
            .map(str::to_string),
        size: field(&["sz", "size"])
            .and_then(Value::as_u64)
            .map(|s| s as usize),
        font_family: field(&["fonts"])
            .and_then(|f| f.get("ascii").or_else(|| f.get("hiAnsi")))
            .and_then(Value::as_str)
            .map(str::to_string),
        color: field(&["color"])
            .and_then(Value::as_str)
            .filter(|c| !c.eq_ignore_ascii_case("auto"))
            .map(str::to_string),
        superscript: field(&["vertAlign", "vert_align"])
            .and_then(Value::as_str)
            .is_some_and(|v| v.to_ascii_lowercase().contains("super")),
        highlight: field(&["highlight"])
            .and_then(Value::as_str)
            .and_then(|h| h.parse::<HighlightColor>().ok()),
    }
}

fn unwrap_val(value: &Value) -> &Value {
    value.get("val").unwrap_or(value)
}

/// Apply the attributes of `format` that differ from what the stored
/// properties already say.
fn apply_format(mut run: DocxRun, base: &RunFormat, format: &RunFormat) -> DocxRun {
    if format.bold == Some(true) && base.bold != Some(true) {
        run = run.bold();
    }
    if format.italic == Some(true) && base.italic != Some(true) {
        run = run.italic();
    }
    if let Some(underline) = &format.underline
        && base.underline.as_ref() != Some(underline)
    {
        run = run.underline(underline.as_str());
    }
    if let Some(size) = format.size
        && base.size != Some(size)
    {
        run = run.size(size);
    }
    if let Some(family) = &format.font_family
        && base.font_family.as_ref() != Some(family)
    {
        run = run.fonts(RunFonts::new().ascii(family.as_str()).hi_ansi(family.as_str()));
    }
    if let Some(color) = &format.color
        && base.color.as_ref() != Some(color)
    {
        run = run.color(color.as_str());
    }
    if format.superscript && !base.superscript {
        run.run_property = run.run_property.vert_align(VertAlignType::SuperScript);
    }
    if let Some(highlight) = format.highlight
        && base.highlight != Some(highlight)
    {
        run = run.highlight(highlight.as_str());
    }
    run
}
