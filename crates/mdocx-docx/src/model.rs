//! In-memory WordprocessingML document model.
//!
//! The model mirrors the parts of a `.docx` package that the builder
//! produces: the body, numbering instances, external hyperlink targets and
//! alternative-format (HTML) chunks. Relationship ids are derived from
//! positions in these vectors at serialization time.

use mdocx_renderer::NumberingId;

/// Accumulated document, ready for serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordDocument {
    /// Top-level body content in document order.
    pub body: Vec<BodyElement>,
    /// One numbering instance per list.
    pub numbering: Vec<NumberingInstance>,
    /// Distinct external hyperlink targets.
    pub hyperlinks: Vec<String>,
    /// Raw HTML chunks imported through `w:altChunk`.
    pub chunks: Vec<String>,
}

impl WordDocument {
    /// Index of the relationship for `url`, registering it if new.
    pub fn hyperlink_index(&mut self, url: &str) -> usize {
        if let Some(index) = self.hyperlinks.iter().position(|known| known == url) {
            return index;
        }
        self.hyperlinks.push(url.to_owned());
        self.hyperlinks.len() - 1
    }

    /// Store a raw chunk and return its index.
    pub fn add_chunk(&mut self, markup: &str) -> usize {
        self.chunks.push(markup.to_owned());
        self.chunks.len() - 1
    }

    /// All paragraphs in the body, including those inside table cells.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().flat_map(BodyElement::paragraphs)
    }
}

/// Block-level body content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
    /// Reference to [`WordDocument::chunks`] by index.
    AltChunk(usize),
}

impl BodyElement {
    fn paragraphs(&self) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
        match self {
            Self::Paragraph(paragraph) => Box::new(std::iter::once(paragraph)),
            Self::Table(table) => Box::new(
                table
                    .rows
                    .iter()
                    .flat_map(|row| &row.cells)
                    .flat_map(|cell| &cell.content)
                    .flat_map(BodyElement::paragraphs),
            ),
            Self::AltChunk(_) => Box::new(std::iter::empty()),
        }
    }
}

/// Paragraph style, resolved to a style id at serialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    Heading(u8),
    CodeBlock,
    BlockQuote,
    /// Empty paragraph with a bottom border.
    HorizontalRule,
}

/// How a paragraph participates in a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPlacement {
    /// First paragraph of an item; carries the number or bullet.
    Item { numbering: NumberingId, level: u8 },
    /// Later paragraph of an item; indented to the item's text.
    Continuation { level: u8 },
}

/// A paragraph of runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub list: Option<ListPlacement>,
    pub content: Vec<ParagraphContent>,
}

impl Paragraph {
    #[must_use]
    pub fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Paragraph with a single plain run, or no runs for empty text.
    #[must_use]
    pub fn with_text(style: ParagraphStyle, text: &str) -> Self {
        let mut paragraph = Self::new(style);
        if !text.is_empty() {
            paragraph
                .content
                .push(ParagraphContent::Run(Run::new(text, RunFormat::Plain)));
        }
        paragraph
    }

    /// Concatenated text of all runs.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for item in &self.content {
            match item {
                ParagraphContent::Run(run) => text.push_str(&run.text),
                ParagraphContent::Hyperlink { run, .. } => text.push_str(&run.text),
                ParagraphContent::Break => text.push('\n'),
            }
        }
        text
    }
}

/// Inline content of a paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParagraphContent {
    Run(Run),
    /// Run wrapped in a hyperlink.
    Hyperlink { target: LinkTarget, run: Run },
    /// Hard line break.
    Break,
}

/// Destination of a hyperlink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// Index into [`WordDocument::hyperlinks`].
    External(usize),
    /// Bookmark name inside the document (`#name`).
    Anchor(String),
    /// Link without destination; rendered as styled text only.
    None,
}

/// Character formatting of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunFormat {
    Plain,
    Bold,
    Italic,
    Code,
    Hyperlink,
}

/// Text with uniform formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    #[must_use]
    pub fn new(text: &str, format: RunFormat) -> Self {
        Self {
            text: text.to_owned(),
            format,
        }
    }
}

/// A table with a fixed column count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub column_count: usize,
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Repeated as header on each page.
    pub is_header: bool,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub content: Vec<BodyElement>,
}

/// A concrete list numbering, referencing the bullet or decimal definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberingInstance {
    pub id: NumberingId,
    pub ordered: bool,
}
