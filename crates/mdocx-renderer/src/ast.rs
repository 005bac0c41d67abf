//! Block/inline document tree consumed by the renderer.
//!
//! The tree is produced by [`parse_markdown`](crate::parse_markdown) or built
//! by hand. It is immutable once built; the renderer only borrows it.

/// A parsed document: an ordered sequence of blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document from its top-level blocks.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// Structural node of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Block {
    /// Heading with its level as written in the source (1 for `#`).
    Heading { level: u8, content: Vec<Inline> },
    /// Paragraph. `None` means the parser produced no inline content at all,
    /// which is distinct from an empty inline list.
    Paragraph(Option<Vec<Inline>>),
    /// Indented or fenced code block.
    CodeBlock {
        text: String,
        language: Option<String>,
    },
    /// Block quote with nested blocks.
    Quote(Vec<Block>),
    /// Ordered or bullet list.
    List { ordered: bool, items: Vec<ListItem> },
    /// Table. The first row determines the column count.
    Table { rows: Vec<TableRow> },
    /// Horizontal rule.
    ThematicBreak,
    /// Block of embedded raw markup, passed through verbatim.
    RawMarkup(String),
    /// Generic grouping node; rendered as its children.
    Container(Vec<Block>),
    /// Node kind the renderer does not know; skipped when rendering.
    Unsupported { kind: String },
}

/// One item of a [`Block::List`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

impl ListItem {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// One row of a [`Block::Table`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRow {
    pub is_header: bool,
    pub cells: Vec<TableCell>,
}

/// One cell of a [`TableRow`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableCell {
    pub content: Vec<Inline>,
}

impl TableCell {
    #[must_use]
    pub fn new(content: Vec<Inline>) -> Self {
        Self { content }
    }
}

/// Content node inside a paragraph-like block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Inline {
    /// Literal text.
    Text(String),
    /// Emphasis. `delimiters` is the number of delimiter characters used
    /// (`*x*` is 1, `**x**` is 2).
    Emphasis {
        delimiters: u8,
        content: Vec<Inline>,
    },
    /// Inline code span.
    Code(String),
    /// Hyperlink or image.
    Link {
        url: Option<String>,
        content: Vec<Inline>,
        is_image: bool,
    },
    /// Hard (`\` or two trailing spaces) or soft (plain newline) break.
    LineBreak { hard: bool },
    /// Fragment of inline raw markup (a single tag or entity).
    RawMarkup(String),
    /// Bare URL in angle brackets.
    Autolink(String),
    /// Generic grouping node; rendered as its children.
    Container(Vec<Inline>),
    /// Node kind the renderer does not know; skipped when rendering.
    Unsupported { kind: String },
}

impl Inline {
    /// Shorthand for [`Inline::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}
