//! Document builder trait.
//!
//! The renderer never produces output itself. It drives a [`DocumentBuilder`]
//! through a strictly ordered sequence of operations; the builder translates
//! them into a concrete output format.

use std::fmt;

/// Highest heading level the output format supports.
///
/// Levels above this are clamped, never rejected.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// Opaque identifier of a numbering (list style) definition.
///
/// Issued by [`DocumentBuilder::enter_list`]; every list gets its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberingId(pub u32);

impl fmt::Display for NumberingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend trait for format-specific document construction.
///
/// Scoped operations come in `enter_*` / `exit_*` pairs and are always
/// balanced by the renderer: paragraph, list, list item, table, row, cell.
/// Any error aborts the render and is returned to the caller unchanged.
pub trait DocumentBuilder {
    /// Error raised by the underlying output.
    type Error;

    /// Add a heading with plain text content. `level` is in `1..=MAX_HEADING_LEVEL`.
    fn add_heading(&mut self, text: &str, level: u8) -> Result<(), Self::Error>;

    /// Add a complete paragraph holding plain text.
    fn add_paragraph(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Open a paragraph that subsequent inline operations write into.
    fn enter_paragraph(&mut self) -> Result<(), Self::Error>;

    /// Close the paragraph opened by [`enter_paragraph`](Self::enter_paragraph).
    fn exit_paragraph(&mut self) -> Result<(), Self::Error>;

    /// Add a plain text run.
    fn add_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Add a bold run.
    fn add_bold(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Add an italic run.
    fn add_italic(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Add an inline code run.
    fn add_inline_code(&mut self, code: &str) -> Result<(), Self::Error>;

    /// Add a hyperlink. `url` is never absent; missing targets arrive as `""`.
    fn add_hyperlink(&mut self, text: &str, url: &str) -> Result<(), Self::Error>;

    /// Add one line of a code block as its own styled paragraph.
    fn add_code_block_line(&mut self, line: &str) -> Result<(), Self::Error>;

    /// Add a block quote paragraph.
    fn add_block_quote(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Add a horizontal rule.
    fn add_horizontal_rule(&mut self) -> Result<(), Self::Error>;

    /// Add a chunk of raw markup to be embedded as-is.
    fn add_raw_chunk(&mut self, markup: &str) -> Result<(), Self::Error>;

    /// Add a placeholder where an image would go.
    fn add_image_placeholder(&mut self, alt: &str) -> Result<(), Self::Error>;

    /// Add an explicit line break inside the current paragraph.
    fn add_line_break(&mut self) -> Result<(), Self::Error>;

    /// Start a list and return the numbering definition for its items.
    fn enter_list(&mut self, ordered: bool) -> Result<NumberingId, Self::Error>;

    /// End the innermost list. Must tolerate being called with no open list.
    fn exit_list(&mut self) -> Result<(), Self::Error>;

    /// Add a list item consisting of a single plain text paragraph.
    fn add_list_item(
        &mut self,
        text: &str,
        numbering: NumberingId,
        depth: usize,
    ) -> Result<(), Self::Error>;

    /// Open a list item. Its first paragraph carries the list marker.
    fn enter_list_item(
        &mut self,
        numbering: NumberingId,
        depth: usize,
    ) -> Result<(), Self::Error>;

    /// Close the list item opened by [`enter_list_item`](Self::enter_list_item).
    fn exit_list_item(&mut self) -> Result<(), Self::Error>;

    /// Open a table with a fixed column count.
    fn enter_table(&mut self, column_count: usize) -> Result<(), Self::Error>;

    /// Close the current table.
    fn exit_table(&mut self) -> Result<(), Self::Error>;

    /// Open a table row.
    fn enter_row(&mut self, is_header: bool) -> Result<(), Self::Error>;

    /// Close the current table row.
    fn exit_row(&mut self) -> Result<(), Self::Error>;

    /// Open a table cell.
    fn enter_cell(&mut self) -> Result<(), Self::Error>;

    /// Close the current table cell.
    fn exit_cell(&mut self) -> Result<(), Self::Error>;

    /// Finalize the document. Called exactly once, after the last operation.
    fn finish(&mut self) -> Result<(), Self::Error>;
}
