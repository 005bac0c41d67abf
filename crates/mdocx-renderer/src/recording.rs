//! Builder that records operations instead of producing a document.
//!
//! Useful for inspecting what the renderer emits for a given input and for
//! asserting on exact operation sequences in tests.

use std::convert::Infallible;
use std::fmt;

use crate::builder::{DocumentBuilder, NumberingId};

/// A single builder operation, as recorded by [`RecordingBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Heading { text: String, level: u8 },
    Paragraph(String),
    EnterParagraph,
    ExitParagraph,
    Text(String),
    Bold(String),
    Italic(String),
    InlineCode(String),
    Hyperlink { text: String, url: String },
    CodeBlockLine(String),
    BlockQuote(String),
    HorizontalRule,
    RawChunk(String),
    ImagePlaceholder(String),
    LineBreak,
    EnterList { ordered: bool, numbering: NumberingId },
    ExitList,
    ListItem {
        text: String,
        numbering: NumberingId,
        depth: usize,
    },
    EnterListItem { numbering: NumberingId, depth: usize },
    ExitListItem,
    EnterTable { column_count: usize },
    ExitTable,
    EnterRow { is_header: bool },
    ExitRow,
    EnterCell,
    ExitCell,
    Finish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading { text, level } => write!(f, "heading level={level} {text:?}"),
            Self::Paragraph(text) => write!(f, "paragraph {text:?}"),
            Self::EnterParagraph => f.write_str("enter paragraph"),
            Self::ExitParagraph => f.write_str("exit paragraph"),
            Self::Text(text) => write!(f, "text {text:?}"),
            Self::Bold(text) => write!(f, "bold {text:?}"),
            Self::Italic(text) => write!(f, "italic {text:?}"),
            Self::InlineCode(code) => write!(f, "inline-code {code:?}"),
            Self::Hyperlink { text, url } => write!(f, "hyperlink {text:?} -> {url:?}"),
            Self::CodeBlockLine(line) => write!(f, "code-line {line:?}"),
            Self::BlockQuote(text) => write!(f, "block-quote {text:?}"),
            Self::HorizontalRule => f.write_str("horizontal-rule"),
            Self::RawChunk(markup) => write!(f, "raw-chunk {markup:?}"),
            Self::ImagePlaceholder(alt) => write!(f, "image-placeholder {alt:?}"),
            Self::LineBreak => f.write_str("line-break"),
            Self::EnterList { ordered, numbering } => {
                let kind = if *ordered { "ordered" } else { "unordered" };
                write!(f, "enter list {kind} numbering={numbering}")
            }
            Self::ExitList => f.write_str("exit list"),
            Self::ListItem {
                text,
                numbering,
                depth,
            } => write!(f, "list-item numbering={numbering} depth={depth} {text:?}"),
            Self::EnterListItem { numbering, depth } => {
                write!(f, "enter list-item numbering={numbering} depth={depth}")
            }
            Self::ExitListItem => f.write_str("exit list-item"),
            Self::EnterTable { column_count } => write!(f, "enter table columns={column_count}"),
            Self::ExitTable => f.write_str("exit table"),
            Self::EnterRow { is_header } => write!(f, "enter row header={is_header}"),
            Self::ExitRow => f.write_str("exit row"),
            Self::EnterCell => f.write_str("enter cell"),
            Self::ExitCell => f.write_str("exit cell"),
            Self::Finish => f.write_str("finish"),
        }
    }
}

/// Builder that appends every call to an operation log.
///
/// Numbering identities are issued sequentially starting at 1.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    operations: Vec<Operation>,
    next_numbering: u32,
}

impl RecordingBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations in emission order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consume the builder and return the recorded operations.
    #[must_use]
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    fn record(&mut self, operation: Operation) -> Result<(), Infallible> {
        self.operations.push(operation);
        Ok(())
    }
}

impl DocumentBuilder for RecordingBuilder {
    type Error = Infallible;

    fn add_heading(&mut self, text: &str, level: u8) -> Result<(), Infallible> {
        self.record(Operation::Heading {
            text: text.to_owned(),
            level,
        })
    }

    fn add_paragraph(&mut self, text: &str) -> Result<(), Infallible> {
        self.record(Operation::Paragraph(text.to_owned()))
    }

    fn enter_paragraph(&mut self) -> Result<(), Infallible> {
        self.record(Operation::EnterParagraph)
    }

    fn exit_paragraph(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitParagraph)
    }

    fn add_text(&mut self, text: &str) -> Result<(), Infallible> {
        self.record(Operation::Text(text.to_owned()))
    }

    fn add_bold(&mut self, text: &str) -> Result<(), Infallible> {
        self.record(Operation::Bold(text.to_owned()))
    }

    fn add_italic(&mut self, text: &str) -> Result<(), Infallible> {
        self.record(Operation::Italic(text.to_owned()))
    }

    fn add_inline_code(&mut self, code: &str) -> Result<(), Infallible> {
        self.record(Operation::InlineCode(code.to_owned()))
    }

    fn add_hyperlink(&mut self, text: &str, url: &str) -> Result<(), Infallible> {
        self.record(Operation::Hyperlink {
            text: text.to_owned(),
            url: url.to_owned(),
        })
    }

    fn add_code_block_line(&mut self, line: &str) -> Result<(), Infallible> {
        self.record(Operation::CodeBlockLine(line.to_owned()))
    }

    fn add_block_quote(&mut self, text: &str) -> Result<(), Infallible> {
        self.record(Operation::BlockQuote(text.to_owned()))
    }

    fn add_horizontal_rule(&mut self) -> Result<(), Infallible> {
        self.record(Operation::HorizontalRule)
    }

    fn add_raw_chunk(&mut self, markup: &str) -> Result<(), Infallible> {
        self.record(Operation::RawChunk(markup.to_owned()))
    }

    fn add_image_placeholder(&mut self, alt: &str) -> Result<(), Infallible> {
        self.record(Operation::ImagePlaceholder(alt.to_owned()))
    }

    fn add_line_break(&mut self) -> Result<(), Infallible> {
        self.record(Operation::LineBreak)
    }

    fn enter_list(&mut self, ordered: bool) -> Result<NumberingId, Infallible> {
        self.next_numbering += 1;
        let numbering = NumberingId(self.next_numbering);
        self.record(Operation::EnterList { ordered, numbering })?;
        Ok(numbering)
    }

    fn exit_list(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitList)
    }

    fn add_list_item(
        &mut self,
        text: &str,
        numbering: NumberingId,
        depth: usize,
    ) -> Result<(), Infallible> {
        self.record(Operation::ListItem {
            text: text.to_owned(),
            numbering,
            depth,
        })
    }

    fn enter_list_item(&mut self, numbering: NumberingId, depth: usize) -> Result<(), Infallible> {
        self.record(Operation::EnterListItem { numbering, depth })
    }

    fn exit_list_item(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitListItem)
    }

    fn enter_table(&mut self, column_count: usize) -> Result<(), Infallible> {
        self.record(Operation::EnterTable { column_count })
    }

    fn exit_table(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitTable)
    }

    fn enter_row(&mut self, is_header: bool) -> Result<(), Infallible> {
        self.record(Operation::EnterRow { is_header })
    }

    fn exit_row(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitRow)
    }

    fn enter_cell(&mut self) -> Result<(), Infallible> {
        self.record(Operation::EnterCell)
    }

    fn exit_cell(&mut self) -> Result<(), Infallible> {
        self.record(Operation::ExitCell)
    }

    fn finish(&mut self) -> Result<(), Infallible> {
        self.record(Operation::Finish)
    }
}
