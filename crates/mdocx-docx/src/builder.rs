//! [`DocumentBuilder`] implementation accumulating a [`WordDocument`].

use mdocx_renderer::{DocumentBuilder, MAX_HEADING_LEVEL, NumberingId};

use crate::error::DocxError;
use crate::model::{
    BodyElement, Cell, LinkTarget, ListPlacement, NumberingInstance, Paragraph, ParagraphContent,
    ParagraphStyle, Row, Run, RunFormat, Table, WordDocument,
};

/// Deepest list level WordprocessingML numbering supports (`w:ilvl`).
pub const MAX_LIST_LEVEL: u8 = 8;

/// Open list item.
#[derive(Debug)]
struct ItemState {
    numbering: NumberingId,
    level: u8,
    /// Whether the item's number was already placed on a paragraph.
    numbered: bool,
}

/// Table under construction.
#[derive(Debug)]
struct TableFrame {
    table: Table,
    row: Option<Row>,
    cell: Option<Cell>,
}

/// Builder producing a [`WordDocument`].
///
/// Inline operations require an open paragraph, cells require an open row
/// and rows an open table; violations fail with [`DocxError::Structure`].
/// `exit_list` without a matching `enter_list` is ignored.
#[derive(Debug, Default)]
pub struct WordBuilder {
    document: WordDocument,
    paragraph: Option<Paragraph>,
    /// Chunks received inside the open paragraph, placed after it.
    pending_chunks: Vec<usize>,
    items: Vec<ItemState>,
    open_lists: usize,
    next_numbering: u32,
    table: Option<TableFrame>,
}

impl WordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document accumulated so far.
    #[must_use]
    pub fn document(&self) -> &WordDocument {
        &self.document
    }

    /// Consume the builder and return the document.
    #[must_use]
    pub fn into_document(self) -> WordDocument {
        self.document
    }

    /// Append block content to the open cell, or to the body.
    fn push_element(&mut self, element: BodyElement) {
        match self.table.as_mut().and_then(|frame| frame.cell.as_mut()) {
            Some(cell) => cell.content.push(element),
            None => self.document.body.push(element),
        }
    }

    /// Start a paragraph, placing it in the innermost open list item.
    fn new_paragraph(&mut self, style: ParagraphStyle) -> Result<Paragraph, DocxError> {
        if self.paragraph.is_some() {
            return Err(DocxError::Structure("paragraph inside an open paragraph"));
        }
        let mut paragraph = Paragraph::new(style);
        if self.table.is_none()
            && let Some(item) = self.items.last_mut()
        {
            paragraph.list = Some(if item.numbered {
                ListPlacement::Continuation { level: item.level }
            } else {
                item.numbered = true;
                ListPlacement::Item {
                    numbering: item.numbering,
                    level: item.level,
                }
            });
        }
        Ok(paragraph)
    }

    fn add_text_paragraph(
        &mut self,
        style: ParagraphStyle,
        text: &str,
        format: RunFormat,
    ) -> Result<(), DocxError> {
        let mut paragraph = self.new_paragraph(style)?;
        if !text.is_empty() {
            paragraph
                .content
                .push(ParagraphContent::Run(Run::new(text, format)));
        }
        self.push_element(BodyElement::Paragraph(paragraph));
        Ok(())
    }

    /// An item whose first block is not a paragraph still shows its number
    /// on an empty paragraph.
    fn number_pending_item(&mut self) {
        if self.table.is_some() {
            return;
        }
        if let Some(item) = self.items.last_mut()
            && !item.numbered
        {
            item.numbered = true;
            let paragraph = Paragraph {
                list: Some(ListPlacement::Item {
                    numbering: item.numbering,
                    level: item.level,
                }),
                ..Paragraph::default()
            };
            self.push_element(BodyElement::Paragraph(paragraph));
        }
    }

    fn open_paragraph(&mut self) -> Result<&mut Paragraph, DocxError> {
        self.paragraph
            .as_mut()
            .ok_or(DocxError::Structure("inline content outside a paragraph"))
    }

    fn push_run(&mut self, text: &str, format: RunFormat) -> Result<(), DocxError> {
        self.open_paragraph()?
            .content
            .push(ParagraphContent::Run(Run::new(text, format)));
        Ok(())
    }

    fn close_paragraph(&mut self) -> Result<(), DocxError> {
        let paragraph = self
            .paragraph
            .take()
            .ok_or(DocxError::Structure("paragraph exit without enter"))?;
        self.push_element(BodyElement::Paragraph(paragraph));
        for index in std::mem::take(&mut self.pending_chunks) {
            self.push_element(BodyElement::AltChunk(index));
        }
        Ok(())
    }

    fn ensure_no_paragraph(&self, operation: &'static str) -> Result<(), DocxError> {
        if self.paragraph.is_some() {
            return Err(DocxError::Structure(operation));
        }
        Ok(())
    }

    fn table_frame(&mut self) -> Result<&mut TableFrame, DocxError> {
        self.table
            .as_mut()
            .ok_or(DocxError::Structure("row outside a table"))
    }
}

fn list_level(depth: usize) -> u8 {
    u8::try_from(depth).map_or(MAX_LIST_LEVEL, |level| level.min(MAX_LIST_LEVEL))
}

impl DocumentBuilder for WordBuilder {
    type Error = DocxError;

    fn add_heading(&mut self, text: &str, level: u8) -> Result<(), DocxError> {
        let level = level.clamp(1, MAX_HEADING_LEVEL);
        self.add_text_paragraph(ParagraphStyle::Heading(level), text, RunFormat::Plain)
    }

    fn add_paragraph(&mut self, text: &str) -> Result<(), DocxError> {
        self.add_text_paragraph(ParagraphStyle::Normal, text, RunFormat::Plain)
    }

    fn enter_paragraph(&mut self) -> Result<(), DocxError> {
        let paragraph = self.new_paragraph(ParagraphStyle::Normal)?;
        self.paragraph = Some(paragraph);
        Ok(())
    }

    fn exit_paragraph(&mut self) -> Result<(), DocxError> {
        self.close_paragraph()
    }

    fn add_text(&mut self, text: &str) -> Result<(), DocxError> {
        self.push_run(text, RunFormat::Plain)
    }

    fn add_bold(&mut self, text: &str) -> Result<(), DocxError> {
        self.push_run(text, RunFormat::Bold)
    }

    fn add_italic(&mut self, text: &str) -> Result<(), DocxError> {
        self.push_run(text, RunFormat::Italic)
    }

    fn add_inline_code(&mut self, code: &str) -> Result<(), DocxError> {
        self.push_run(code, RunFormat::Code)
    }

    fn add_hyperlink(&mut self, text: &str, url: &str) -> Result<(), DocxError> {
        self.open_paragraph()?;
        let target = if url.is_empty() {
            LinkTarget::None
        } else if let Some(anchor) = url.strip_prefix('#') {
            LinkTarget::Anchor(anchor.to_owned())
        } else {
            LinkTarget::External(self.document.hyperlink_index(url))
        };
        let run = Run::new(text, RunFormat::Hyperlink);
        self.open_paragraph()?
            .content
            .push(ParagraphContent::Hyperlink { target, run });
        Ok(())
    }

    fn add_code_block_line(&mut self, line: &str) -> Result<(), DocxError> {
        self.add_text_paragraph(ParagraphStyle::CodeBlock, line, RunFormat::Plain)
    }

    fn add_block_quote(&mut self, text: &str) -> Result<(), DocxError> {
        self.add_text_paragraph(ParagraphStyle::BlockQuote, text, RunFormat::Plain)
    }

    fn add_horizontal_rule(&mut self) -> Result<(), DocxError> {
        self.add_text_paragraph(ParagraphStyle::HorizontalRule, "", RunFormat::Plain)
    }

    fn add_raw_chunk(&mut self, markup: &str) -> Result<(), DocxError> {
        let index = self.document.add_chunk(markup);
        if self.paragraph.is_some() {
            self.pending_chunks.push(index);
        } else {
            self.number_pending_item();
            self.push_element(BodyElement::AltChunk(index));
        }
        Ok(())
    }

    fn add_image_placeholder(&mut self, alt: &str) -> Result<(), DocxError> {
        self.push_run(&format!("[image: {alt}]"), RunFormat::Italic)
    }

    fn add_line_break(&mut self) -> Result<(), DocxError> {
        self.open_paragraph()?.content.push(ParagraphContent::Break);
        Ok(())
    }

    fn enter_list(&mut self, ordered: bool) -> Result<NumberingId, DocxError> {
        self.ensure_no_paragraph("list inside an open paragraph")?;
        self.next_numbering += 1;
        let id = NumberingId(self.next_numbering);
        self.document
            .numbering
            .push(NumberingInstance { id, ordered });
        self.open_lists += 1;
        Ok(id)
    }

    fn exit_list(&mut self) -> Result<(), DocxError> {
        if self.open_lists == 0 {
            tracing::debug!("Ignoring list exit without open list");
        } else {
            self.open_lists -= 1;
        }
        Ok(())
    }

    fn add_list_item(
        &mut self,
        text: &str,
        numbering: NumberingId,
        depth: usize,
    ) -> Result<(), DocxError> {
        self.ensure_no_paragraph("list item inside an open paragraph")?;
        self.number_pending_item();
        let mut paragraph = Paragraph::with_text(ParagraphStyle::Normal, text);
        paragraph.list = Some(ListPlacement::Item {
            numbering,
            level: list_level(depth),
        });
        self.push_element(BodyElement::Paragraph(paragraph));
        Ok(())
    }

    fn enter_list_item(&mut self, numbering: NumberingId, depth: usize) -> Result<(), DocxError> {
        self.ensure_no_paragraph("list item inside an open paragraph")?;
        self.number_pending_item();
        self.items.push(ItemState {
            numbering,
            level: list_level(depth),
            numbered: false,
        });
        Ok(())
    }

    fn exit_list_item(&mut self) -> Result<(), DocxError> {
        self.ensure_no_paragraph("list item exit inside an open paragraph")?;
        self.items
            .pop()
            .map(drop)
            .ok_or(DocxError::Structure("list item exit without enter"))
    }

    fn enter_table(&mut self, column_count: usize) -> Result<(), DocxError> {
        self.ensure_no_paragraph("table inside an open paragraph")?;
        if self.table.is_some() {
            return Err(DocxError::Structure("nested table"));
        }
        self.number_pending_item();
        self.table = Some(TableFrame {
            table: Table {
                column_count,
                rows: Vec::new(),
            },
            row: None,
            cell: None,
        });
        Ok(())
    }

    fn exit_table(&mut self) -> Result<(), DocxError> {
        let frame = self
            .table
            .take()
            .ok_or(DocxError::Structure("table exit without enter"))?;
        if frame.row.is_some() {
            return Err(DocxError::Structure("table exit with an open row"));
        }
        self.push_element(BodyElement::Table(frame.table));
        Ok(())
    }

    fn enter_row(&mut self, is_header: bool) -> Result<(), DocxError> {
        let frame = self.table_frame()?;
        if frame.row.is_some() {
            return Err(DocxError::Structure("row inside an open row"));
        }
        frame.row = Some(Row {
            is_header,
            cells: Vec::new(),
        });
        Ok(())
    }

    fn exit_row(&mut self) -> Result<(), DocxError> {
        let frame = self.table_frame()?;
        if frame.cell.is_some() {
            return Err(DocxError::Structure("row exit with an open cell"));
        }
        let row = frame
            .row
            .take()
            .ok_or(DocxError::Structure("row exit without enter"))?;
        frame.table.rows.push(row);
        Ok(())
    }

    fn enter_cell(&mut self) -> Result<(), DocxError> {
        let frame = self.table_frame()?;
        if frame.row.is_none() {
            return Err(DocxError::Structure("cell outside a row"));
        }
        if frame.cell.is_some() {
            return Err(DocxError::Structure("cell inside an open cell"));
        }
        frame.cell = Some(Cell::default());
        Ok(())
    }

    fn exit_cell(&mut self) -> Result<(), DocxError> {
        self.ensure_no_paragraph("cell exit inside an open paragraph")?;
        let frame = self.table_frame()?;
        let cell = frame
            .cell
            .take()
            .ok_or(DocxError::Structure("cell exit without enter"))?;
        if let Some(row) = frame.row.as_mut() {
            row.cells.push(cell);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), DocxError> {
        if self.paragraph.is_some() {
            self.close_paragraph()?;
        }
        if self.table.is_some() {
            return Err(DocxError::Structure("unclosed table"));
        }
        if !self.items.is_empty() {
            tracing::debug!(open = self.items.len(), "Finishing with open list items");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mdocx_renderer::{parse_markdown, render_document};
    use pretty_assertions::assert_eq;

    use super::*;

    fn build(markdown: &str) -> WordDocument {
        let mut builder = WordBuilder::new();
        render_document(&mut builder, &parse_markdown(markdown, true)).unwrap();
        builder.into_document()
    }

    fn paragraph_at(document: &WordDocument, index: usize) -> &Paragraph {
        match &document.body[index] {
            BodyElement::Paragraph(paragraph) => paragraph,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_and_formatted_paragraph() {
        let document = build("# Title\n\nSome **bold** and `code`");
        assert_eq!(document.body.len(), 2);

        let heading = paragraph_at(&document, 0);
        assert_eq!(heading.style, ParagraphStyle::Heading(1));
        assert_eq!(heading.text(), "Title");

        let paragraph = paragraph_at(&document, 1);
        assert_eq!(
            paragraph.content,
            vec![
                ParagraphContent::Run(Run::new("Some ", RunFormat::Plain)),
                ParagraphContent::Run(Run::new("bold", RunFormat::Bold)),
                ParagraphContent::Run(Run::new(" and ", RunFormat::Plain)),
                ParagraphContent::Run(Run::new("code", RunFormat::Code)),
            ]
        );
    }

    #[test]
    fn test_list_paragraphs_carry_numbering() {
        let document = build("1. one\n2. two\n   - nested");
        assert_eq!(
            document.numbering,
            vec![
                NumberingInstance {
                    id: NumberingId(1),
                    ordered: true
                },
                NumberingInstance {
                    id: NumberingId(2),
                    ordered: false
                },
            ]
        );
        let placements: Vec<_> = document.paragraphs().map(|p| p.list).collect();
        assert_eq!(
            placements,
            vec![
                Some(ListPlacement::Item {
                    numbering: NumberingId(1),
                    level: 0
                }),
                Some(ListPlacement::Item {
                    numbering: NumberingId(1),
                    level: 0
                }),
                Some(ListPlacement::Item {
                    numbering: NumberingId(2),
                    level: 1
                }),
            ]
        );
    }

    #[test]
    fn test_second_paragraph_in_item_is_continuation() {
        let document = build("- first\n\n  second");
        let placements: Vec<_> = document.paragraphs().map(|p| p.list).collect();
        assert_eq!(
            placements,
            vec![
                Some(ListPlacement::Item {
                    numbering: NumberingId(1),
                    level: 0
                }),
                Some(ListPlacement::Continuation { level: 0 }),
            ]
        );
    }

    #[test]
    fn test_table_cells_hold_paragraphs() {
        let document = build("| A | B |\n|---|---|\n| 1 |   |");
        let [BodyElement::Table(table)] = document.body.as_slice() else {
            panic!("expected a table, got {:?}", document.body);
        };
        assert_eq!(table.column_count, 2);
        assert!(table.rows[0].is_header);
        assert_eq!(table.rows[1].cells.len(), 2);
        for cell in table.rows.iter().flat_map(|row| &row.cells) {
            assert!(matches!(cell.content[0], BodyElement::Paragraph(_)));
        }
    }

    #[test]
    fn test_raw_chunk_in_paragraph_follows_it() {
        let document = build("before <span>inside</span> after");
        assert_eq!(document.chunks, vec!["<span>inside</span>".to_owned()]);
        assert_eq!(document.body.len(), 2);
        assert_eq!(paragraph_at(&document, 0).text(), "before  after");
        assert_eq!(document.body[1], BodyElement::AltChunk(0));
    }

    #[test]
    fn test_hyperlink_targets_are_deduplicated() {
        let document = build("[a](https://x.example) [b](https://x.example) [c](#top)");
        assert_eq!(document.hyperlinks, vec!["https://x.example".to_owned()]);
        let paragraph = paragraph_at(&document, 0);
        assert!(paragraph.content.contains(&ParagraphContent::Hyperlink {
            target: LinkTarget::Anchor("top".to_owned()),
            run: Run::new("c", RunFormat::Hyperlink),
        }));
    }

    #[test]
    fn test_image_placeholder_is_italic() {
        let document = build("![Logo](logo.png)");
        assert_eq!(
            paragraph_at(&document, 0).content,
            vec![ParagraphContent::Run(Run::new(
                "[image: Logo]",
                RunFormat::Italic
            ))]
        );
    }

    #[test]
    fn test_inline_outside_paragraph_is_rejected() {
        let mut builder = WordBuilder::new();
        assert!(matches!(
            builder.add_text("loose"),
            Err(DocxError::Structure(_))
        ));
    }

    #[test]
    fn test_cell_outside_row_is_rejected() {
        let mut builder = WordBuilder::new();
        assert!(builder.enter_cell().is_err());
        builder.enter_table(1).unwrap();
        assert!(matches!(
            builder.enter_cell(),
            Err(DocxError::Structure("cell outside a row"))
        ));
    }

    #[test]
    fn test_exit_list_without_enter_is_ignored() {
        let mut builder = WordBuilder::new();
        builder.exit_list().unwrap();
        assert_eq!(builder.enter_list(false).unwrap(), NumberingId(1));
    }

    #[test]
    fn test_finish_closes_dangling_paragraph() {
        let mut builder = WordBuilder::new();
        builder.enter_paragraph().unwrap();
        builder.add_text("open").unwrap();
        builder.add_raw_chunk("<b>x</b>").unwrap();
        builder.finish().unwrap();

        let document = builder.into_document();
        assert_eq!(document.body.len(), 2);
        assert_eq!(document.body[1], BodyElement::AltChunk(0));
    }

    #[test]
    fn test_item_starting_with_table_gets_numbered_paragraph() {
        let mut builder = WordBuilder::new();
        let numbering = builder.enter_list(true).unwrap();
        builder.enter_list_item(numbering, 0).unwrap();
        builder.enter_table(1).unwrap();
        builder.exit_table().unwrap();
        builder.exit_list_item().unwrap();
        builder.exit_list().unwrap();

        let document = builder.into_document();
        assert_eq!(
            paragraph_at(&document, 0).list,
            Some(ListPlacement::Item {
                numbering,
                level: 0
            })
        );
        assert!(matches!(document.body[1], BodyElement::Table(_)));
    }

    #[test]
    fn test_deep_lists_clamp_level() {
        assert_eq!(list_level(3), 3);
        assert_eq!(list_level(20), MAX_LIST_LEVEL);
    }
}
