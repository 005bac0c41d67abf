//! Tree-walking renderer driving a [`DocumentBuilder`].

use crate::ast::{Block, Document, Inline, ListItem, TableCell, TableRow};
use crate::builder::{DocumentBuilder, MAX_HEADING_LEVEL};
use crate::extract::plain_text;
use crate::raw::{RawMarkupBuffer, escape_html};
use crate::state::{ListContext, ListStack, TableState};

/// Render a document into `builder` and finalize it.
///
/// Convenience wrapper around [`DocumentRenderer`].
pub fn render_document<B: DocumentBuilder>(
    builder: &mut B,
    document: &Document,
) -> Result<(), B::Error> {
    DocumentRenderer::new(builder).render(document)
}

/// Depth-first renderer from the block/inline tree to builder operations.
///
/// Owns all traversal state (open lists, current table, buffered raw
/// markup) and borrows the builder for the duration of the render.
/// Operations are emitted in source order and scoped operations are always
/// balanced, also when the builder fails halfway.
pub struct DocumentRenderer<'b, B: DocumentBuilder> {
    builder: &'b mut B,
    lists: ListStack,
    table: Option<TableState>,
    raw: RawMarkupBuffer,
}

impl<'b, B: DocumentBuilder> DocumentRenderer<'b, B> {
    /// Create a renderer writing into `builder`.
    pub fn new(builder: &'b mut B) -> Self {
        Self {
            builder,
            lists: ListStack::new(),
            table: None,
            raw: RawMarkupBuffer::new(),
        }
    }

    /// Render the whole document, then call [`DocumentBuilder::finish`].
    ///
    /// The first builder error aborts the traversal and is returned as is.
    pub fn render(&mut self, document: &Document) -> Result<(), B::Error> {
        self.render_blocks(&document.blocks)?;
        self.flush_raw()?;
        self.builder.finish()
    }

    /// Number of lists currently open. Zero outside a render.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.lists.depth()
    }

    fn render_blocks(&mut self, blocks: &[Block]) -> Result<(), B::Error> {
        for block in blocks {
            self.render_block(block)?;
        }
        Ok(())
    }

    fn render_block(&mut self, block: &Block) -> Result<(), B::Error> {
        match block {
            Block::Heading { level, content } => {
                let level = (*level).clamp(1, MAX_HEADING_LEVEL);
                self.builder.add_heading(&plain_text(content), level)
            }
            Block::Paragraph(None) => Ok(()),
            Block::Paragraph(Some(inlines)) => self.render_paragraph(inlines),
            Block::CodeBlock { text, language } => {
                self.render_code_block(text, language.as_deref())
            }
            Block::Quote(children) => self.render_quote(children),
            Block::List { ordered, items } => self.render_list(*ordered, items),
            Block::Table { rows } => self.render_table(rows),
            Block::ThematicBreak => self.builder.add_horizontal_rule(),
            Block::RawMarkup(markup) => self.builder.add_raw_chunk(markup),
            Block::Container(children) => self.render_blocks(children),
            Block::Unsupported { kind } => {
                tracing::debug!(kind = %kind, "Skipping unsupported block");
                Ok(())
            }
        }
    }

    fn render_paragraph(&mut self, inlines: &[Inline]) -> Result<(), B::Error> {
        self.builder.enter_paragraph()?;
        if let Some(table) = &mut self.table {
            table.mark_content();
        }
        self.render_inlines(inlines)?;
        self.flush_raw()?;
        self.builder.exit_paragraph()
    }

    fn render_code_block(&mut self, text: &str, language: Option<&str>) -> Result<(), B::Error> {
        tracing::trace!(language = language.unwrap_or_default(), "Rendering code block");
        for line in text.lines() {
            self.builder.add_code_block_line(line)?;
        }
        Ok(())
    }

    /// Direct child paragraphs become quote paragraphs; anything else is
    /// rendered as ordinary blocks.
    fn render_quote(&mut self, children: &[Block]) -> Result<(), B::Error> {
        for child in children {
            match child {
                Block::Paragraph(Some(inlines)) => {
                    self.builder.add_block_quote(&plain_text(inlines))?;
                }
                other => self.render_block(other)?,
            }
        }
        Ok(())
    }

    fn render_list(&mut self, ordered: bool, items: &[ListItem]) -> Result<(), B::Error> {
        let numbering = self.builder.enter_list(ordered)?;
        self.lists.enter(numbering, ordered);
        let result = self.render_list_items(items);
        self.lists.exit();
        result?;
        self.builder.exit_list()
    }

    fn render_list_items(&mut self, items: &[ListItem]) -> Result<(), B::Error> {
        for item in items {
            // Re-read per item: a nested list may have been pushed and popped.
            let Some(&ListContext {
                numbering,
                ordered,
                depth,
            }) = self.lists.current()
            else {
                break;
            };
            tracing::trace!(ordered, depth, blocks = item.blocks.len(), "Rendering list item");

            if item.blocks.is_empty() {
                self.builder.add_list_item("", numbering, depth)?;
                continue;
            }

            self.builder.enter_list_item(numbering, depth)?;
            self.render_blocks(&item.blocks)?;
            self.builder.exit_list_item()?;
        }
        Ok(())
    }

    fn render_table(&mut self, rows: &[TableRow]) -> Result<(), B::Error> {
        let column_count = rows.first().map_or(0, |row| row.cells.len());
        if column_count == 0 {
            tracing::debug!(rows = rows.len(), "Skipping table without columns");
            return Ok(());
        }

        self.builder.enter_table(column_count)?;
        let outer = self.table.replace(TableState::new(column_count));
        let result = self.render_rows(rows);
        self.table = outer;
        result?;
        self.builder.exit_table()
    }

    fn render_rows(&mut self, rows: &[TableRow]) -> Result<(), B::Error> {
        for (index, row) in rows.iter().enumerate() {
            if let Some(table) = &mut self.table {
                table.start_row(index, row.is_header);
                tracing::trace!(
                    row = table.row_index(),
                    header = table.is_header_row(),
                    cells = row.cells.len(),
                    columns = table.column_count(),
                    "Rendering table row"
                );
            }
            self.builder.enter_row(row.is_header)?;
            for cell in &row.cells {
                self.render_cell(cell)?;
            }
            self.builder.exit_row()?;
        }
        Ok(())
    }

    /// The output format rejects cells without block content, so an empty
    /// paragraph is added to any cell that did not get one.
    fn render_cell(&mut self, cell: &TableCell) -> Result<(), B::Error> {
        self.builder.enter_cell()?;
        if let Some(table) = &mut self.table {
            table.start_cell();
        }

        if !cell.content.is_empty() {
            self.render_paragraph(&cell.content)?;
        }

        if self.table.as_mut().is_some_and(TableState::end_cell) {
            self.builder.add_paragraph("")?;
        }
        self.builder.exit_cell()
    }

    fn render_inlines(&mut self, inlines: &[Inline]) -> Result<(), B::Error> {
        for inline in inlines {
            self.render_inline(inline)?;
        }
        Ok(())
    }

    fn render_inline(&mut self, inline: &Inline) -> Result<(), B::Error> {
        if self.buffer_inline(inline) {
            return Ok(());
        }

        match inline {
            Inline::Text(text) => self.builder.add_text(text),
            Inline::Emphasis {
                delimiters,
                content,
            } => {
                let text = plain_text(content);
                if *delimiters == 2 {
                    self.builder.add_bold(&text)
                } else {
                    self.builder.add_italic(&text)
                }
            }
            Inline::Code(code) => self.builder.add_inline_code(code),
            Inline::Link {
                url,
                content,
                is_image,
            } => {
                let text = plain_text(content);
                if *is_image {
                    self.builder.add_image_placeholder(&text)
                } else {
                    self.builder
                        .add_hyperlink(&text, url.as_deref().unwrap_or_default())
                }
            }
            Inline::LineBreak { hard: true } => self.builder.add_line_break(),
            Inline::LineBreak { hard: false } => self.builder.add_text(" "),
            Inline::RawMarkup(fragment) => match self.raw.push_fragment(fragment) {
                Some(chunk) => self.builder.add_raw_chunk(&chunk),
                None => Ok(()),
            },
            Inline::Autolink(url) => self.builder.add_hyperlink(url, url),
            Inline::Container(children) => self.render_inlines(children),
            Inline::Unsupported { kind } => {
                tracing::debug!(kind = %kind, "Skipping unsupported inline");
                Ok(())
            }
        }
    }

    /// While a raw element is open, inline content between its tags belongs
    /// to the same chunk. Text and soft breaks are escaped into it; hard
    /// breaks, emphasis, code spans, links, autolinks and images are written
    /// as the equivalent HTML elements. Returns `true` if `inline` was
    /// consumed.
    fn buffer_inline(&mut self, inline: &Inline) -> bool {
        if !self.raw.is_buffering() {
            return false;
        }
        match inline {
            Inline::Text(text) => self.raw.push_text(text),
            Inline::LineBreak { hard: false } => self.raw.push_text(" "),
            Inline::LineBreak { hard: true } => self.raw.push_html("<br>"),
            Inline::Emphasis {
                delimiters,
                content,
            } => {
                let tag = if *delimiters == 2 { "strong" } else { "em" };
                let text = escape_html(&plain_text(content));
                self.raw.push_html(&format!("<{tag}>{text}</{tag}>"))
            }
            Inline::Code(code) => self
                .raw
                .push_html(&format!("<code>{}</code>", escape_html(code))),
            Inline::Link {
                url,
                content,
                is_image: false,
            } => {
                let href = escape_html(url.as_deref().unwrap_or_default());
                let text = escape_html(&plain_text(content));
                self.raw.push_html(&format!(r#"<a href="{href}">{text}</a>"#))
            }
            Inline::Autolink(url) => {
                let url = escape_html(url);
                self.raw.push_html(&format!(r#"<a href="{url}">{url}</a>"#))
            }
            Inline::Link {
                content,
                is_image: true,
                ..
            } => {
                let alt = escape_html(&plain_text(content));
                self.raw.push_html(&format!(r#"<img alt="{alt}">"#))
            }
            Inline::RawMarkup(_)
            | Inline::Container(_)
            | Inline::Unsupported { .. } => false,
        }
    }

    fn flush_raw(&mut self) -> Result<(), B::Error> {
        match self.raw.flush() {
            Some(chunk) => self.builder.add_raw_chunk(&chunk),
            None => Ok(()),
        }
    }
}
