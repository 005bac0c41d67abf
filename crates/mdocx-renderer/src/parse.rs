//! Markdown parsing into the block/inline tree.
//!
//! Folds the flat `pulldown-cmark` event stream into a [`Document`] using an
//! explicit stack of open frames.

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};

use crate::ast::{Block, Document, Inline, ListItem, TableCell, TableRow};

/// Parser options for the given GitHub Flavored Markdown setting.
#[must_use]
pub fn parser_options(gfm: bool) -> Options {
    if gfm {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    } else {
        Options::empty()
    }
}

/// Parse markdown source into a document tree.
#[must_use]
pub fn parse_markdown(source: &str, gfm: bool) -> Document {
    parse_events(Parser::new_ext(source, parser_options(gfm)))
}

/// Build a document tree from markdown events.
pub fn parse_events<'a, I>(events: I) -> Document
where
    I: Iterator<Item = Event<'a>>,
{
    let mut tree = TreeBuilder::new();
    for event in events {
        tree.event(event);
    }
    tree.finish()
}

/// A node under construction.
enum Frame {
    Document(Vec<Block>),
    Quote(Vec<Block>),
    Item(Vec<Block>),
    /// Block construct without a tree counterpart; its content is discarded.
    Skipped {
        kind: &'static str,
        blocks: Vec<Block>,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Table(Vec<TableRow>),
    Row {
        is_header: bool,
        cells: Vec<TableCell>,
    },
    /// `implicit` paragraphs wrap loose inline content of tight list items.
    Paragraph {
        inlines: Vec<Inline>,
        implicit: bool,
    },
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    Cell(Vec<Inline>),
    Emphasis {
        delimiters: u8,
        inlines: Vec<Inline>,
    },
    Link {
        url: String,
        is_image: bool,
        autolink: bool,
        inlines: Vec<Inline>,
    },
    Span(Vec<Inline>),
    Code {
        language: Option<String>,
        text: String,
    },
    Html(String),
    Metadata,
}

impl Frame {
    /// Frames nested inside a paragraph-like parent.
    fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Emphasis { .. } | Self::Link { .. } | Self::Span(_)
        )
    }

    fn blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Self::Document(blocks)
            | Self::Quote(blocks)
            | Self::Item(blocks)
            | Self::Skipped { blocks, .. } => Some(blocks),
            _ => None,
        }
    }

    fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Self::Paragraph { inlines, .. }
            | Self::Heading { inlines, .. }
            | Self::Cell(inlines)
            | Self::Emphasis { inlines, .. }
            | Self::Link { inlines, .. }
            | Self::Span(inlines) => Some(inlines),
            _ => None,
        }
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Document(Vec::new())],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::Html(html) => self.html(&html),
            Event::InlineHtml(html) => self.push_inline(Inline::RawMarkup(html.into_string())),
            Event::SoftBreak => self.push_inline(Inline::LineBreak { hard: false }),
            Event::HardBreak => self.push_inline(Inline::LineBreak { hard: true }),
            Event::Rule => self.push_block(Block::ThematicBreak),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_inline(Inline::text(marker));
            }
            Event::FootnoteReference(_) => self.push_inline(Inline::Unsupported {
                kind: "footnote_reference".to_owned(),
            }),
            Event::InlineMath(_) | Event::DisplayMath(_) => self.push_inline(Inline::Unsupported {
                kind: "math".to_owned(),
            }),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.close_implicit_paragraph();
                Frame::Paragraph {
                    inlines: Vec::new(),
                    implicit: false,
                }
            }
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level_to_num(level),
                inlines: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                language: match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                },
                text: String::new(),
            },
            Tag::HtmlBlock => Frame::Html(String::new()),
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::FootnoteDefinition(_) => Frame::Skipped {
                kind: "footnote_definition",
                blocks: Vec::new(),
            },
            Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => {
                Frame::Skipped {
                    kind: "definition_list",
                    blocks: Vec::new(),
                }
            }
            Tag::MetadataBlock(_) => Frame::Metadata,
            Tag::Table(_) => Frame::Table(Vec::new()),
            Tag::TableHead => Frame::Row {
                is_header: true,
                cells: Vec::new(),
            },
            Tag::TableRow => Frame::Row {
                is_header: false,
                cells: Vec::new(),
            },
            Tag::TableCell => Frame::Cell(Vec::new()),
            Tag::Emphasis => Frame::Emphasis {
                delimiters: 1,
                inlines: Vec::new(),
            },
            Tag::Strong => Frame::Emphasis {
                delimiters: 2,
                inlines: Vec::new(),
            },
            Tag::Strikethrough | Tag::Superscript | Tag::Subscript => Frame::Span(Vec::new()),
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => {
                let url = match link_type {
                    LinkType::Email => format!("mailto:{dest_url}"),
                    _ => dest_url.into_string(),
                };
                Frame::Link {
                    url,
                    is_image: false,
                    autolink: link_type == LinkType::Autolink,
                    inlines: Vec::new(),
                }
            }
            Tag::Image { dest_url, .. } => Frame::Link {
                url: dest_url.into_string(),
                is_image: true,
                autolink: false,
                inlines: Vec::new(),
            },
        };

        // Inline frames inside a tight list item need a paragraph around them.
        if frame.is_inline() {
            self.ensure_inline_target();
        } else {
            self.close_implicit_paragraph();
        }
        self.stack.push(frame);
    }

    fn end_tag(&mut self, _tag: TagEnd) {
        self.close_implicit_paragraph();
        self.close_top();
    }

    /// Pop the top frame and attach the finished node to its parent.
    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Document(blocks) => self.stack.push(Frame::Document(blocks)),
            Frame::Quote(blocks) => self.push_block(Block::Quote(blocks)),
            Frame::Item(blocks) => {
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem::new(blocks));
                }
            }
            Frame::Skipped { kind, .. } => self.push_block(Block::Unsupported {
                kind: kind.to_owned(),
            }),
            Frame::List { ordered, items } => self.push_block(Block::List { ordered, items }),
            Frame::Table(rows) => self.push_block(Block::Table { rows }),
            Frame::Row { is_header, cells } => {
                if let Some(Frame::Table(rows)) = self.stack.last_mut() {
                    rows.push(TableRow { is_header, cells });
                }
            }
            Frame::Paragraph { inlines, .. } => self.push_block(Block::Paragraph(Some(inlines))),
            Frame::Heading { level, inlines } => self.push_block(Block::Heading {
                level,
                content: inlines,
            }),
            Frame::Cell(inlines) => {
                if let Some(Frame::Row { cells, .. }) = self.stack.last_mut() {
                    cells.push(TableCell::new(inlines));
                }
            }
            Frame::Emphasis {
                delimiters,
                inlines,
            } => self.push_inline(Inline::Emphasis {
                delimiters,
                content: inlines,
            }),
            Frame::Link {
                url,
                is_image,
                autolink,
                inlines,
            } => {
                let inline = if autolink {
                    Inline::Autolink(url)
                } else {
                    Inline::Link {
                        url: (!url.is_empty()).then_some(url),
                        content: inlines,
                        is_image,
                    }
                };
                self.push_inline(inline);
            }
            Frame::Span(inlines) => self.push_inline(Inline::Container(inlines)),
            Frame::Code { language, text } => self.push_block(Block::CodeBlock { text, language }),
            Frame::Html(text) => self.push_block(Block::RawMarkup(text)),
            Frame::Metadata => self.push_block(Block::Unsupported {
                kind: "metadata".to_owned(),
            }),
        }
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::Code { text: buffer, .. } | Frame::Html(buffer)) => buffer.push_str(text),
            Some(Frame::Metadata) => {}
            _ => self.push_inline(Inline::text(text)),
        }
    }

    fn html(&mut self, html: &str) {
        if let Some(Frame::Html(buffer)) = self.stack.last_mut() {
            buffer.push_str(html);
        } else {
            self.push_block(Block::RawMarkup(html.to_owned()));
        }
    }

    fn push_block(&mut self, block: Block) {
        self.close_implicit_paragraph();
        match self.stack.last_mut().and_then(Frame::blocks_mut) {
            Some(blocks) => blocks.push(block),
            None => tracing::debug!("Dropping block outside a block container"),
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        self.ensure_inline_target();
        let Some(inlines) = self.stack.last_mut().and_then(Frame::inlines_mut) else {
            tracing::debug!("Dropping inline outside an inline container");
            return;
        };
        // The parser splits text at special characters; keep runs whole.
        if let (Inline::Text(next), Some(Inline::Text(last))) = (&inline, inlines.last_mut()) {
            last.push_str(next);
        } else {
            inlines.push(inline);
        }
    }

    /// Open an implicit paragraph when inline content arrives directly in a
    /// block container (tight list items).
    fn ensure_inline_target(&mut self) {
        if self
            .stack
            .last_mut()
            .is_some_and(|frame| frame.blocks_mut().is_some())
        {
            self.stack.push(Frame::Paragraph {
                inlines: Vec::new(),
                implicit: true,
            });
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame::Paragraph { implicit: true, .. })
        ) && let Some(Frame::Paragraph { inlines, .. }) = self.stack.pop()
            && let Some(blocks) = self.stack.last_mut().and_then(Frame::blocks_mut)
        {
            blocks.push(Block::Paragraph(Some(inlines)));
        }
    }

    fn finish(mut self) -> Document {
        self.close_implicit_paragraph();
        while self.stack.len() > 1 {
            self.close_top();
            self.close_implicit_paragraph();
        }
        match self.stack.pop() {
            Some(Frame::Document(blocks)) => Document::new(blocks),
            _ => Document::default(),
        }
    }
}

/// Language identifier from a fence info string (`rust ignore` -> `rust`).
fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .map(|lang| lang.trim_start_matches('{').trim_end_matches('}'))
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(markdown: &str) -> Vec<Block> {
        parse_markdown(markdown, true).blocks
    }

    fn text(s: &str) -> Inline {
        Inline::text(s)
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            parse("# Hello\n\nSome *nice* text"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("Hello")],
                },
                Block::Paragraph(Some(vec![
                    text("Some "),
                    Inline::Emphasis {
                        delimiters: 1,
                        content: vec![text("nice")],
                    },
                    text(" text"),
                ])),
            ]
        );
    }

    #[test]
    fn test_strong_has_two_delimiters() {
        assert_eq!(
            parse("**bold**"),
            vec![Block::Paragraph(Some(vec![Inline::Emphasis {
                delimiters: 2,
                content: vec![text("bold")],
            }]))]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            parse("```rust ignore\na\n\nb\n```"),
            vec![Block::CodeBlock {
                text: "a\n\nb\n".to_owned(),
                language: Some("rust".to_owned()),
            }]
        );
    }

    #[test]
    fn test_tight_list_items_get_paragraphs() {
        assert_eq!(
            parse("- one\n- two"),
            vec![Block::List {
                ordered: false,
                items: vec![
                    ListItem::new(vec![Block::Paragraph(Some(vec![text("one")]))]),
                    ListItem::new(vec![Block::Paragraph(Some(vec![text("two")]))]),
                ],
            }]
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            parse("- outer\n  1. inner"),
            vec![Block::List {
                ordered: false,
                items: vec![ListItem::new(vec![
                    Block::Paragraph(Some(vec![text("outer")])),
                    Block::List {
                        ordered: true,
                        items: vec![ListItem::new(vec![Block::Paragraph(Some(vec![text(
                            "inner"
                        )]))])],
                    },
                ])],
            }]
        );
    }

    #[test]
    fn test_task_list_marker() {
        assert_eq!(
            parse("- [x] done"),
            vec![Block::List {
                ordered: false,
                items: vec![ListItem::new(vec![Block::Paragraph(Some(vec![text(
                    "[x] done"
                )]))])],
            }]
        );
    }

    #[test]
    fn test_table_rows() {
        let blocks = parse("| A | B | C |\n|---|---|---|\n| 1 | 2 |");
        let [Block::Table { rows }] = blocks.as_slice() else {
            panic!("expected a single table, got {blocks:?}");
        };
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_header);
        assert_eq!(rows[0].cells.len(), 3);
        assert!(!rows[1].is_header);
        assert_eq!(rows[1].cells[0], TableCell::new(vec![text("1")]));
    }

    #[test]
    fn test_links_images_and_autolinks() {
        assert_eq!(
            parse("[Rust](https://rust-lang.org) ![Logo](logo.png) <https://a.example>"),
            vec![Block::Paragraph(Some(vec![
                Inline::Link {
                    url: Some("https://rust-lang.org".to_owned()),
                    content: vec![text("Rust")],
                    is_image: false,
                },
                text(" "),
                Inline::Link {
                    url: Some("logo.png".to_owned()),
                    content: vec![text("Logo")],
                    is_image: true,
                },
                text(" "),
                Inline::Autolink("https://a.example".to_owned()),
            ]))]
        );
    }

    #[test]
    fn test_inline_and_block_html() {
        assert_eq!(
            parse("a <b>x</b>\n\n<div>\nblock\n</div>\n"),
            vec![
                Block::Paragraph(Some(vec![
                    text("a "),
                    Inline::RawMarkup("<b>".to_owned()),
                    text("x"),
                    Inline::RawMarkup("</b>".to_owned()),
                ])),
                Block::RawMarkup("<div>\nblock\n</div>\n".to_owned()),
            ]
        );
    }

    #[test]
    fn test_quote_and_rule() {
        assert_eq!(
            parse("> quoted\n\n---"),
            vec![
                Block::Quote(vec![Block::Paragraph(Some(vec![text("quoted")]))]),
                Block::ThematicBreak,
            ]
        );
    }

    #[test]
    fn test_breaks() {
        assert_eq!(
            parse("a\nb\\\nc"),
            vec![Block::Paragraph(Some(vec![
                text("a"),
                Inline::LineBreak { hard: false },
                text("b"),
                Inline::LineBreak { hard: true },
                text("c"),
            ]))]
        );
    }

    #[test]
    fn test_strikethrough_is_container() {
        assert_eq!(
            parse("~~gone~~"),
            vec![Block::Paragraph(Some(vec![Inline::Container(vec![text(
                "gone"
            )])]))]
        );
    }

    #[test]
    fn test_gfm_disabled_has_no_tables() {
        let blocks = parse_markdown("| A |\n|---|\n| 1 |", false).blocks;
        assert!(
            blocks
                .iter()
                .all(|block| !matches!(block, Block::Table { .. }))
        );
    }

    #[test]
    fn test_parser_options() {
        let options = parser_options(true);
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(parser_options(false).is_empty());
    }
}
