//! Flat OPC serialization of a [`WordDocument`].
//!
//! Flat OPC stores every part of a `.docx` package in one XML file
//! (`pkg:package`), which Word opens directly. XML parts are embedded as
//! `pkg:xmlData`; the HTML chunks referenced by `w:altChunk` are embedded as
//! base64 `pkg:binaryData`.

use std::borrow::Cow;
use std::io::Write;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::builder::MAX_LIST_LEVEL;
use crate::error::DocxError;
use crate::model::{
    BodyElement, Cell, LinkTarget, ListPlacement, Paragraph, ParagraphContent, ParagraphStyle,
    Run, RunFormat, Table, WordDocument,
};

const PKG_NS: &str = "http://schemas.microsoft.com/office/2006/xmlPackage";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const NUMBERING_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

/// Abstract numbering definition ids.
const BULLET_ABSTRACT_ID: &str = "0";
const DECIMAL_ABSTRACT_ID: &str = "1";

/// Bullet glyphs cycled through list levels.
const BULLETS: [&str; 3] = ["\u{2022}", "\u{25e6}", "\u{25aa}"];

/// Indentation step per list level, in twentieths of a point.
const INDENT_STEP: u32 = 720;
const HANGING_INDENT: u32 = 360;

/// Style ids used for the configurable styles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleNames {
    /// Paragraph style of code block lines.
    pub code_block: String,
    /// Paragraph style of block quotes.
    pub block_quote: String,
    /// Character style of inline code.
    pub inline_code: String,
    /// Character style of hyperlinks.
    pub hyperlink: String,
}

impl Default for StyleNames {
    fn default() -> Self {
        Self {
            code_block: "SourceCode".to_owned(),
            block_quote: "Quote".to_owned(),
            inline_code: "VerbatimChar".to_owned(),
            hyperlink: "Hyperlink".to_owned(),
        }
    }
}

impl WordDocument {
    /// Serialize the document as a Flat OPC package string.
    ///
    /// # Errors
    ///
    /// Returns an error if XML serialization fails.
    pub fn to_flat_opc(&self, styles: &StyleNames) -> Result<String, DocxError> {
        let mut buffer = Vec::new();
        self.write_flat_opc(styles, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write the document as a Flat OPC package.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_flat_opc<W: Write>(&self, styles: &StyleNames, out: W) -> Result<(), DocxError> {
        let mut writer = PackageWriter {
            xml: Writer::new(out),
            styles,
        };
        writer.package(self)
    }
}

/// Relationship id of an external hyperlink.
fn hyperlink_rel_id(index: usize) -> String {
    format!("rIdLink{}", index + 1)
}

/// Relationship id of an HTML chunk.
fn chunk_rel_id(index: usize) -> String {
    format!("rIdChunk{}", index + 1)
}

/// Part name of an HTML chunk, relative to `/word`.
fn chunk_part_name(index: usize) -> String {
    format!("afchunk{}.html", index + 1)
}

/// Characters outside the XML 1.0 `Char` production. Escaping cannot
/// represent them, so they are replaced.
fn is_xml_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// `text` with forbidden characters replaced by U+FFFD.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_xml_forbidden) {
        return Cow::Borrowed(text);
    }
    tracing::debug!("Replacing control characters not allowed in XML");
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_forbidden(c) { '\u{FFFD}' } else { c })
            .collect(),
    )
}

struct PackageWriter<'s, W: Write> {
    xml: Writer<W>,
    styles: &'s StyleNames,
}

impl<W: Write> PackageWriter<'_, W> {
    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
        let start = BytesStart::new(name)
            .with_attributes(attrs.iter().map(|&(key, value)| (key, xml_safe(value))));
        self.xml.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), DocxError> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
        let element = BytesStart::new(name)
            .with_attributes(attrs.iter().map(|&(key, value)| (key, xml_safe(value))));
        self.xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Empty element with a single `w:val` attribute.
    fn empty_val(&mut self, name: &str, value: &str) -> Result<(), DocxError> {
        self.empty(name, &[("w:val", value)])
    }

    fn text(&mut self, text: &str) -> Result<(), DocxError> {
        let text = xml_safe(text);
        self.xml.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    fn package(&mut self, document: &WordDocument) -> Result<(), DocxError> {
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        self.xml.write_event(Event::PI(BytesPI::new(
            r#"mso-application progid="Word.Document""#,
        )))?;
        self.start("pkg:package", &[("xmlns:pkg", PKG_NS)])?;

        self.xml_part("/_rels/.rels", RELS_CONTENT_TYPE, |w| w.package_rels())?;
        self.xml_part("/word/document.xml", DOCUMENT_CONTENT_TYPE, |w| {
            w.document_part(document)
        })?;
        self.xml_part("/word/_rels/document.xml.rels", RELS_CONTENT_TYPE, |w| {
            w.document_rels(document)
        })?;
        self.xml_part("/word/styles.xml", STYLES_CONTENT_TYPE, |w| w.styles_part())?;
        self.xml_part("/word/numbering.xml", NUMBERING_CONTENT_TYPE, |w| {
            w.numbering_part(document)
        })?;
        for (index, chunk) in document.chunks.iter().enumerate() {
            self.chunk_part(index, chunk)?;
        }

        self.end("pkg:package")
    }

    fn xml_part(
        &mut self,
        name: &str,
        content_type: &str,
        body: impl FnOnce(&mut Self) -> Result<(), DocxError>,
    ) -> Result<(), DocxError> {
        self.start(
            "pkg:part",
            &[("pkg:name", name), ("pkg:contentType", content_type)],
        )?;
        self.start("pkg:xmlData", &[])?;
        body(self)?;
        self.end("pkg:xmlData")?;
        self.end("pkg:part")
    }

    fn chunk_part(&mut self, index: usize, chunk: &str) -> Result<(), DocxError> {
        let name = format!("/word/{}", chunk_part_name(index));
        self.start(
            "pkg:part",
            &[
                ("pkg:name", name.as_str()),
                ("pkg:contentType", "text/html"),
                ("pkg:compression", "store"),
            ],
        )?;
        self.start("pkg:binaryData", &[])?;
        let html = format!("<html><body>{chunk}</body></html>");
        self.text(&BASE64_STANDARD.encode(html))?;
        self.end("pkg:binaryData")?;
        self.end("pkg:part")
    }

    fn package_rels(&mut self) -> Result<(), DocxError> {
        self.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
        self.relationship("rId1", "officeDocument", "word/document.xml", false)?;
        self.end("Relationships")
    }

    fn document_rels(&mut self, document: &WordDocument) -> Result<(), DocxError> {
        self.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
        self.relationship("rIdStyles", "styles", "styles.xml", false)?;
        self.relationship("rIdNumbering", "numbering", "numbering.xml", false)?;
        for (index, url) in document.hyperlinks.iter().enumerate() {
            self.relationship(&hyperlink_rel_id(index), "hyperlink", url, true)?;
        }
        for index in 0..document.chunks.len() {
            self.relationship(
                &chunk_rel_id(index),
                "aFChunk",
                &chunk_part_name(index),
                false,
            )?;
        }
        self.end("Relationships")
    }

    fn relationship(
        &mut self,
        id: &str,
        kind: &str,
        target: &str,
        external: bool,
    ) -> Result<(), DocxError> {
        let rel_type = format!("{REL_TYPE_BASE}/{kind}");
        let mut attrs = vec![("Id", id), ("Type", rel_type.as_str()), ("Target", target)];
        if external {
            attrs.push(("TargetMode", "External"));
        }
        self.empty("Relationship", &attrs)
    }

    fn document_part(&mut self, document: &WordDocument) -> Result<(), DocxError> {
        self.start("w:document", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
        self.start("w:body", &[])?;
        for element in &document.body {
            self.body_element(element)?;
        }
        self.empty("w:sectPr", &[])?;
        self.end("w:body")?;
        self.end("w:document")
    }

    fn body_element(&mut self, element: &BodyElement) -> Result<(), DocxError> {
        match element {
            BodyElement::Paragraph(paragraph) => self.paragraph(paragraph),
            BodyElement::Table(table) => self.table(table),
            BodyElement::AltChunk(index) => {
                let id = chunk_rel_id(*index);
                self.empty("w:altChunk", &[("r:id", id.as_str())])
            }
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<(), DocxError> {
        self.start("w:p", &[])?;
        self.paragraph_properties(paragraph)?;
        for item in &paragraph.content {
            match item {
                ParagraphContent::Run(run) => self.run(run)?,
                ParagraphContent::Hyperlink { target, run } => self.hyperlink(target, run)?,
                ParagraphContent::Break => {
                    self.start("w:r", &[])?;
                    self.empty("w:br", &[])?;
                    self.end("w:r")?;
                }
            }
        }
        self.end("w:p")
    }

    fn paragraph_properties(&mut self, paragraph: &Paragraph) -> Result<(), DocxError> {
        let style = match paragraph.style {
            ParagraphStyle::Normal | ParagraphStyle::HorizontalRule => None,
            ParagraphStyle::Heading(level) => Some(format!("Heading{level}")),
            ParagraphStyle::CodeBlock => Some(self.styles.code_block.clone()),
            ParagraphStyle::BlockQuote => Some(self.styles.block_quote.clone()),
        };
        let rule = paragraph.style == ParagraphStyle::HorizontalRule;
        if style.is_none() && paragraph.list.is_none() && !rule {
            return Ok(());
        }

        self.start("w:pPr", &[])?;
        if let Some(style) = style {
            self.empty_val("w:pStyle", &style)?;
        }
        match paragraph.list {
            Some(ListPlacement::Item { numbering, level }) => {
                self.start("w:numPr", &[])?;
                self.empty_val("w:ilvl", &level.to_string())?;
                self.empty_val("w:numId", &numbering.to_string())?;
                self.end("w:numPr")?;
            }
            Some(ListPlacement::Continuation { level }) => {
                let left = INDENT_STEP * (u32::from(level) + 1);
                let left = left.to_string();
                self.empty("w:ind", &[("w:left", left.as_str())])?;
            }
            None => {}
        }
        if rule {
            self.start("w:pBdr", &[])?;
            self.empty(
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", "6"),
                    ("w:space", "1"),
                    ("w:color", "auto"),
                ],
            )?;
            self.end("w:pBdr")?;
        }
        self.end("w:pPr")
    }

    fn run(&mut self, run: &Run) -> Result<(), DocxError> {
        self.start("w:r", &[])?;
        match run.format {
            RunFormat::Plain => {}
            RunFormat::Bold => self.run_properties(|w| w.empty("w:b", &[]))?,
            RunFormat::Italic => self.run_properties(|w| w.empty("w:i", &[]))?,
            RunFormat::Code => {
                let styles = self.styles;
                self.run_properties(|w| w.empty_val("w:rStyle", &styles.inline_code))?;
            }
            RunFormat::Hyperlink => {
                let styles = self.styles;
                self.run_properties(|w| w.empty_val("w:rStyle", &styles.hyperlink))?;
            }
        }
        self.start("w:t", &[("xml:space", "preserve")])?;
        self.text(&run.text)?;
        self.end("w:t")?;
        self.end("w:r")
    }

    fn run_properties(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<(), DocxError>,
    ) -> Result<(), DocxError> {
        self.start("w:rPr", &[])?;
        body(self)?;
        self.end("w:rPr")
    }

    fn hyperlink(&mut self, target: &LinkTarget, run: &Run) -> Result<(), DocxError> {
        match target {
            LinkTarget::External(index) => {
                let id = hyperlink_rel_id(*index);
                self.start("w:hyperlink", &[("r:id", id.as_str())])?;
            }
            LinkTarget::Anchor(anchor) => {
                self.start("w:hyperlink", &[("w:anchor", anchor.as_str())])?;
            }
            LinkTarget::None => return self.run(run),
        }
        self.run(run)?;
        self.end("w:hyperlink")
    }

    fn table(&mut self, table: &Table) -> Result<(), DocxError> {
        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty_val("w:tblStyle", "TableGrid")?;
        self.empty("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
        self.end("w:tblPr")?;

        self.start("w:tblGrid", &[])?;
        for _ in 0..table.column_count {
            self.empty("w:gridCol", &[])?;
        }
        self.end("w:tblGrid")?;

        for row in &table.rows {
            self.start("w:tr", &[])?;
            if row.is_header {
                self.start("w:trPr", &[])?;
                self.empty("w:tblHeader", &[])?;
                self.end("w:trPr")?;
            }
            for cell in &row.cells {
                self.cell(cell)?;
            }
            // Short rows are padded to the grid width.
            for _ in row.cells.len()..table.column_count {
                self.cell(&Cell::default())?;
            }
            self.end("w:tr")?;
        }
        self.end("w:tbl")
    }

    fn cell(&mut self, cell: &Cell) -> Result<(), DocxError> {
        self.start("w:tc", &[])?;
        for element in &cell.content {
            self.body_element(element)?;
        }
        // A cell must end with a paragraph.
        if !matches!(cell.content.last(), Some(BodyElement::Paragraph(_))) {
            self.empty("w:p", &[])?;
        }
        self.end("w:tc")
    }

    fn styles_part(&mut self) -> Result<(), DocxError> {
        self.start("w:styles", &[("xmlns:w", W_NS)])?;

        self.style("paragraph", "Normal", "Normal", None, |_| Ok(()))?;
        for level in 1..=9u8 {
            let id = format!("Heading{level}");
            let name = format!("heading {level}");
            self.style("paragraph", &id, &name, Some("Normal"), |w| {
                w.start("w:pPr", &[])?;
                w.empty("w:keepNext", &[])?;
                w.empty_val("w:outlineLvl", &(level - 1).to_string())?;
                w.end("w:pPr")?;
                w.run_properties(|w| w.empty("w:b", &[]))
            })?;
        }

        let styles = self.styles;
        self.style("paragraph", &styles.code_block, "Source Code", Some("Normal"), |w| {
            w.start("w:pPr", &[])?;
            w.empty("w:spacing", &[("w:before", "0"), ("w:after", "0")])?;
            w.end("w:pPr")?;
            w.run_properties(|w| w.monospace())
        })?;
        self.style("paragraph", &styles.block_quote, "Block Text", Some("Normal"), |w| {
            w.start("w:pPr", &[])?;
            w.empty("w:ind", &[("w:left", "720"), ("w:right", "720")])?;
            w.end("w:pPr")?;
            w.run_properties(|w| w.empty("w:i", &[]))
        })?;
        self.style("character", &styles.inline_code, "Verbatim Char", None, |w| {
            w.run_properties(|w| w.monospace())
        })?;
        self.style("character", &styles.hyperlink, "Hyperlink", None, |w| {
            w.run_properties(|w| {
                w.empty_val("w:color", "0563C1")?;
                w.empty_val("w:u", "single")
            })
        })?;
        self.style("table", "TableGrid", "Table Grid", None, |w| {
            w.start("w:tblPr", &[])?;
            w.start("w:tblBorders", &[])?;
            for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
                w.empty(side, &[("w:val", "single"), ("w:sz", "4"), ("w:color", "auto")])?;
            }
            w.end("w:tblBorders")?;
            w.end("w:tblPr")
        })?;

        self.end("w:styles")
    }

    fn monospace(&mut self) -> Result<(), DocxError> {
        self.empty(
            "w:rFonts",
            &[("w:ascii", "Consolas"), ("w:hAnsi", "Consolas")],
        )
    }

    fn style(
        &mut self,
        kind: &str,
        id: &str,
        name: &str,
        based_on: Option<&str>,
        body: impl FnOnce(&mut Self) -> Result<(), DocxError>,
    ) -> Result<(), DocxError> {
        let mut attrs = vec![("w:type", kind), ("w:styleId", id)];
        if id == "Normal" {
            attrs.push(("w:default", "1"));
        }
        self.start("w:style", &attrs)?;
        self.empty_val("w:name", name)?;
        if let Some(parent) = based_on {
            self.empty_val("w:basedOn", parent)?;
        }
        body(self)?;
        self.end("w:style")
    }

    fn numbering_part(&mut self, document: &WordDocument) -> Result<(), DocxError> {
        self.start("w:numbering", &[("xmlns:w", W_NS)])?;
        self.abstract_numbering(BULLET_ABSTRACT_ID, false)?;
        self.abstract_numbering(DECIMAL_ABSTRACT_ID, true)?;

        for instance in &document.numbering {
            let abstract_id = if instance.ordered {
                DECIMAL_ABSTRACT_ID
            } else {
                BULLET_ABSTRACT_ID
            };
            let num_id = instance.id.to_string();
            self.start("w:num", &[("w:numId", num_id.as_str())])?;
            self.empty_val("w:abstractNumId", abstract_id)?;
            // Each ordered list counts from 1 again.
            if instance.ordered {
                for level in 0..=MAX_LIST_LEVEL {
                    let level = level.to_string();
                    self.start("w:lvlOverride", &[("w:ilvl", level.as_str())])?;
                    self.empty_val("w:startOverride", "1")?;
                    self.end("w:lvlOverride")?;
                }
            }
            self.end("w:num")?;
        }

        self.end("w:numbering")
    }

    fn abstract_numbering(&mut self, id: &str, ordered: bool) -> Result<(), DocxError> {
        self.start("w:abstractNum", &[("w:abstractNumId", id)])?;
        self.empty_val("w:multiLevelType", "hybridMultilevel")?;
        for level in 0..=MAX_LIST_LEVEL {
            let (format, text) = if ordered {
                ("decimal", format!("%{}.", level + 1))
            } else {
                ("bullet", BULLETS[usize::from(level) % BULLETS.len()].to_owned())
            };
            let ilvl = level.to_string();
            let left = (INDENT_STEP * (u32::from(level) + 1)).to_string();
            let hanging = HANGING_INDENT.to_string();

            self.start("w:lvl", &[("w:ilvl", ilvl.as_str())])?;
            self.empty_val("w:start", "1")?;
            self.empty_val("w:numFmt", format)?;
            self.empty_val("w:lvlText", &text)?;
            self.empty_val("w:lvlJc", "left")?;
            self.start("w:pPr", &[])?;
            self.empty(
                "w:ind",
                &[("w:left", left.as_str()), ("w:hanging", hanging.as_str())],
            )?;
            self.end("w:pPr")?;
            self.end("w:lvl")?;
        }
        self.end("w:abstractNum")
    }
}

#[cfg(test)]
mod tests {
    use mdocx_renderer::{DocumentBuilder, parse_markdown, render_document};

    use super::*;
    use crate::WordBuilder;

    fn package(markdown: &str) -> String {
        let mut builder = WordBuilder::new();
        render_document(&mut builder, &parse_markdown(markdown, true)).unwrap();
        builder
            .into_document()
            .to_flat_opc(&StyleNames::default())
            .unwrap()
    }

    #[test]
    fn test_package_has_all_parts() {
        let xml = package("# Title");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<?mso-application progid="Word.Document"?>"#));
        for part in [
            "/_rels/.rels",
            "/word/document.xml",
            "/word/_rels/document.xml.rels",
            "/word/styles.xml",
            "/word/numbering.xml",
        ] {
            assert!(
                xml.contains(&format!(r#"pkg:name="{part}""#)),
                "missing part {part}"
            );
        }
        assert!(xml.ends_with("</pkg:package>"));
    }

    #[test]
    fn test_heading_paragraph_xml() {
        let xml = package("## Setup");
        assert!(xml.contains(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t xml:space="preserve">Setup</w:t></w:r></w:p>"#
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = package("a < b & c");
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_control_characters_are_replaced() {
        let mut builder = WordBuilder::new();
        builder.enter_paragraph().unwrap();
        builder.add_text("page\u{C}break \u{1}x\ttab").unwrap();
        builder
            .add_hyperlink("link", "https://example.com/\u{7}")
            .unwrap();
        builder.exit_paragraph().unwrap();
        builder.finish().unwrap();

        let xml = builder
            .into_document()
            .to_flat_opc(&StyleNames::default())
            .unwrap();
        assert!(!xml.contains(['\u{1}', '\u{7}', '\u{C}']));
        assert!(xml.contains("page\u{FFFD}break \u{FFFD}x\ttab"));
        assert!(xml.contains(r#"Target="https://example.com/\u{FFFD}""#));
    }

    #[test]
    fn test_list_numbering_xml() {
        let xml = package("1. one\n2. two");
        assert!(xml.contains(r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>"#));
        assert!(xml.contains(r#"<w:num w:numId="1"><w:abstractNumId w:val="1"/>"#));
        assert!(xml.contains(r#"<w:startOverride w:val="1"/>"#));
    }

    #[test]
    fn test_hyperlink_relationship() {
        let xml = package("[Rust](https://rust-lang.org)");
        assert!(xml.contains(r#"<w:hyperlink r:id="rIdLink1">"#));
        assert!(xml.contains(
            r#"Id="rIdLink1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://rust-lang.org" TargetMode="External""#
        ));
    }

    #[test]
    fn test_raw_chunk_is_base64_part() {
        let xml = package("<div>\nhello\n</div>\n");
        assert!(xml.contains(r#"<w:altChunk r:id="rIdChunk1"/>"#));
        assert!(xml.contains(r#"pkg:name="/word/afchunk1.html""#));
        let encoded = BASE64_STANDARD.encode("<html><body><div>\nhello\n</div>\n</body></html>");
        assert!(xml.contains(&encoded));
    }

    #[test]
    fn test_custom_style_names() {
        let mut builder = WordBuilder::new();
        builder.add_code_block_line("let x = 1;").unwrap();
        builder.finish().unwrap();
        let styles = StyleNames {
            code_block: "Code".to_owned(),
            ..StyleNames::default()
        };
        let xml = builder.into_document().to_flat_opc(&styles).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="Code"/>"#));
        assert!(xml.contains(r#"w:styleId="Code""#));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut builder = WordBuilder::new();
        builder.enter_table(2).unwrap();
        builder.enter_row(false).unwrap();
        builder.enter_cell().unwrap();
        builder.add_paragraph("only").unwrap();
        builder.exit_cell().unwrap();
        builder.exit_row().unwrap();
        builder.exit_table().unwrap();

        let xml = builder
            .into_document()
            .to_flat_opc(&StyleNames::default())
            .unwrap();
        assert_eq!(xml.matches("<w:tc>").count(), 2);
        assert_eq!(xml.matches("<w:gridCol/>").count(), 2);
    }
}
