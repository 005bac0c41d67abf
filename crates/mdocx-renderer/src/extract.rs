//! Plain text extraction from inline content.

use crate::ast::Inline;

/// Flatten inline content into plain text.
///
/// Text and code spans contribute their content and containers are flattened
/// recursively. Every other inline kind (emphasis, links, breaks, raw markup)
/// contributes nothing, so formatting is lost.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Container(children) => push_plain_text(children, out),
            Inline::Emphasis { .. }
            | Inline::Link { .. }
            | Inline::LineBreak { .. }
            | Inline::RawMarkup(_)
            | Inline::Autolink(_)
            | Inline::Unsupported { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenates_text() {
        let inlines = vec![Inline::text("Hello"), Inline::text(", "), Inline::text("world")];
        assert_eq!(plain_text(&inlines), "Hello, world");
    }

    #[test]
    fn test_container_of_text_equals_concatenation() {
        let inlines = vec![Inline::Container(vec![
            Inline::text("a"),
            Inline::text("b"),
            Inline::text("c"),
        ])];
        assert_eq!(plain_text(&inlines), "abc");
    }

    #[test]
    fn test_nested_containers_and_code() {
        let inlines = vec![
            Inline::text("Install "),
            Inline::Container(vec![Inline::Container(vec![Inline::Code("npm".to_owned())])]),
        ];
        assert_eq!(plain_text(&inlines), "Install npm");
    }

    #[test]
    fn test_other_kinds_yield_nothing() {
        let inlines = vec![
            Inline::text("x"),
            Inline::Emphasis {
                delimiters: 2,
                content: vec![Inline::text("bold")],
            },
            Inline::Link {
                url: Some("https://example.com".to_owned()),
                content: vec![Inline::text("link")],
                is_image: false,
            },
            Inline::LineBreak { hard: true },
            Inline::RawMarkup("<b>".to_owned()),
            Inline::Autolink("https://example.com".to_owned()),
            Inline::text("y"),
        ];
        assert_eq!(plain_text(&inlines), "xy");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let inlines = vec![
            Inline::text("same"),
            Inline::Container(vec![Inline::text(" input")]),
        ];
        let first = plain_text(&inlines);
        let second = plain_text(&inlines);
        assert_eq!(first, second);
        assert_eq!(first, "same input");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(plain_text(&[]), "");
    }
}
