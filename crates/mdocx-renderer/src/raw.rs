//! Coalescing of inline raw-markup fragments.
//!
//! The parser hands inline HTML over one tag at a time, so `<span>text</span>`
//! arrives as three separate tokens. Each emitted chunk must parse as markup
//! on its own, so the fragments between an opening and a closing tag are
//! collected into a single chunk before they reach the builder.

/// HTML elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Classification of a single raw-markup fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// Void element (`<br>`) or explicitly self-closed tag (`<x />`).
    SelfClosing,
    /// Start tag such as `<div class="a">`.
    Opening,
    /// End tag such as `</div>`.
    Closing,
    /// Entity, comment, declaration or plain text.
    Other,
}

impl FragmentKind {
    /// Classify a raw-markup fragment.
    #[must_use]
    pub fn classify(fragment: &str) -> Self {
        let fragment = fragment.trim();
        if fragment.starts_with("</") {
            return Self::Closing;
        }
        let Some(rest) = fragment.strip_prefix('<') else {
            return Self::Other;
        };
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Self::Other;
        }
        if fragment.ends_with("/>") || is_void_element(rest) {
            Self::SelfClosing
        } else {
            Self::Opening
        }
    }
}

/// Check whether the tag starting `rest` (text after `<`) names a void element.
fn is_void_element(rest: &str) -> bool {
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Buffer mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RawMode {
    #[default]
    Idle,
    Buffering,
}

/// State machine that merges raw-markup fragments into well-formed chunks.
///
/// Every method that can complete a chunk returns it; the caller hands the
/// chunk to the builder. In [`RawMode::Idle`] the accumulator is empty.
///
/// Nested openings while buffering are appended without depth tracking, so
/// `<div><span>x</span></div>` is flushed at the first closing tag.
#[derive(Debug, Default)]
pub struct RawMarkupBuffer {
    mode: RawMode,
    accumulated: String,
}

impl RawMarkupBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> RawMode {
        self.mode
    }

    /// Check whether fragments are currently being collected.
    #[must_use]
    pub fn is_buffering(&self) -> bool {
        self.mode == RawMode::Buffering
    }

    /// Feed one raw-markup fragment.
    ///
    /// Returns the chunk to emit, if the fragment completed one.
    pub fn push_fragment(&mut self, fragment: &str) -> Option<String> {
        match (FragmentKind::classify(fragment), self.mode) {
            (FragmentKind::SelfClosing, _)
            | (FragmentKind::Closing | FragmentKind::Other, RawMode::Idle) => {
                Some(fragment.to_owned())
            }
            (FragmentKind::Opening, RawMode::Idle) => {
                self.mode = RawMode::Buffering;
                self.accumulated.clear();
                self.accumulated.push_str(fragment);
                None
            }
            (FragmentKind::Opening | FragmentKind::Other, RawMode::Buffering) => {
                self.accumulated.push_str(fragment);
                None
            }
            (FragmentKind::Closing, RawMode::Buffering) => {
                self.accumulated.push_str(fragment);
                self.flush()
            }
        }
    }

    /// Append plain text to the chunk being collected.
    ///
    /// The text is HTML-escaped. Returns `false` without consuming the text
    /// when idle; the caller then renders it as ordinary text.
    pub fn push_text(&mut self, text: &str) -> bool {
        if self.mode == RawMode::Idle {
            return false;
        }
        self.accumulated.push_str(&escape_html(text));
        true
    }

    /// Append already-escaped markup verbatim. Returns `false` when idle.
    pub fn push_html(&mut self, html: &str) -> bool {
        if self.mode == RawMode::Idle {
            return false;
        }
        self.accumulated.push_str(html);
        true
    }

    /// Emit whatever has been collected and return to idle.
    pub fn flush(&mut self) -> Option<String> {
        self.mode = RawMode::Idle;
        if self.accumulated.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.accumulated))
        }
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
