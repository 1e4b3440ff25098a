//! # Inline Scanner
//!
//! Converts one run of raw text into styled spans. A single left-to-right
//! pass with one open style at a time: opening a new delimiter while another
//! style is open flushes the accumulated text and switches to the new style
//! (toggle semantics, not nesting). Link and image syntax is consumed whole;
//! anything unmatched or malformed falls through as literal text, so the
//! scanner accepts any input.

use crate::model::{Span, SpanData, SpanStyle};

/// Parse inline Markdown into an ordered span list.
///
/// Recognized, in priority order at each position: `` ` `` (code), `**`/`__`
/// (bold), `~~` (strikethrough), `*`/`_` (italic), `![alt](url)` (image),
/// `[text](url)` (link).
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut scanner = InlineScanner::new();
    scanner.scan(text);
    scanner.finish()
}

/// The scanner state: output spans, the pending text accumulator, and the
/// currently open style.
struct InlineScanner {
    spans: Vec<Span>,
    buffer: String,
    current: SpanStyle,
}

impl InlineScanner {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            buffer: String::new(),
            current: SpanStyle::Normal,
        }
    }

    /// Move the accumulated text into a span carrying the open style.
    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.spans.push(Span::new(text, self.current, SpanData::None));
        }
    }

    /// Close the open style if it matches `style`, otherwise open `style`.
    fn toggle(&mut self, style: SpanStyle) {
        self.flush();
        self.current = if self.current == style {
            SpanStyle::Normal
        } else {
            style
        };
    }

    fn scan(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            let c = chars[i];

            if c == '`' {
                self.toggle(SpanStyle::Code);
                i += 1;
                continue;
            }

            if i + 1 < len
                && ((c == '*' && chars[i + 1] == '*') || (c == '_' && chars[i + 1] == '_'))
            {
                self.toggle(SpanStyle::Bold);
                i += 2;
                continue;
            }

            if i + 1 < len && c == '~' && chars[i + 1] == '~' {
                self.toggle(SpanStyle::Strikethrough);
                i += 2;
                continue;
            }

            if c == '*' || c == '_' {
                self.toggle(SpanStyle::Italic);
                i += 1;
                continue;
            }

            if c == '!' && i + 1 < len && chars[i + 1] == '[' {
                if let Some((alt, url, next)) = bracket_pair(&chars, i + 1) {
                    self.flush();
                    self.spans
                        .push(Span::new(alt, SpanStyle::Image, SpanData::Target(url)));
                    i = next;
                    continue;
                }
            }

            if c == '[' {
                if let Some((label, url, next)) = bracket_pair(&chars, i) {
                    self.flush();
                    self.spans
                        .push(Span::new(label, SpanStyle::Link, SpanData::Target(url)));
                    i = next;
                    continue;
                }
            }

            self.buffer.push(c);
            i += 1;
        }

        self.flush();
    }

    fn finish(mut self) -> Vec<Span> {
        self.flush();
        self.spans
    }
}

/// Match `[label](url)` starting at the `[` at `open`. Returns the label,
/// the url, and the index just past the closing `)`. Any missing piece means
/// no match and the caller treats the bracket as literal text.
fn bracket_pair(chars: &[char], open: usize) -> Option<(String, String, usize)> {
    let close = chars[open + 1..]
        .iter()
        .position(|&c| c == ']')
        .map(|p| p + open + 1)?;
    if close + 1 >= chars.len() || chars[close + 1] != '(' {
        return None;
    }
    let paren = chars[close + 2..]
        .iter()
        .position(|&c| c == ')')
        .map(|p| p + close + 2)?;
    let label: String = chars[open + 1..close].iter().collect();
    let url: String = chars[close + 2..paren].iter().collect();
    Some((label, url, paren + 1))
}
