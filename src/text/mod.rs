//! # Line Wrapping
//!
//! Width-constrained greedy wrapping of styled spans into display lines.
//!
//! The atomic unit is the word (split on spaces); images are always atomic.
//! Each word is measured against the remaining room on the current line and
//! the line is flushed when the word would overflow — unless the line is
//! still empty, in which case the word is placed anyway so an over-wide
//! unbreakable unit can never loop or vanish.
//!
//! Preformatted content splits on literal newlines first, then each
//! non-empty sub-line takes the normal path.

use crate::backend::{AssetSource, TextMetrics};
use crate::model::{Line, Span, SpanData, SpanStyle};

/// Replace typographic characters the device font lacks with ASCII
/// equivalents.
pub(crate) fn sanitize_text(text: &str) -> String {
    text.replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2014}', "--")
}

/// Resolved render size for an image: intrinsic size, scaled down
/// proportionally when wider than the container. `None` when the asset
/// cannot be resolved (the caller falls back to alt text).
fn render_size(assets: &dyn AssetSource, source: &str, container_w: i32) -> Option<(i32, i32)> {
    let (orig_w, orig_h) = assets.intrinsic_size(source)?;
    if orig_w <= 0 {
        return None;
    }
    if orig_w > container_w {
        let h = (orig_h as i64 * container_w as i64 / orig_w as i64) as i32;
        Some((container_w, h))
    } else {
        Some((orig_w, orig_h))
    }
}

/// The greedy word-wrapping engine.
#[derive(Debug, Default)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `spans` into lines no wider than `max_width`, except that a
    /// single unbreakable item wider than `max_width` still gets a line of
    /// its own.
    pub fn wrap(
        &self,
        spans: &[Span],
        max_width: i32,
        preformatted: bool,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) -> Vec<Line> {
        if preformatted {
            return self.wrap_preformatted(spans, max_width, fonts, assets);
        }
        self.wrap_spans(spans, max_width, fonts, assets)
    }

    /// Split on hard newlines, then word-wrap each sub-line. An empty
    /// sub-line stays an empty line so blank lines inside code blocks keep
    /// their vertical space.
    fn wrap_preformatted(
        &self,
        spans: &[Span],
        max_width: i32,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) -> Vec<Line> {
        let Some(first) = spans.first() else {
            return Vec::new();
        };
        let raw = sanitize_text(&first.text);

        let mut lines = Vec::new();
        for hard_line in raw.split('\n') {
            if hard_line.is_empty() {
                lines.push(Line::new());
                continue;
            }
            let sub = Span::new(hard_line, first.style, first.data.clone());
            let wrapped = self.wrap_spans(std::slice::from_ref(&sub), max_width, fonts, assets);
            if wrapped.is_empty() {
                lines.push(Line::new());
            } else {
                lines.extend(wrapped);
            }
        }
        lines
    }

    fn wrap_spans(
        &self,
        spans: &[Span],
        max_width: i32,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut current: Line = Vec::new();
        let mut current_w = 0;
        let space_w = fonts.space_width();

        for span in spans {
            let clean = sanitize_text(&span.text);
            // Image alt text is one atomic unit; everything else splits on
            // spaces.
            let words: Vec<&str> = if span.style == SpanStyle::Image {
                vec![span.text.as_str()]
            } else {
                clean.split(' ').collect()
            };

            for (idx, word) in words.iter().enumerate() {
                if word.is_empty() && idx < words.len() - 1 {
                    continue;
                }

                // Resolved image: (source, render width, render height).
                let mut image: Option<(String, i32, i32)> = None;
                let word_w = if span.style == SpanStyle::Image {
                    let sized = span
                        .data
                        .target()
                        .and_then(|src| render_size(assets, src, max_width).map(|(w, h)| (src, w, h)));
                    match sized {
                        Some((src, w, h)) => {
                            image = Some((src.to_string(), w, h));
                            w
                        }
                        None => fonts.measure_text(word).0,
                    }
                } else {
                    fonts.measure_text(word).0
                };

                // A space goes before the word when it follows other content,
                // but never around images.
                let add_space = span.style != SpanStyle::Image
                    && (idx > 0
                        || (current_w > 0
                            && current.last().is_some_and(|s| !s.text.ends_with(' '))));
                let mut space_needed = if add_space { space_w } else { 0 };

                if current_w + space_needed + word_w > max_width && current_w > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0;
                    space_needed = 0;
                }

                let mut prefix = if space_needed > 0 { " " } else { "" };

                if let Some((source, img_w, img_h)) = image {
                    // A wide image claims its own line rather than sharing.
                    if img_w > max_width / 2 && current_w > 0 {
                        lines.push(std::mem::take(&mut current));
                        current_w = 0;
                        prefix = "";
                    }
                    current.push(Span::new(
                        format!("{prefix}{word}"),
                        span.style,
                        SpanData::Image {
                            source,
                            width: img_w,
                            height: img_h,
                        },
                    ));
                    current_w += img_w;
                } else {
                    current.push(Span::new(
                        format!("{prefix}{word}"),
                        span.style,
                        span.data.clone(),
                    ));
                    current_w += space_needed + word_w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}
