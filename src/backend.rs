//! # Backend Seams
//!
//! The engine draws nothing itself. It measures through [`TextMetrics`],
//! paints through [`Canvas`], and resolves image dimensions through
//! [`AssetSource`]. The embedding shell implements these against the real
//! display and asset store; the engine core stays synchronous and pure.
//!
//! Three reference implementations ship with the crate: [`MonoMetrics`]
//! (the target device's fixed-cell font), [`TraceCanvas`] (records every
//! draw call — the headless backend the test suite asserts against), and
//! [`StaticAssets`] / [`NoAssets`] for image resolution.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::style::Color;

/// Text measurement, needed by both layout and rendering.
pub trait TextMetrics {
    /// Rendered (width, height) of `text` in pixels.
    fn measure_text(&self, text: &str) -> (i32, i32);

    /// Vertical advance of one text line. Normally a little taller than the
    /// glyph height.
    fn line_height(&self) -> i32;

    fn space_width(&self) -> i32 {
        self.measure_text(" ").0
    }
}

/// The primitive drawing surface the renderer paints onto.
///
/// Coordinates are screen-space pixels; rectangles are corner-inclusive the
/// way the target display library fills them.
pub trait Canvas: TextMetrics {
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color);
    fn draw_text(&mut self, x: i32, y: i32, color: Color, text: &str);
    /// Draw the asset identified by `source` with its top-left corner at
    /// (x, y), scaled by `scale`.
    fn draw_image(&mut self, source: &str, x: i32, y: i32, scale: f32);
}

/// Resolves an image/vector reference to its intrinsic pixel size.
///
/// Implementations return plain values, never handles into their own cache:
/// the engine must not be able to retain asset state past invalidation.
pub trait AssetSource {
    /// Intrinsic (width, height) of the asset, or `None` if it cannot be
    /// resolved. A `None` makes the engine fall back to the alt text.
    fn intrinsic_size(&self, source: &str) -> Option<(i32, i32)>;
}

/// Fixed-cell font metrics matching the reference device: 10×18 glyph cells
/// on a 20px line. Wide (CJK) glyphs count as two cells.
#[derive(Debug, Clone, Copy)]
pub struct MonoMetrics {
    pub char_width: i32,
    pub char_height: i32,
    pub line_advance: i32,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self {
            char_width: 10,
            char_height: 18,
            line_advance: 20,
        }
    }
}

impl TextMetrics for MonoMetrics {
    fn measure_text(&self, text: &str) -> (i32, i32) {
        (text.width() as i32 * self.char_width, self.char_height)
    }

    fn line_height(&self) -> i32 {
        self.line_advance
    }
}

/// An asset source with no assets. Every image degrades to its alt text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn intrinsic_size(&self, _source: &str) -> Option<(i32, i32)> {
        None
    }
}

/// A fixed source → size table.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    sizes: HashMap<String, (i32, i32)>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, width: i32, height: i32) {
        self.sizes.insert(source.into(), (width, height));
    }
}

impl AssetSource for StaticAssets {
    fn intrinsic_size(&self, source: &str) -> Option<(i32, i32)> {
        self.sizes.get(source).copied()
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    },
    Circle {
        cx: i32,
        cy: i32,
        r: i32,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        color: Color,
        text: String,
    },
    Image {
        source: String,
        x: i32,
        y: i32,
        scale: f32,
    },
}

/// A canvas that records every draw call instead of painting.
#[derive(Debug, Clone, Default)]
pub struct TraceCanvas {
    pub ops: Vec<DrawOp>,
    metrics: MonoMetrics,
}

impl TraceCanvas {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            metrics: MonoMetrics::default(),
        }
    }

    /// All recorded text draws, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMetrics for TraceCanvas {
    fn measure_text(&self, text: &str) -> (i32, i32) {
        self.metrics.measure_text(text)
    }

    fn line_height(&self) -> i32 {
        self.metrics.line_height()
    }
}

impl Canvas for TraceCanvas {
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.ops.push(DrawOp::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        self.ops.push(DrawOp::Circle { cx, cy, r, color });
    }

    fn draw_text(&mut self, x: i32, y: i32, color: Color, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            color,
            text: text.to_string(),
        });
    }

    fn draw_image(&mut self, source: &str, x: i32, y: i32, scale: f32) {
        self.ops.push(DrawOp::Image {
            source: source.to_string(),
            x,
            y,
            scale,
        });
    }
}
