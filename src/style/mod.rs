//! # Style System
//!
//! The box-model and color properties attached to every block node, plus the
//! `Theme` that bundles every color the pipeline uses.
//!
//! Colors are RGB565 — the pixel format of the target display. The engine
//! never owns mutable color state: the parser bakes theme colors into node
//! styles when the tree is built, and the renderer receives the same
//! immutable theme for the few colors it resolves at paint time (link text,
//! inline-code highlight, list bullets). Rendering twice with two different
//! themes means parsing twice; there are no process-wide color globals.

use serde::{Deserialize, Serialize};

/// Edge values (top, right, bottom, left) used for margin, padding and
/// border widths, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Edges {
    pub const ZERO: Edges = Edges::new(0, 0, 0, 0);

    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// An RGB565 color, as consumed by the drawing backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const BLUE: Color = Color(0x001F);

    /// Pack 8-bit RGB channels into RGB565.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color((((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3))
    }
}

/// Horizontal alignment of inline content within its content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// The complete set of style properties for a block node.
///
/// Unlike a CSS engine there is no cascade: the parser assigns each node a
/// fully concrete style when the node is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    /// Block-level (stacked vertically) vs. inline. Every node the parser
    /// produces today is block-level.
    pub block: bool,
    /// Margin outside the border.
    pub margin: Edges,
    /// Padding inside the border.
    pub padding: Edges,
    /// Border width per edge.
    pub border: Edges,
    /// Background fill; `None` means transparent.
    pub background: Option<Color>,
    pub border_color: Color,
    /// Text color.
    pub color: Color,
    pub align: TextAlign,
    /// Preformatted content: literal newlines are honored and inline-code
    /// highlighting is suppressed (the whole block already has a background).
    pub preformatted: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            block: true,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            border: Edges::ZERO,
            background: None,
            border_color: Color::BLACK,
            color: Color::BLACK,
            align: TextAlign::Left,
            preformatted: false,
        }
    }
}

/// Every color the parser and renderer consume, as one immutable bundle.
///
/// `Theme::default()` reproduces the reference device palette. A theme can
/// also be loaded from JSON; absent fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub page_background: Color,
    pub text: Color,
    pub link: Color,
    /// Fenced code block background.
    pub code_background: Color,
    pub code_text: Color,
    /// Highlight rectangle painted behind inline `code` spans.
    pub inline_code_highlight: Color,
    /// Bottom border under level 1–2 headers.
    pub header_border: Color,
    pub quote_background: Color,
    /// The vertical bar on the left edge of a block quote.
    pub quote_bar: Color,
    pub table_header_background: Color,
    pub rule: Color,
    pub bullet: Color,
    /// Default admonition container colors (`::: note` etc.).
    pub panel_background: Color,
    pub panel_border: Color,
    pub warning_background: Color,
    pub warning_border: Color,
    pub tip_background: Color,
    pub tip_border: Color,
    pub danger_background: Color,
    pub danger_border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            page_background: Color::WHITE,
            text: Color::BLACK,
            link: Color::BLUE,
            code_background: Color(0xDEFB),
            code_text: Color::BLACK,
            inline_code_highlight: Color(0xCE79),
            header_border: Color(0x8410),
            quote_background: Color(0xEF5D),
            quote_bar: Color(0xC618),
            table_header_background: Color(0xCE79),
            rule: Color::BLACK,
            bullet: Color::BLACK,
            panel_background: Color(0xEF5D),
            panel_border: Color::BLACK,
            warning_background: Color(0xFFE0),
            warning_border: Color(0xFD20),
            tip_background: Color(0xE7FF),
            tip_border: Color(0x07E0),
            danger_background: Color(0xF800),
            danger_border: Color(0xF800),
        }
    }
}

impl Theme {
    /// Load a theme from JSON. Fields not present keep their defaults.
    pub fn from_json(json: &str) -> Result<Theme, crate::error::EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
