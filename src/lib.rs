//! # Inkdown
//!
//! A Markdown rendering engine for small fixed-size pixel displays.
//!
//! Most Markdown renderers target HTML or a terminal grid. Inkdown targets
//! a bare pixel canvas: it parses Markdown into a block tree, resolves that
//! tree into absolutely positioned boxes for a known viewport width, and
//! paints the visible slice through a handful of drawing primitives the
//! embedding shell provides.
//!
//! ## Architecture
//!
//! ```text
//! Markdown text
//!       ↓
//!   [parser]   — Block tree: headers, paragraphs, lists, quotes,
//!                tables, code, admonitions; inline spans per leaf
//!       ↓
//!   [layout]   — Box-model resolution: margins, padding, borders,
//!                word wrapping, table column sizing
//!       ↓
//!   [render]   — Scroll-aware painting + link hotspot collection
//! ```
//!
//! Every stage totalizes: malformed Markdown degrades to literal text,
//! missing images degrade to their alt text, and a failed document load
//! becomes a rendered error page. Parse and layout never return errors.
//!
//! The engine draws nothing itself — see [`backend`] for the three seams
//! (text metrics, canvas primitives, asset sizes) a shell implements, and
//! [`session::Session`] for the open/scroll/render/tap loop.

pub mod backend;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;
pub mod style;
pub mod text;

pub use backend::{AssetSource, Canvas, TextMetrics};
pub use error::EngineError;
pub use model::Node;
pub use style::Theme;

use layout::LayoutEngine;
use parser::Parser;

/// Parse Markdown into an unlaid-out block tree. Never fails.
pub fn parse(text: &str, theme: &Theme) -> Node {
    Parser::new(theme).parse(text)
}

/// Parse and lay out a document for a viewport width: the tree comes back
/// with every box resolved, ready for [`render::Renderer`].
pub fn build(
    text: &str,
    viewport_width: i32,
    theme: &Theme,
    fonts: &dyn TextMetrics,
    assets: &dyn AssetSource,
) -> Node {
    let mut root = parse(text, theme);
    LayoutEngine::new().layout(&mut root, viewport_width, fonts, assets);
    root
}
