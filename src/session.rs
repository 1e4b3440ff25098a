//! # Viewer Session
//!
//! Owns exactly one built document (tree plus computed layout) and the
//! scroll offset, and sequences the parse → layout → render pipeline the
//! way an embedding shell needs it: open a document, scroll it, render a
//! frame, hit-test taps against the links of the last frame, navigate.
//!
//! A document load that fails is replaced by a synthetic error document, so
//! the session always holds a valid, fully laid-out tree. Replacement is
//! atomic: the new tree is completely built and resolved before the old one
//! is dropped.

use log::{debug, warn};

use crate::backend::{AssetSource, Canvas, TextMetrics};
use crate::error::EngineError;
use crate::layout::LayoutEngine;
use crate::model::Node;
use crate::parser::Parser;
use crate::render::{Hotspot, Rect, Renderer, Viewport};
use crate::style::Theme;

/// Width of the scrollbar thumb at the right screen edge.
const SCROLLBAR_WIDTH: i32 = 5;

/// Minimum scrollbar thumb height.
const SCROLLBAR_MIN_HEIGHT: i32 = 20;

/// Supplies document text by identifier. Identifiers are opaque to the
/// engine; link targets are passed back here verbatim.
pub trait DocumentSource {
    fn fetch(&self, id: &str) -> Result<String, EngineError>;
}

pub struct Session<S: DocumentSource> {
    source: S,
    theme: Theme,
    viewport: Viewport,
    viewport_width: i32,
    document: Node,
    document_id: String,
    scroll_y: i32,
    hotspots: Vec<Hotspot>,
}

impl<S: DocumentSource> Session<S> {
    /// Create a session with an empty document. Call [`Session::open`] to
    /// load content.
    pub fn new(source: S, theme: Theme, viewport_width: i32, viewport: Viewport) -> Self {
        let document = Parser::new(&theme).parse("");
        Self {
            source,
            theme,
            viewport,
            viewport_width,
            document,
            document_id: String::new(),
            scroll_y: 0,
            hotspots: Vec::new(),
        }
    }

    /// Fetch, parse, and lay out a document, replacing the current one and
    /// resetting scroll. A fetch failure yields the error document instead;
    /// this never fails.
    pub fn open(&mut self, id: &str, fonts: &dyn TextMetrics, assets: &dyn AssetSource) {
        let text = match self.source.fetch(id) {
            Ok(text) => text,
            Err(err) => {
                warn!("falling back to error document: {err}");
                format!("# Error\nCould not load {id}")
            }
        };

        let mut document = Parser::new(&self.theme).parse(&text);
        LayoutEngine::new().layout(&mut document, self.viewport_width, fonts, assets);
        debug!(
            "opened '{}': {} nodes, {}px",
            id,
            document.node_count(),
            document.layout.height
        );

        self.document = document;
        self.document_id = id.to_string();
        self.scroll_y = 0;
        self.hotspots.clear();
    }

    /// Follow a link target from [`Session::tap`].
    pub fn navigate(&mut self, target: &str, fonts: &dyn TextMetrics, assets: &dyn AssetSource) {
        self.open(target, fonts, assets);
    }

    /// Re-resolve layout for a new viewport width, keeping the document and
    /// clamping scroll into the new range.
    pub fn set_viewport_width(
        &mut self,
        width: i32,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) {
        self.viewport_width = width;
        LayoutEngine::new().layout(&mut self.document, width, fonts, assets);
        self.scroll_y = self.scroll_y.clamp(0, self.max_scroll());
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn content_height(&self) -> i32 {
        self.document.layout.height
    }

    pub fn scroll(&self) -> i32 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height() - self.viewport.height()).max(0)
    }

    pub fn scroll_by(&mut self, dy: i32) {
        self.scroll_to(self.scroll_y + dy);
    }

    pub fn scroll_to(&mut self, y: i32) {
        self.scroll_y = y.clamp(0, self.max_scroll());
    }

    /// Render a frame and refresh the hotspot list used by
    /// [`Session::tap`].
    pub fn render(&mut self, canvas: &mut dyn Canvas, assets: &dyn AssetSource) {
        let renderer = Renderer::new(self.viewport, &self.theme);
        let mut hotspots = Vec::new();
        renderer.render(
            &self.document,
            0,
            self.viewport.top,
            self.scroll_y,
            canvas,
            assets,
            &mut hotspots,
        );
        self.hotspots = hotspots;
    }

    /// Link rectangles from the last rendered frame.
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    /// Hit-test a tap against the last frame's links.
    pub fn tap(&self, x: i32, y: i32) -> Option<&str> {
        self.hotspots
            .iter()
            .find(|h| h.rect.contains(x, y))
            .map(|h| h.target.as_str())
    }

    /// Scrollbar thumb geometry at the right edge of `screen_width`, or
    /// `None` when the content fits the viewport.
    pub fn scrollbar(&self, screen_width: i32) -> Option<Rect> {
        let view_h = self.viewport.height();
        let content_h = self.content_height();
        if content_h <= view_h {
            return None;
        }
        let thumb_h =
            ((view_h as i64 * view_h as i64 / content_h as i64) as i32).max(SCROLLBAR_MIN_HEIGHT);
        let thumb_y =
            self.viewport.top + (self.scroll_y as i64 * view_h as i64 / content_h as i64) as i32;
        Some(Rect {
            x: screen_width - SCROLLBAR_WIDTH,
            y: thumb_y,
            w: SCROLLBAR_WIDTH,
            h: thumb_h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MonoMetrics, NoAssets, TraceCanvas};
    use std::collections::HashMap;

    struct MapSource(HashMap<String, String>);

    impl MapSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl DocumentSource for MapSource {
        fn fetch(&self, id: &str) -> Result<String, EngineError> {
            self.0
                .get(id)
                .cloned()
                .ok_or_else(|| EngineError::load(id, "not found"))
        }
    }

    fn session(entries: &[(&str, &str)]) -> Session<MapSource> {
        Session::new(
            MapSource::new(entries),
            Theme::default(),
            320,
            Viewport::new(40, 528),
        )
    }

    #[test]
    fn open_builds_and_lays_out() {
        let mut s = session(&[("index.md", "# Hi\n\nbody text")]);
        s.open("index.md", &MonoMetrics::default(), &NoAssets);
        assert_eq!(s.document_id(), "index.md");
        assert_eq!(s.document().children.len(), 2);
        assert!(s.content_height() > 0);
    }

    #[test]
    fn failed_fetch_yields_error_document() {
        let mut s = session(&[]);
        s.open("gone.md", &MonoMetrics::default(), &NoAssets);
        let doc = s.document();
        assert_eq!(doc.children.len(), 2);
        let text: String = doc.children[1]
            .spans
            .iter()
            .map(|sp| sp.text.as_str())
            .collect();
        assert_eq!(text, "Could not load gone.md");
    }

    #[test]
    fn scroll_clamps_to_content() {
        let long: String = (0..100)
            .map(|i| format!("para {i}\n\n"))
            .collect();
        let mut s = session(&[("long.md", long.as_str())]);
        s.open("long.md", &MonoMetrics::default(), &NoAssets);

        s.scroll_by(-50);
        assert_eq!(s.scroll(), 0);
        s.scroll_by(i32::MAX / 2);
        assert_eq!(s.scroll(), s.max_scroll());
        assert_eq!(s.max_scroll(), s.content_height() - 488);
    }

    #[test]
    fn short_document_never_scrolls() {
        let mut s = session(&[("a.md", "hi")]);
        s.open("a.md", &MonoMetrics::default(), &NoAssets);
        assert_eq!(s.max_scroll(), 0);
        s.scroll_by(100);
        assert_eq!(s.scroll(), 0);
        assert!(s.scrollbar(320).is_none());
    }

    #[test]
    fn tap_on_link_finds_target_and_navigate_follows_it() {
        let mut s = session(&[("index.md", "[next](two.md)"), ("two.md", "# Second")]);
        s.open("index.md", &MonoMetrics::default(), &NoAssets);
        s.render(&mut TraceCanvas::new(), &NoAssets);

        assert_eq!(s.hotspots().len(), 1);
        let spot = s.hotspots()[0].rect;
        let target = s.tap(spot.x + 2, spot.y + 2).map(str::to_string);
        assert_eq!(target.as_deref(), Some("two.md"));
        assert_eq!(s.tap(0, 0), None);

        s.navigate("two.md", &MonoMetrics::default(), &NoAssets);
        assert_eq!(s.document_id(), "two.md");
        assert_eq!(s.scroll(), 0);
        assert!(s.hotspots().is_empty());
    }

    #[test]
    fn scrollbar_tracks_scroll_position() {
        let long: String = (0..100).map(|i| format!("para {i}\n\n")).collect();
        let mut s = session(&[("long.md", long.as_str())]);
        s.open("long.md", &MonoMetrics::default(), &NoAssets);

        let top = s.scrollbar(320).unwrap();
        assert_eq!(top.x, 315);
        assert_eq!(top.y, 40);
        assert!(top.h >= SCROLLBAR_MIN_HEIGHT);

        s.scroll_to(s.max_scroll());
        let bottom = s.scrollbar(320).unwrap();
        assert!(bottom.y > top.y);
        assert!(bottom.y + bottom.h <= 528 + SCROLLBAR_MIN_HEIGHT);
    }

    #[test]
    fn viewport_width_change_relayouts_and_clamps() {
        let long: String = (0..50).map(|i| format!("word{i} ")).collect();
        let mut s = session(&[("w.md", long.as_str())]);
        s.open("w.md", &MonoMetrics::default(), &NoAssets);
        let h_wide = s.content_height();
        s.scroll_to(s.max_scroll());

        s.set_viewport_width(160, &MonoMetrics::default(), &NoAssets);
        assert!(s.content_height() > h_wide);
        assert!(s.scroll() <= s.max_scroll());
    }
}
