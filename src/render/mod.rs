//! # Renderer
//!
//! Walks the positioned tree and paints it through the [`Canvas`] trait,
//! culling every subtree whose vertical extent misses the visible band.
//! Nothing persists between frames: the caller owns the tree and the scroll
//! offset, and every call produces a fresh list of link hotspots for
//! hit-testing.
//!
//! Paint order per node: background, border edges, list bullet, wrapped
//! lines, then children. Scroll is folded into the root's origin once;
//! children inherit screen coordinates from their parent.

use crate::backend::{AssetSource, Canvas};
use crate::model::{Node, NodeKind, Span, SpanData, SpanStyle};
use crate::style::{Style, Theme};

/// Vertical offset that seats glyphs inside their line box.
const TEXT_Y_OFFSET: i32 = 4;

/// An axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Edge-inclusive point test, matching the target display's fill
    /// convention.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// A clickable link rectangle produced during rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub rect: Rect,
    /// Opaque navigation target, as written in the document.
    pub target: String,
}

/// The visible vertical band in screen coordinates. Content above `top`
/// (the header bar, on the reference device) or below `bottom` is culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: i32,
    pub bottom: i32,
}

impl Viewport {
    pub fn new(top: i32, bottom: i32) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

pub struct Renderer<'a> {
    viewport: Viewport,
    theme: &'a Theme,
}

impl<'a> Renderer<'a> {
    pub fn new(viewport: Viewport, theme: &'a Theme) -> Self {
        Self { viewport, theme }
    }

    /// Paint `node` and its subtree. `origin_x`/`origin_y` is the parent's
    /// screen-space content origin; `scroll_y` is subtracted once at the
    /// call that starts the walk and must be 0 for recursive calls.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        node: &Node,
        origin_x: i32,
        origin_y: i32,
        scroll_y: i32,
        canvas: &mut dyn Canvas,
        assets: &dyn AssetSource,
        hotspots: &mut Vec<Hotspot>,
    ) {
        let screen_x = origin_x + node.layout.x;
        let screen_y = origin_y + node.layout.y - scroll_y;

        // The only scroll optimization: whole-subtree vertical culling.
        if screen_y > self.viewport.bottom || screen_y + node.layout.height < self.viewport.top {
            return;
        }

        let s = &node.style;
        let box_w = node.layout.width - s.margin.horizontal();
        let box_h = node.layout.height;

        if let Some(bg) = s.background {
            canvas.fill_rect(screen_x, screen_y, screen_x + box_w, screen_y + box_h, bg);
        }

        if s.border.top > 0 {
            canvas.fill_rect(
                screen_x,
                screen_y,
                screen_x + box_w,
                screen_y + s.border.top,
                s.border_color,
            );
        }
        if s.border.right > 0 {
            canvas.fill_rect(
                screen_x + box_w - s.border.right,
                screen_y,
                screen_x + box_w,
                screen_y + box_h,
                s.border_color,
            );
        }
        if s.border.bottom > 0 {
            canvas.fill_rect(
                screen_x,
                screen_y + box_h - s.border.bottom,
                screen_x + box_w,
                screen_y + box_h,
                s.border_color,
            );
        }
        if s.border.left > 0 {
            canvas.fill_rect(
                screen_x,
                screen_y,
                screen_x + s.border.left,
                screen_y + box_h,
                s.border_color,
            );
        }

        if matches!(node.kind, NodeKind::ListItem) {
            let first_line_h = node
                .layout
                .line_heights
                .first()
                .copied()
                .unwrap_or_else(|| canvas.line_height());
            canvas.fill_circle(
                screen_x + 6,
                screen_y + s.padding.top + s.border.top + first_line_h / 2,
                2,
                self.theme.bullet,
            );
        }

        if !node.layout.lines.is_empty() {
            self.draw_lines(node, screen_x, screen_y, canvas, assets, hotspots);
        }

        for child in &node.children {
            self.render(child, screen_x, screen_y, 0, canvas, assets, hotspots);
        }
    }

    fn draw_lines(
        &self,
        node: &Node,
        screen_x: i32,
        screen_y: i32,
        canvas: &mut dyn Canvas,
        assets: &dyn AssetSource,
        hotspots: &mut Vec<Hotspot>,
    ) {
        let s = &node.style;
        let text_x_start = screen_x + s.padding.left + s.border.left;
        let mut text_y = screen_y + s.padding.top + s.border.top;
        let base_line_h = canvas.line_height();

        for (idx, line) in node.layout.lines.iter().enumerate() {
            let line_h = node
                .layout
                .line_heights
                .get(idx)
                .copied()
                .unwrap_or(base_line_h);

            // Past the bottom edge nothing further can be visible.
            if text_y > self.viewport.bottom {
                break;
            }

            // A line fully above the band is skipped but still advances the
            // cursor so later lines land where layout put them.
            if text_y + line_h > self.viewport.top {
                let mut cursor_x = text_x_start;
                for item in line {
                    cursor_x +=
                        self.draw_item(item, cursor_x, text_y, line_h, s, canvas, assets, hotspots);
                }
            }

            text_y += line_h;
        }
    }

    /// Paint one wrapped-line item and return its horizontal advance.
    #[allow(clippy::too_many_arguments)]
    fn draw_item(
        &self,
        item: &Span,
        x: i32,
        text_y: i32,
        line_h: i32,
        style: &Style,
        canvas: &mut dyn Canvas,
        assets: &dyn AssetSource,
        hotspots: &mut Vec<Hotspot>,
    ) -> i32 {
        if item.style == SpanStyle::Image {
            if let SpanData::Image {
                source,
                width,
                height,
            } = &item.data
            {
                let scale = match assets.intrinsic_size(source) {
                    Some((orig_w, _)) if orig_w > 0 => *width as f32 / orig_w as f32,
                    _ => 1.0,
                };
                canvas.draw_image(source, x, text_y + (line_h - height) / 2, scale);
                return *width;
            }
            // Unresolved asset: paint the alt text instead.
            let (w, font_h) = canvas.measure_text(&item.text);
            canvas.draw_text(x, text_y + (line_h - font_h) / 2, style.color, &item.text);
            return w;
        }

        let (w, font_h) = canvas.measure_text(&item.text);
        let draw_y = text_y + (line_h - canvas.line_height()) / 2 + TEXT_Y_OFFSET;
        let mut color = style.color;

        match item.style {
            // The highlight only applies to inline code; a preformatted
            // block already painted its own background.
            SpanStyle::Code if !style.preformatted => {
                canvas.fill_rect(
                    x + 1,
                    draw_y - 2,
                    x + w,
                    draw_y + canvas.line_height() - 4,
                    self.theme.inline_code_highlight,
                );
            }
            SpanStyle::Bold => {
                // Pseudo-bold: the glyphs drawn twice, 1px apart.
                canvas.draw_text(x + 1, draw_y, color, &item.text);
            }
            SpanStyle::Link => {
                color = self.theme.link;
                let underline_y = draw_y + font_h - 7;
                canvas.draw_line(x, underline_y, x + w, underline_y, color);
                if let SpanData::Target(target) = &item.data {
                    hotspots.push(Hotspot {
                        rect: Rect {
                            x,
                            y: text_y,
                            w,
                            h: line_h,
                        },
                        target: target.clone(),
                    });
                }
            }
            SpanStyle::Strikethrough => {
                let strike_y = draw_y + font_h / 2 - 4;
                canvas.draw_line(x, strike_y, x + w, strike_y, color);
            }
            // Italic has no slanted face on the device; rendered plain.
            _ => {}
        }

        canvas.draw_text(x, draw_y, color, &item.text);
        w
    }
}
