//! # Layout Resolver
//!
//! Walks the block tree top-down and assigns every node its absolute box.
//! Layout is a pure function of (tree, viewport width): it writes only the
//! computed [`crate::model::LayoutBox`] fields and reads nothing it wrote on
//! a previous pass, so resolving the same tree twice yields identical
//! geometry.
//!
//! Heights are exact, never estimated: a container is as tall as its
//! children (plus their margins and its own padding and border), a text
//! leaf is as tall as its wrapped lines, and a table is as tall as its
//! rows. Tables size their columns from the separator-row weights, floored
//! at a minimum width and uniformly rescaled if the floor pushed the total
//! past the available width.

use log::debug;
use serde::Serialize;

use crate::backend::{AssetSource, TextMetrics};
use crate::model::{Node, NodeKind, SpanData};
use crate::style::Style;
use crate::text::LineBreaker;

/// Columns never shrink below this many pixels, even when the weighted
/// share would.
pub const MIN_COLUMN_WIDTH: i32 = 20;

/// Content height of a horizontal rule.
pub const RULE_THICKNESS: i32 = 2;

pub struct LayoutEngine {
    breaker: LineBreaker,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            breaker: LineBreaker::new(),
        }
    }

    /// Resolve the whole tree against a viewport width.
    pub fn layout(
        &self,
        root: &mut Node,
        viewport_width: i32,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) {
        self.resolve(root, viewport_width, fonts, assets);
        debug!("layout resolved: {}px total height", root.layout.height);
    }

    /// Resolve one node (and its subtree) within `container_width`.
    ///
    /// Writes `width`, `height`, wrapped `lines`, and children's `x`/`y`.
    /// The node's own x/y belong to its parent; table rows and cells are
    /// positioned by the table pass instead of the generic container loop.
    fn resolve(
        &self,
        node: &mut Node,
        container_width: i32,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) {
        let s = node.style;
        let avail_width = container_width - s.margin.horizontal() - s.border.horizontal();
        let content_width = avail_width - s.padding.horizontal();

        node.layout.width = container_width;
        let mut running = s.padding.top + s.border.top;

        if matches!(node.kind, NodeKind::Table(_)) {
            self.resolve_table(node, content_width, &s, fonts, assets);
            return;
        }

        if node.is_text_leaf() {
            let lines =
                self.breaker
                    .wrap(&node.spans, content_width, s.preformatted, fonts, assets);

            let base_height = fonts.line_height();
            let mut line_heights = Vec::with_capacity(lines.len());
            let mut total = 0;
            for line in &lines {
                let mut line_h = base_height;
                for item in line {
                    if let SpanData::Image { height, .. } = &item.data {
                        line_h = line_h.max(*height);
                    }
                }
                line_heights.push(line_h);
                total += line_h;
            }

            node.layout.lines = lines;
            node.layout.line_heights = line_heights;
            running += total;
            node.layout.height = running + s.padding.bottom + s.border.bottom;
            return;
        }

        if matches!(node.kind, NodeKind::HorizontalRule) {
            running += RULE_THICKNESS;
            node.layout.height = running + s.padding.bottom + s.border.bottom;
            return;
        }

        // Generic container: stack children vertically with their margins.
        let reposition = !matches!(node.kind, NodeKind::TableRow);
        for idx in 0..node.children.len() {
            let child_margin = node.children[idx].style.margin;
            self.resolve(&mut node.children[idx], content_width, fonts, assets);
            let child = &mut node.children[idx];
            if reposition {
                child.layout.x = s.margin.left + s.border.left + s.padding.left + child_margin.left;
                child.layout.y = running + child_margin.top;
                running += child.layout.height + child_margin.top + child_margin.bottom;
            }
        }
        node.layout.height = running + s.padding.bottom + s.border.bottom;
    }

    /// Table layout: weighted column widths, then rows of height-matched
    /// cells. Cell boxes are positioned here, relative to their row; rows
    /// are positioned relative to the table.
    fn resolve_table(
        &self,
        node: &mut Node,
        content_width: i32,
        s: &Style,
        fonts: &dyn TextMetrics,
        assets: &dyn AssetSource,
    ) {
        let col_widths = match &node.kind {
            NodeKind::Table(cols) => column_widths(&cols.weights, content_width),
            _ => unreachable!("resolve_table called on a non-table node"),
        };
        let row_width: i32 = col_widths.iter().sum();

        let mut running = s.padding.top + s.border.top;
        for row in &mut node.children {
            row.layout.x = s.margin.left + s.border.left + s.padding.left;
            row.layout.y = running;
            row.layout.width = row_width;

            let mut cell_x = 0;
            let mut row_height = 0;
            for (idx, cell) in row.children.iter_mut().enumerate() {
                if idx >= col_widths.len() {
                    break;
                }
                self.resolve(cell, col_widths[idx], fonts, assets);
                cell.layout.x = cell_x;
                cell.layout.y = 0;
                row_height = row_height.max(cell.layout.height);
                cell_x += col_widths[idx];
            }

            // Every cell stretches to the tallest cell in its row.
            for cell in &mut row.children {
                cell.layout.height = row_height;
            }
            row.layout.height = row_height;
            running += row_height;
        }

        node.layout.height = running + s.padding.bottom + s.border.bottom;
    }
}

/// Weighted column widths for a table, floored at [`MIN_COLUMN_WIDTH`] and
/// uniformly rescaled when the floors overflow the content width.
pub(crate) fn column_widths(weights: &[u32], content_width: i32) -> Vec<i32> {
    let total: i64 = weights.iter().map(|&w| w as i64).sum();
    let total = total.max(1);

    let mut widths: Vec<i32> = weights
        .iter()
        .map(|&w| ((w as i64 * content_width as i64 / total) as i32).max(MIN_COLUMN_WIDTH))
        .collect();

    let sum: i64 = widths.iter().map(|&w| w as i64).sum();
    if sum > content_width as i64 {
        for w in &mut widths {
            *w = (*w as i64 * content_width as i64 / sum) as i32;
        }
    }
    widths
}

/// A serializable snapshot of the resolved geometry, for debug overlays and
/// golden tests.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub line_count: usize,
    pub children: Vec<LayoutInfo>,
}

impl LayoutInfo {
    pub fn from_tree(node: &Node) -> Self {
        LayoutInfo {
            kind: node.kind_name().to_string(),
            x: node.layout.x,
            y: node.layout.y,
            width: node.layout.width,
            height: node.layout.height,
            line_count: node.layout.lines.len(),
            children: node.children.iter().map(LayoutInfo::from_tree).collect(),
        }
    }
}
