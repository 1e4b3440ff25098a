//! # Document Model
//!
//! The tree the block parser produces and the layout engine annotates. A
//! document is a single `Node` of kind `Root`; every block construct in the
//! source becomes one child (or subtree, for tables).
//!
//! A node is either a text leaf (non-empty `spans`, no meaningful children)
//! or a container (children, no spans). Tables are the structured exception:
//! `Table` holds `TableRow` children which hold `TableCell` text leaves.
//!
//! Layout never rebuilds the tree. It writes the computed box into each
//! node's `layout` field, which the parser always leaves zeroed.

use crate::style::{Style, TextAlign};

/// The kind of block-level construct a node represents.
///
/// Table-only data (column alignments, width weights, column count) lives in
/// the `Table` variant so it cannot exist on any other kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Header { level: u8 },
    Paragraph,
    ListItem,
    Blockquote,
    CodeBlock,
    Table(TableColumns),
    TableRow,
    TableCell,
    /// Custom `::: name` admonition container.
    Container,
    HorizontalRule,
}

/// Column metadata decoded from a table's separator row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableColumns {
    /// Per-column alignment from `:---` / `:---:` / `---:`.
    pub aligns: Vec<TextAlign>,
    /// Per-column width weight: the number of dashes typed in the separator
    /// cell (minimum 1). A wider separator buys a proportionally wider
    /// rendered column.
    pub weights: Vec<u32>,
    /// Number of columns, fixed by the header row. Body rows with more cells
    /// are truncated to this.
    pub count: usize,
}

/// Inline emphasis marker for a span. The discriminants match the wire-level
/// style ids of the reference implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Normal = 0,
    Bold = 1,
    Code = 2,
    Link = 3,
    Italic = 4,
    Strikethrough = 5,
    Image = 6,
}

/// Auxiliary payload attached to a span.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpanData {
    #[default]
    None,
    /// Link destination or image source, as written in the document.
    Target(String),
    /// An image that line wrapping has already sized: source plus the
    /// resolved render dimensions in pixels.
    Image {
        source: String,
        width: i32,
        height: i32,
    },
}

impl SpanData {
    /// The navigation/asset target, if this payload carries one.
    pub fn target(&self) -> Option<&str> {
        match self {
            SpanData::None => None,
            SpanData::Target(t) => Some(t),
            SpanData::Image { source, .. } => Some(source),
        }
    }
}

/// A contiguous run of inline content carrying one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    pub data: SpanData,
}

impl Span {
    pub fn new(text: impl Into<String>, style: SpanStyle, data: SpanData) -> Self {
        Self {
            text: text.into(),
            style,
            data,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Normal, SpanData::None)
    }
}

/// One visually laid-out row of inline content, items positioned
/// left-to-right in order.
pub type Line = Vec<Span>;

/// Computed layout, written only by the layout engine.
///
/// `x`/`y` are relative to the parent's box origin; the renderer accumulates
/// them into screen coordinates. `width` is the full width handed to the
/// node (margins included); `height` covers padding and borders but not
/// margins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Wrapped display lines for text leaves.
    pub lines: Vec<Line>,
    /// Per-line pixel height; taller than the base line height when a line
    /// carries an inline image.
    pub line_heights: Vec<i32>,
}

/// A node in the document tree. Owns its children exclusively; the tree is
/// acyclic and never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub style: Style,
    /// Inline content for text leaves; empty for containers.
    pub spans: Vec<Span>,
    pub children: Vec<Node>,
    pub layout: LayoutBox,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            spans: Vec::new(),
            children: Vec::new(),
            layout: LayoutBox::default(),
        }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// A node renders text itself iff the parser gave it spans.
    pub fn is_text_leaf(&self) -> bool {
        !self.spans.is_empty()
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Root => "Root",
            NodeKind::Header { .. } => "Header",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::ListItem => "ListItem",
            NodeKind::Blockquote => "Blockquote",
            NodeKind::CodeBlock => "CodeBlock",
            NodeKind::Table(_) => "Table",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::Container => "Container",
            NodeKind::HorizontalRule => "HorizontalRule",
        }
    }

    /// Total node count of this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}
