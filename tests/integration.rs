//! Integration tests for the Inkdown rendering pipeline.
//!
//! These tests exercise the full path from Markdown text to draw calls.
//! They verify:
//! - Parsing produces the right tree shapes
//! - Layout geometry obeys the box-model accounting rules
//! - Wrapped lines stay inside their width budget
//! - Rendering culls off-screen content and collects link hotspots
//! - Sessions degrade gracefully and clamp scrolling

use inkdown::backend::{DrawOp, MonoMetrics, NoAssets, StaticAssets, TextMetrics, TraceCanvas};
use inkdown::error::EngineError;
use inkdown::layout::{LayoutEngine, LayoutInfo};
use inkdown::model::{Node, NodeKind, SpanStyle};
use inkdown::render::{Hotspot, Renderer, Viewport};
use inkdown::session::{DocumentSource, Session};
use inkdown::style::{TextAlign, Theme};

// ─── Helpers ────────────────────────────────────────────────────

const SCREEN_W: i32 = 320;
const VIEW: Viewport = Viewport {
    top: 40,
    bottom: 528,
};

fn build(text: &str) -> Node {
    inkdown::build(
        text,
        SCREEN_W,
        &Theme::default(),
        &MonoMetrics::default(),
        &NoAssets,
    )
}

fn render(root: &Node, scroll_y: i32) -> (TraceCanvas, Vec<Hotspot>) {
    let theme = Theme::default();
    let renderer = Renderer::new(VIEW, &theme);
    let mut canvas = TraceCanvas::new();
    let mut hotspots = Vec::new();
    renderer.render(
        root,
        0,
        VIEW.top,
        scroll_y,
        &mut canvas,
        &NoAssets,
        &mut hotspots,
    );
    (canvas, hotspots)
}

/// Recursively check container height accounting: padding + borders +
/// children (with their margins). Table rows and their stretched cells are
/// height-matched by design, so only pure stacking containers are checked.
fn assert_height_additivity(node: &Node) {
    let stacking = matches!(
        node.kind,
        NodeKind::Root | NodeKind::Container | NodeKind::Table(_)
    );
    if stacking && !node.children.is_empty() {
        let children_sum: i32 = node
            .children
            .iter()
            .map(|c| c.layout.height + c.style.margin.vertical())
            .sum();
        let expected = node.style.padding.vertical()
            + node.style.border.vertical()
            + children_sum;
        assert_eq!(
            node.layout.height,
            expected,
            "height accounting broken on {}",
            node.kind_name()
        );
    }
    for child in &node.children {
        assert_height_additivity(child);
    }
}

// ─── Parse → tree shapes ────────────────────────────────────────

#[test]
fn header_levels_scenario() {
    let root = build("# Title\n\n## Sub");
    assert_eq!(root.children.len(), 2);

    let h1 = &root.children[0];
    let h2 = &root.children[1];
    assert_eq!(h1.kind, NodeKind::Header { level: 1 });
    assert_eq!(h2.kind, NodeKind::Header { level: 2 });
    // Both carry the bottom-border flag; level 1 has the larger top margin.
    assert_eq!(h1.style.border.bottom, 2);
    assert_eq!(h2.style.border.bottom, 2);
    assert!(h1.style.margin.top > h2.style.margin.top);
    assert_eq!(h1.style.margin.top, 15);
    assert_eq!(h2.style.margin.top, 10);
}

#[test]
fn table_scenario() {
    let root = build("| A | B |\n|:--|--:|\n| 1 | 2 |");
    assert_eq!(root.children.len(), 1);

    let table = &root.children[0];
    let cols = match &table.kind {
        NodeKind::Table(cols) => cols,
        other => panic!("expected a table, got {other:?}"),
    };
    assert_eq!(cols.aligns, vec![TextAlign::Left, TextAlign::Right]);
    assert_eq!(table.children.len(), 2);
    for row in &table.children {
        assert_eq!(row.kind, NodeKind::TableRow);
        assert_eq!(row.children.len(), 2);
    }
}

#[test]
fn inline_toggle_scenario() {
    let spans = inkdown::parser::inline::parse_inline("a `b` c **d**");
    let got: Vec<(&str, SpanStyle)> = spans.iter().map(|s| (s.text.as_str(), s.style)).collect();
    assert_eq!(
        got,
        vec![
            ("a ", SpanStyle::Normal),
            ("b", SpanStyle::Code),
            (" c ", SpanStyle::Normal),
            ("d", SpanStyle::Bold),
        ]
    );
}

#[test]
fn unterminated_link_scenario() {
    let root = build("see [broken(url");
    let para = &root.children[0];
    assert_eq!(para.kind, NodeKind::Paragraph);
    assert_eq!(para.spans.len(), 1);
    assert_eq!(para.spans[0].style, SpanStyle::Normal);
    assert_eq!(para.spans[0].text, "see [broken(url");
}

#[test]
fn mixed_document_parses_every_construct() {
    let doc = "\
# Top

Intro paragraph.

---

> a quote

::: warning
watch out
:::

```
let x = 1;
```

- one
- two

| H |
|---|
| v |
";
    let root = build(doc);
    let kinds: Vec<&str> = root.children.iter().map(Node::kind_name).collect();
    assert_eq!(
        kinds,
        vec![
            "Header",
            "Paragraph",
            "HorizontalRule",
            "Blockquote",
            "Container",
            "CodeBlock",
            "ListItem",
            "ListItem",
            "Table",
        ]
    );
}

// ─── Layout properties ──────────────────────────────────────────

#[test]
fn layout_is_idempotent() {
    let text = "# H\n\nbody text with several words\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n- li";
    let theme = Theme::default();
    let mut root = inkdown::parse(text, &theme);
    let engine = LayoutEngine::new();

    engine.layout(&mut root, SCREEN_W, &MonoMetrics::default(), &NoAssets);
    let first = serde_json::to_value(LayoutInfo::from_tree(&root)).unwrap();
    engine.layout(&mut root, SCREEN_W, &MonoMetrics::default(), &NoAssets);
    let second = serde_json::to_value(LayoutInfo::from_tree(&root)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn wrapped_lines_fit_their_width() {
    let fonts = MonoMetrics::default();
    let root = build(
        "a paragraph with enough words to wrap onto several lines at the reference width \
         plus `inline code` and **bold** and a [link](x.md)",
    );
    let para = &root.children[0];
    // paragraph content width: 320 - root horizontal padding
    let max_width = SCREEN_W - 10;
    assert!(para.layout.lines.len() > 1);
    for line in &para.layout.lines {
        let width: i32 = line.iter().map(|s| fonts.measure_text(&s.text).0).sum();
        assert!(
            width <= max_width || line.len() == 1,
            "line exceeds budget: {width}px"
        );
    }
}

#[test]
fn height_additivity_holds_across_a_document() {
    let root = build(
        "# H\n\npara\n\n> quote\n\n::: tip\nnested\n:::\n\n- a\n- b\n\n\
         | A | B |\n|---|---|\n| 1 | 2 |\n\n---\n\nend",
    );
    assert_height_additivity(&root);
}

#[test]
fn table_width_conservation() {
    let root = build("| A | B | C |\n|---|-------|---|\n| 1 | 2 | 3 |");
    let table = &root.children[0];
    let content_width = table.layout.width
        - table.style.margin.horizontal()
        - table.style.border.horizontal()
        - table.style.padding.horizontal();

    let header_row = &table.children[0];
    let total: i32 = header_row
        .children
        .iter()
        .map(|c| c.layout.width)
        .sum();
    assert!(total <= content_width);
    assert_eq!(header_row.layout.width, total);
}

#[test]
fn plain_text_round_trip() {
    let text = "plain ascii words no syntax";
    let root = build(text);
    assert_eq!(root.children.len(), 1);

    let para = &root.children[0];
    assert_eq!(para.kind, NodeKind::Paragraph);
    assert_eq!(para.layout.lines.len(), 1);

    let rejoined: Vec<String> = para.layout.lines[0]
        .iter()
        .map(|s| s.text.clone())
        .collect();
    assert_eq!(rejoined.concat(), text);
}

#[test]
fn image_taller_than_text_stretches_its_line() {
    let mut assets = StaticAssets::new();
    assets.insert("chart.svf", 100, 80);
    let root = inkdown::build(
        "before ![chart](chart.svf) after",
        SCREEN_W,
        &Theme::default(),
        &MonoMetrics::default(),
        &assets,
    );
    let para = &root.children[0];
    assert!(para.layout.line_heights.iter().any(|&h| h == 80));
}

// ─── Rendering ──────────────────────────────────────────────────

#[test]
fn culling_scenario_scrolled_past_end() {
    let doc: String = (0..60)
        .map(|i| format!("# Section {i}\n\nbody for [link {i}](doc{i}.md)\n\n"))
        .collect();
    let root = build(&doc);
    let total = root.layout.height;
    assert!(total > VIEW.height());

    let (canvas, hotspots) = render(&root, total);
    assert!(
        canvas.ops.is_empty(),
        "culled render still drew: {:?}",
        canvas.ops.first()
    );
    assert!(hotspots.is_empty());
}

#[test]
fn unscrolled_render_draws_only_the_visible_prefix() {
    let doc: String = (0..60).map(|i| format!("entry{i}\n\n")).collect();
    let root = build(&doc);
    let (canvas, _) = render(&root, 0);
    let texts = canvas.texts();
    assert!(texts.contains(&"entry0"));
    assert!(!texts.contains(&"entry59"));
}

#[test]
fn scrolling_reveals_later_content() {
    let doc: String = (0..60).map(|i| format!("entry{i}\n\n")).collect();
    let root = build(&doc);
    let (canvas, _) = render(&root, root.layout.height - VIEW.height());
    let texts = canvas.texts();
    assert!(texts.contains(&"entry59"));
    assert!(!texts.contains(&"entry0"));
}

#[test]
fn hotspots_are_fresh_each_render() {
    let root = build("[a](a.md) and [b](b.md)");
    let (_, first) = render(&root, 0);
    let (_, second) = render(&root, 0);
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    let targets: Vec<&str> = first.iter().map(|h| h.target.as_str()).collect();
    assert_eq!(targets, vec!["a.md", "b.md"]);
}

#[test]
fn full_pipeline_draws_every_visible_construct() {
    let theme = Theme::default();
    let root = build("# Head\n\n- bullet item\n\n`code`\n\n~~strike~~");
    let (canvas, _) = render(&root, 0);

    assert!(canvas.texts().contains(&"Head"));
    assert!(canvas
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Circle { .. })));
    assert!(canvas.ops.iter().any(
        |op| matches!(op, DrawOp::FillRect { color, .. } if *color == theme.inline_code_highlight)
    ));
    assert!(canvas
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Line { .. })));
}

// ─── Session ────────────────────────────────────────────────────

struct SingleDoc {
    id: &'static str,
    body: &'static str,
}

impl DocumentSource for SingleDoc {
    fn fetch(&self, id: &str) -> Result<String, EngineError> {
        if id == self.id {
            Ok(self.body.to_string())
        } else {
            Err(EngineError::load(id, "unknown document"))
        }
    }
}

#[test]
fn session_open_render_tap_navigate_loop() {
    let source = SingleDoc {
        id: "index.md",
        body: "jump [ahead](missing.md)",
    };
    let mut session = Session::new(source, Theme::default(), SCREEN_W, VIEW);
    session.open("index.md", &MonoMetrics::default(), &NoAssets);

    let mut canvas = TraceCanvas::new();
    session.render(&mut canvas, &NoAssets);
    let spot = session.hotspots()[0].rect;
    let target = session
        .tap(spot.x + 1, spot.y + 1)
        .map(str::to_string)
        .expect("tap should hit the link");

    // The target doesn't exist: navigation lands on the error document
    // instead of failing.
    session.navigate(&target, &MonoMetrics::default(), &NoAssets);
    let mut canvas = TraceCanvas::new();
    session.render(&mut canvas, &NoAssets);
    assert!(canvas.texts().contains(&"Error"));
    assert!(canvas
        .texts()
        .iter()
        .any(|t| t.contains("missing.md") || *t == "Could" || t.contains("load")));
}

#[test]
fn session_scroll_is_clamped_and_scrollbar_appears() {
    let source = SingleDoc {
        id: "long.md",
        body: "word\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\n\
               word\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword\n\nword",
    };
    let mut session = Session::new(source, Theme::default(), SCREEN_W, VIEW);
    session.open("long.md", &MonoMetrics::default(), &NoAssets);

    session.scroll_by(10_000);
    assert_eq!(session.scroll(), session.max_scroll());
    session.scroll_by(-10_000);
    assert_eq!(session.scroll(), 0);

    if session.content_height() > VIEW.height() {
        let thumb = session.scrollbar(SCREEN_W).unwrap();
        assert_eq!(thumb.x, SCREEN_W - 5);
        assert!(thumb.h >= 20);
    }
}
