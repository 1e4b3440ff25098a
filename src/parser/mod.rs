//! # Block Parser
//!
//! Consumes the document line-by-line and produces the block tree. Each line
//! is classified by its trimmed prefix; text runs are handed to the inline
//! scanner. Every construct carries its concrete style (margins, padding,
//! borders, colors) from the moment it is created, baked from the theme —
//! layout and rendering never consult the theme for per-node properties.
//!
//! The parser accepts any input: unrecognized or malformed syntax always
//! lands in the paragraph fallback as literal text.

pub mod inline;

use log::debug;

use crate::model::{Node, NodeKind, Span, SpanData, SpanStyle, TableColumns};
use crate::style::{Edges, TextAlign, Theme};

use inline::parse_inline;

/// Line prefixes that terminate a paragraph or a block quote run.
const BLOCK_STARTERS: [&str; 6] = ["#", "-", "*", "+", "```", "---"];

pub struct Parser<'a> {
    theme: &'a Theme,
}

impl<'a> Parser<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Parse a whole document into its root node. Never fails.
    pub fn parse(&self, text: &str) -> Node {
        let mut root = Node::new(NodeKind::Root);
        root.style.padding = Edges::new(10, 5, 10, 5);
        root.style.color = self.theme.text;

        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        let n_lines = lines.len();

        let mut i = 0;
        while i < n_lines {
            let line = lines[i];
            let indent = (line.chars().count() - line.trim_start().chars().count()) as i32;
            let stripped = line.trim();

            if stripped.is_empty() {
                i += 1;
                continue;
            }

            if stripped.starts_with('#') {
                root.push(self.header(stripped));
                i += 1;
                continue;
            }

            if stripped.starts_with("---") || stripped.starts_with("***") {
                // A ---|--- line is a table separator and belongs to the
                // table lookahead, not here.
                let table_separator = stripped.starts_with("---") && stripped.contains('|');
                if !table_separator {
                    root.push(self.horizontal_rule());
                    i += 1;
                    continue;
                }
            }

            if stripped.starts_with('|') {
                if let Some(next) = lines.get(i + 1).map(|l| l.trim()) {
                    if next.starts_with('|') && next.contains("---") {
                        let table = self.table(stripped, next, &lines, &mut i);
                        root.push(table);
                        continue;
                    }
                }
            }

            if stripped.starts_with('>') {
                root.push(self.blockquote(stripped, &lines, &mut i));
                continue;
            }

            if let Some(name) = stripped.strip_prefix("::: ") {
                root.push(self.container(name, &lines, &mut i));
                continue;
            }

            if stripped.starts_with("```") {
                root.push(self.code_block(&lines, &mut i));
                continue;
            }

            if stripped.starts_with("- ") || stripped.starts_with("* ") || stripped.starts_with("+ ")
            {
                root.push(self.list_item(stripped, indent));
                i += 1;
                continue;
            }

            root.push(self.paragraph(stripped, &lines, &mut i));
        }

        debug!("parsed document: {} nodes", root.node_count());
        root
    }

    fn header(&self, stripped: &str) -> Node {
        let hashes = stripped.chars().take_while(|&c| c == '#').count();
        let content = stripped[hashes..].trim();
        let level = hashes.min(6) as u8;

        let mut node = Node::new(NodeKind::Header { level });
        node.style.margin = Edges::new(if level == 1 { 15 } else { 10 }, 0, 10, 0);
        node.style.color = self.theme.text;
        if level <= 2 {
            node.style.border = Edges::new(0, 0, 2, 0);
            node.style.padding = Edges::new(0, 0, 5, 0);
            node.style.background = Some(self.theme.page_background);
            node.style.border_color = self.theme.header_border;
        }
        node.spans = parse_inline(content);
        node
    }

    fn horizontal_rule(&self) -> Node {
        let mut node = Node::new(NodeKind::HorizontalRule);
        node.style.margin = Edges::new(10, 0, 10, 0);
        node.style.background = Some(self.theme.rule);
        node
    }

    fn table(&self, header_line: &str, separator: &str, lines: &[&str], i: &mut usize) -> Node {
        let header_cells = split_row(header_line);
        let sep_cells = split_row(separator);

        let mut aligns = Vec::with_capacity(sep_cells.len());
        let mut weights = Vec::with_capacity(sep_cells.len());
        for sep in &sep_cells {
            weights.push((sep.matches('-').count() as u32).max(1));
            aligns.push(if sep.starts_with(':') && sep.ends_with(':') {
                TextAlign::Center
            } else if sep.ends_with(':') {
                TextAlign::Right
            } else {
                TextAlign::Left
            });
        }

        let col_count = header_cells.len();
        let mut table = Node::new(NodeKind::Table(TableColumns {
            aligns: aligns.clone(),
            weights,
            count: col_count,
        }));
        table.style.margin = Edges::new(10, 0, 10, 0);
        table.style.border = Edges::uniform(1);

        let mut header_row = Node::new(NodeKind::TableRow);
        header_row.style.background = Some(self.theme.table_header_background);
        for (idx, text) in header_cells.iter().enumerate() {
            header_row.push(self.table_cell(text, aligns.get(idx).copied()));
        }
        table.push(header_row);

        *i += 2;

        while *i < lines.len() {
            let line = lines[*i].trim();
            if !line.starts_with('|') {
                break;
            }
            let cells = split_row(line);
            let mut row = Node::new(NodeKind::TableRow);
            for (idx, text) in cells.iter().enumerate() {
                if idx >= col_count {
                    break;
                }
                row.push(self.table_cell(text, aligns.get(idx).copied()));
            }
            table.push(row);
            *i += 1;
        }

        table
    }

    fn table_cell(&self, text: &str, align: Option<TextAlign>) -> Node {
        let mut cell = Node::new(NodeKind::TableCell);
        cell.style.padding = Edges::uniform(4);
        cell.style.border = Edges::new(0, 1, 1, 0);
        cell.style.align = align.unwrap_or_default();
        cell.style.color = self.theme.text;
        cell.spans = parse_inline(text);
        cell
    }

    fn blockquote(&self, first: &str, lines: &[&str], i: &mut usize) -> Node {
        let (depth, mut text) = quote_depth_content(first);

        *i += 1;
        while *i < lines.len() {
            let next = lines[*i].trim();
            if next.is_empty() || starts_with_any(next, &BLOCK_STARTERS) {
                break;
            }
            if next.starts_with('>') {
                let (next_depth, content) = quote_depth_content(next);
                if next_depth != depth {
                    // Depth changed; a fresh blockquote node starts there.
                    break;
                }
                text.push(' ');
                text.push_str(&content);
            } else {
                // Lazy continuation: the bare line is absorbed into the quote.
                text.push(' ');
                text.push_str(next);
            }
            *i += 1;
        }

        let mut node = Node::new(NodeKind::Blockquote);
        node.style.margin = Edges::new(5, 0, 5, (depth - 1) * 20);
        node.style.padding = Edges::new(5, 5, 5, 10);
        node.style.border = Edges::new(0, 0, 0, 2);
        node.style.background = Some(self.theme.quote_background);
        node.style.border_color = self.theme.quote_bar;
        node.spans = parse_inline(&text);
        node
    }

    fn container(&self, name: &str, lines: &[&str], i: &mut usize) -> Node {
        let kind = name.trim().to_lowercase();
        let (background, border_color) = if kind.contains("warning") {
            (self.theme.warning_background, self.theme.warning_border)
        } else if kind.contains("tip") {
            (self.theme.tip_background, self.theme.tip_border)
        } else if kind.contains("danger") {
            (self.theme.danger_background, self.theme.danger_border)
        } else {
            (self.theme.panel_background, self.theme.panel_border)
        };

        let mut node = Node::new(NodeKind::Container);
        node.style.margin = Edges::new(10, 0, 10, 0);
        node.style.padding = Edges::uniform(10);
        node.style.background = Some(background);
        node.style.border = Edges::new(1, 1, 1, 4);
        node.style.border_color = border_color;

        *i += 1;
        let mut content: Vec<&str> = Vec::new();
        while *i < lines.len() {
            if lines[*i].trim() == ":::" {
                *i += 1;
                break;
            }
            content.push(lines[*i]);
            *i += 1;
        }

        // Container content is treated as one inline-parsed paragraph, not
        // recursively block-parsed.
        let mut para = Node::new(NodeKind::Paragraph);
        para.style.color = self.theme.text;
        para.spans = parse_inline(&content.join("\n"));
        node.push(para);
        node
    }

    fn code_block(&self, lines: &[&str], i: &mut usize) -> Node {
        *i += 1;
        let mut code_lines: Vec<&str> = Vec::new();
        while *i < lines.len() {
            if lines[*i].trim().starts_with("```") {
                *i += 1;
                break;
            }
            // Internal indentation preserved verbatim.
            code_lines.push(lines[*i]);
            *i += 1;
        }

        let mut node = Node::new(NodeKind::CodeBlock);
        node.style.preformatted = true;
        node.style.background = Some(self.theme.code_background);
        node.style.color = self.theme.code_text;
        node.style.padding = Edges::uniform(5);
        node.style.margin = Edges::new(5, 0, 5, 0);
        node.style.border = Edges::uniform(1);
        node.spans = vec![Span::new(
            code_lines.join("\n"),
            SpanStyle::Code,
            SpanData::None,
        )];
        node
    }

    fn list_item(&self, stripped: &str, indent: i32) -> Node {
        let content = stripped[2..].trim();
        let indent_level = indent / 2;

        let mut node = Node::new(NodeKind::ListItem);
        node.style.margin = Edges::new(2, 0, 2, 5 + indent_level * 10);
        node.style.padding = Edges::new(0, 0, 0, 12);
        node.style.color = self.theme.text;
        node.spans = parse_inline(content);
        node
    }

    fn paragraph(&self, first: &str, lines: &[&str], i: &mut usize) -> Node {
        let mut text = first.to_string();
        *i += 1;
        while *i < lines.len() {
            let next = lines[*i].trim();
            if next.is_empty() || starts_with_any(next, &BLOCK_STARTERS) || next.starts_with('>') {
                break;
            }
            text.push(' ');
            text.push_str(next);
            *i += 1;
        }

        let mut node = Node::new(NodeKind::Paragraph);
        node.style.margin = Edges::new(0, 0, 8, 0);
        node.style.color = self.theme.text;
        node.spans = parse_inline(&text);
        node
    }
}

/// Split a `| a | b |` row into trimmed cell texts, outer pipes stripped.
fn split_row(line: &str) -> Vec<&str> {
    line.trim_matches('|').split('|').map(str::trim).collect()
}

/// Count leading `>` markers (spaces between them allowed) and return the
/// remaining content. `>>` and `> >` both mean depth 2.
fn quote_depth_content(line: &str) -> (i32, String) {
    let mut depth = 0;
    let mut content = line;
    while let Some(rest) = content.strip_prefix('>') {
        depth += 1;
        content = rest.trim();
    }
    (depth, content.to_string())
}

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p))
}
