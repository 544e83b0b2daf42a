//! Rendering of computed layouts for the terminal and for SVG viewers

use std::collections::HashMap;
use std::fmt::Write as _;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{LayoutArena, LayoutConfig, TreeLayout};

/// Conversion into a printable `termtree` tree.
pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Levels below this depth collapse into one marker line.
pub const MAX_TREE_DEPTH: usize = 64;

impl TreeDisplay for LayoutArena<'_> {
    fn to_tree_string(&self) -> Tree<String> {
        // Built bottom-up: children are finished before their parent takes them
        let mut built: HashMap<Index, Tree<String>> = HashMap::new();
        for (idx, node) in self.iter_postorder() {
            if node.depth > MAX_TREE_DEPTH {
                continue;
            }
            let mut tree = Tree::new(label(node.card));
            if node.depth == MAX_TREE_DEPTH && !node.children.is_empty() {
                tree.push(Tree::new(format!("… truncated at depth {MAX_TREE_DEPTH}")));
            } else {
                for child in &node.children {
                    if let Some(child_tree) = built.remove(child) {
                        tree.push(child_tree);
                    }
                }
            }
            built.insert(idx, tree);
        }

        self.root()
            .and_then(|root| built.remove(&root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

fn label(card: &crate::domain::Card) -> String {
    if card.layer.is_empty() {
        card.to_string()
    } else {
        format!("{} [{}]", card, card.layer)
    }
}

/// One line per placement, then one per connector.
pub fn layout_text(layout: &TreeLayout<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "size {} {}", layout.width, layout.height);
    for p in &layout.placements {
        let _ = writeln!(out, "node {} {} {} depth={}", p.id, p.x, p.y, p.depth);
    }
    for c in &layout.connectors {
        let _ = writeln!(out, "link {} -> {} {}", c.parent, c.child, c.curve.svg_path());
    }
    out
}

/// Standalone SVG: one rect and label per card, one path per connector.
pub fn layout_svg(layout: &TreeLayout<'_>, config: &LayoutConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = layout.width,
        h = layout.height
    );
    for c in &layout.connectors {
        let _ = writeln!(
            out,
            r##"  <path d="{}" fill="none" stroke="#888" stroke-width="2"/>"##,
            c.curve.svg_path()
        );
    }
    for (_, node) in layout.nodes.iter() {
        let left = node.x - config.card_width / 2.0;
        let _ = writeln!(
            out,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" rx="8" fill="#fff" stroke="#333"/>"##,
            left, node.y, config.card_width, config.card_height
        );
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="14">{}</text>"#,
            node.x,
            node.y + config.card_height / 2.0,
            escape_xml(&node.card.field)
        );
    }
    out.push_str("</svg>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, TreeLayoutEngine};

    fn cards() -> Vec<Card> {
        vec![
            Card::new("db", "email <column>", "database"),
            Card::new("api", "email param", "api").linked_to("db"),
        ]
    }

    #[test]
    fn given_layout_when_rendering_svg_then_one_path_per_connector() {
        let cards = cards();
        let engine = TreeLayoutEngine::default();
        let layout = engine.layout("db", &cards).unwrap();

        let svg = layout_svg(&layout, engine.config());

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<path").count(), 1);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("email &lt;column&gt;"));
    }

    #[test]
    fn given_layout_when_rendering_tree_then_children_nested() {
        let cards = cards();
        let layout = TreeLayoutEngine::default().layout("db", &cards).unwrap();

        let rendered = layout.nodes.to_tree_string().to_string();

        assert!(rendered.starts_with("email <column> (db) [database]"));
        assert!(rendered.contains("email param (api) [api]"));
    }

    #[test]
    fn given_chain_deeper_than_cap_when_rendering_tree_then_truncated() {
        let mut cards = vec![Card::new("c0", "f0", "api")];
        for i in 1..10_000 {
            cards.push(Card::new(format!("c{i}"), format!("f{i}"), "api").linked_to(format!("c{}", i - 1)));
        }
        let layout = TreeLayoutEngine::default().layout("c0", &cards).unwrap();

        let rendered = layout.nodes.to_tree_string().to_string();

        assert_eq!(rendered.lines().count(), MAX_TREE_DEPTH + 2);
        assert!(rendered.contains(&format!("f{MAX_TREE_DEPTH} (c{MAX_TREE_DEPTH})")));
        assert!(!rendered.contains(&format!("(c{})", MAX_TREE_DEPTH + 1)));
        assert!(rendered.lines().last().is_some_and(|l| l.contains("truncated at depth 64")));
    }

    #[test]
    fn given_empty_arena_when_rendering_tree_then_placeholder() {
        let arena = LayoutArena::new();

        assert_eq!(arena.to_tree_string().to_string().trim_end(), "Empty tree");
    }
}
