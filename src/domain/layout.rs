//! Tidy-enough tree layout for the relationship view.
//!
//! The tree grows downward from the root card; a node's children are the
//! cards linking to it. Each subtree reserves a horizontal slot as wide as
//! its widest level demands, so sibling subtrees never overlap. The result is
//! deterministic but not contour-compacted: one wide subtree widens the gaps
//! around its siblings.

use std::collections::{HashSet, VecDeque};

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::LayoutArena;
use crate::domain::curve::{Curve, Point};
use crate::domain::entities::{Card, CardId};
use crate::domain::link_graph::LinkGraph;

/// Layout constants, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Rendered card width, also the minimum subtree width
    pub card_width: f64,
    /// Rendered card height
    pub card_height: f64,
    /// Gap between adjacent sibling subtrees
    pub horizontal_spacing: f64,
    /// Distance between the tops of consecutive levels
    pub vertical_spacing: f64,
    /// Canvas width floor
    pub min_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 220.0,
            card_height: 90.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 160.0,
            min_width: 600.0,
        }
    }
}

/// Where to put one card visual (top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: CardId,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
}

/// Curve joining a parent card to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub parent: CardId,
    pub child: CardId,
    pub curve: Curve,
}

/// Serializable summary of a computed layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub root: CardId,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<Placement>,
    pub connectors: Vec<Connector>,
}

/// A positioned relationship tree.
#[derive(Debug)]
pub struct TreeLayout<'a> {
    /// Positioned nodes (x = horizontal center, y = top edge)
    pub nodes: LayoutArena<'a>,
    pub root: Index,
    /// Pre-order, root first
    pub placements: Vec<Placement>,
    /// One per parent-child pair, pre-order of the child
    pub connectors: Vec<Connector>,
    pub width: f64,
    pub height: f64,
}

impl<'a> TreeLayout<'a> {
    pub fn root_card(&self) -> Option<&'a Card> {
        self.nodes.get_node(self.root).map(|node| node.card)
    }

    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn report(&self) -> LayoutReport {
        LayoutReport {
            root: self
                .root_card()
                .map(|card| card.id.clone())
                .unwrap_or_default(),
            width: self.width,
            height: self.height,
            placements: self.placements.clone(),
            connectors: self.connectors.clone(),
        }
    }
}

/// Computes [`TreeLayout`]s. Holds only constants; every call starts fresh.
#[derive(Debug, Clone, Default)]
pub struct TreeLayoutEngine {
    config: LayoutConfig,
}

impl TreeLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the tree rooted at `root_id`. `None` if the root is unknown.
    pub fn layout<'a>(&self, root_id: &str, cards: &'a [Card]) -> Option<TreeLayout<'a>> {
        self.layout_in(&LinkGraph::new(cards), root_id)
    }

    /// Same as [`layout`](Self::layout) over a prebuilt index.
    #[instrument(level = "debug", skip(self, graph))]
    pub fn layout_in<'a>(&self, graph: &LinkGraph<'a>, root_id: &str) -> Option<TreeLayout<'a>> {
        let root_card = graph.get(root_id)?;
        let mut nodes = build_tree(graph, root_card);
        let root = nodes.root()?;

        self.size_subtrees(&mut nodes);
        let canvas = nodes
            .get_node(root)
            .map_or(self.config.card_width, |node| node.width)
            .max(self.config.min_width);
        self.position(&mut nodes, root, canvas / 2.0);

        let placements = self.placements(&nodes);
        let connectors = self.connectors(&nodes);
        let (width, height) = self.bounds(&nodes);
        debug!(
            "layout {:?}: {} nodes, {}x{}",
            root_id,
            nodes.len(),
            width,
            height
        );

        Some(TreeLayout {
            nodes,
            root,
            placements,
            connectors,
            width,
            height,
        })
    }

    /// Post-order: leaves take one card width; parents the larger of one card
    /// width and their children's slots plus gaps.
    fn size_subtrees(&self, nodes: &mut LayoutArena<'_>) {
        let order: Vec<Index> = nodes.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let Some(node) = nodes.get_node(idx) else {
                continue;
            };
            let width = self
                .children_span(nodes, &node.children)
                .map_or(self.config.card_width, |span| span.max(self.config.card_width));
            if let Some(node) = nodes.get_node_mut(idx) {
                node.width = width;
            }
        }
    }

    /// Total width of the children's slots laid side by side, None for a leaf.
    fn children_span(&self, nodes: &LayoutArena<'_>, children: &[Index]) -> Option<f64> {
        if children.is_empty() {
            return None;
        }
        let widths: f64 = children
            .iter()
            .filter_map(|&child| nodes.get_node(child))
            .map(|child| child.width)
            .sum();
        let gaps = (children.len() - 1) as f64 * self.config.horizontal_spacing;
        Some(widths + gaps)
    }

    /// Pre-order: center each child in its slot, slots centered under the parent.
    fn position(&self, nodes: &mut LayoutArena<'_>, root: Index, root_x: f64) {
        if let Some(node) = nodes.get_node_mut(root) {
            node.x = root_x;
            node.y = 0.0;
        }

        let order: Vec<Index> = nodes.iter().map(|(idx, _)| idx).collect();
        for idx in order {
            let Some(node) = nodes.get_node(idx) else {
                continue;
            };
            let Some(span) = self.children_span(nodes, &node.children) else {
                continue;
            };
            let child_y = node.y + self.config.vertical_spacing;
            let mut cursor = node.x - span / 2.0;
            let children = node.children.clone();

            for child in children {
                if let Some(child) = nodes.get_node_mut(child) {
                    child.x = cursor + child.width / 2.0;
                    child.y = child_y;
                    cursor += child.width + self.config.horizontal_spacing;
                }
            }
        }
    }

    fn placements(&self, nodes: &LayoutArena<'_>) -> Vec<Placement> {
        nodes
            .iter()
            .map(|(_, node)| Placement {
                id: node.card.id.clone(),
                x: node.x - self.config.card_width / 2.0,
                y: node.y,
                depth: node.depth,
            })
            .collect()
    }

    fn connectors(&self, nodes: &LayoutArena<'_>) -> Vec<Connector> {
        nodes
            .iter()
            .filter_map(|(_, child)| {
                let parent = nodes.get_node(child.parent?)?;
                let start = Point::new(parent.x, parent.y + self.config.card_height);
                let end = Point::new(child.x, child.y);
                Some(Connector {
                    parent: parent.card.id.clone(),
                    child: child.card.id.clone(),
                    curve: Curve::between(start, end),
                })
            })
            .collect()
    }

    /// Tight box around all cards, width floored at `min_width`.
    fn bounds(&self, nodes: &LayoutArena<'_>) -> (f64, f64) {
        let (max_x, max_y) = nodes
            .iter()
            .fold((0.0_f64, 0.0_f64), |(mx, my), (_, node)| {
                (mx.max(node.x), my.max(node.y))
            });
        let width = (max_x + self.config.card_width / 2.0).max(self.config.min_width);
        let height = max_y + self.config.card_height;
        (width, height)
    }
}

/// Breadth-first tree over reverse links, rooted at `root`.
///
/// The visited set keeps every card to a single node even when the link
/// relation has cycles.
fn build_tree<'a>(graph: &LinkGraph<'a>, root: &'a Card) -> LayoutArena<'a> {
    let mut nodes = LayoutArena::new();
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(root.id.as_str());
    queue.push_back(nodes.insert_node(root, None));

    while let Some(parent_idx) = queue.pop_front() {
        let Some(parent) = nodes.get_node(parent_idx).map(|node| node.card) else {
            continue;
        };
        let children: Vec<&'a Card> = graph
            .incoming(&parent.id)
            .filter(|&card| visited.insert(card.id.as_str()))
            .collect();
        for card in children {
            queue.push_back(nodes.insert_node(card, Some(parent_idx)));
        }
    }

    nodes
}
