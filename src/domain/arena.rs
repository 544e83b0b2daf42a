//! Index arena holding one layout tree.

use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::entities::Card;

/// Layout tree node. Coordinates are filled in by the layout passes.
#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    /// Card this node renders
    pub card: &'a Card,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, left to right
    pub children: Vec<Index>,
    /// Distance from the root
    pub depth: usize,
    /// Horizontal extent reserved for this node's subtree
    pub width: f64,
    /// Horizontal center
    pub x: f64,
    /// Top edge
    pub y: f64,
}

impl fmt::Display for LayoutNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.card)
    }
}

/// Arena-based tree built for one layout invocation.
///
/// Nodes are referenced by arena index, never by pointer, so a cyclic link
/// relation cannot produce an ownership cycle.
#[derive(Debug)]
pub struct LayoutArena<'a> {
    arena: Arena<LayoutNode<'a>>,
    root: Option<Index>,
}

impl Default for LayoutArena<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LayoutArena<'a> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, card), fields(card = %card.id))]
    pub fn insert_node(&mut self, card: &'a Card, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|idx| self.arena.get(idx))
            .map_or(0, |p| p.depth + 1);
        let node = LayoutNode {
            card,
            parent,
            children: Vec::new(),
            depth,
            width: 0.0,
            x: 0.0,
            y: 0.0,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&LayoutNode<'a>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut LayoutNode<'a>> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Find the node rendering card `id`.
    pub fn find(&self, id: &str) -> Option<(Index, &LayoutNode<'a>)> {
        self.iter().find(|(_, node)| node.card.id == id)
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> TreeIterator<'_, 'a> {
        TreeIterator::new(self)
    }

    /// Post-order traversal: every child before its parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, 'a> {
        PostOrderIterator::new(self)
    }

    /// Number of levels; 0 for an empty arena.
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, node)| node.depth + 1).max().unwrap_or(0)
    }

    /// Ids of nodes without children, left to right.
    pub fn leaf_ids(&self) -> Vec<&'a str> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.card.id.as_str())
            .collect()
    }
}

pub struct TreeIterator<'t, 'a> {
    arena: &'t LayoutArena<'a>,
    stack: Vec<Index>,
}

impl<'t, 'a> TreeIterator<'t, 'a> {
    fn new(arena: &'t LayoutArena<'a>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'t, 'a> Iterator for TreeIterator<'t, 'a> {
    type Item = (Index, &'t LayoutNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'t, 'a> {
    arena: &'t LayoutArena<'a>,
    stack: Vec<(Index, bool)>,
}

impl<'t, 'a> PostOrderIterator<'t, 'a> {
    fn new(arena: &'t LayoutArena<'a>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'t, 'a> Iterator for PostOrderIterator<'t, 'a> {
    type Item = (Index, &'t LayoutNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, expanded)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !expanded {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      root
    //      /  \
    // child1 child2
    //    |
    // grandchild1
    fn sample<'a>(cards: &'a [Card]) -> LayoutArena<'a> {
        let mut arena = LayoutArena::new();
        let root = arena.insert_node(&cards[0], None);
        let child1 = arena.insert_node(&cards[1], Some(root));
        arena.insert_node(&cards[2], Some(root));
        arena.insert_node(&cards[3], Some(child1));
        arena
    }

    fn cards() -> Vec<Card> {
        ["root", "child1", "child2", "grandchild1"]
            .into_iter()
            .map(|id| Card::new(id, id, "api"))
            .collect()
    }

    #[test]
    fn given_tree_when_iterating_preorder_then_parent_before_children() {
        let cards = cards();
        let arena = sample(&cards);
        let ids: Vec<_> = arena.iter().map(|(_, n)| n.card.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "child1", "grandchild1", "child2"]);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_before_parent() {
        let cards = cards();
        let arena = sample(&cards);
        let ids: Vec<_> = arena
            .iter_postorder()
            .map(|(_, n)| n.card.id.as_str())
            .collect();
        assert_eq!(ids, vec!["grandchild1", "child1", "child2", "root"]);
    }

    #[test]
    fn given_tree_when_inserting_then_depth_tracks_parent() {
        let cards = cards();
        let arena = sample(&cards);
        assert_eq!(arena.depth(), 3);
        assert_eq!(arena.find("grandchild1").map(|(_, n)| n.depth), Some(2));
        assert_eq!(arena.leaf_ids(), vec!["grandchild1", "child2"]);
    }

    #[test]
    fn given_empty_arena_when_querying_then_nothing() {
        let arena = LayoutArena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.depth(), 0);
        assert!(arena.iter().next().is_none());
    }
}
