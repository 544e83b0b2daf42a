//! Weak connectivity and link-trail traversal.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::domain::entities::{Card, CardId};
use crate::domain::link_graph::LinkGraph;

/// Ids weakly reachable from `root_id` (links treated as undirected).
///
/// The root is always a member. An id absent from `cards` yields `{root_id}`.
pub fn connected_ids(root_id: &str, cards: &[Card]) -> BTreeSet<CardId> {
    reachable_from(&LinkGraph::new(cards), root_id)
}

/// Breadth-first weak reachability over a prebuilt index.
#[instrument(level = "debug", skip(graph))]
pub fn reachable_from(graph: &LinkGraph<'_>, root_id: &str) -> BTreeSet<CardId> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(root_id);
    if graph.contains(root_id) {
        queue.push_back(root_id);
    } else {
        debug!("root {:?} not in snapshot", root_id);
    }

    while let Some(current) = queue.pop_front() {
        if let Some(target) = graph.outgoing(current) {
            if visited.insert(target.id.as_str()) {
                queue.push_back(target.id.as_str());
            }
        }
        for source in graph.incoming(current) {
            if visited.insert(source.id.as_str()) {
                queue.push_back(source.id.as_str());
            }
        }
    }

    visited.into_iter().map(str::to_string).collect()
}

/// How a downstream trail stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailEnd {
    /// Last card has no link
    Terminal,
    /// Last card links to an id not in the snapshot
    Dangling(CardId),
    /// Last card links back to this already visited card
    Cycle(CardId),
}

/// Cards reached by following `linked_to` from a start card.
#[derive(Debug, Clone)]
pub struct LinkTrail<'a> {
    /// Start card first. Empty when the start id is unknown.
    pub cards: Vec<&'a Card>,
    pub end: TrailEnd,
}

/// Follow links downstream from `start_id` until the chain ends or repeats.
pub fn link_trail<'a>(graph: &LinkGraph<'a>, start_id: &str) -> LinkTrail<'a> {
    let mut cards = Vec::new();
    let mut seen = HashSet::new();

    let Some(mut current) = graph.get(start_id) else {
        return LinkTrail {
            cards,
            end: TrailEnd::Dangling(start_id.to_string()),
        };
    };

    loop {
        seen.insert(current.id.as_str());
        cards.push(current);

        let Some(target) = current.link() else {
            return LinkTrail {
                cards,
                end: TrailEnd::Terminal,
            };
        };
        match graph.get(target) {
            None => {
                return LinkTrail {
                    cards,
                    end: TrailEnd::Dangling(target.to_string()),
                }
            }
            Some(next) if seen.contains(next.id.as_str()) => {
                return LinkTrail {
                    cards,
                    end: TrailEnd::Cycle(next.id.clone()),
                }
            }
            Some(next) => current = next,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Walk {
    OnPath,
    Done,
}

/// Ids of cards that sit on a link cycle (self-links included).
///
/// Out-degree is at most one, so each walk is a single path; every card is
/// walked once.
pub fn cyclic_ids(graph: &LinkGraph<'_>) -> BTreeSet<CardId> {
    let mut state: HashMap<&str, Walk> = HashMap::with_capacity(graph.len());
    let mut cyclic = BTreeSet::new();

    for start in graph.cards() {
        if state.contains_key(start.id.as_str()) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut current = Some(start);
        while let Some(card) = current {
            let id = card.id.as_str();
            match state.get(id) {
                Some(Walk::Done) => break,
                Some(Walk::OnPath) => {
                    if let Some(pos) = path.iter().position(|p| *p == id) {
                        cyclic.extend(path[pos..].iter().map(|p| p.to_string()));
                    }
                    break;
                }
                None => {
                    state.insert(id, Walk::OnPath);
                    path.push(id);
                    current = graph.outgoing(id);
                }
            }
        }
        for id in path {
            state.insert(id, Walk::Done);
        }
    }

    cyclic
}
