//! Relationship queries over a card snapshot
//!
//! Wires the taxonomy and layout constants from settings to the domain
//! engine. Every call rebuilds the link index from the snapshot it is given.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{
    cyclic_ids, link_trail, orphans_in, reachable_from, Card, CardId, LayerTaxonomy, LinkGraph,
    LinkTrail, OrphanMode, TreeLayout, TreeLayoutEngine,
};

/// Which cards a listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardFilter {
    #[default]
    All,
    /// Cards weakly connected to the given root
    Connected(CardId),
    /// Orphans of the given kind
    Orphans(OrphanMode),
}

/// Link health of a snapshot. Reported, never repaired.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics<'a> {
    /// Cards linking to an id that is not in the snapshot
    pub dangling: Vec<&'a Card>,
    /// Ids of cards on a link cycle
    pub cyclic: BTreeSet<CardId>,
    /// Layer keys used by cards but absent from the taxonomy
    pub unregistered_layers: BTreeSet<String>,
}

impl Diagnostics<'_> {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.cyclic.is_empty()
    }
}

/// Service answering relationship questions about a catalog.
pub struct RelationshipService {
    taxonomy: LayerTaxonomy,
    engine: TreeLayoutEngine,
}

impl RelationshipService {
    pub fn new(taxonomy: LayerTaxonomy, engine: TreeLayoutEngine) -> Self {
        Self { taxonomy, engine }
    }

    pub fn taxonomy(&self) -> &LayerTaxonomy {
        &self.taxonomy
    }

    /// Cards selected by `filter`, in collection order.
    pub fn apply_filter<'a>(&self, cards: &'a [Card], filter: &CardFilter) -> Vec<&'a Card> {
        debug!("apply_filter: {:?} over {} cards", filter, cards.len());
        let graph = LinkGraph::new(cards);
        match filter {
            CardFilter::All => cards.iter().collect(),
            CardFilter::Connected(root) => {
                let ids = reachable_from(&graph, root);
                cards
                    .iter()
                    .filter(|card| ids.contains(&card.id))
                    .collect()
            }
            CardFilter::Orphans(mode) => orphans_in(&graph, *mode, &self.taxonomy),
        }
    }

    pub fn connected(&self, cards: &[Card], root: &str) -> BTreeSet<CardId> {
        reachable_from(&LinkGraph::new(cards), root)
    }

    pub fn orphans<'a>(&self, cards: &'a [Card], mode: OrphanMode) -> Vec<&'a Card> {
        orphans_in(&LinkGraph::new(cards), mode, &self.taxonomy)
    }

    /// Positioned relationship tree, `None` if `root` is not in `cards`.
    pub fn layout<'a>(&self, cards: &'a [Card], root: &str) -> Option<TreeLayout<'a>> {
        self.engine.layout(root, cards)
    }

    pub fn trail<'a>(&self, cards: &'a [Card], start: &str) -> LinkTrail<'a> {
        link_trail(&LinkGraph::new(cards), start)
    }

    pub fn diagnose<'a>(&self, cards: &'a [Card]) -> Diagnostics<'a> {
        let graph = LinkGraph::new(cards);
        let unregistered_layers = cards
            .iter()
            .filter(|card| !card.layer.is_empty())
            .filter(|card| self.taxonomy.kind_of(&card.layer).is_none())
            .map(|card| card.layer.clone())
            .collect();

        Diagnostics {
            dangling: graph.dangling(),
            cyclic: cyclic_ids(&graph),
            unregistered_layers,
        }
    }
}
