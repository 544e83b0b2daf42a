//! Orphan classification against the endpoint/throughpoint taxonomy.

use crate::domain::entities::{Card, LayerKind, LayerTaxonomy, OrphanMode};
use crate::domain::link_graph::LinkGraph;

/// Orphan flags for a single card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrphanStatus {
    /// Endpoint-layer card with no incoming link
    pub orphan_endpoint: bool,
    /// Throughpoint-layer card with no outgoing link
    pub orphan_throughpoint: bool,
}

impl OrphanStatus {
    pub fn is_orphan(&self) -> bool {
        self.orphan_endpoint || self.orphan_throughpoint
    }

    pub fn matches(&self, mode: OrphanMode) -> bool {
        match mode {
            OrphanMode::Endpoints => self.orphan_endpoint,
            OrphanMode::Throughpoints => self.orphan_throughpoint,
        }
    }
}

/// Classify `card` within the snapshot indexed by `graph`.
///
/// A dangling link still counts as an outgoing link; a self-link does not
/// count as incoming.
pub fn classify(card: &Card, graph: &LinkGraph<'_>, taxonomy: &LayerTaxonomy) -> OrphanStatus {
    match taxonomy.kind_of(&card.layer) {
        Some(LayerKind::Endpoint) => OrphanStatus {
            orphan_endpoint: graph.in_degree(&card.id) == 0,
            orphan_throughpoint: false,
        },
        Some(LayerKind::Throughpoint) => OrphanStatus {
            orphan_endpoint: false,
            orphan_throughpoint: card.link().is_none(),
        },
        None => OrphanStatus::default(),
    }
}

/// Cards matching the orphan predicate for `mode`, in collection order.
pub fn filter_orphans<'a>(
    mode: OrphanMode,
    cards: &'a [Card],
    taxonomy: &LayerTaxonomy,
) -> Vec<&'a Card> {
    orphans_in(&LinkGraph::new(cards), mode, taxonomy)
}

/// Same as [`filter_orphans`] over a prebuilt index.
pub fn orphans_in<'a>(
    graph: &LinkGraph<'a>,
    mode: OrphanMode,
    taxonomy: &LayerTaxonomy,
) -> Vec<&'a Card> {
    graph
        .cards()
        .iter()
        .filter(|card| classify(card, graph, taxonomy).matches(mode))
        .collect()
}
