//! Read-only link index over a card snapshot.
//!
//! Each card has at most one outgoing link and any number of incoming links.
//! The forward map (id -> card) and the reverse multimap (target id -> linking
//! cards) are built once here and shared by connectivity, orphan
//! classification and layout.

use std::collections::HashMap;

use tracing::{instrument, warn};

use crate::domain::entities::Card;

/// Index over a borrowed card collection.
#[derive(Debug)]
pub struct LinkGraph<'a> {
    cards: &'a [Card],
    /// id -> position in `cards`, first occurrence wins
    by_id: HashMap<&'a str, usize>,
    /// link target id -> positions of linking cards, in collection order.
    /// Only cards that win their id lookup contribute edges.
    incoming: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LinkGraph<'a> {
    #[instrument(level = "trace", skip(cards), fields(cards = cards.len()))]
    pub fn new(cards: &'a [Card]) -> Self {
        let mut by_id = HashMap::with_capacity(cards.len());
        let mut incoming: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (pos, card) in cards.iter().enumerate() {
            if by_id.contains_key(card.id.as_str()) {
                // Shadowed duplicates are not nodes, so their links are not edges
                warn!("duplicate card id {:?} at position {}, keeping first", card.id, pos);
                continue;
            }
            by_id.insert(card.id.as_str(), pos);
            if let Some(target) = card.link() {
                incoming.entry(target).or_default().push(pos);
            }
        }

        Self {
            cards,
            by_id,
            incoming,
        }
    }

    /// The underlying snapshot, in collection order.
    pub fn cards(&self) -> &'a [Card] {
        self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&'a Card> {
        self.by_id.get(id).map(|&pos| &self.cards[pos])
    }

    /// The card `id` links to, if the link exists and resolves.
    pub fn outgoing(&self, id: &str) -> Option<&'a Card> {
        self.get(id)
            .and_then(Card::link)
            .and_then(|target| self.get(target))
    }

    /// Cards whose link points at `id`, in collection order.
    ///
    /// Includes `id` itself when it links to itself.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &'a Card> + '_ {
        let cards = self.cards;
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &cards[pos])
    }

    /// Number of other cards linking to `id`. Self-links are not counted.
    pub fn in_degree(&self, id: &str) -> usize {
        self.incoming(id).filter(|card| card.id != id).count()
    }

    /// Cards whose link target is not in the snapshot. Shadowed duplicates are skipped.
    pub fn dangling(&self) -> Vec<&'a Card> {
        self.cards
            .iter()
            .enumerate()
            .filter(|&(pos, card)| self.by_id.get(card.id.as_str()) == Some(&pos))
            .map(|(_, card)| card)
            .filter(|card| matches!(card.link(), Some(target) if !self.contains(target)))
            .collect()
    }
}
