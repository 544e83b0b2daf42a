//! Domain entities: cards and the layer taxonomy.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Card identifier. Opaque to the engine.
pub type CardId = String;

/// A named data field in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable unique identifier
    pub id: CardId,
    /// Display name
    pub field: String,
    /// Key into the layer taxonomy
    #[serde(default)]
    pub layer: String,
    /// Id of the card this one links to (single outgoing edge)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_to: Option<CardId>,
    /// Where the data value lives (e.g. `crm.customers.email`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Declared type of the data value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, field: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            layer: layer.into(),
            linked_to: None,
            location: None,
            data_type: None,
            description: None,
        }
    }

    /// Builder-style setter for the outgoing link.
    pub fn linked_to(mut self, target: impl Into<CardId>) -> Self {
        self.linked_to = Some(target.into());
        self
    }

    /// The outgoing link target, if any.
    ///
    /// Empty or whitespace-only values count as no link.
    pub fn link(&self) -> Option<&str> {
        self.linked_to
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.id)
    }
}

/// Taxonomy bucket a layer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Terminal destination of data
    Endpoint,
    /// Intermediate pass-through point
    Throughpoint,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Endpoint => write!(f, "endpoint"),
            LayerKind::Throughpoint => write!(f, "throughpoint"),
        }
    }
}

/// Mapping from layer key to its taxonomy bucket.
///
/// Keys not present are "neither" and never produce orphans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerTaxonomy {
    layers: BTreeMap<String, LayerKind>,
}

impl LayerTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a taxonomy from the two buckets.
    ///
    /// A key listed in both buckets is rejected.
    pub fn from_buckets<E, T>(endpoints: E, throughpoints: T) -> Result<Self, DomainError>
    where
        E: IntoIterator,
        E::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let mut taxonomy = Self::new();
        for key in endpoints {
            taxonomy.register(key, LayerKind::Endpoint)?;
        }
        for key in throughpoints {
            taxonomy.register(key, LayerKind::Throughpoint)?;
        }
        Ok(taxonomy)
    }

    /// Register a layer key. Re-registering with the same kind is a no-op.
    pub fn register(&mut self, key: impl Into<String>, kind: LayerKind) -> Result<(), DomainError> {
        let key = key.into();
        match self.layers.get(&key) {
            Some(existing) if *existing != kind => Err(DomainError::AmbiguousLayer { key }),
            _ => {
                self.layers.insert(key, kind);
                Ok(())
            }
        }
    }

    pub fn kind_of(&self, key: &str) -> Option<LayerKind> {
        self.layers.get(key).copied()
    }

    pub fn is_endpoint(&self, key: &str) -> bool {
        self.kind_of(key) == Some(LayerKind::Endpoint)
    }

    pub fn is_throughpoint(&self, key: &str) -> bool {
        self.kind_of(key) == Some(LayerKind::Throughpoint)
    }

    /// Layer keys of the given kind, sorted.
    pub fn keys(&self, kind: LayerKind) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Which orphan predicate a filter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrphanMode {
    /// Endpoint-layer cards nothing links to
    Endpoints,
    /// Throughpoint-layer cards that link nowhere
    Throughpoints,
}

impl OrphanMode {
    pub fn layer_kind(self) -> LayerKind {
        match self {
            OrphanMode::Endpoints => LayerKind::Endpoint,
            OrphanMode::Throughpoints => LayerKind::Throughpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_link_when_reading_link_then_none() {
        let card = Card::new("a", "alpha", "api").linked_to("   ");
        assert_eq!(card.link(), None);
    }

    #[test]
    fn given_padded_link_when_reading_link_then_trimmed() {
        let card = Card::new("a", "alpha", "api").linked_to(" b ");
        assert_eq!(card.link(), Some("b"));
    }

    #[test]
    fn given_key_in_both_buckets_when_building_taxonomy_then_ambiguous() {
        let result = LayerTaxonomy::from_buckets(["database"], ["api", "database"]);
        assert!(matches!(
            result,
            Err(DomainError::AmbiguousLayer { ref key }) if key == "database"
        ));
    }

    #[test]
    fn given_duplicate_key_same_kind_when_registering_then_accepted() {
        let taxonomy = LayerTaxonomy::from_buckets(["database", "database"], ["api"]).unwrap();
        assert_eq!(taxonomy.keys(LayerKind::Endpoint), vec!["database"]);
        assert_eq!(taxonomy.kind_of("api"), Some(LayerKind::Throughpoint));
        assert_eq!(taxonomy.kind_of("unknown"), None);
    }
}
