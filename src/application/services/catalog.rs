//! Catalog snapshot loading
//!
//! Reads the TOML card list the storage collaborator exports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, TomlResultExt};
use crate::domain::Card;
use crate::infrastructure::traits::FileSystem;

/// An ordered card snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Catalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Serialize back to the catalog TOML format.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).serializing("catalog")
    }
}

/// Service for reading catalog snapshots.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and parse the catalog at `path`.
    pub fn load(&self, path: &Path) -> ApplicationResult<Catalog> {
        debug!("load: path={}", path.display());
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Catalog {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .at("read catalog", path)?;
        let catalog = Self::parse(&content, path)?;
        debug!("load: {} cards", catalog.len());
        Ok(catalog)
    }

    /// Parse catalog TOML. `path` is only used for error messages.
    ///
    /// Cards with a blank id are rejected; duplicate ids are kept and logged.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Catalog> {
        let catalog: Catalog = toml::from_str(content).map_err(|e| ApplicationError::Catalog {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        for (pos, card) in catalog.cards.iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(ApplicationError::Catalog {
                    path: PathBuf::from(path),
                    message: format!("card #{} ({:?}) has an empty id", pos + 1, card.field),
                });
            }
            if !seen.insert(card.id.as_str()) {
                warn!("{}: duplicate card id {:?}", path.display(), card.id);
            }
        }

        Ok(catalog)
    }
}
