//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogService, RelationshipService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::TreeLayoutEngine;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.fs))
    }

    /// Relationship service configured from settings.
    ///
    /// Fails if the configured taxonomy lists a layer in both buckets.
    pub fn relationship_service(&self) -> ApplicationResult<RelationshipService> {
        let taxonomy = self.settings.taxonomy()?;
        let engine = TreeLayoutEngine::new(self.settings.layout);
        Ok(RelationshipService::new(taxonomy, engine))
    }
}
