//! Tests for CatalogService loading and parsing

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use cardmap::application::services::{Catalog, CatalogService};
use cardmap::application::ApplicationError;
use cardmap::domain::Card;
use cardmap::infrastructure::traits::{FileSystem, RealFileSystem};
use cardmap::util::testing::{init_test_setup, pipeline_cards};

/// In-memory filesystem for tests that must not touch disk
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.create_new(Path::new(path), content).unwrap();
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

const CATALOG: &str = r#"
[[cards]]
id = "email_col"
field = "users.email"
layer = "database"
location = "crm.users.email"
data_type = "varchar(255)"

[[cards]]
id = "email_param"
field = "POST /signup email"
layer = "api"
linked_to = "email_col"
"#;

#[test]
fn given_catalog_file_when_loading_then_cards_in_file_order() {
    // Arrange
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.toml");
    std::fs::write(&path, CATALOG).unwrap();
    let service = CatalogService::new(Arc::new(RealFileSystem));

    // Act
    let catalog = service.load(&path).unwrap();

    // Assert
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.cards()[0].id, "email_col");
    assert_eq!(
        catalog.cards()[0].location.as_deref(),
        Some("crm.users.email")
    );
    assert_eq!(catalog.cards()[1].link(), Some("email_col"));
}

#[test]
fn given_missing_file_when_loading_then_catalog_error() {
    let temp = TempDir::new().unwrap();
    let service = CatalogService::new(Arc::new(RealFileSystem));

    let result = service.load(&temp.path().join("absent.toml"));

    assert!(matches!(result, Err(ApplicationError::Catalog { .. })));
}

#[test]
fn given_in_memory_catalog_when_loading_then_parsed_without_disk() {
    let fs = MemoryFileSystem::with_file("/virtual/catalog.toml", CATALOG);
    let service = CatalogService::new(Arc::new(fs));

    let catalog = service.load(Path::new("/virtual/catalog.toml")).unwrap();

    assert_eq!(catalog.len(), 2);
}

#[test]
fn given_malformed_toml_when_parsing_then_error_names_path() {
    let result = CatalogService::parse("[[cards]\nid = ", Path::new("broken.toml"));

    match result {
        Err(ApplicationError::Catalog { path, .. }) => assert_eq!(path, PathBuf::from("broken.toml")),
        other => panic!("expected catalog error, got {other:?}"),
    }
}

#[test]
fn given_blank_id_when_parsing_then_rejected() {
    let content = r#"
[[cards]]
id = "  "
field = "nameless"
"#;

    let result = CatalogService::parse(content, Path::new("catalog.toml"));

    assert!(matches!(result, Err(ApplicationError::Catalog { .. })));
}

#[test]
fn given_duplicate_ids_when_parsing_then_both_kept() {
    let content = r#"
[[cards]]
id = "dup"
field = "first"

[[cards]]
id = "dup"
field = "second"
"#;

    let catalog = CatalogService::parse(content, Path::new("catalog.toml")).unwrap();

    assert_eq!(catalog.len(), 2);
}

#[test]
fn given_empty_file_when_parsing_then_empty_catalog() {
    let catalog = CatalogService::parse("", Path::new("catalog.toml")).unwrap();

    assert!(catalog.is_empty());
}

#[test]
fn given_catalog_when_written_as_toml_then_reloads_same_cards() {
    let cards: Vec<Card> = pipeline_cards();
    let catalog = Catalog::new(cards.clone());

    let content = catalog.to_toml().unwrap();
    let reloaded = CatalogService::parse(&content, Path::new("catalog.toml")).unwrap();

    assert_eq!(reloaded.cards(), cards.as_slice());
}
