//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod catalog;
mod relationship;

pub use catalog::{Catalog, CatalogService};
pub use relationship::{CardFilter, Diagnostics, RelationshipService};
