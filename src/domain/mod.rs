//! Domain layer: catalog entities and the relationship graph engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Every operation is a pure function of the card snapshot it is given.

pub mod arena;
pub mod connectivity;
pub mod curve;
pub mod entities;
pub mod error;
pub mod layout;
pub mod link_graph;
pub mod orphans;

pub use arena::{LayoutArena, LayoutNode};
pub use connectivity::{connected_ids, cyclic_ids, link_trail, reachable_from, LinkTrail, TrailEnd};
pub use curve::{Curve, Point};
pub use entities::*;
pub use error::DomainError;
pub use layout::{Connector, LayoutConfig, LayoutReport, Placement, TreeLayout, TreeLayoutEngine};
pub use link_graph::LinkGraph;
pub use orphans::{classify, filter_orphans, orphans_in, OrphanStatus};
