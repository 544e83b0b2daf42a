//! Relationship graph engine for a catalog of linked data-field cards.
//!
//! Each card links to at most one other card. The engine answers three
//! questions about a card snapshot: which cards are connected to a root,
//! which cards are orphaned for their layer, and where to draw the
//! relationship tree rooted at a card.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
