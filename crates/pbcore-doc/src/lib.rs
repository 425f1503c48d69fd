//! Mutable element trees for template documents.
//!
//! A [`Document`] is one fresh instance of a template, owned by the
//! driver for the duration of a single record. Nodes are addressed by
//! positional [`DocPath`] expressions, so removal is deferred: lookups
//! schedule nodes into a [`PendingRemovals`] set, and [`Document::prune`]
//! consumes the set once every lookup for the record is done.

pub mod error;
pub mod path;
pub mod tree;

pub use error::DocError;
pub use path::DocPath;
pub use tree::{Document, NodeId, PendingRemovals};
