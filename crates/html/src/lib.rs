//! Live document model for the annotation engine.
//!
//! A [`Document`] is an arena of nodes addressed by [`NodeKey`], exposing
//! the handful of browser DOM primitives the engine relies on (text
//! splitting, child replacement, attribute access) plus subtree mutation
//! observation through bounded queues.

pub mod dom_utils;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod traverse;

mod dom_builder;
mod dom_store;
mod mutation;
mod types;

pub use crate::dom_builder::NodeSpec;
pub use crate::dom_store::{Document, DomError};
pub use crate::mutation::{MutationRecord, ObserverId};
pub use crate::types::{Attribute, Node, NodeKey, NodeKind};
