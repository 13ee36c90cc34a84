//! Network model: the mutable actor graph and the immutable resource table.

pub mod attributes;
pub mod graph;

pub use attributes::{AttributeRow, AttributeTable, AttributeVector, Resource, ResourceSet};
pub use graph::{Network, NetworkError, NodeId};
