//! Bidirectional mapping between typed values and format-neutral trees.
//!
//! - [`node`]: the [`Node`](node::Node) tree itself.
//! - [`map`]: type registration and the forward/reverse passes.
//! - [`utils`]: hash containers shared by both.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use nodal_map as map;
pub use nodal_node as node;
pub use nodal_utils as utils;
