//! The format-neutral tree value produced and consumed by `nodal_map`.
//!
//! A [`Node`] is either a *value node*, holding one [`Value`] directly, or a
//! *composite node*, holding ordered child nodes. Every node may carry a
//! name (its key inside the parent) and the path of the type it was built
//! from, which is what lets a reader rebuild typed values without knowing
//! anything about the codec that transported the tree.
//!
//! ```
//! use nodal_node::{Node, Value, ValueHint};
//!
//! let mut x = Node::with_value(Value::Int(3));
//! x.set_name("x");
//!
//! let mut point = Node::new();
//! point.set_represented_type("demo::Point");
//! point.add_child(x).unwrap();
//!
//! assert_eq!(point.value_hint(), ValueHint::Composite);
//! assert_eq!(point.child("x").and_then(Node::value), Some(&Value::Int(3)));
//! ```
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod node;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use error::NodeError;
pub use node::Node;
pub use value::{Value, ValueHint};
