use thiserror::Error;

use crate::{Value, ValueHint};

/// Violations of the value-node / composite-node split, and of the
/// uniqueness of child names.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum NodeError {
    #[error("cannot add a child to a value node holding a {0} value")]
    ChildOnValueNode(ValueHint),

    #[error("cannot store a value in a composite node with {0} children")]
    ValueOnCompositeNode(usize),

    #[error("a child named `{0}` already exists")]
    DuplicateChild(Value),
}
