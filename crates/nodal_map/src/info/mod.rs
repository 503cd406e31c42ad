//! Statically declared capability tables.
//!
//! A [`TypeInfo`] lists the members and methods of one type together with
//! its capability markers and construction strategies. It is produced once,
//! by a [`GetTypeMeta`](crate::GetTypeMeta) implementation, and read by the
//! [`inspect`](crate::inspect) queries during every pass.

// -----------------------------------------------------------------------------
// Modules

mod member;
mod method;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use member::{Member, MemberFlags, Visibility};
pub use method::{Method, MethodKind};
pub use type_info::{TypeInfo, TypeInfoBuilder};

// -----------------------------------------------------------------------------
// Marker

/// A declared fact that steers the mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The type opts into method-based strategies.
    Aggregate,
    /// A getter bound to a member name.
    ExplicitAccessor,
    /// A setter bound to a member name.
    ExplicitMutator,
    /// The member is excluded from mapping.
    Ignore,
    /// The member's value is the node name.
    Identifier,
}

/// Anything that can carry [`Marker`]s.
pub trait Marked {
    fn has_marker(&self, marker: Marker) -> bool;
}
