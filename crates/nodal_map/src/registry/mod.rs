//! Type registration and transformer lookup.
//!
//! - [`TypeMeta`]: a [`TypeInfo`](crate::info::TypeInfo) plus an optional
//!   dedicated [`Transformer`](crate::Transformer).
//! - [`GetTypeMeta`]: declares the `TypeMeta` of a type.
//! - [`TypeRegistry`]: stores `TypeMeta`s and resolves transformers by type,
//!   by member, by type path and by alias.

// -----------------------------------------------------------------------------
// Modules

mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
