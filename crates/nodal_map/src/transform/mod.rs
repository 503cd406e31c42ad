//! Conversions between values and [`Node`]s.
//!
//! - [`Transformer`]: the conversion interface, resolved per type or per
//!   member through the [`TypeRegistry`].
//! - [`GenericObjectTransformer`]: the fallback for any registered type,
//!   driven by its [`TypeInfo`](crate::info::TypeInfo).
//! - [`ValueTransformer`], [`OptionTransformer`], [`SequenceTransformer`]:
//!   leaf values, `Option<T>` and `Vec<T>`.

use alloc::boxed::Box;

use nodal_node::Node;

use crate::TransformError;
use crate::reflect::Reflect;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// Modules

mod generic;
mod option;
mod sequence;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use generic::GenericObjectTransformer;
pub use option::OptionTransformer;
pub use sequence::SequenceTransformer;
pub use value::{ValueTransformer, ValueType};

// -----------------------------------------------------------------------------
// MapContext

/// State threaded through one forward or reverse pass.
#[derive(Debug, Clone, Copy)]
pub struct MapContext<'a> {
    registry: &'a TypeRegistry,
    depth: usize,
}

impl<'a> MapContext<'a> {
    /// A context for the root value of a pass.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry, depth: 0 }
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// How many values enclose the one being mapped.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// The context for a child value.
    #[inline]
    pub const fn nested(&self) -> Self {
        Self {
            registry: self.registry,
            depth: self.depth + 1,
        }
    }
}

// -----------------------------------------------------------------------------
// Transformer

/// Converts values of one type (or one member) to and from [`Node`]s.
///
/// `None` stands for an absent value on both sides: `to_node(None, _)`
/// should produce a null node and `from_node` of a null node should return
/// `Ok(None)`.
///
/// # Examples
///
/// ```
/// use nodal_map::{MapContext, Reflect, TransformError, Transformer, TypeRegistry};
/// use nodal_node::{Node, Value};
///
/// /// Stores booleans as "yes" / "no".
/// struct YesNo;
///
/// impl Transformer for YesNo {
///     fn to_node(&self, value: Option<&dyn Reflect>, _: &MapContext<'_>) -> Result<Node, TransformError> {
///         Ok(match value.and_then(|v| v.downcast_ref::<bool>()) {
///             Some(true) => Node::with_value(Value::from("yes")),
///             Some(false) => Node::with_value(Value::from("no")),
///             None => Node::null(),
///         })
///     }
///
///     fn from_node(&self, node: &Node, _: &MapContext<'_>) -> Result<Option<Box<dyn Reflect>>, TransformError> {
///         match node.value().and_then(Value::as_str) {
///             Some(text) => Ok(Some(Box::new(text == "yes"))),
///             None => Ok(None),
///         }
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_transformer::<bool>(YesNo);
///
/// let cx = MapContext::new(&registry);
/// let node = registry.get(core::any::TypeId::of::<bool>()).to_node(Some(&true), &cx).unwrap();
/// assert_eq!(node.value(), Some(&Value::from("yes")));
/// ```
pub trait Transformer: Send + Sync + 'static {
    /// Forward pass: builds the node for `value`.
    fn to_node(
        &self,
        value: Option<&dyn Reflect>,
        cx: &MapContext<'_>,
    ) -> Result<Node, TransformError>;

    /// Reverse pass: rebuilds a value from `node`.
    fn from_node(
        &self,
        node: &Node,
        cx: &MapContext<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, TransformError>;
}
