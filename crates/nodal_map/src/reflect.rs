use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::TransformError;

// -----------------------------------------------------------------------------
// Typed

/// Static type facts used by the mapping engine.
///
/// Every type that crosses the mapper implements this trait. The declared
/// [`type_path`](Self::type_path) is persisted in the trees, so it must stay
/// the same across builds and compiler versions. The other methods have
/// defaults; override them only to change how absence or boxed values are
/// handled, as `Option<T>` does.
///
/// Generic types compose their path from their parameters' paths and keep
/// it in a [`GenericTypePathCell`](crate::GenericTypePathCell).
///
/// # Examples
///
/// ```
/// use nodal_map::Typed;
///
/// struct Point;
/// impl Typed for Point {
///     fn type_path() -> &'static str {
///         "demo::Point"
///     }
/// }
///
/// assert_eq!(Point::type_path(), "demo::Point");
/// assert_eq!(Point::type_name(), "Point");
/// assert!(Point::accepts_represented(Some(Point::type_path())));
/// assert!(Point::absent().is_none());
/// ```
pub trait Typed: Any + Send + Sync {
    /// The full path of the type, written into
    /// [`Node::represented_type`](nodal_node::Node::represented_type).
    fn type_path() -> &'static str;

    /// The last segment of [`type_path`](Self::type_path), for messages.
    #[inline]
    fn type_name() -> &'static str {
        short_type_name(Self::type_path())
    }

    /// Whether a node tagged with `represented` can be fed to a mutator
    /// taking this type.
    ///
    /// Untagged nodes are accepted, the transformer decides later.
    #[inline]
    fn accepts_represented(represented: Option<&str>) -> bool {
        represented.is_none_or(|path| path == Self::type_path())
    }

    /// The value an absent (null) node stands for, if this type has one.
    #[inline]
    fn absent() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    /// Takes a reconstructed value back into this type.
    #[inline]
    fn from_reflect(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>>
    where
        Self: Sized,
    {
        value.downcast::<Self>().map(|boxed| *boxed)
    }
}

/// Strips the module path (and generic arguments) off a type path.
pub(crate) fn short_type_name(path: &'static str) -> &'static str {
    let head = path.find('<').map_or(path, |end| &path[..end]);
    match head.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

// -----------------------------------------------------------------------------
// Reflect

/// Object-safe view of a [`Typed`] value.
///
/// Implemented for every `Typed` type; transformers work exclusively on
/// `&dyn Reflect` and `Box<dyn Reflect>`.
pub trait Reflect: Any + Send + Sync {
    /// Returns the [`Typed::type_path`] of the concrete type.
    fn reflect_type_path(&self) -> &'static str;
}

impl<T: Typed> Reflect for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        T::type_path()
    }
}

impl dyn Reflect {
    /// Returns the [`TypeId`] of the concrete type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    #[inline]
    pub fn is<T: Typed>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Typed>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Typed>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }

    /// Downcasts a boxed value, handing it back unchanged on failure.
    pub fn downcast<T: Typed>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            // Checked above.
            Ok(any.downcast::<T>().unwrap_or_else(|_| unreachable!()))
        } else {
            Err(self)
        }
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect<{}>", self.reflect_type_path())
    }
}

/// Turns the output of [`Transformer::from_node`](crate::Transformer::from_node)
/// into a concrete `T`.
///
/// `None` becomes [`Typed::absent`], so a null node only fits types that have
/// an absent value.
pub fn take_value<T: Typed>(value: Option<Box<dyn Reflect>>) -> Result<T, TransformError> {
    match value {
        Some(value) => T::from_reflect(value)
            .map_err(|value| TransformError::mismatch(T::type_path(), value.reflect_type_path())),
        None => T::absent().ok_or_else(|| TransformError::mismatch(T::type_path(), "null")),
    }
}
