use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::info::TypeInfo;
use crate::reflect::Typed;
use crate::registry::TypeRegistry;
use crate::transform::Transformer;

// -----------------------------------------------------------------------------
// TypeMeta

/// Registry entry of one type: its capability table and, optionally, the
/// transformer that handles it instead of the generic one.
#[derive(Clone)]
pub struct TypeMeta {
    info: TypeInfo,
    transformer: Option<Arc<dyn Transformer>>,
}

impl TypeMeta {
    /// An entry without a dedicated transformer.
    #[inline]
    pub fn new(info: TypeInfo) -> Self {
        Self {
            info,
            transformer: None,
        }
    }

    /// Builder-style [`set_transformer`](Self::set_transformer).
    #[inline]
    pub fn with_transformer(mut self, transformer: impl Transformer) -> Self {
        self.set_transformer(transformer);
        self
    }

    #[inline]
    pub fn set_transformer(&mut self, transformer: impl Transformer) {
        self.transformer = Some(Arc::new(transformer));
    }

    #[inline]
    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.info.ty_id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.info.type_path()
    }

    /// The dedicated transformer, if one was registered.
    #[inline]
    pub fn transformer(&self) -> Option<&dyn Transformer> {
        self.transformer.as_deref()
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("info", &self.info)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Declares the registry entry of a type.
///
/// # Examples
///
/// ```
/// use nodal_map::info::{Member, TypeInfo};
/// use nodal_map::{GetTypeMeta, TypeMeta, TypeRegistry, Typed};
///
/// #[derive(Default)]
/// struct Point { x: i32, y: i32 }
/// impl Typed for Point {
///     fn type_path() -> &'static str {
///         "demo::Point"
///     }
/// }
///
/// impl GetTypeMeta for Point {
///     fn get_type_meta() -> TypeMeta {
///         TypeMeta::new(
///             TypeInfo::builder::<Self>()
///                 .member(Member::public::<Self, i32>("x", |p| &p.x, |p| &mut p.x))
///                 .member(Member::public::<Self, i32>("y", |p| &p.y, |p| &mut p.y))
///                 .with_default()
///                 .build(),
///         )
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
/// assert!(registry.get_with_type_path(Point::type_path()).is_some());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot be registered",
    note = "declare the members of `{Self}` with `TypeInfo::builder`"
)]
pub trait GetTypeMeta: Typed {
    fn get_type_meta() -> TypeMeta;

    /// Registers the types this type's members and methods refer to.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
