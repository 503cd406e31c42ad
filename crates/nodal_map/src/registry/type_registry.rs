use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use nodal_utils::TypeIdMap;
use nodal_utils::hash::{FixedHashState, HashMap};

use crate::info::{Member, TypeInfo};
use crate::reflect::Typed;
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::transform::{GenericObjectTransformer, Transformer};

// -----------------------------------------------------------------------------
// TypeRegistry

/// Maps types and members to the [`Transformer`] that handles them.
///
/// Lookups resolve, in order: a transformer registered for the exact member,
/// a transformer registered for the exact type, then the
/// [`GenericObjectTransformer`]. Registration takes `&mut self`; once the
/// registry is shared (usually as `Arc<TypeRegistry>` inside a
/// [`Mapper`](crate::Mapper)) it is only read.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use nodal_map::{TypeRegistry, Typed};
///
/// let mut registry = TypeRegistry::new();
/// registry.register_alias::<i32>("int");
///
/// let meta = registry.resolve_type_path("int").unwrap();
/// assert_eq!(meta.ty_id(), TypeId::of::<i32>());
/// assert!(registry.get_with_type_path("int").is_none());
/// assert!(registry.contains(TypeId::of::<String>()));
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    alias_to_id: HashMap<String, TypeId>,
    member_transformers: HashMap<(TypeId, &'static str), Arc<dyn Transformer>>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any entry.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            alias_to_id: HashMap::with_hasher(FixedHashState),
            member_transformers: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Creates a registry holding the leaf value types.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i64` `isize`
    /// - `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    /// Registers `T` and, recursively, its dependencies.
    ///
    /// Does nothing if `T` is already registered. Use
    /// [`insert_type_meta`](Self::insert_type_meta) to overwrite an entry.
    pub fn register<T: GetTypeMeta>(&mut self) {
        let inserted = self.type_meta_table.try_insert(TypeId::of::<T>(), || {
            let meta = T::get_type_meta();
            log::trace!("registering `{}`", meta.type_path());
            self.type_path_to_id.insert(meta.type_path(), meta.ty_id());
            meta
        });
        if inserted {
            T::register_dependencies(self);
        }
    }

    /// Inserts or **overwrites** an entry. Dependencies are not registered.
    pub fn insert_type_meta(&mut self, meta: TypeMeta) {
        self.type_path_to_id.insert(meta.type_path(), meta.ty_id());
        self.type_meta_table.insert(meta.ty_id(), meta);
    }

    /// Sets the transformer used for every value of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    pub fn register_transformer<T: Typed>(&mut self, transformer: impl Transformer) {
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(meta) => meta.set_transformer(transformer),
            None => panic!(
                "Called `TypeRegistry::register_transformer`, but the type `{}` is not registered",
                T::type_path(),
            ),
        }
    }

    /// Sets the transformer used for the member `member` of `T`, taking
    /// precedence over the transformer of the member's type.
    pub fn register_member_transformer<T: Typed>(
        &mut self,
        member: &'static str,
        transformer: impl Transformer,
    ) {
        self.member_transformers
            .insert((TypeId::of::<T>(), member), Arc::new(transformer));
    }

    /// Makes `alias` resolve to the registered type `T`.
    ///
    /// Aliases let trees produced elsewhere name types their own way, e.g.
    /// `"int"` for `i32`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    pub fn register_alias<T: Typed>(&mut self, alias: impl Into<String>) {
        let type_id = TypeId::of::<T>();
        if !self.contains(type_id) {
            panic!(
                "Called `TypeRegistry::register_alias`, but the type `{}` is not registered",
                T::type_path(),
            );
        }
        self.alias_to_id.insert(alias.into(), type_id);
    }

    // -------------------------------------------------------------------------
    // Lookups

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get_meta(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Looks an entry up by its exact type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get_meta(*id),
            None => None,
        }
    }

    /// Looks an entry up by type path, then by alias.
    pub fn resolve_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.get_with_type_path(type_path).or_else(|| {
            let id = self.alias_to_id.get(type_path)?;
            self.get_meta(*id)
        })
    }

    /// Iterates over all entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    // -------------------------------------------------------------------------
    // Transformer resolution

    /// Returns the transformer for values of the type `type_id`.
    pub fn get(&self, type_id: TypeId) -> &dyn Transformer {
        self.get_meta(type_id)
            .and_then(TypeMeta::transformer)
            .unwrap_or(&GenericObjectTransformer)
    }

    /// Returns the transformer for the member `member` of `owner`.
    pub fn get_member(&self, owner: &TypeInfo, member: &Member) -> &dyn Transformer {
        match self.member_transformers.get(&(owner.ty_id(), member.name())) {
            Some(transformer) => &**transformer,
            None => self.get(member.ty_id()),
        }
    }

    /// Returns the transformer for nodes tagged with `represented`.
    ///
    /// Untagged or unknown paths get the generic transformer, which reports
    /// the problem if the node is not null.
    pub fn get_represented(&self, represented: Option<&str>) -> &dyn Transformer {
        represented
            .and_then(|path| self.resolve_type_path(path))
            .and_then(TypeMeta::transformer)
            .unwrap_or(&GenericObjectTransformer)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}
