use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::marker::PhantomData;

use crate::info::{Marked, Marker, Member, Method, MethodKind};
use crate::instantiate::Instantiator;
use crate::reflect::Typed;
use crate::registry::GetTypeMeta;
use crate::BoxError;

// -----------------------------------------------------------------------------
// TypeInfo

/// The capability table of one type.
///
/// `members` and `methods` are already flattened: members and methods of
/// every type named in [`TypeInfoBuilder::extends`] follow the type's own
/// ones, and a descendant's declaration hides an ancestor's declaration of
/// the same name.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    ty_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    aggregate: bool,
    members: Box<[Member]>,
    methods: Box<[Method]>,
    instantiator: Instantiator,
}

impl TypeInfo {
    /// Starts a capability table for `T`.
    #[inline]
    pub fn builder<T: Typed>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder::new()
    }

    /// A table with no members, methods, or construction strategy, for types
    /// handled entirely by a dedicated transformer.
    #[inline]
    pub fn opaque<T: Typed>() -> Self {
        TypeInfoBuilder::<T>::new().build()
    }

    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn type_is<T: Typed>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    #[inline]
    pub fn is_aggregate(&self) -> bool {
        self.aggregate
    }

    /// All members, own and inherited.
    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name() == name)
    }

    /// All methods, own and inherited.
    #[inline]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    #[inline]
    pub fn instantiator(&self) -> &Instantiator {
        &self.instantiator
    }
}

impl Marked for TypeInfo {
    #[inline]
    fn has_marker(&self, marker: Marker) -> bool {
        marker == Marker::Aggregate && self.aggregate
    }
}

// -----------------------------------------------------------------------------
// TypeInfoBuilder

/// Declares the capabilities of `T`.
///
/// # Examples
///
/// ```
/// use nodal_map::Typed;
/// use nodal_map::info::{Marker, Member, Method, TypeInfo};
/// use nodal_map::inspect;
///
/// #[derive(Default)]
/// struct Temperature { celsius: f64 }
/// impl Typed for Temperature {
///     fn type_path() -> &'static str {
///         "demo::Temperature"
///     }
/// }
///
/// let info = TypeInfo::builder::<Temperature>()
///     .aggregate()
///     .member(Member::private::<f64>("celsius"))
///     .method(Method::getter("getCelsius", |t: &Temperature| t.celsius))
///     .method(Method::setter("setCelsius", |t: &mut Temperature, v: f64| t.celsius = v))
///     .with_default()
///     .build();
///
/// assert!(inspect::has_marker(&info, Marker::Aggregate));
/// assert!(inspect::conventional_getter(&info, "celsius").is_some());
/// assert!(info.instantiator().create(info.type_path()).is_ok());
/// ```
pub struct TypeInfoBuilder<T> {
    aggregate: bool,
    members: Vec<Member>,
    methods: Vec<Method>,
    inherited_members: Vec<Member>,
    inherited_methods: Vec<Method>,
    instantiator: Instantiator,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Typed> TypeInfoBuilder<T> {
    fn new() -> Self {
        Self {
            aggregate: false,
            members: Vec::new(),
            methods: Vec::new(),
            inherited_members: Vec::new(),
            inherited_methods: Vec::new(),
            instantiator: Instantiator::none(),
            _marker: PhantomData,
        }
    }

    /// Marks the type as an aggregate, enabling explicit and conventional
    /// accessor/mutator strategies.
    #[inline]
    pub fn aggregate(mut self) -> Self {
        self.aggregate = true;
        self
    }

    #[inline]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[inline]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Inherits the members and methods of an embedded ancestor `B`.
    ///
    /// The ancestor's own table is already flattened, so a chain of
    /// `extends` calls reaches every level. Markers on the ancestor's type
    /// (such as [`Marker::Aggregate`]) are not inherited.
    pub fn extends<B: GetTypeMeta>(
        mut self,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        let base = B::get_type_meta();
        let info = base.info();
        self.inherited_members.extend(
            info.members()
                .iter()
                .cloned()
                .map(|member| member.project(project, project_mut)),
        );
        self.inherited_methods.extend(
            info.methods()
                .iter()
                .cloned()
                .map(|method| method.project(project, project_mut)),
        );
        self
    }

    /// Constructs through [`Default`].
    #[inline]
    pub fn with_default(mut self) -> Self
    where
        T: Default,
    {
        self.instantiator = self.instantiator.with_default::<T>();
        self
    }

    /// Constructs through a fallible argument-less constructor.
    #[inline]
    pub fn with_constructor<E>(mut self, f: fn() -> Result<T, E>) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        self.instantiator = self.instantiator.with_constructor(f);
        self
    }

    /// Supplies a blank value, used when no constructor is declared or the
    /// declared one fails.
    #[inline]
    pub fn with_bypass(mut self, f: fn() -> T) -> Self {
        self.instantiator = self.instantiator.with_bypass(f);
        self
    }

    pub fn build(self) -> TypeInfo {
        let mut members: Vec<Member> = Vec::with_capacity(self.members.len());
        for member in self.members.into_iter().chain(self.inherited_members) {
            if members.iter().all(|known| known.name() != member.name()) {
                members.push(member);
            }
        }

        // A getter hides every getter of the same name. Setters overload on
        // their parameter type.
        let mut methods: Vec<Method> = Vec::with_capacity(self.methods.len());
        for method in self.methods.into_iter().chain(self.inherited_methods) {
            let hidden = methods.iter().any(|known| {
                known.name() == method.name()
                    && known.kind() == method.kind()
                    && (method.kind() == MethodKind::Getter || known.ty_id() == method.ty_id())
            });
            if !hidden {
                methods.push(method);
            }
        }

        TypeInfo {
            ty_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            aggregate: self.aggregate,
            members: members.into_boxed_slice(),
            methods: methods.into_boxed_slice(),
            instantiator: self.instantiator,
        }
    }
}
