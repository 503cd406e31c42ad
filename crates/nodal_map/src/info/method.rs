use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::info::{Marked, Marker};
use crate::reflect::{Reflect, Typed, take_value};
use crate::{BoxError, TransformError};

// -----------------------------------------------------------------------------
// MethodKind

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Takes no argument and returns a value.
    Getter,
    /// Takes one argument.
    Setter,
}

type GetFn = Arc<dyn Fn(&dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> + Send + Sync>;

type SetFn = Arc<
    dyn Fn(&mut dyn Reflect, Option<Box<dyn Reflect>>) -> Result<(), TransformError>
        + Send
        + Sync,
>;

#[derive(Clone)]
enum Invoke {
    Get(GetFn),
    Set(SetFn),
}

// -----------------------------------------------------------------------------
// Method

/// A callable accessor or mutator declared on a type.
///
/// The method's type is the return type of a getter or the parameter type of
/// a setter. A method [bound](Self::bind) to a member name is an explicit
/// accessor (getter) or explicit mutator (setter) for that member.
///
/// # Examples
///
/// ```
/// use nodal_map::Typed;
/// use nodal_map::info::{Marker, Method, MethodKind};
///
/// #[derive(Default)]
/// struct Counter { hits: u32 }
/// impl Typed for Counter {
///     fn type_path() -> &'static str {
///         "demo::Counter"
///     }
/// }
///
/// let get = Method::getter("getHits", |c: &Counter| c.hits);
/// let set = Method::setter("setHits", |c: &mut Counter, v: u32| c.hits = v).bind("hits");
/// assert_eq!(set.kind(), MethodKind::Setter);
/// assert_eq!(set.binding(Marker::ExplicitMutator), Some("hits"));
///
/// let mut counter = Counter::default();
/// set.set(&mut counter, Some(Box::new(4_u32))).unwrap();
/// let hits = get.get(&counter).unwrap();
/// assert_eq!(hits.downcast_ref::<u32>(), Some(&4));
/// ```
#[derive(Clone)]
pub struct Method {
    name: &'static str,
    kind: MethodKind,
    ty_id: TypeId,
    type_path: &'static str,
    accepts: fn(Option<&str>) -> bool,
    binding: Option<&'static str>,
    invoke: Invoke,
}

impl Method {
    fn new<V: Typed>(name: &'static str, kind: MethodKind, invoke: Invoke) -> Self {
        Self {
            name,
            kind,
            ty_id: TypeId::of::<V>(),
            type_path: V::type_path(),
            accepts: V::accepts_represented,
            binding: None,
            invoke,
        }
    }

    /// An infallible getter on `T` returning `R`.
    pub fn getter<T: Typed, R: Typed>(name: &'static str, f: fn(&T) -> R) -> Self {
        let invoke = Invoke::Get(Arc::new(move |object: &dyn Reflect| {
            let target = receiver::<T>(object)?;
            Ok(Box::new(f(target)) as Box<dyn Reflect>)
        }));
        Self::new::<R>(name, MethodKind::Getter, invoke)
    }

    /// A getter on `T` whose failure aborts the pass.
    pub fn try_getter<T, R, E>(name: &'static str, f: fn(&T) -> Result<R, E>) -> Self
    where
        T: Typed,
        R: Typed,
        E: Into<BoxError> + 'static,
    {
        let invoke = Invoke::Get(Arc::new(move |object: &dyn Reflect| {
            let target = receiver::<T>(object)?;
            match f(target) {
                Ok(value) => Ok(Box::new(value) as Box<dyn Reflect>),
                Err(err) => Err(invocation::<T>(name, err.into())),
            }
        }));
        Self::new::<R>(name, MethodKind::Getter, invoke)
    }

    /// An infallible setter on `T` taking `P`.
    pub fn setter<T: Typed, P: Typed>(name: &'static str, f: fn(&mut T, P)) -> Self {
        let invoke = Invoke::Set(Arc::new(move |object: &mut dyn Reflect, value| {
            let found = object.reflect_type_path();
            let target = object
                .downcast_mut::<T>()
                .ok_or_else(|| TransformError::mismatch(T::type_path(), found))?;
            f(target, take_value::<P>(value)?);
            Ok(())
        }));
        Self::new::<P>(name, MethodKind::Setter, invoke)
    }

    /// A setter on `T` whose failure aborts the pass.
    pub fn try_setter<T, P, E>(name: &'static str, f: fn(&mut T, P) -> Result<(), E>) -> Self
    where
        T: Typed,
        P: Typed,
        E: Into<BoxError> + 'static,
    {
        let invoke = Invoke::Set(Arc::new(move |object: &mut dyn Reflect, value| {
            let found = object.reflect_type_path();
            let target = object
                .downcast_mut::<T>()
                .ok_or_else(|| TransformError::mismatch(T::type_path(), found))?;
            f(target, take_value::<P>(value)?).map_err(|err| invocation::<T>(name, err.into()))
        }));
        Self::new::<P>(name, MethodKind::Setter, invoke)
    }

    /// Binds the method to `member`, making it an explicit accessor or
    /// mutator depending on its kind.
    #[inline]
    pub fn bind(mut self, member: &'static str) -> Self {
        self.binding = Some(member);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// The [`TypeId`] of the returned (getter) or accepted (setter) type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Whether this setter takes values of the type a node represents.
    #[inline]
    pub fn accepts(&self, represented: Option<&str>) -> bool {
        self.kind == MethodKind::Setter && (self.accepts)(represented)
    }

    /// Returns the bound member name if the method carries `marker`.
    pub fn binding(&self, marker: Marker) -> Option<&'static str> {
        match (marker, self.kind) {
            (Marker::ExplicitAccessor, MethodKind::Getter)
            | (Marker::ExplicitMutator, MethodKind::Setter) => self.binding,
            _ => None,
        }
    }

    /// Invokes a getter.
    pub fn get(&self, object: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> {
        match &self.invoke {
            Invoke::Get(get) => (**get)(object),
            Invoke::Set(_) => Err(TransformError::Invocation {
                owner: object.reflect_type_path(),
                method: self.name,
                source: "not a getter".into(),
            }),
        }
    }

    /// Invokes a setter with a reconstructed value.
    pub fn set(
        &self,
        object: &mut dyn Reflect,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), TransformError> {
        match &self.invoke {
            Invoke::Set(set) => (**set)(object, value),
            Invoke::Get(_) => Err(TransformError::Invocation {
                owner: object.reflect_type_path(),
                method: self.name,
                source: "not a setter".into(),
            }),
        }
    }

    /// Lifts a method of `B` onto a type `T` that embeds a `B`.
    pub(crate) fn project<T: Typed, B: Typed>(
        mut self,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.invoke = match self.invoke {
            Invoke::Get(get) => Invoke::Get(Arc::new(move |object: &dyn Reflect| {
                let base = project(receiver::<T>(object)?);
                (*get)(base as &dyn Reflect)
            })),
            Invoke::Set(set) => Invoke::Set(Arc::new(move |object: &mut dyn Reflect, value| {
                let found = object.reflect_type_path();
                match object.downcast_mut::<T>() {
                    Some(target) => (*set)(project_mut(target) as &mut dyn Reflect, value),
                    None => Err(TransformError::mismatch(T::type_path(), found)),
                }
            })),
        };
        self
    }
}

fn receiver<T: Typed>(object: &dyn Reflect) -> Result<&T, TransformError> {
    object
        .downcast_ref::<T>()
        .ok_or_else(|| TransformError::mismatch(T::type_path(), object.reflect_type_path()))
}

fn invocation<T: Typed>(method: &'static str, source: BoxError) -> TransformError {
    TransformError::Invocation {
        owner: T::type_path(),
        method,
        source,
    }
}

impl Marked for Method {
    fn has_marker(&self, marker: Marker) -> bool {
        self.binding(marker).is_some()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_path", &self.type_path)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
