use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use bitflags::bitflags;

use crate::info::{Marked, Marker};
use crate::reflect::{Reflect, Typed, take_value};
use crate::{AccessError, TransformError};

// -----------------------------------------------------------------------------
// Access functions

pub(crate) type ReadFn =
    Arc<dyn for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync>;

pub(crate) type WriteFn = Arc<
    dyn Fn(&mut dyn Reflect, Option<Box<dyn Reflect>>) -> Result<(), TransformError>
        + Send
        + Sync,
>;

#[inline]
pub(crate) fn read_fn<F>(f: F) -> ReadFn
where
    F: for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn write_fn<F>(f: F) -> WriteFn
where
    F: Fn(&mut dyn Reflect, Option<Box<dyn Reflect>>) -> Result<(), TransformError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// Visibility & flags

/// Whether a member can be read and written directly, without going through
/// a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

bitflags! {
    /// Member-level capability markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const IGNORE = 1 << 0;
        const IDENTIFIER = 1 << 1;
    }
}

// -----------------------------------------------------------------------------
// Member

/// Describes one property of a type.
///
/// # Examples
///
/// ```
/// use nodal_map::Typed;
/// use nodal_map::info::{Member, Visibility};
///
/// struct Account { id: String, cache: u32 }
/// impl Typed for Account {
///     fn type_path() -> &'static str {
///         "demo::Account"
///     }
/// }
///
/// let id = Member::public::<Account, String>("id", |a| &a.id, |a| &mut a.id).identifier();
/// let cache = Member::private::<u32>("cache");
///
/// let account = Account { id: "a-1".into(), cache: 0 };
/// let value = id.read(&account).unwrap();
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "a-1");
///
/// assert_eq!(cache.visibility(), Visibility::Private);
/// assert!(cache.read(&account).is_err());
/// ```
#[derive(Clone)]
pub struct Member {
    name: &'static str,
    ty_id: TypeId,
    type_path: &'static str,
    visibility: Visibility,
    flags: MemberFlags,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
}

impl Member {
    /// A directly readable and writable member of `T` with type `F`.
    pub fn public<T: Typed, F: Typed>(
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self::read_only(name, get).with_write(write_fn(move |object, value| {
            let found = object.reflect_type_path();
            let target = object
                .downcast_mut::<T>()
                .ok_or_else(|| TransformError::mismatch(T::type_path(), found))?;
            *get_mut(target) = take_value::<F>(value)?;
            Ok(())
        }))
    }

    /// A directly readable member that cannot be assigned.
    pub fn read_only<T: Typed, F: Typed>(name: &'static str, get: fn(&T) -> &F) -> Self {
        Self {
            visibility: Visibility::Public,
            read: Some(read_fn(move |object| {
                object.downcast_ref::<T>().map(|target| get(target) as &dyn Reflect)
            })),
            ..Self::private::<F>(name)
        }
    }

    /// A member only reachable through methods.
    pub fn private<F: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty_id: TypeId::of::<F>(),
            type_path: F::type_path(),
            visibility: Visibility::Private,
            flags: MemberFlags::empty(),
            read: None,
            write: None,
        }
    }

    fn with_write(mut self, write: WriteFn) -> Self {
        self.write = Some(write);
        self
    }

    /// Excludes the member from both passes.
    #[inline]
    pub fn ignored(mut self) -> Self {
        self.flags |= MemberFlags::IGNORE;
        self
    }

    /// Marks the member as the identifier: it becomes the node name.
    #[inline]
    pub fn identifier(mut self) -> Self {
        self.flags |= MemberFlags::IDENTIFIER;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The [`TypeId`] of the declared type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn type_is<F: Typed>(&self) -> bool {
        self.ty_id == TypeId::of::<F>()
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[inline]
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Reads the current value of this member out of `object`.
    pub fn read<'a>(&self, object: &'a dyn Reflect) -> Result<&'a dyn Reflect, AccessError> {
        let read = match &self.read {
            Some(read) if self.is_public() => read,
            _ => return Err(AccessError::NotVisible(self.name)),
        };
        (**read)(object).ok_or(AccessError::Receiver {
            expected: "member owner",
            found: object.reflect_type_path(),
        })
    }

    /// Assigns a reconstructed value to this member of `object`.
    ///
    /// `None` only fits members whose type has an absent value.
    pub fn write(
        &self,
        object: &mut dyn Reflect,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), TransformError> {
        match &self.write {
            Some(write) => (**write)(object, value),
            None => Err(TransformError::FieldAccess {
                owner: object.reflect_type_path(),
                member: self.name,
            }),
        }
    }

    /// Lifts a member of `B` onto a type `T` that embeds a `B`.
    pub(crate) fn project<T: Typed, B: Typed>(
        mut self,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        if let Some(read) = self.read.take() {
            self.read = Some(read_fn(move |object| {
                let base = project(object.downcast_ref::<T>()?);
                (*read)(base as &dyn Reflect)
            }));
        }
        if let Some(write) = self.write.take() {
            self.write = Some(write_fn(move |object, value| {
                let found = object.reflect_type_path();
                match object.downcast_mut::<T>() {
                    Some(target) => (*write)(project_mut(target) as &mut dyn Reflect, value),
                    None => Err(TransformError::mismatch(T::type_path(), found)),
                }
            }));
        }
        self
    }
}

impl Marked for Member {
    fn has_marker(&self, marker: Marker) -> bool {
        match marker {
            Marker::Ignore => self.flags.contains(MemberFlags::IGNORE),
            Marker::Identifier => self.flags.contains(MemberFlags::IDENTIFIER),
            _ => false,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("type_path", &self.type_path)
            .field("visibility", &self.visibility)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
