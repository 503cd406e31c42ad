//! [`Typed`] and [`GetTypeMeta`] for leaf values, `Option<T>` and `Vec<T>`.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::cell::{GenericTypePathCell, concat};
use crate::info::TypeInfo;
use crate::reflect::{Reflect, Typed};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::transform::{OptionTransformer, SequenceTransformer, ValueTransformer};

macro_rules! impl_leaf {
    ($($ty:ty => $path:literal),* $(,)?) => {
        $(
            impl Typed for $ty {
                #[inline]
                fn type_path() -> &'static str {
                    $path
                }
            }

            impl GetTypeMeta for $ty {
                fn get_type_meta() -> TypeMeta {
                    TypeMeta::new(TypeInfo::opaque::<Self>())
                        .with_transformer(ValueTransformer::<Self>::new())
                }
            }
        )*
    };
}

impl_leaf!(
    bool => "bool",
    char => "char",
    String => "alloc::string::String",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
);

impl Typed for () {
    #[inline]
    fn type_path() -> &'static str {
        "()"
    }

    #[inline]
    fn absent() -> Option<Self> {
        Some(())
    }
}

impl GetTypeMeta for () {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new(TypeInfo::opaque::<Self>()).with_transformer(ValueTransformer::<Self>::new())
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: Typed> Typed for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn accepts_represented(represented: Option<&str>) -> bool {
        represented.is_none_or(|path| path == Self::type_path())
            || T::accepts_represented(represented)
    }

    #[inline]
    fn absent() -> Option<Self> {
        Some(None)
    }

    /// Accepts both a boxed `Option<T>` and a boxed `T`.
    fn from_reflect(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        match value.downcast::<Self>() {
            Ok(option) => Ok(*option),
            Err(value) => T::from_reflect(value).map(Some),
        }
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new(TypeInfo::opaque::<Self>()).with_transformer(OptionTransformer::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Typed> Typed for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new(TypeInfo::opaque::<Self>())
            .with_transformer(SequenceTransformer::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
