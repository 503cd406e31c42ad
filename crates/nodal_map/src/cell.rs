//! Static storage for the type paths of generic types.
//!
//! A `static` declared inside a generic function is shared by every
//! instantiation of that function, so the cell keys its entries by
//! [`TypeId`]. Entries form a lock-free chain and are never removed, which
//! lets the cell hand out `&'static str` without leaking.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};

use once_cell::race::OnceBox;

struct Entry {
    type_id: TypeId,
    path: String,
    next: OnceBox<Entry>,
}

/// Caches the composed [`type_path`](crate::Typed::type_path) of each
/// instantiation of a generic type.
///
/// # Examples
///
/// ```
/// use nodal_map::{GenericTypePathCell, Typed, concat};
///
/// struct Pair<T>(T, T);
///
/// impl<T: Typed> Typed for Pair<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["demo::Pair<", T::type_path(), ">"]))
///     }
/// }
///
/// assert_eq!(<Pair<u8>>::type_path(), "demo::Pair<u8>");
/// assert_eq!(<Pair<bool>>::type_path(), "demo::Pair<bool>");
/// assert_eq!(<Pair<bool>>::type_name(), "Pair<bool>");
/// ```
pub struct GenericTypePathCell {
    head: OnceBox<Entry>,
}

impl GenericTypePathCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: OnceBox::new(),
        }
    }

    /// Returns the path stored for `G`, composing it with `f` on first use.
    ///
    /// Threads racing on the first use of the same `G` may each call `f`;
    /// only one result is kept.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&'static self, f: impl Fn() -> String) -> &'static str {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), &f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &'static self,
        type_id: TypeId,
        f: &dyn Fn() -> String,
    ) -> &'static str {
        let mut slot = &self.head;
        loop {
            let entry = slot.get_or_init(|| {
                Box::new(Entry {
                    type_id,
                    path: f(),
                    next: OnceBox::new(),
                })
            });
            if entry.type_id == type_id {
                return &entry.path;
            }
            slot = &entry.next;
        }
    }
}

/// Joins string slices into one `String`, for composing generic type paths.
pub fn concat(parts: &[&str]) -> String {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut path = String::with_capacity(len);
    for part in parts {
        path.push_str(part);
    }
    path
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{GenericTypePathCell, concat};
    use crate::Typed;

    struct Wrap<T>(T);

    impl<T: Typed> Typed for Wrap<T> {
        fn type_path() -> &'static str {
            static CELL: GenericTypePathCell = GenericTypePathCell::new();
            CELL.get_or_insert::<Self>(|| concat(&["test::Wrap<", T::type_path(), ">"]))
        }
    }

    #[test]
    fn one_path_per_instantiation() {
        assert_eq!(<Wrap<u8>>::type_path(), "test::Wrap<u8>");
        assert_eq!(<Wrap<Wrap<u8>>>::type_path(), "test::Wrap<test::Wrap<u8>>");
        assert_eq!(<Wrap<i64>>::type_path(), "test::Wrap<i64>");
        // Repeated lookups return the cached string.
        assert!(core::ptr::eq(<Wrap<u8>>::type_path(), <Wrap<u8>>::type_path()));
    }

    #[test]
    fn container_paths_are_declared() {
        assert_eq!(<Vec<Option<u32>>>::type_path(), "alloc::vec::Vec<core::option::Option<u32>>");
        assert_eq!(<Option<alloc::string::String>>::type_name(), "Option<alloc::string::String>");
    }
}
