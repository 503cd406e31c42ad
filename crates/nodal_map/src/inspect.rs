//! Capability queries over [`TypeInfo`] tables.
//!
//! All functions are pure lookups; the tables themselves are built once by
//! [`TypeInfoBuilder`](crate::info::TypeInfoBuilder).

use alloc::string::String;

use crate::info::{Marked, Marker, Member, Method, MethodKind, TypeInfo};

/// Every member of the type, own and inherited, descendant first.
#[inline]
pub fn all_members(info: &TypeInfo) -> &[Member] {
    info.members()
}

#[inline]
pub fn has_marker(target: &impl Marked, marker: Marker) -> bool {
    target.has_marker(marker)
}

/// The member an explicit accessor reads, if `method` is one.
#[inline]
pub fn explicit_accessor_target(method: &Method) -> Option<&'static str> {
    method.binding(Marker::ExplicitAccessor)
}

/// The member an explicit mutator writes, if `method` is one.
#[inline]
pub fn explicit_mutator_target(method: &Method) -> Option<&'static str> {
    method.binding(Marker::ExplicitMutator)
}

/// The member named `name`, if it can be accessed directly.
pub fn visible_member<'a>(info: &'a TypeInfo, name: &str) -> Option<&'a Member> {
    info.member(name).filter(|member| member.is_public())
}

/// Whether the member is excluded from mapping.
pub fn is_ignored(info: &TypeInfo, name: &str) -> bool {
    info.member(name)
        .is_some_and(|member| member.has_marker(Marker::Ignore))
}

/// `prefix` followed by `member` with its first character upper-cased.
///
/// ```
/// assert_eq!(nodal_map::inspect::accessor_name("get", "width"), "getWidth");
/// assert_eq!(nodal_map::inspect::accessor_name("set", "x"), "setX");
/// ```
pub fn accessor_name(prefix: &str, member: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + member.len());
    name.push_str(prefix);
    let mut chars = member.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}

/// The argument-less getter named `get` + capitalized `member`.
pub fn conventional_getter<'a>(info: &'a TypeInfo, member: &str) -> Option<&'a Method> {
    let name = accessor_name("get", member);
    info.methods()
        .iter()
        .find(|method| method.kind() == MethodKind::Getter && method.name() == name)
}

/// The one-argument setter named `set` + capitalized `member` that takes
/// values of the `represented` type.
pub fn conventional_setter<'a>(
    info: &'a TypeInfo,
    member: &str,
    represented: Option<&str>,
) -> Option<&'a Method> {
    let name = accessor_name("set", member);
    info.methods()
        .iter()
        .find(|method| method.name() == name && method.accepts(represented))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{conventional_getter, conventional_setter, explicit_accessor_target, is_ignored};
    use super::{accessor_name, visible_member};
    use crate::Typed;
    use crate::info::{Member, Method, TypeInfo};

    #[derive(Debug, Default)]
    struct Badge {
        owner: String,
        level: u32,
        secret: u64,
    }
    impl Typed for Badge {
        fn type_path() -> &'static str {
            "test::Badge"
        }
    }

    fn badge() -> TypeInfo {
        TypeInfo::builder::<Badge>()
            .aggregate()
            .member(Member::public::<Badge, String>("owner", |b| &b.owner, |b| &mut b.owner))
            .member(Member::private::<u32>("level"))
            .member(Member::public::<Badge, u64>("secret", |b| &b.secret, |b| &mut b.secret).ignored())
            .method(Method::getter("getLevel", |b: &Badge| b.level))
            .method(Method::setter("setLevel", |b: &mut Badge, v: u32| b.level = v))
            .method(Method::setter("setLevel", |b: &mut Badge, v: String| b.owner = v))
            .method(Method::getter("holder", |b: &Badge| b.owner.clone()).bind("owner"))
            .build()
    }

    #[test]
    fn capitalization() {
        assert_eq!(accessor_name("get", "éclair"), "getÉclair");
        assert_eq!(accessor_name("get", ""), "get");
    }

    #[test]
    fn conventional_lookups() {
        let info = badge();
        assert_eq!(conventional_getter(&info, "level").map(Method::name), Some("getLevel"));
        assert!(conventional_getter(&info, "owner").is_none());

        let by_u32 = conventional_setter(&info, "level", Some(u32::type_path())).unwrap();
        assert_eq!(by_u32.type_path(), u32::type_path());
        let by_string = conventional_setter(&info, "level", Some(String::type_path())).unwrap();
        assert_eq!(by_string.type_path(), String::type_path());
        assert!(conventional_setter(&info, "level", Some(i8::type_path())).is_none());
    }

    #[test]
    fn member_queries() {
        let info = badge();
        assert!(visible_member(&info, "owner").is_some());
        assert!(visible_member(&info, "level").is_none());
        assert!(is_ignored(&info, "secret"));
        assert!(!is_ignored(&info, "owner"));
        assert!(!is_ignored(&info, "unknown"));

        let targets: alloc::vec::Vec<_> =
            info.methods().iter().filter_map(explicit_accessor_target).collect();
        assert_eq!(targets, ["owner"]);
    }
}
