use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use nodal_node::{Node, ValueHint};

use crate::TransformError;
use crate::info::{Marked, Marker, Member, TypeInfo};
use crate::inspect;
use crate::reflect::Reflect;
use crate::registry::TypeMeta;
use crate::transform::{MapContext, Transformer};

// -----------------------------------------------------------------------------
// GenericObjectTransformer

/// The fallback transformer for every registered type without a dedicated
/// one.
///
/// It works from the type's [`TypeInfo`] alone. Properties are resolved with
/// the precedence *explicit markers > naming conventions > direct member
/// access*; the first two strategies only apply to types marked
/// [`Marker::Aggregate`].
///
/// The forward pass is lenient: members that cannot be read directly are
/// skipped. The reverse pass is strict: every child must land somewhere.
///
/// An identifier member names the root node. Below the root the node name is
/// the parent's key, so the identifier is written as an ordinary child.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericObjectTransformer;

impl Transformer for GenericObjectTransformer {
    fn to_node(
        &self,
        value: Option<&dyn Reflect>,
        cx: &MapContext<'_>,
    ) -> Result<Node, TransformError> {
        let Some(object) = value else {
            return Ok(Node::null());
        };
        let info = cx
            .registry()
            .get_meta(object.ty_id())
            .map(TypeMeta::info)
            .ok_or_else(|| TransformError::UnknownType(object.reflect_type_path().into()))?;
        log::trace!("mapping `{}` to a node (depth {})", info.type_path(), cx.depth());

        let mut node = Node::new();
        node.set_represented_type(info.type_path());

        let mut pending: Vec<&Member> = inspect::all_members(info).iter().collect();
        if inspect::has_marker(info, Marker::Aggregate) {
            read_explicit_accessors(object, info, &mut pending, &mut node, cx)?;
            read_conventional_getters(object, info, &mut pending, &mut node, cx)?;
        }
        read_members(object, info, &pending, &mut node, cx)?;

        Ok(node)
    }

    fn from_node(
        &self,
        node: &Node,
        cx: &MapContext<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, TransformError> {
        if node.value_hint() == ValueHint::Null {
            return Ok(None);
        }
        let path = node.represented_type().ok_or(TransformError::MissingType)?;
        let info = cx
            .registry()
            .resolve_type_path(path)
            .map(TypeMeta::info)
            .ok_or_else(|| TransformError::UnknownType(path.into()))?;
        if node.value_hint() != ValueHint::Composite {
            return Err(TransformError::mismatch(
                info.type_path(),
                format!("{} value", node.value_hint()),
            ));
        }
        log::trace!("rebuilding `{}` from a node (depth {})", info.type_path(), cx.depth());

        let mut instance = info.instantiator().create(info.type_path())?;
        // Below the root the identifier arrives as a child.
        if cx.is_root() {
            restore_identifier(node, info, &mut *instance)?;
        }

        let mut pending: Vec<&Node> = node.children().iter().collect();
        if inspect::has_marker(info, Marker::Aggregate) {
            apply_explicit_mutators(node, info, &mut *instance, &mut pending, cx)?;
            apply_conventional_setters(info, &mut *instance, &mut pending, cx)?;
        }
        assign_members(info, &mut *instance, &pending, cx)?;

        Ok(Some(instance))
    }
}

// -----------------------------------------------------------------------------
// Forward steps

fn read_explicit_accessors(
    object: &dyn Reflect,
    info: &TypeInfo,
    pending: &mut Vec<&Member>,
    node: &mut Node,
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    for method in info.methods() {
        let Some(target) = inspect::explicit_accessor_target(method) else {
            continue;
        };
        if inspect::is_ignored(info, target) {
            log::trace!("`{}::{target}` is ignored", info.type_path());
            continue;
        }

        if node.child(target).is_some() {
            log::debug!(
                "`{}::{}` skipped: `{target}` is already read",
                info.type_path(),
                method.name()
            );
            continue;
        }

        let value = method.get(object)?;
        pending.retain(|known| known.name() != target);
        let transformer = match inspect::visible_member(info, target) {
            Some(member) => cx.registry().get_member(info, member),
            None => cx.registry().get(value.ty_id()),
        };
        let child = transformer.to_node(Some(&*value), &cx.nested())?;
        node.add_child(child.named(target))?;
    }
    Ok(())
}

fn read_conventional_getters<'a>(
    object: &dyn Reflect,
    info: &TypeInfo,
    pending: &mut Vec<&'a Member>,
    node: &mut Node,
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    let mut unresolved = Vec::with_capacity(pending.len());
    for member in pending.drain(..) {
        // Identifiers are read directly.
        if member.has_marker(Marker::Ignore) || member.has_marker(Marker::Identifier) {
            unresolved.push(member);
            continue;
        }
        let Some(getter) = inspect::conventional_getter(info, member.name()) else {
            unresolved.push(member);
            continue;
        };

        let value = getter.get(object)?;
        let child = cx
            .registry()
            .get_member(info, member)
            .to_node(Some(&*value), &cx.nested())?;
        node.add_child(child.named(member.name()))?;
    }
    *pending = unresolved;
    Ok(())
}

fn read_members(
    object: &dyn Reflect,
    info: &TypeInfo,
    pending: &[&Member],
    node: &mut Node,
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    for member in pending {
        if member.has_marker(Marker::Ignore) {
            log::trace!("`{}::{}` is ignored", info.type_path(), member.name());
            continue;
        }
        let identifier = member.has_marker(Marker::Identifier);
        if identifier && !member.type_is::<String>() {
            return Err(TransformError::IdentifierType {
                owner: info.type_path(),
                member: member.name(),
                found: member.type_path(),
            });
        }

        let current = match member.read(object) {
            Ok(current) => current,
            Err(err) => {
                log::debug!("skipping `{}::{}`: {err}", info.type_path(), member.name());
                continue;
            }
        };

        if identifier && cx.is_root() {
            if let Some(id) = current.downcast_ref::<String>() {
                node.set_name(id.as_str());
            }
            continue;
        }

        let child = cx
            .registry()
            .get_member(info, member)
            .to_node(Some(current), &cx.nested())?;
        node.add_child(child.named(member.name()))?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Reverse steps

fn restore_identifier(
    node: &Node,
    info: &TypeInfo,
    instance: &mut dyn Reflect,
) -> Result<(), TransformError> {
    let Some(id) = node.name_str() else {
        return Ok(());
    };
    let identifier = info
        .members()
        .iter()
        .find(|member| member.has_marker(Marker::Identifier) && !member.has_marker(Marker::Ignore));
    match identifier {
        Some(member) => member.write(instance, Some(Box::new(String::from(id)))),
        None => Ok(()),
    }
}

fn apply_explicit_mutators<'n>(
    node: &'n Node,
    info: &TypeInfo,
    instance: &mut dyn Reflect,
    pending: &mut Vec<&'n Node>,
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    for method in info.methods() {
        let Some(target) = inspect::explicit_mutator_target(method) else {
            continue;
        };
        if inspect::is_ignored(info, target) {
            log::trace!("`{}::{target}` is ignored", info.type_path());
            continue;
        }
        let Some(child) = node.child(target) else {
            log::debug!(
                "`{}::{}` skipped: no child named `{target}`",
                info.type_path(),
                method.name()
            );
            continue;
        };

        let value = resolve_child(info, target, child, cx)?;
        method.set(instance, value)?;
        pending.retain(|other| !core::ptr::eq(*other, child));
    }
    Ok(())
}

fn apply_conventional_setters(
    info: &TypeInfo,
    instance: &mut dyn Reflect,
    pending: &mut Vec<&Node>,
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    let mut unresolved = Vec::with_capacity(pending.len());
    for child in pending.drain(..) {
        let setter = match child.name_str() {
            Some(name) if !inspect::is_ignored(info, name) => {
                // Aliases match the setter of the type they stand for.
                let represented = child.represented_type().map(|path| {
                    cx.registry()
                        .resolve_type_path(path)
                        .map_or(path, |meta| meta.type_path())
                });
                inspect::conventional_setter(info, name, represented).map(|setter| (name, setter))
            }
            _ => None,
        };
        let Some((name, setter)) = setter else {
            unresolved.push(child);
            continue;
        };

        let value = resolve_child(info, name, child, cx)?;
        setter.set(instance, value)?;
    }
    *pending = unresolved;
    Ok(())
}

fn assign_members(
    info: &TypeInfo,
    instance: &mut dyn Reflect,
    pending: &[&Node],
    cx: &MapContext<'_>,
) -> Result<(), TransformError> {
    for child in pending {
        let Some(name) = child.name_str() else {
            return Err(TransformError::MissingTarget {
                owner: info.type_path(),
                name: child
                    .name()
                    .map_or_else(|| String::from("<unnamed>"), ToString::to_string),
            });
        };
        if inspect::is_ignored(info, name) {
            log::debug!("`{}`: dropping child `{name}` of an ignored member", info.type_path());
            continue;
        }
        let member = info.member(name).ok_or_else(|| TransformError::MissingTarget {
            owner: info.type_path(),
            name: name.into(),
        })?;
        if !member.is_writable() {
            return Err(TransformError::FieldAccess {
                owner: info.type_path(),
                member: member.name(),
            });
        }

        let value = cx
            .registry()
            .get_member(info, member)
            .from_node(child, &cx.nested())?;
        member.write(instance, value)?;
    }
    Ok(())
}

/// Rebuilds the value of a child consumed by a mutator.
fn resolve_child(
    info: &TypeInfo,
    name: &str,
    child: &Node,
    cx: &MapContext<'_>,
) -> Result<Option<Box<dyn Reflect>>, TransformError> {
    let transformer = match inspect::visible_member(info, name) {
        Some(member) => cx.registry().get_member(info, member),
        None => cx.registry().get_represented(child.represented_type()),
    };
    transformer.from_node(child, &cx.nested())
}
