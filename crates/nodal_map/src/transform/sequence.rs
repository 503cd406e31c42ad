use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use core::marker::PhantomData;

use nodal_node::{Node, Value, ValueHint};

use crate::TransformError;
use crate::reflect::{Reflect, Typed, take_value};
use crate::transform::{MapContext, Transformer};

/// Maps `Vec<T>` to a composite node whose children are keyed by their
/// index (`Value::UInt`).
///
/// Elements are placed by key on the way back, so the order of the children
/// does not matter. Every index below the child count must appear once.
pub struct SequenceTransformer<T>(PhantomData<fn() -> T>);

impl<T> SequenceTransformer<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SequenceTransformer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Typed> Transformer for SequenceTransformer<T> {
    fn to_node(
        &self,
        value: Option<&dyn Reflect>,
        cx: &MapContext<'_>,
    ) -> Result<Node, TransformError> {
        let Some(value) = value else {
            return Ok(Node::null());
        };
        let items = value.downcast_ref::<Vec<T>>().ok_or_else(|| {
            TransformError::mismatch(Vec::<T>::type_path(), value.reflect_type_path())
        })?;

        let element = cx.registry().get(TypeId::of::<T>());
        let nested = cx.nested();
        let mut node = Node::new();
        node.set_represented_type(Vec::<T>::type_path());
        for (index, item) in items.iter().enumerate() {
            let child = element.to_node(Some(item), &nested)?;
            node.add_child(child.named(index as u64))?;
        }
        Ok(node)
    }

    fn from_node(
        &self,
        node: &Node,
        cx: &MapContext<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, TransformError> {
        match node.value_hint() {
            ValueHint::Null => return Ok(None),
            ValueHint::Composite => {}
            hint => {
                return Err(TransformError::mismatch(
                    Vec::<T>::type_path(),
                    format!("{hint} value"),
                ));
            }
        }

        let element = cx.registry().get(TypeId::of::<T>());
        let nested = cx.nested();
        let len = node.children().len();
        let mut slots: Vec<Option<T>> = (0..len).map(|_| None).collect();
        for child in node.children() {
            let index = child.name().and_then(Value::as_u64).ok_or_else(|| {
                let found = child.name().map_or_else(|| String::from("no key"), ToString::to_string);
                TransformError::mismatch("sequence index", found)
            })?;
            let slot = usize::try_from(index)
                .ok()
                .and_then(|index| slots.get_mut(index))
                .ok_or_else(|| TransformError::MissingTarget {
                    owner: Vec::<T>::type_path(),
                    name: index.to_string(),
                })?;
            if slot.is_some() {
                return Err(TransformError::mismatch(
                    "unique sequence index",
                    format!("repeated index {index}"),
                ));
            }

            let transformer = match child.represented_type() {
                Some(path) if path != T::type_path() => {
                    cx.registry().get_represented(Some(path))
                }
                _ => element,
            };
            *slot = Some(take_value::<T>(transformer.from_node(child, &nested)?)?);
        }
        // Every slot is filled: `len` distinct indices below `len`.
        Ok(Some(Box::new(slots.into_iter().flatten().collect::<Vec<T>>())))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use nodal_node::{Node, Value, ValueHint};

    use super::SequenceTransformer;
    use crate::transform::{MapContext, Transformer};
    use crate::{TransformError, TypeRegistry, take_value};

    #[test]
    fn elements_are_keyed_by_index() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = SequenceTransformer::<i16>::new();

        let node = transformer.to_node(Some(&vec![4_i16, -2]), &cx).unwrap();
        let keys: Vec<_> = node.children().iter().filter_map(Node::name).cloned().collect();
        assert_eq!(keys, [Value::UInt(0), Value::UInt(1)]);
        assert_eq!(node.children()[0].name_hint(), Some(ValueHint::Numeric));

        let back = transformer.from_node(&node, &cx).unwrap();
        assert_eq!(take_value::<Vec<i16>>(back).unwrap(), [4, -2]);
    }

    #[test]
    fn elements_are_placed_by_key() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = SequenceTransformer::<String>::new();

        let mut node = Node::new();
        node.add_child(Node::with_value(Value::from("b")).named(1_u64)).unwrap();
        node.add_child(Node::with_value(Value::from("a")).named(0_u64)).unwrap();
        let back = transformer.from_node(&node, &cx).unwrap();
        assert_eq!(take_value::<Vec<String>>(back).unwrap(), ["a", "b"]);
    }

    #[test]
    fn bad_keys_are_rejected() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = SequenceTransformer::<String>::new();

        let mut gap = Node::new();
        gap.add_child(Node::with_value(Value::from("a")).named(0_u64)).unwrap();
        gap.add_child(Node::with_value(Value::from("c")).named(2_u64)).unwrap();
        let err = transformer.from_node(&gap, &cx).unwrap_err();
        assert!(matches!(err, TransformError::MissingTarget { ref name, .. } if name == "2"));

        let mut named = Node::new();
        named.add_child(Node::with_value(Value::from("a")).named("first")).unwrap();
        let err = transformer.from_node(&named, &cx).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));

        let mut unkeyed = Node::new();
        unkeyed.add_child(Node::with_value(Value::from("a"))).unwrap();
        let err = transformer.from_node(&unkeyed, &cx).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
    }

    #[test]
    fn value_nodes_are_rejected() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let err = SequenceTransformer::<i16>::new()
            .from_node(&Node::with_value(Value::Int(1)), &cx)
            .unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
    }
}
