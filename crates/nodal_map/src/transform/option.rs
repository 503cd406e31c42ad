use alloc::boxed::Box;
use core::any::TypeId;
use core::marker::PhantomData;

use nodal_node::Node;

use crate::TransformError;
use crate::reflect::{Reflect, Typed, take_value};
use crate::transform::{MapContext, Transformer};

/// Maps `Option<T>`: `None` is a null node, `Some(v)` is the node of `v`.
pub struct OptionTransformer<T>(PhantomData<fn() -> T>);

impl<T> OptionTransformer<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for OptionTransformer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Typed> Transformer for OptionTransformer<T> {
    fn to_node(
        &self,
        value: Option<&dyn Reflect>,
        cx: &MapContext<'_>,
    ) -> Result<Node, TransformError> {
        let Some(value) = value else {
            return Ok(Node::null());
        };
        let value = value.downcast_ref::<Option<T>>().ok_or_else(|| {
            TransformError::mismatch(Option::<T>::type_path(), value.reflect_type_path())
        })?;
        match value {
            Some(inner) => cx.registry().get(TypeId::of::<T>()).to_node(Some(inner), cx),
            None => Ok(Node::null()),
        }
    }

    fn from_node(
        &self,
        node: &Node,
        cx: &MapContext<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, TransformError> {
        if node.is_null() {
            return Ok(Some(Box::new(None::<T>)));
        }
        let transformer = match node.represented_type() {
            Some(path) if path != T::type_path() => cx.registry().get_represented(Some(path)),
            _ => cx.registry().get(TypeId::of::<T>()),
        };
        let inner = take_value::<T>(transformer.from_node(node, cx)?)?;
        Ok(Some(Box::new(Some(inner))))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use nodal_node::{Node, Value};

    use super::OptionTransformer;
    use crate::transform::{MapContext, Transformer};
    use crate::{TypeRegistry, take_value};

    #[test]
    fn none_is_a_null_node() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = OptionTransformer::<String>::new();

        let node = transformer.to_node(Some(&None::<String>), &cx).unwrap();
        assert!(node.is_null());
        let back = transformer.from_node(&node, &cx).unwrap();
        assert_eq!(take_value::<Option<String>>(back).unwrap(), None);
    }

    #[test]
    fn some_is_the_inner_node() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = OptionTransformer::<String>::new();

        let node = transformer
            .to_node(Some(&Some(String::from("x"))), &cx)
            .unwrap();
        assert_eq!(node.value(), Some(&Value::from("x")));

        let back = transformer.from_node(&node, &cx).unwrap();
        assert_eq!(take_value::<Option<String>>(back).unwrap().as_deref(), Some("x"));

        // Untagged values are read as the inner type.
        let back = transformer
            .from_node(&Node::with_value(Value::from("y")), &cx)
            .unwrap();
        assert_eq!(take_value::<Option<String>>(back).unwrap().as_deref(), Some("y"));
    }
}
