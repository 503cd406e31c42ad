use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;

use nodal_node::Node;

use crate::TransformError;
use crate::reflect::{Reflect, Typed, take_value};
use crate::registry::TypeRegistry;
use crate::transform::{MapContext, Transformer};

// -----------------------------------------------------------------------------
// Mapper

/// Entry point of both passes over a shared, read-only [`TypeRegistry`].
///
/// # Examples
///
/// ```
/// use nodal_map::info::{Member, TypeInfo};
/// use nodal_map::{GetTypeMeta, Mapper, TypeMeta, TypeRegistry, Typed};
/// use nodal_node::Value;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point { x: i32, y: i32 }
/// impl Typed for Point {
///     fn type_path() -> &'static str {
///         "demo::Point"
///     }
/// }
///
/// impl GetTypeMeta for Point {
///     fn get_type_meta() -> TypeMeta {
///         TypeMeta::new(
///             TypeInfo::builder::<Self>()
///                 .member(Member::public::<Self, i32>("x", |p| &p.x, |p| &mut p.x))
///                 .member(Member::public::<Self, i32>("y", |p| &p.y, |p| &mut p.y))
///                 .with_default()
///                 .build(),
///         )
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
/// let mapper = Mapper::new(registry);
///
/// let node = mapper.to_node(Some(&Point { x: 3, y: 4 })).unwrap();
/// assert_eq!(node.represented_type(), Some(Point::type_path()));
/// assert_eq!(node.child("x").and_then(|x| x.value()), Some(&Value::Int(3)));
///
/// let point: Option<Point> = mapper.from_node(&node).unwrap();
/// assert_eq!(point, Some(Point { x: 3, y: 4 }));
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    registry: Arc<TypeRegistry>,
}

impl Mapper {
    #[inline]
    pub fn new(registry: impl Into<Arc<TypeRegistry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Maps `value` through the transformer registered for `T`.
    ///
    /// `None` produces a null node.
    pub fn to_node<T: Typed>(&self, value: Option<&T>) -> Result<Node, TransformError> {
        let cx = MapContext::new(&self.registry);
        let value = value.map(|value| value as &dyn Reflect);
        self.registry.get(TypeId::of::<T>()).to_node(value, &cx)
    }

    /// Maps a value of any registered type, chosen by its runtime type.
    pub fn to_node_dyn(&self, value: Option<&dyn Reflect>) -> Result<Node, TransformError> {
        let cx = MapContext::new(&self.registry);
        match value {
            Some(object) => self.registry.get(object.ty_id()).to_node(Some(object), &cx),
            None => Ok(Node::null()),
        }
    }

    /// Rebuilds a `T` from `node`.
    ///
    /// The node's represented type picks the transformer when it is known;
    /// otherwise the transformer registered for `T` reads the node. A null
    /// node yields `Ok(None)`.
    pub fn from_node<T: Typed>(&self, node: &Node) -> Result<Option<T>, TransformError> {
        let cx = MapContext::new(&self.registry);
        let transformer: &dyn Transformer = match node.represented_type() {
            Some(path) if self.registry.resolve_type_path(path).is_some() => {
                self.registry.get_represented(Some(path))
            }
            _ => self.registry.get(TypeId::of::<T>()),
        };
        match transformer.from_node(node, &cx)? {
            Some(value) => take_value::<T>(Some(value)).map(Some),
            None => Ok(None),
        }
    }

    /// Rebuilds a value of whatever type `node` represents.
    pub fn from_node_dyn(&self, node: &Node) -> Result<Option<Box<dyn Reflect>>, TransformError> {
        let cx = MapContext::new(&self.registry);
        self.registry
            .get_represented(node.represented_type())
            .from_node(node, &cx)
    }
}

impl From<TypeRegistry> for Mapper {
    #[inline]
    fn from(registry: TypeRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use nodal_node::{Node, Value};

    use super::Mapper;
    use crate::info::{Member, TypeInfo};
    use crate::transform::{MapContext, Transformer};
    use crate::{GetTypeMeta, Reflect, TransformError, TypeMeta, TypeRegistry, Typed};

    #[derive(Debug, Default, PartialEq)]
    struct Reading {
        celsius: f64,
        label: String,
    }
    impl Typed for Reading {
        fn type_path() -> &'static str {
            "test::Reading"
        }
    }

    impl GetTypeMeta for Reading {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::new(
                TypeInfo::builder::<Self>()
                    .member(Member::public::<Self, f64>("celsius", |r| &r.celsius, |r| &mut r.celsius))
                    .member(Member::public::<Self, String>("label", |r| &r.label, |r| &mut r.label))
                    .with_default()
                    .build(),
            )
        }
    }

    /// Writes labels in upper case and reads them back in lower case.
    struct Shout;

    impl Transformer for Shout {
        fn to_node(
            &self,
            value: Option<&dyn Reflect>,
            _cx: &MapContext<'_>,
        ) -> Result<Node, TransformError> {
            match value.and_then(|v| v.downcast_ref::<String>()) {
                Some(text) => Ok(Node::with_value(Value::String(text.to_uppercase()))),
                None => Ok(Node::null()),
            }
        }

        fn from_node(
            &self,
            node: &Node,
            _cx: &MapContext<'_>,
        ) -> Result<Option<Box<dyn Reflect>>, TransformError> {
            match node.value().and_then(Value::as_str) {
                Some(text) => Ok(Some(Box::new(text.to_lowercase()))),
                None => Ok(None),
            }
        }
    }

    fn mapper() -> Mapper {
        let mut registry = TypeRegistry::new();
        registry.register::<Reading>();
        registry.register::<Vec<Reading>>();
        registry.register::<Option<u16>>();
        registry.register_alias::<i32>("int");
        Mapper::new(registry)
    }

    #[test]
    fn containers_at_the_root() {
        let mapper = mapper();
        let readings = vec![
            Reading { celsius: 21.5, label: String::from("hall") },
            Reading { celsius: -3.0, label: String::from("porch") },
        ];
        let node = mapper.to_node(Some(&readings)).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[1].name(), Some(&Value::UInt(1)));
        assert_eq!(mapper.from_node::<Vec<Reading>>(&node).unwrap(), Some(readings));

        let node = mapper.to_node(Some(&Some(7_u16))).unwrap();
        assert_eq!(node.value(), Some(&Value::UInt(7)));
        assert_eq!(mapper.from_node::<Option<u16>>(&node).unwrap(), Some(Some(7)));

        let node = mapper.to_node::<Reading>(None).unwrap();
        assert!(node.is_null());
    }

    #[test]
    fn aliases_normalize_type_names() {
        let mapper = mapper();
        let mut node = Node::with_value(Value::Int(-12));
        node.set_represented_type("int");

        assert_eq!(mapper.from_node::<i32>(&node).unwrap(), Some(-12));
        let any = mapper.from_node_dyn(&node).unwrap().unwrap();
        assert_eq!(any.downcast_ref::<i32>(), Some(&-12));
    }

    #[test]
    fn untagged_nodes_use_the_requested_type() {
        let mapper = mapper();
        let node = Node::with_value(Value::from("plain"));
        assert_eq!(mapper.from_node::<String>(&node).unwrap().as_deref(), Some("plain"));

        let err = mapper.from_node::<u8>(&node).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
    }

    #[test]
    fn dynamic_values_pick_their_runtime_type() {
        let mapper = mapper();
        let reading = Reading { celsius: 1.0, label: String::from("attic") };
        let node = mapper.to_node_dyn(Some(&reading)).unwrap();
        assert_eq!(node.represented_type(), Some(Reading::type_path()));

        let back = mapper.from_node_dyn(&node).unwrap().unwrap();
        assert_eq!(back.downcast_ref::<Reading>(), Some(&reading));
        assert!(mapper.to_node_dyn(None).unwrap().is_null());
    }

    #[test]
    fn member_transformers_override_type_transformers() {
        let mut registry = TypeRegistry::new();
        registry.register::<Reading>();
        registry.register_member_transformer::<Reading>("label", Shout);
        let mapper = Mapper::from(registry);

        let reading = Reading { celsius: 0.5, label: String::from("Cellar") };
        let node = mapper.to_node(Some(&reading)).unwrap();
        assert_eq!(node.child("label").and_then(Node::value), Some(&Value::from("CELLAR")));

        let back: Reading = mapper.from_node(&node).unwrap().unwrap();
        assert_eq!(back.label, "cellar");
    }

    #[test]
    fn wrong_target_type() {
        let mapper = mapper();
        let node = mapper.to_node(Some(&Reading::default())).unwrap();
        let err = mapper.from_node::<String>(&node).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_as_the_codec() {
        let mapper = mapper();
        let reading = Reading { celsius: 18.25, label: String::from("den") };
        let node = mapper.to_node(Some(&reading)).unwrap();

        let json = serde_json::to_string(&node).unwrap();
        let decoded: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(mapper.from_node::<Reading>(&decoded).unwrap(), Some(reading));
    }
}
