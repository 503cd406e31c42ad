use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::{NodeError, Value, ValueHint};

// -----------------------------------------------------------------------------
// Content

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Content {
    Value(Value),
    Children(Vec<Node>),
}

impl Default for Content {
    #[inline]
    fn default() -> Self {
        Self::Children(Vec::new())
    }
}

// -----------------------------------------------------------------------------
// Node

/// One element of the format-neutral tree.
///
/// A fresh node is composite and has no children. It becomes a value node
/// through [`set_value`](Self::set_value) or
/// [`set_null_value`](Self::set_null_value); from then on it refuses
/// children, and a node that already has children refuses a value.
///
/// # Examples
///
/// ```
/// use nodal_node::{Node, NodeError, Value, ValueHint};
///
/// let mut node = Node::null();
/// assert_eq!(node.value_hint(), ValueHint::Null);
///
/// let err = node.add_child(Node::new()).unwrap_err();
/// assert_eq!(err, NodeError::ChildOnValueNode(ValueHint::Null));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    #[cfg_attr(feature = "serde", serde(default))]
    name: Option<Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    represented_type: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    content: Content,
}

impl Node {
    /// Creates an empty composite node.
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            represented_type: None,
            content: Content::Children(Vec::new()),
        }
    }

    /// Creates a value node marked null.
    #[inline]
    pub const fn null() -> Self {
        Self::with_value(Value::Null)
    }

    /// Creates a value node holding `value`.
    #[inline]
    pub const fn with_value(value: Value) -> Self {
        Self {
            name: None,
            represented_type: None,
            content: Content::Value(value),
        }
    }

    // -------------------------------------------------------------------------
    // Name

    /// Returns the key of this node inside its parent.
    #[inline]
    pub fn name(&self) -> Option<&Value> {
        self.name.as_ref()
    }

    /// Returns the key if it is a string.
    #[inline]
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    /// Returns the hint of the key type, if the node is named.
    #[inline]
    pub fn name_hint(&self) -> Option<ValueHint> {
        self.name.as_ref().map(Value::hint)
    }

    /// Sets the key; its [`ValueHint`] tags the key type.
    #[inline]
    pub fn set_name(&mut self, name: impl Into<Value>) {
        self.name = Some(name.into());
    }

    /// Builder-style [`set_name`](Self::set_name).
    #[inline]
    pub fn named(mut self, name: impl Into<Value>) -> Self {
        self.set_name(name);
        self
    }

    // -------------------------------------------------------------------------
    // Represented type

    /// Returns the path of the type this node reconstructs into.
    #[inline]
    pub fn represented_type(&self) -> Option<&str> {
        self.represented_type.as_deref()
    }

    #[inline]
    pub fn set_represented_type(&mut self, type_path: impl Into<Cow<'static, str>>) {
        self.represented_type = Some(type_path.into());
    }

    // -------------------------------------------------------------------------
    // Content

    /// Returns the hint of the content: the value's hint, or
    /// [`ValueHint::Composite`] for composite nodes.
    #[inline]
    pub fn value_hint(&self) -> ValueHint {
        match &self.content {
            Content::Value(value) => value.hint(),
            Content::Children(_) => ValueHint::Composite,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(&self.content, Content::Value(Value::Null))
    }

    /// Returns the direct value of a value node.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match &self.content {
            Content::Value(value) => Some(value),
            Content::Children(_) => None,
        }
    }

    /// Turns this node into a value node holding `value`.
    ///
    /// Fails if the node already has children. An empty composite node, or a
    /// value node, can always take a value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), NodeError> {
        match &self.content {
            Content::Children(children) if !children.is_empty() => {
                Err(NodeError::ValueOnCompositeNode(children.len()))
            }
            _ => {
                self.content = Content::Value(value.into());
                Ok(())
            }
        }
    }

    /// Marks this node as a null value node.
    #[inline]
    pub fn set_null_value(&mut self) -> Result<(), NodeError> {
        self.set_value(Value::Null)
    }

    // -------------------------------------------------------------------------
    // Children

    /// Appends a child, failing if this is a value node or if a child with
    /// the same name exists. Unnamed children are never duplicates.
    pub fn add_child(&mut self, child: Node) -> Result<(), NodeError> {
        match &mut self.content {
            Content::Children(children) => {
                if let Some(name) = &child.name
                    && children.iter().any(|known| known.name.as_ref() == Some(name))
                {
                    return Err(NodeError::DuplicateChild(name.clone()));
                }
                children.push(child);
                Ok(())
            }
            Content::Value(value) => Err(NodeError::ChildOnValueNode(value.hint())),
        }
    }

    /// Returns the children in insertion order; empty for value nodes.
    #[inline]
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Children(children) => children,
            Content::Value(_) => &[],
        }
    }

    /// Returns the child whose name is the string `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children()
            .iter()
            .find(|child| child.name_str() == Some(name))
    }

    /// Returns the child whose name equals `name`, whatever its type.
    pub fn child_by_key(&self, name: &Value) -> Option<&Node> {
        self.children()
            .iter()
            .find(|child| child.name.as_ref() == Some(name))
    }
}
