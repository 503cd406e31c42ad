use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::marker::PhantomData;

use nodal_node::{Node, Value};

use crate::TransformError;
use crate::reflect::{Reflect, Typed};
use crate::transform::{MapContext, Transformer};

// -----------------------------------------------------------------------------
// ValueType

/// A type stored directly as a node [`Value`].
pub trait ValueType: Typed + Sized {
    fn to_value(&self) -> Value;

    /// Converts back, or `None` if `value` does not fit.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_type {
    (signed: $($ty:ty),*) => {
        $(
            impl ValueType for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                #[inline]
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_i64().and_then(|v| Self::try_from(v).ok())
                }
            }
        )*
    };
    (unsigned: $($ty:ty),*) => {
        $(
            impl ValueType for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::UInt(u64::from(*self))
                }

                #[inline]
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_u64().and_then(|v| Self::try_from(v).ok())
                }
            }
        )*
    };
}

impl_value_type!(signed: i8, i16, i32, i64);
impl_value_type!(unsigned: u8, u16, u32, u64);

impl ValueType for isize {
    #[inline]
    fn to_value(&self) -> Value {
        // `isize` is at most 64 bits wide on supported targets.
        Value::Int(*self as i64)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|v| Self::try_from(v).ok())
    }
}

impl ValueType for usize {
    #[inline]
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|v| Self::try_from(v).ok())
    }
}

impl ValueType for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl ValueType for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl ValueType for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ValueType for char {
    fn to_value(&self) -> Value {
        let mut text = String::with_capacity(self.len_utf8());
        text.push(*self);
        Value::String(text)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let mut chars = value.as_str()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ValueType for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl ValueType for () {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Null
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.is_null().then_some(())
    }
}

// -----------------------------------------------------------------------------
// ValueTransformer

/// Maps a [`ValueType`] to a value node tagged with its type path.
pub struct ValueTransformer<T>(PhantomData<fn() -> T>);

impl<T> ValueTransformer<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ValueTransformer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueType> Transformer for ValueTransformer<T> {
    fn to_node(
        &self,
        value: Option<&dyn Reflect>,
        _cx: &MapContext<'_>,
    ) -> Result<Node, TransformError> {
        let Some(value) = value else {
            return Ok(Node::null());
        };
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(|| TransformError::mismatch(T::type_path(), value.reflect_type_path()))?;
        let mut node = Node::with_value(value.to_value());
        node.set_represented_type(T::type_path());
        Ok(node)
    }

    fn from_node(
        &self,
        node: &Node,
        _cx: &MapContext<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, TransformError> {
        if node.is_null() {
            return Ok(None);
        }
        let Some(value) = node.value() else {
            return Err(TransformError::mismatch(T::type_path(), "composite node"));
        };
        match T::from_value(value) {
            Some(value) => Ok(Some(Box::new(value))),
            None => Err(TransformError::mismatch(T::type_path(), format!("{value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use nodal_node::{Node, Value};

    use super::{ValueTransformer, ValueType};
    use crate::transform::{MapContext, Transformer};
    use crate::{TransformError, TypeRegistry, Typed, take_value};

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(u8::from_value(&Value::Int(200)), Some(200));
        assert_eq!(u8::from_value(&Value::Int(300)), None);
        assert_eq!(i8::from_value(&Value::UInt(5)), Some(5));
        assert_eq!(u32::from_value(&Value::Int(-1)), None);
        assert_eq!(i64::MIN.to_value(), Value::Int(i64::MIN));
        assert_eq!(u64::MAX.to_value(), Value::UInt(u64::MAX));
        assert_eq!(i32::from_value(&Value::Float(1.0)), None);
    }

    #[test]
    fn chars_and_text() {
        assert_eq!('é'.to_value(), Value::from("é"));
        assert_eq!(char::from_value(&Value::from("ab")), None);
        assert_eq!(char::from_value(&Value::from("")), None);
        assert_eq!(String::from_value(&Value::from("ab")).as_deref(), Some("ab"));
        assert_eq!(<()>::from_value(&Value::Null), Some(()));
    }

    #[test]
    fn nodes_are_tagged_and_checked() {
        let registry = TypeRegistry::new();
        let cx = MapContext::new(&registry);
        let transformer = ValueTransformer::<u16>::new();

        let node = transformer.to_node(Some(&513_u16), &cx).unwrap();
        assert_eq!(node.value(), Some(&Value::UInt(513)));
        assert_eq!(node.represented_type(), Some(u16::type_path()));

        let back = transformer.from_node(&node, &cx).unwrap();
        assert_eq!(take_value::<u16>(back).unwrap(), 513);

        assert!(transformer.from_node(&Node::null(), &cx).unwrap().is_none());
        let err = transformer.from_node(&Node::new(), &cx).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
        let err = transformer.to_node(Some(&1_i16), &cx).unwrap_err();
        assert!(matches!(err, TransformError::Mismatch { .. }));
    }
}
