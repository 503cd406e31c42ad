//! Maps typed values to format-neutral [`Node`](nodal_node::Node) trees and
//! back.
//!
//! Every mapped type declares a [`TypeInfo`](info::TypeInfo) through
//! [`GetTypeMeta`] and is registered in a [`TypeRegistry`]. A [`Mapper`]
//! then walks values in either direction, picking a [`Transformer`] per
//! type or per member. Types without a dedicated transformer go through the
//! [`GenericObjectTransformer`], which resolves each property with the
//! precedence *explicit markers > naming conventions > direct members*.
//!
//! ```
//! use nodal_map::info::{Member, Method, TypeInfo};
//! use nodal_map::{GetTypeMeta, Mapper, TypeMeta, TypeRegistry, Typed};
//! use nodal_node::Value;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: String,
//!     age: u32,
//!     cache: Vec<u8>,
//! }
//!
//! impl Typed for User {
//!     fn type_path() -> &'static str {
//!         "demo::User"
//!     }
//! }
//!
//! impl GetTypeMeta for User {
//!     fn get_type_meta() -> TypeMeta {
//!         TypeMeta::new(
//!             TypeInfo::builder::<Self>()
//!                 .aggregate()
//!                 .member(Member::public::<Self, String>("id", |u| &u.id, |u| &mut u.id).identifier())
//!                 .member(Member::private::<u32>("age"))
//!                 .member(Member::public::<Self, Vec<u8>>("cache", |u| &u.cache, |u| &mut u.cache).ignored())
//!                 .method(Method::getter::<Self, u32>("getAge", |u| u.age))
//!                 .method(Method::setter::<Self, u32>("setAge", |u, age| u.age = age))
//!                 .with_default()
//!                 .build(),
//!         )
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<User>();
//! let mapper = Mapper::new(registry);
//!
//! let user = User { id: "ada".into(), age: 36, cache: vec![1, 2] };
//! let node = mapper.to_node(Some(&user)).unwrap();
//! assert_eq!(node.name_str(), Some("ada"));
//! assert_eq!(node.child("age").and_then(|n| n.value()), Some(&Value::UInt(36)));
//! assert!(node.child("cache").is_none());
//!
//! let back: User = mapper.from_node(&node).unwrap().unwrap();
//! assert_eq!(back, User { id: "ada".into(), age: 36, cache: vec![] });
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod error;
mod impls;
mod instantiate;
mod mapper;
mod reflect;

pub mod info;
pub mod inspect;
pub mod registry;
pub mod transform;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cell::{GenericTypePathCell, concat};
pub use error::{AccessError, BoxError, TransformError};
pub use instantiate::Instantiator;
pub use mapper::Mapper;
pub use reflect::{Reflect, Typed, take_value};
pub use registry::{GetTypeMeta, TypeMeta, TypeRegistry};
pub use transform::{GenericObjectTransformer, MapContext, Transformer};
