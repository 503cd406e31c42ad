use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;

use nodal_node::NodeError;
use thiserror::Error;

/// Failure raised by user code the mapper calls into: accessors, mutators
/// and constructors.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// AccessError

/// A member could not be read directly.
///
/// The forward pass recovers from this error by skipping the member.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("member `{0}` is not directly visible")]
    NotVisible(&'static str),

    #[error("receiver mismatch: expected `{expected}`, found `{found}`")]
    Receiver {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// TransformError

/// Every fatal condition of a forward or reverse pass.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    #[error("`{owner}::{method}` failed")]
    Invocation {
        owner: &'static str,
        method: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("identifier `{owner}::{member}` must be a `String`, found `{found}`")]
    IdentifierType {
        owner: &'static str,
        member: &'static str,
        found: &'static str,
    },

    #[error("`{owner}` has no member or mutator for child `{name}`")]
    MissingTarget { owner: &'static str, name: String },

    #[error("cannot instantiate `{type_path}`: {preferred}; bypass: {bypass}")]
    Instantiation {
        type_path: &'static str,
        preferred: BoxError,
        bypass: BoxError,
    },

    #[error("member `{owner}::{member}` is not writable")]
    FieldAccess {
        owner: &'static str,
        member: &'static str,
    },

    #[error("type `{0}` is not registered")]
    UnknownType(String),

    #[error("composite node carries no represented type")]
    MissingType,

    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    Mismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("{message}")]
    Custom {
        message: Cow<'static, str>,
        #[source]
        source: Option<BoxError>,
    },
}

impl TransformError {
    #[inline]
    pub fn mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// An error carrying only a message, for custom transformers.
    #[inline]
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    /// An error wrapping an underlying cause, for custom transformers.
    #[inline]
    pub fn wrap(message: impl Into<Cow<'static, str>>, source: impl Into<BoxError>) -> Self {
        Self::Custom {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
