use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::reflect::{Reflect, Typed};
use crate::{BoxError, TransformError};

type Construct = Arc<dyn Fn() -> Result<Box<dyn Reflect>, BoxError> + Send + Sync>;

#[inline]
fn construct<F>(f: F) -> Construct
where
    F: Fn() -> Result<Box<dyn Reflect>, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// Instantiator

/// Produces blank instances of one type for the reverse pass.
///
/// Two strategies are tried in order: the *preferred* one runs an
/// argument-less constructor, the *bypass* one produces a blank value
/// without running any constructor logic. Either may be missing.
///
/// # Examples
///
/// ```
/// use nodal_map::{Instantiator, Typed};
///
/// struct Session { token: String }
/// impl Typed for Session {
///     fn type_path() -> &'static str {
///         "demo::Session"
///     }
/// }
///
/// fn connect() -> Result<Session, &'static str> {
///     Err("no network")
/// }
///
/// let instantiator = Instantiator::none()
///     .with_constructor(connect)
///     .with_bypass(|| Session { token: String::new() });
///
/// let session = instantiator.create(Session::type_path()).unwrap();
/// assert!(session.is::<Session>());
///
/// let err = Instantiator::none().with_constructor(connect).create("Session").unwrap_err();
/// assert!(err.to_string().contains("no network"));
/// ```
#[derive(Clone, Default)]
pub struct Instantiator {
    preferred: Option<Construct>,
    bypass: Option<Construct>,
}

impl Instantiator {
    /// An instantiator without any strategy.
    #[inline]
    pub const fn none() -> Self {
        Self {
            preferred: None,
            bypass: None,
        }
    }

    /// Sets the preferred strategy to [`Default::default`].
    pub fn with_default<T: Typed + Default>(mut self) -> Self {
        self.preferred = Some(construct(|| Ok(Box::new(T::default()) as Box<dyn Reflect>)));
        self
    }

    /// Sets the preferred strategy to a fallible constructor.
    pub fn with_constructor<T: Typed, E: Into<BoxError> + 'static>(
        mut self,
        f: fn() -> Result<T, E>,
    ) -> Self {
        self.preferred = Some(construct(move || match f() {
            Ok(value) => Ok(Box::new(value) as Box<dyn Reflect>),
            Err(err) => Err(err.into()),
        }));
        self
    }

    /// Sets the bypass strategy.
    pub fn with_bypass<T: Typed>(mut self, f: fn() -> T) -> Self {
        self.bypass = Some(construct(move || Ok(Box::new(f()) as Box<dyn Reflect>)));
        self
    }

    #[inline]
    pub fn has_preferred(&self) -> bool {
        self.preferred.is_some()
    }

    #[inline]
    pub fn has_bypass(&self) -> bool {
        self.bypass.is_some()
    }

    pub fn try_preferred(&self) -> Result<Box<dyn Reflect>, BoxError> {
        match &self.preferred {
            Some(construct) => (**construct)(),
            None => Err("no argument-less constructor declared".into()),
        }
    }

    pub fn try_bypass(&self) -> Result<Box<dyn Reflect>, BoxError> {
        match &self.bypass {
            Some(construct) => (**construct)(),
            None => Err("no blank value declared".into()),
        }
    }

    /// Tries the preferred strategy, then the bypass strategy.
    ///
    /// Fails with [`TransformError::Instantiation`] carrying both causes when
    /// neither produces an instance.
    pub fn create(&self, type_path: &'static str) -> Result<Box<dyn Reflect>, TransformError> {
        let preferred = match self.try_preferred() {
            Ok(instance) => return Ok(instance),
            Err(err) => err,
        };
        log::debug!("`{type_path}`: preferred construction failed ({preferred}), using bypass");
        self.try_bypass()
            .map_err(|bypass| TransformError::Instantiation {
                type_path,
                preferred,
                bypass,
            })
    }
}

impl fmt::Debug for Instantiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiator")
            .field("preferred", &self.has_preferred())
            .field("bypass", &self.has_bypass())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::Instantiator;
    use crate::{TransformError, Typed};

    #[derive(Debug, Default, PartialEq)]
    struct Blank(u8);
    impl Typed for Blank {
        fn type_path() -> &'static str {
            "test::Blank"
        }
    }

    #[test]
    fn preferred_wins() {
        let instantiator = Instantiator::none()
            .with_default::<Blank>()
            .with_bypass(|| Blank(9));
        let value = instantiator.create(Blank::type_path()).unwrap();
        assert_eq!(value.downcast_ref::<Blank>(), Some(&Blank(0)));
    }

    #[test]
    fn missing_constructor_falls_back_to_bypass() {
        let instantiator = Instantiator::none().with_bypass(|| Blank(9));
        assert!(instantiator.try_preferred().is_err());
        let value = instantiator.create(Blank::type_path()).unwrap();
        assert_eq!(value.downcast_ref::<Blank>(), Some(&Blank(9)));
    }

    #[test]
    fn both_strategies_failing_is_fatal() {
        let err = Instantiator::none().create("demo::Blank").unwrap_err();
        let TransformError::Instantiation { type_path, preferred, bypass } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(*type_path, "demo::Blank");
        assert_eq!(preferred.to_string(), "no argument-less constructor declared");
        assert_eq!(bypass.to_string(), "no blank value declared");
    }
}
