mod wrapper;

use std::error::Error;

use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::SharedManaged;
use crate::scope::Scope;

pub use wrapper::ComponentProvider;

/// A type that has a dedicated constructor for dependency injection.
///
/// A [`Component`] is what the container falls back to when no explicit
/// provider is bound for a key: every registered component contributes a
/// provider of [`Component::Constructed`] within [`Component::SCOPE`].
///
/// Usually, you don't need to implement the [`Component`] trait manually for
/// your components, because the [`component`] macro helps with this. In case
/// that you really want to write implementation in your own, take a look at
/// the following code snippet:
///
/// ```rust
/// # use std::sync::Arc;
/// # use std::convert::Infallible;
/// # use kdi::container::injector::{TypedInjector, InjectorError};
/// # use kdi::provider::component::Component;
/// # use kdi::scope::Scope;
/// #
/// trait Catalogue: Send + Sync + 'static {}
///
/// struct RemoteCatalogue {
///     endpoint: Arc<String>,
/// }
///
/// impl Catalogue for RemoteCatalogue {}
///
/// impl Component for RemoteCatalogue {
///     type Constructed = Arc<dyn Catalogue>;
///
///     type Error = Infallible;
///
///     const SCOPE: Scope = Scope::Activity;
///
///     fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
///     where
///         I: TypedInjector + ?Sized
///     {
///         let endpoint = injector.get()?;
///         Ok(Ok(Self { endpoint }))
///     }
///
///     fn post_process(self) -> Self::Constructed {
///         Arc::new(self)
///     }
/// }
/// ```
///
/// [`component`]: crate::component
pub trait Component: Sized + 'static {
    /// The successfully constructed object. This is usually `Arc<Self>`, or an
    /// `Arc<dyn Trait>` when the component is looked up by its interface.
    type Constructed: SharedManaged;

    /// The error occurred in object construction after all dependencies are
    /// resolved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// The scope the component is registered within unless a binding
    /// overrides it.
    const SCOPE: Scope = Scope::Singleton;

    /// Resolves the dependencies from the injector and creates the object.
    ///
    /// # Errors
    ///
    /// Returns an error if all dependencies can't be resolved.
    ///
    /// Returns an inner error [`Component::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn construct<I>(injector: &I) -> Result<Result<Self, Self::Error>, InjectorError>
    where
        I: TypedInjector + ?Sized;

    /// Converts `self` to [`Component::Constructed`]. Typical usages are
    /// putting `self` to an [`Arc`] and coercing it to an `Arc<dyn Trait>`.
    ///
    /// [`Arc`]: std::sync::Arc
    fn post_process(self) -> Self::Constructed;
}
