pub mod closure;
pub mod component;
pub mod factory;
pub mod instance;

use std::fmt::Debug;

use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::SharedManaged;

/// A universal factory which constructs objects of one type.
///
/// A [`Provider`] is responsible for constructing a object on each request and
/// retrieving all dependencies from an [`Injector`]. The container caches what
/// a [`Provider`] returns in the scope of the binding, so a [`Provider`] is
/// invoked at most once per scope store.
///
/// In convention, a [`Provider`] is a stateless object and may be used by
/// multiple threads. Each request should receive a newly created object,
/// unless the provider deliberately hands out one fixed instance like
/// [`InstanceProvider`] does.
///
/// Usually, you don't need to implement [`Provider`] manually, since this is
/// automatically done by [`TypedProvider`]'s blanket implementation.
///
/// [`InstanceProvider`]: crate::provider::instance::InstanceProvider
pub trait Provider: Debug + Send + Sync + 'static {
    /// Provides a newly created type-erased object. The `injector` continues
    /// the request described by `context` when dependencies are fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if all dependencies can't be fetched or the object
    /// construction fails.
    fn dyn_provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError>;
}

/// A static variant of the [`Provider`] trait, leveraging static dispatch and
/// type-safety.
pub trait TypedProvider: Provider {
    /// The return type in response to each request to the provider.
    type Output: SharedManaged;

    /// Provides a newly created object of type [`TypedProvider::Output`].
    ///
    /// # Errors
    ///
    /// Returns an error if all dependencies can't be fetched or the object
    /// construction fails.
    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized;
}

impl<T: TypedProvider> Provider for T {
    fn dyn_provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.provide(injector, context)
            .map(|obj| -> Box<dyn SharedManaged> { Box::new(obj) })
    }
}
