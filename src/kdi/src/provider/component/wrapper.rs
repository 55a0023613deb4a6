use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::injector::{
    CallContext, ContextForwardingInjectorProxy, InjectorError, TypedInjector,
};
use crate::key::TypeKey;
use crate::provider::component::Component;
use crate::provider::TypedProvider;

/// A [`Provider`] synthesized from a [`Component`] implementation.
///
/// [`Provider`]: crate::provider::Provider
pub struct ComponentProvider<C>
where
    C: Component,
{
    _marker: PhantomData<fn() -> C>,
}

impl<C> ComponentProvider<C>
where
    C: Component,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C> Debug for ComponentProvider<C>
where
    C: Component,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ComponentProvider<C>")
            .finish_non_exhaustive()
    }
}

impl<C> TypedProvider for ComponentProvider<C>
where
    C: Component,
{
    type Output = C::Constructed;

    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        let injector = ContextForwardingInjectorProxy::new(injector, context);
        match C::construct(&injector) {
            Ok(Ok(obj)) => Ok(obj.post_process()),
            Ok(Err(err)) => Err(InjectorError::ObjectConstruction {
                key: TypeKey::of::<C::Constructed>(),
                source: Arc::from(err.into()),
            }),
            Err(err) => Err(err),
        }
    }
}
