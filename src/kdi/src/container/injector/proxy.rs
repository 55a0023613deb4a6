use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::SharedManaged;
use crate::key::TypeKey;

/// An [`Injector`] handed to providers, which turns every request into a
/// dependency request of the object under construction.
pub struct ContextForwardingInjectorProxy<'a, I>
where
    I: TypedInjector + ?Sized,
{
    inner: &'a I,
    context: &'a CallContext<'a>,
}

impl<'a, I> ContextForwardingInjectorProxy<'a, I>
where
    I: TypedInjector + ?Sized,
{
    pub fn new(inner: &'a I, context: &'a CallContext<'a>) -> Self {
        Self { inner, context }
    }
}

impl<I> Injector for ContextForwardingInjectorProxy<'_, I>
where
    I: TypedInjector + ?Sized,
{
    fn dyn_get(&self, key: TypeKey) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.dyn_get_dependency(key, self.context)
    }

    fn dyn_get_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.inner.dyn_get_dependency(key, context)
    }
}
