use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::injector::{CallContext, InjectorError, TypedInjector};
use crate::container::SharedManaged;
use crate::provider::TypedProvider;

/// A [`Provider`] backed by a zero-argument function.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use kdi::provider::factory::FactoryProvider;
/// let provider = FactoryProvider::new(|| Arc::new(String::from("catalogue")));
/// ```
///
/// [`Provider`]: crate::provider::Provider
pub struct FactoryProvider<T, F>
where
    T: SharedManaged,
    F: Fn() -> T + Send + Sync + 'static,
{
    factory: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> FactoryProvider<T, F>
where
    T: SharedManaged,
    F: Fn() -> T + Send + Sync + 'static,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Debug for FactoryProvider<T, F>
where
    T: SharedManaged,
    F: Fn() -> T + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FactoryProvider<T, F>")
            .finish_non_exhaustive()
    }
}

impl<T, F> TypedProvider for FactoryProvider<T, F>
where
    T: SharedManaged,
    F: Fn() -> T + Send + Sync + 'static,
{
    type Output = T;

    fn provide<I>(
        &self,
        _injector: &I,
        _context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        Ok((self.factory)())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::container::injector::MockInjector;

    use super::*;

    #[test]
    fn factory_provider_creates_new_object_on_each_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = FactoryProvider::new({
            let calls = Arc::clone(&calls);
            move || Arc::new(calls.fetch_add(1, Ordering::SeqCst))
        });
        let injector = MockInjector::new();

        let first = provider.provide(&injector, &CallContext::new(None)).unwrap();
        let second = provider.provide(&injector, &CallContext::new(None)).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
