use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::injector::{
    CallContext, ContextForwardingInjectorProxy, InjectorError, TypedInjector,
};
use crate::container::SharedManaged;
use crate::key::TypeKey;
use crate::provider::closure::Closure;
use crate::provider::TypedProvider;

/// A [`Provider`] which supplies objects from a [`Closure`].
///
/// # Examples
///
/// ```rust
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use kdi::provider::closure::ClosureProvider;
/// let closure = |name: Arc<String>| Ok::<_, Infallible>(Arc::new(name.len()));
/// let provider = ClosureProvider::new(closure);
/// ```
///
/// [`Provider`]: crate::provider::Provider
pub struct ClosureProvider<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    closure: C,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<T, C, D> ClosureProvider<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    /// Creates a new [`ClosureProvider`] from a [`Closure`].
    pub fn new(closure: C) -> Self {
        Self {
            closure,
            _marker: PhantomData,
        }
    }
}

impl<T, C, D> Debug for ClosureProvider<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClosureProvider<T, C, D>")
            .finish_non_exhaustive()
    }
}

impl<T, C, D> TypedProvider for ClosureProvider<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    type Output = T;

    fn provide<I>(
        &self,
        injector: &I,
        context: &CallContext<'_>,
    ) -> Result<Self::Output, InjectorError>
    where
        I: TypedInjector + ?Sized,
    {
        let injector = ContextForwardingInjectorProxy::new(injector, context);
        match self.closure.run(&injector) {
            Ok(Ok(obj)) => Ok(obj),
            Ok(Err(err)) => Err(InjectorError::ObjectConstruction {
                key: TypeKey::of::<T>(),
                source: Arc::from(err.into()),
            }),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fmt::{Display, Formatter, Result as FmtResult};

    use crate::container::injector::MockInjector;
    use crate::key;
    use crate::scope::Scope;

    use super::*;

    #[derive(Debug)]
    struct CatalogueUnavailable;

    impl Display for CatalogueUnavailable {
        fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
            write!(f, "catalogue unavailable")
        }
    }

    impl Error for CatalogueUnavailable {}

    #[test]
    fn closure_provider_forwards_context_to_dependencies() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get_dependency()
            .times(1)
            .returning(|key, context| {
                assert_eq!(key, key::of::<Arc<i32>>());
                assert_eq!(context.key(), Some(key::of::<Arc<String>>()));
                Ok(Box::new(Arc::new(3)))
            });

        let provider = ClosureProvider::new(|n: Arc<i32>| {
            Ok::<_, CatalogueUnavailable>(Arc::new(n.to_string()))
        });
        let root = CallContext::new(None);
        let context = root.append(key::of::<Arc<String>>(), Scope::Singleton);

        let res = provider.provide(&injector, &context).unwrap();
        assert_eq!(res.as_str(), "3");
    }

    #[test]
    fn closure_provider_reports_construction_failure() {
        let injector = MockInjector::new();
        let provider =
            ClosureProvider::new(|| Err::<Arc<String>, _>(CatalogueUnavailable));

        let res = provider.provide(&injector, &CallContext::new(None));
        assert!(matches!(
            res,
            Err(InjectorError::ObjectConstruction { key, .. }) if key == key::of::<Arc<String>>()
        ));
    }
}
