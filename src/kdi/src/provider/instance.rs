use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::container::injector::{CallContext, InjectorError, TypedInjector};
use crate::container::SharedManaged;
use crate::provider::TypedProvider;

/// A [`Provider`] which hands out clones of one pre-built handle.
///
/// [`Provider`]: crate::provider::Provider
pub struct InstanceProvider<T>
where
    T: SharedManaged + Clone,
{
    instance: T,
}

impl<T> InstanceProvider<T>
where
    T: SharedManaged + Clone,
{
    pub fn new(instance: T) -> Self {
        Self { instance }
    }
}

impl<T> Debug for InstanceProvider<T>
where
    T: SharedManaged + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstanceProvider<T>")
            .finish_non_exhaustive()
    }
}

impl<T> TypedProvider for InstanceProvider<T>
where
    T: SharedManaged + Clone,
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
        Ok(self.instance.clone())
    }
}
