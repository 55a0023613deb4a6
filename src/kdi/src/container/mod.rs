pub mod injector;
pub mod registry;

mod binder;
mod core;
mod handle;
mod scopes;
mod store;

use std::sync::Arc;

use crate::util::any::AsAny;

pub use handle::{Container, ContainerConfig, OwnerInjector, StaleOwnerPolicy};

/// A handle to an object managed by a container.
///
/// Managed objects are always shared: the container keeps one handle in a
/// scope store and hands out clones, so two resolutions of the same key within
/// a scope point to the same object. [`SharedManaged`] is implemented for any
/// [`Arc`], including `Arc<dyn Trait>`.
pub trait SharedManaged: AsAny + Send + Sync + 'static {
    fn dyn_clone(&self) -> Box<dyn SharedManaged>;
}

impl<T> SharedManaged for Arc<T>
where
    T: Send + Sync + ?Sized + 'static,
{
    fn dyn_clone(&self) -> Box<dyn SharedManaged> {
        Box::new(Arc::clone(self))
    }
}
