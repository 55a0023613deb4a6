use crate::container::injector::{InjectorError, TypedInjector};

/// A type whose fields can be populated after construction.
///
/// Usually you don't implement [`Inject`] by hand; derive it and mark each
/// injection point with `#[inject]`:
///
/// ```rust
/// # use std::sync::Arc;
/// # use kdi::prelude::*;
/// struct Repository;
///
/// #[derive(Inject, Default)]
/// struct ProfileScreen {
///     #[inject]
///     repository: Option<Arc<Repository>>,
///     title: String,
/// }
/// ```
///
/// An `Option<T>` field receives `Some(object)`; any other field is assigned
/// the resolved object directly.
pub trait Inject {
    /// Resolves and assigns every injection point in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first injection point that can't be resolved.
    /// The remaining injection points are left untouched, and the ones before
    /// it keep their newly assigned values.
    fn inject_fields<I>(&mut self, injector: &I) -> Result<(), InjectorError>
    where
        I: TypedInjector + ?Sized;
}
