mod closure_implementation;
mod wrapper;

use std::error::Error;

use crate::container::injector::{Injector, InjectorError};
use crate::container::SharedManaged;

pub use wrapper::ClosureProvider;

/// A specialized form of [`Fn`] that can be called by supplying arguments
/// resolved from an [`Injector`].
///
/// Closures of `Fn(A1, A2, ...) -> Result<T, E> + Send + Sync + 'static`
/// where `Ai: SharedManaged` are [`Closure`]. Each argument is resolved by its
/// type, in the order the parameters are declared.
///
/// Usually you don't need to use a [`Closure`] directly. The most recommended
/// way is to use `to_closure()` [`dsl`]s offered by this crate. Or wrap your
/// [`Closure`] in a [`ClosureProvider`] if you need low-level control.
///
/// Due to the lack of variadic generics, [`Closure`] is only implemented by
/// functions whose arity is at most 12.
///
/// [`dsl`]: crate::module::dsl
pub trait Closure<D>
where
    Self: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// The successfully constructed object.
    type Constructed: SharedManaged;

    /// The error occurred in object construction after all dependencies are
    /// resolved.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Resolves the dependencies from the injector and calls `self` with
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if all dependencies can't be resolved.
    ///
    /// Returns an inner error [`Closure::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn run(
        &self,
        injector: &dyn Injector,
    ) -> Result<Result<Self::Constructed, Self::Error>, InjectorError>;
}
