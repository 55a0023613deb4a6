mod context;
mod proxy;

use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::SharedManaged;
use crate::field::Inject;
use crate::key::TypeKey;
use crate::lifecycle::OwnerId;
use crate::scope::Scope;
use crate::util::any::Downcast;

pub use context::{CallContext, InjectionTrace};
pub(crate) use proxy::ContextForwardingInjectorProxy;

/// A type-erased source of managed objects.
///
/// [`Injector::dyn_get`] starts a new resolution request, while
/// [`Injector::dyn_get_dependency`] continues the request described by
/// `context`, which is how providers fetch their dependencies.
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    fn dyn_get(&self, key: TypeKey) -> Result<Box<dyn SharedManaged>, InjectorError>;

    fn dyn_get_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError>;
}

/// A statically typed front end of [`Injector`].
pub trait TypedInjector: Injector {
    /// Resolves the object of type `T`, constructing and caching it if it's
    /// absent from its scope.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` or one of its transitive dependencies can't be
    /// resolved.
    fn get<T>(&self) -> Result<T, InjectorError>
    where
        T: SharedManaged,
    {
        match self.dyn_get(TypeKey::of::<T>()) {
            Ok(boxed) => match boxed.downcast::<T>() {
                Ok(object) => Ok(*object),
                Err(_) => unreachable!("the object's type should be `T`"),
            },
            Err(err) => Err(err),
        }
    }

    /// Populates the injection points of an already constructed `target`.
    ///
    /// Fields are assigned in declaration order and the first failure aborts
    /// the remaining ones. Fields assigned before the failure keep their new
    /// values.
    ///
    /// # Errors
    ///
    /// Returns the error of the first field that can't be resolved.
    fn inject<T>(&self, target: &mut T) -> Result<(), InjectorError>
    where
        T: Inject + ?Sized,
    {
        target.inject_fields(self.upcast_dyn())
    }

    fn upcast_dyn(&self) -> &dyn Injector;
}

impl<T> TypedInjector for T
where
    T: Injector,
{
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

impl TypedInjector for dyn Injector + '_ {
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum InjectorError {
    #[snafu(display("could not find a provider or a component for {key}"))]
    #[non_exhaustive]
    UnresolvedDependency { key: TypeKey },
    #[snafu(display("could not construct the object {key} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { key: TypeKey },
    #[snafu(display(
        "could not inject the {scope} object {key} into the {requester_scope} object {requester}"
    ))]
    #[non_exhaustive]
    ShortLifetime {
        key: TypeKey,
        scope: Scope,
        requester: TypeKey,
        requester_scope: Scope,
    },
    #[snafu(display("could not resolve the {scope} object {key} without an owner"))]
    #[non_exhaustive]
    OwnerRequired { key: TypeKey, scope: Scope },
    #[snafu(display("could not resolve {key} against {owner} whose scopes were torn down"))]
    #[non_exhaustive]
    StaleOwnerAccess { key: TypeKey, owner: OwnerId },
    #[snafu(display("could not construct the object {key}"))]
    #[non_exhaustive]
    ObjectConstruction {
        key: TypeKey,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl InjectorError {
    /// Returns the key the failing request was made for.
    pub fn key(&self) -> TypeKey {
        match self {
            Self::UnresolvedDependency { key }
            | Self::CyclicDependency { key }
            | Self::ShortLifetime { key, .. }
            | Self::OwnerRequired { key, .. }
            | Self::StaleOwnerAccess { key, .. }
            | Self::ObjectConstruction { key, .. } => *key,
        }
    }
}
