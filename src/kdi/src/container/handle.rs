use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::debug;

use crate::container::core::ContainerCore;
use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::registry::{ConfigurerImpl, Registry, RegistryError};
use crate::container::SharedManaged;
use crate::field::Inject;
use crate::key::TypeKey;
use crate::lifecycle::{Owner, OwnerId};
use crate::module::Module;
use crate::util::any::Downcast;

/// What a container does when an owner-scoped object is requested on behalf
/// of an owner whose scopes have already been torn down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleOwnerPolicy {
    /// Fail with [`InjectorError::StaleOwnerAccess`].
    #[default]
    Reject,
    /// Bind the owner again to fresh, empty scopes. The owner is subscribed
    /// again, so an owner which has already terminated discards them at once
    /// and every request receives a new object.
    Recreate,
}

/// Runtime behavior of a [`Container`].
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    pub stale_owners: StaleOwnerPolicy,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stale_owners(mut self, policy: StaleOwnerPolicy) -> Self {
        self.stale_owners = policy;
        self
    }
}

/// A dependency injection container.
///
/// A [`Container`] is a cheap handle: clones share the same bindings and the
/// same scope stores, and may be sent to other threads.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use std::error::Error;
/// # use kdi::prelude::*;
/// struct Greeting(String);
///
/// struct GreetingModule;
///
/// impl Module for GreetingModule {
///     fn configure(
///         &self,
///         configurer: &mut dyn Configurer,
///     ) -> Result<(), Box<dyn Error + Send + Sync>> {
///         bind::<Arc<Greeting>>()
///             .within(Scope::Activity)
///             .to_factory(|| Arc::new(Greeting(String::from("hello"))))
///             .set_on(configurer);
///         Ok(())
///     }
/// }
///
/// let container = Container::init(GreetingModule).unwrap();
/// let screen = Lifecycle::new();
///
/// let first: Arc<Greeting> = container.resolve(Some(&screen)).unwrap();
/// let second: Arc<Greeting> = container.with_owner(&screen).get().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.0, "hello");
///
/// screen.terminate();
/// assert!(!container.is_owner_active(screen.id()));
/// ```
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    /// Builds a container from `module` with the given runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any module fails to configure itself.
    pub fn init_with<M>(module: M, config: ContainerConfig) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let mut configurer = ConfigurerImpl::new();
        module.setup(&mut configurer);
        let providers = configurer.finish()?;
        debug!(bindings = providers.len(), ?config, "container initialized");
        Ok(Self {
            core: ContainerCore::new(providers, config),
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        self.core.config()
    }

    /// Resolves the object of type `T` on behalf of `owner`.
    ///
    /// Singleton objects are shared regardless of `owner`. Objects of an
    /// owner-bound scope are cached per owner and require one.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` or one of its transitive dependencies can't be
    /// resolved.
    pub fn resolve<T>(&self, owner: Option<&dyn Owner>) -> Result<T, InjectorError>
    where
        T: SharedManaged,
    {
        match self.core.resolve(TypeKey::of::<T>(), owner) {
            Ok(boxed) => match boxed.downcast::<T>() {
                Ok(object) => Ok(*object),
                Err(_) => unreachable!("the object's type should be `T`"),
            },
            Err(err) => Err(err),
        }
    }

    /// Populates the injection points of `target` on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first injection point that can't be resolved.
    /// Injection points assigned before it are not rolled back.
    pub fn inject<T>(&self, target: &mut T, owner: Option<&dyn Owner>) -> Result<(), InjectorError>
    where
        T: Inject + ?Sized,
    {
        match owner {
            Some(owner) => self.with_owner(owner).inject(target),
            None => TypedInjector::inject(self, target),
        }
    }

    /// Returns an [`Injector`] whose requests are all made on behalf of
    /// `owner`.
    pub fn with_owner<'a>(&'a self, owner: &'a dyn Owner) -> OwnerInjector<'a> {
        OwnerInjector {
            core: &self.core,
            owner,
        }
    }

    /// Tears down every scope of `owner` as if it had terminated.
    ///
    /// Returns false if the owner had already been torn down. The container
    /// remembers the id of every torn down owner for as long as it lives, so
    /// that later requests on its behalf follow [`ContainerConfig::stale_owners`].
    /// The subscription to the owner's terminal event is kept.
    pub fn release_owner(&self, owner: OwnerId) -> bool {
        self.core.teardown(owner)
    }

    /// Returns true if `owner` currently holds live scope stores.
    pub fn is_owner_active(&self, owner: OwnerId) -> bool {
        self.core.is_owner_active(owner)
    }
}

impl Registry for Container {
    fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        Self::init_with(module, ContainerConfig::default())
    }
}

impl Injector for Container {
    fn dyn_get(&self, key: TypeKey) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.core.dyn_get(key)
    }

    fn dyn_get_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.core.dyn_get_dependency(key, context)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Container")
            .field("config", self.core.config())
            .finish_non_exhaustive()
    }
}

/// An [`Injector`] bound to one [`Owner`], created by
/// [`Container::with_owner`].
pub struct OwnerInjector<'a> {
    core: &'a ContainerCore,
    owner: &'a dyn Owner,
}

impl OwnerInjector<'_> {
    pub fn owner_id(&self) -> OwnerId {
        self.owner.owner_id()
    }
}

impl Injector for OwnerInjector<'_> {
    fn dyn_get(&self, key: TypeKey) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.core.resolve(key, Some(self.owner))
    }

    fn dyn_get_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.core.dyn_get_dependency(key, context)
    }
}
