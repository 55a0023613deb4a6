mod configurer;
mod provider_map;

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use snafu::prelude::*;

use crate::container::SharedManaged;
use crate::key::TypeKey;
use crate::module::Module;
use crate::provider::component::{Component, ComponentProvider};
use crate::provider::factory::FactoryProvider;
use crate::provider::{Provider, TypedProvider};
use crate::scope::Scope;

pub(super) use configurer::ConfigurerImpl;
pub use provider_map::Origin;
pub(super) use provider_map::{ProviderEntry, ProviderMap};

/// A type that can be built from the bindings declared by a [`Module`].
pub trait Registry: Sized + Send + Sync + 'static {
    /// Collects every binding of `module` and freezes them.
    ///
    /// # Errors
    ///
    /// Returns an error if any module fails to configure itself.
    fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module;
}

/// The registration surface handed to [`Module::configure`].
///
/// Registering a key twice is not an error: the last registration of the
/// same origin wins, and explicit providers always take precedence over
/// component providers. See [`TypedConfigurer`] for the registration methods.
pub trait Configurer: Send + Sync + 'static {
    #[doc(hidden)]
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn ConfigurerPrivate;

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>);
}

trait ConfigurerPrivate: Configurer {
    fn dyn_register(
        &mut self,
        key: TypeKey,
        provider: Box<dyn Provider>,
        scope: Scope,
        origin: Origin,
    );
}

pub trait TypedConfigurer: Configurer {
    /// Registers an explicit provider of `P::Output` within `scope`.
    fn register<P>(&mut self, provider: P, scope: Scope)
    where
        P: TypedProvider,
    {
        self.as_private().dyn_register(
            TypeKey::of::<P::Output>(),
            Box::new(provider),
            scope,
            Origin::Explicit,
        );
    }

    /// Registers a zero-argument factory of `T` within `scope`.
    fn register_factory<T, F>(&mut self, factory: F, scope: Scope)
    where
        T: SharedManaged,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(FactoryProvider::new(factory), scope);
    }

    /// Registers the provider synthesized from `C`'s [`Component`]
    /// implementation, within the scope declared by `C::SCOPE`.
    fn register_component<C>(&mut self)
    where
        C: Component,
    {
        self.register_component_within::<C>(C::SCOPE);
    }

    /// Same as [`TypedConfigurer::register_component`], but overrides the
    /// scope declared by the component.
    fn register_component_within<C>(&mut self, scope: Scope)
    where
        C: Component,
    {
        self.as_private().dyn_register(
            TypeKey::of::<C::Constructed>(),
            Box::new(ComponentProvider::<C>::new()),
            scope,
            Origin::Component,
        );
    }
}

impl<T: Configurer + ?Sized> TypedConfigurer for T {}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("module {module} fails to setup the configuration"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("aggregated registry errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<RegistryError> },
}

struct AggregatedDisplayer<'a> {
    errors: &'a [RegistryError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [RegistryError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
        }
        Ok(())
    }
}
