use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::registry::{Configurer, TypedConfigurer};
use crate::container::SharedManaged;
use crate::module::dsl::closure_helper::ClosureBinding;
use crate::module::dsl::component_helper::ComponentBinding;
use crate::module::dsl::instance_helper::InstanceBinding;
use crate::module::dsl::provider_helper::ProviderBinding;
use crate::provider::closure::Closure;
use crate::provider::component::Component;
use crate::provider::factory::FactoryProvider;
use crate::provider::TypedProvider;
use crate::scope::Scope;

/// A binding which has a key and maybe a scope, but no provider yet.
pub struct MetadataBinding<T>
where
    T: SharedManaged,
{
    scope: Option<Scope>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MetadataBinding<T>
where
    T: SharedManaged,
{
    pub(super) fn new(scope: Option<Scope>) -> Self {
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    pub fn within(self, scope: Scope) -> Self {
        Self::new(Some(scope))
    }

    pub fn to_component<C>(self) -> ComponentBinding<C>
    where
        C: Component<Constructed = T>,
    {
        ComponentBinding::new(self.scope)
    }

    pub fn to_closure<C, D>(self, closure: C) -> ClosureBinding<T, C, D>
    where
        C: Closure<D, Constructed = T>,
        D: Send + Sync + 'static,
    {
        ClosureBinding::new(closure, self.scope.unwrap_or_default())
    }

    pub fn to_instance(self, instance: T) -> InstanceBinding<T>
    where
        T: Clone,
    {
        InstanceBinding::new(instance, self.scope.unwrap_or_default())
    }

    pub fn to_factory<F>(self, factory: F) -> ProviderBinding<T, FactoryProvider<T, F>>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.to_provider(FactoryProvider::new(factory))
    }

    pub fn to_provider<P>(self, provider: P) -> ProviderBinding<T, P>
    where
        P: TypedProvider<Output = T>,
    {
        ProviderBinding::new(provider, self.scope.unwrap_or_default())
    }
}

impl<C> MetadataBinding<Arc<C>>
where
    C: Component<Constructed = Arc<C>> + Send + Sync,
{
    /// Binds `Arc<C>` to `C`'s own [`Component`] implementation.
    pub fn set_on(self, configurer: &mut dyn Configurer) {
        let scope = self.scope.unwrap_or(C::SCOPE);
        configurer.register_component_within::<C>(scope);
    }
}
