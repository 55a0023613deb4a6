use std::marker::PhantomData;

use crate::container::registry::{Configurer, TypedConfigurer};
use crate::provider::component::Component;
use crate::scope::Scope;

pub struct ComponentBinding<C>
where
    C: Component,
{
    scope: Option<Scope>,
    _marker: PhantomData<fn() -> C>,
}

impl<C> ComponentBinding<C>
where
    C: Component,
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

    pub fn set_on(self, configurer: &mut dyn Configurer) {
        let scope = self.scope.unwrap_or(C::SCOPE);
        configurer.register_component_within::<C>(scope);
    }
}
