use std::marker::PhantomData;

use crate::container::registry::{Configurer, TypedConfigurer};
use crate::container::SharedManaged;
use crate::provider::closure::{Closure, ClosureProvider};
use crate::scope::Scope;

pub struct ClosureBinding<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    closure: C,
    scope: Scope,
    _marker: PhantomData<fn() -> D>,
}

impl<T, C, D> ClosureBinding<T, C, D>
where
    T: SharedManaged,
    C: Closure<D, Constructed = T>,
    D: Send + Sync + 'static,
{
    pub(super) fn new(closure: C, scope: Scope) -> Self {
        Self {
            closure,
            scope,
            _marker: PhantomData,
        }
    }

    pub fn within(self, scope: Scope) -> Self {
        Self::new(self.closure, scope)
    }

    pub fn set_on(self, configurer: &mut dyn Configurer) {
        let provider = ClosureProvider::new(self.closure);
        configurer.register(provider, self.scope);
    }
}
