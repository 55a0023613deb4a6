use crate::container::registry::{Configurer, TypedConfigurer};
use crate::container::SharedManaged;
use crate::provider::TypedProvider;
use crate::scope::Scope;

pub struct ProviderBinding<T, P>
where
    T: SharedManaged,
    P: TypedProvider<Output = T>,
{
    provider: P,
    scope: Scope,
}

impl<T, P> ProviderBinding<T, P>
where
    T: SharedManaged,
    P: TypedProvider<Output = T>,
{
    pub(super) fn new(provider: P, scope: Scope) -> Self {
        Self { provider, scope }
    }

    pub fn within(self, scope: Scope) -> Self {
        Self::new(self.provider, scope)
    }

    pub fn set_on(self, configurer: &mut dyn Configurer) {
        configurer.register(self.provider, self.scope);
    }
}
