use crate::container::registry::{Configurer, TypedConfigurer};
use crate::container::SharedManaged;
use crate::provider::instance::InstanceProvider;
use crate::scope::Scope;

pub struct InstanceBinding<T>
where
    T: SharedManaged + Clone,
{
    instance: T,
    scope: Scope,
}

impl<T> InstanceBinding<T>
where
    T: SharedManaged + Clone,
{
    pub(super) fn new(instance: T, scope: Scope) -> Self {
        Self { instance, scope }
    }

    pub fn within(self, scope: Scope) -> Self {
        Self::new(self.instance, scope)
    }

    pub fn set_on(self, configurer: &mut dyn Configurer) {
        let provider = InstanceProvider::new(self.instance);
        configurer.register(provider, self.scope);
    }
}
