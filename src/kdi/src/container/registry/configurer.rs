use std::error::Error;

use crate::container::registry::provider_map::{Origin, ProviderEntry, ProviderMap};
use crate::container::registry::{Configurer, ConfigurerPrivate, RegistryError};
use crate::key::TypeKey;
use crate::provider::Provider;
use crate::scope::Scope;

pub struct ConfigurerImpl {
    providers: ProviderMap,
    errors: Vec<RegistryError>,
}

impl ConfigurerImpl {
    pub fn new() -> Self {
        Self {
            providers: ProviderMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Result<ProviderMap, RegistryError> {
        match self.errors.len() {
            0 => Ok(self.providers),
            1 => Err(self.errors.remove(0)),
            _ => Err(RegistryError::Aggregated {
                errors: self.errors,
            }),
        }
    }
}

impl Configurer for ConfigurerImpl {
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn ConfigurerPrivate {
        self
    }

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        self.errors.push(RegistryError::ModuleInner {
            module,
            source: err,
        });
    }
}

impl ConfigurerPrivate for ConfigurerImpl {
    fn dyn_register(
        &mut self,
        key: TypeKey,
        provider: Box<dyn Provider>,
        scope: Scope,
        origin: Origin,
    ) {
        self.providers
            .insert(ProviderEntry::new(key, provider, scope, origin));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::container::registry::TypedConfigurer;
    use crate::key;
    use crate::provider::instance::InstanceProvider;

    use super::*;

    #[test]
    fn configurer_impl_register_succeeds() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(InstanceProvider::new(Arc::new(42i32)), Scope::Singleton);
        configurer.register_factory(|| Arc::new(String::from("str")), Scope::Activity);

        let map = configurer.finish().unwrap();
        assert!(map.get(key::of::<Arc<i32>>()).is_some());
        assert_eq!(
            map.get(key::of::<Arc<String>>()).map(ProviderEntry::scope),
            Some(Scope::Activity)
        );
    }

    #[test]
    fn configurer_impl_finish_succeeds_when_key_is_registered_twice() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(InstanceProvider::new(Arc::new(1i32)), Scope::Singleton);
        configurer.register(InstanceProvider::new(Arc::new(2i32)), Scope::Fragment);

        let map = configurer.finish().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(key::of::<Arc<i32>>()).map(ProviderEntry::scope),
            Some(Scope::Fragment)
        );
    }

    #[test]
    fn configurer_impl_finish_fails_when_module_error_reported() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(InstanceProvider::new(Arc::new(1i32)), Scope::Singleton);
        configurer.report_module_error("test", "whatever".into());

        assert!(matches!(
            configurer.finish(),
            Err(RegistryError::ModuleInner { module: "test", .. })
        ));
    }

    #[test]
    fn configurer_impl_finish_aggregates_multiple_errors() {
        let mut configurer = ConfigurerImpl::new();
        configurer.report_module_error("first", "whatever".into());
        configurer.report_module_error("second", "whatever".into());

        let Err(RegistryError::Aggregated { errors }) = configurer.finish() else {
            panic!("errors should be aggregated");
        };
        assert_eq!(errors.len(), 2);
    }
}
