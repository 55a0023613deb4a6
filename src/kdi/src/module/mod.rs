pub mod dsl;

use std::any;
use std::error::Error;

use crate::container::registry::Configurer;

/// A unit of binding declarations.
///
/// Implementors declare their bindings in [`Module::configure`]. Errors are
/// not propagated immediately: [`Module::setup`] reports them to the
/// [`Configurer`], so that one failing module doesn't hide the errors of the
/// others.
pub trait Module: Send + Sync + 'static {
    fn setup(&self, configurer: &mut dyn Configurer) {
        if let Err(err) = self.configure(configurer) {
            configurer.report_module_error(any::type_name::<Self>(), err);
        }
    }

    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// A [`Module`] composed of other modules, set up in insertion order.
///
/// # Examples
///
/// ```rust
/// # use std::error::Error;
/// # use kdi::prelude::*;
/// struct NetworkModule;
///
/// impl Module for NetworkModule {
///     fn configure(
///         &self,
///         _configurer: &mut dyn Configurer,
///     ) -> Result<(), Box<dyn Error + Send + Sync>> {
///         Ok(())
///     }
/// }
///
/// let app = Configuration::new().with(NetworkModule);
/// let container = Container::init(Configuration::new().compose(app)).unwrap();
/// ```
#[derive(Default)]
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }
}

impl Module for Configuration {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.modules
            .iter()
            .for_each(|module| module.setup(configurer));
        Ok(())
    }
}
