//! A lifecycle-scoped dependency injection runtime.
//!
//! Bindings are declared by [`Module`]s and frozen into a [`Container`].
//! Every binding lives in a [`Scope`]: singleton objects are shared by the
//! whole container, while activity and fragment objects are cached per
//! [`Owner`] and discarded when the owner terminates.
//!
//! [`Module`]: module::Module
//! [`Container`]: container::Container
//! [`Scope`]: scope::Scope
//! [`Owner`]: lifecycle::Owner

#![allow(clippy::new_without_default)]

extern crate self as kdi;

pub mod container;
pub mod field;
pub mod key;
pub mod lifecycle;
pub mod module;
pub mod provider;
pub mod scope;
mod util;

pub use kdi_derive::{component, Inject};

pub mod prelude {
    pub use crate::component;
    pub use crate::container::injector::{Injector, InjectorError, TypedInjector};
    pub use crate::container::registry::{Configurer, Registry, RegistryError, TypedConfigurer};
    pub use crate::container::{Container, ContainerConfig, StaleOwnerPolicy};
    pub use crate::field::Inject;
    pub use crate::key;
    pub use crate::lifecycle::{Lifecycle, Owner, OwnerId};
    pub use crate::module::dsl::bind;
    pub use crate::module::{Configuration, Module};
    pub use crate::scope::Scope;
    pub use crate::Inject;
}
