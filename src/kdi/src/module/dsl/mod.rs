//! A fluent binding language used inside [`Module::configure`].
//!
//! Every binding starts with [`bind`], naming the handle type to bind, is
//! optionally given a scope with `within`, picks a provider and is finally
//! registered with `set_on`. Bindings without an explicit scope are
//! singletons, except component bindings which default to the component's
//! declared scope.
//!
//! [`Module::configure`]: crate::module::Module::configure

pub mod closure_helper;
pub mod component_helper;
pub mod instance_helper;
pub mod metadata_helper;
pub mod provider_helper;

use metadata_helper::MetadataBinding;

use crate::container::SharedManaged;

pub fn bind<T>() -> MetadataBinding<T>
where
    T: SharedManaged,
{
    MetadataBinding::new(None)
}
