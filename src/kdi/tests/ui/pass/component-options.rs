use std::sync::Arc;

use kdi::prelude::*;
use kdi::provider::component::Component;

pub trait Catalogue: Send + Sync + 'static {}

pub struct Remote;

impl Catalogue for Remote {}

#[component(scope = Activity)]
impl Remote {
    pub fn new() -> Self {
        Self
    }
}

pub struct Local;

impl Catalogue for Local {}

#[component(Arc<dyn Catalogue>, Arc::new)]
impl Local {
    pub fn new() -> Self {
        Self
    }
}

pub struct Cached;

impl Catalogue for Cached {}

#[component(Arc<dyn Catalogue>, Arc::new, scope = Fragment)]
impl Cached {
    pub fn new(_remote: Arc<Remote>) -> Self {
        Self
    }
}

pub struct Holder<T: Send + Sync + 'static> {
    _value: Arc<T>,
}

#[component]
impl<T: Send + Sync + 'static> Holder<T> {
    pub fn new(value: Arc<T>) -> Self {
        Self { _value: value }
    }
}

fn main() {
    assert_eq!(<Remote as Component>::SCOPE, Scope::Activity);
    assert_eq!(<Local as Component>::SCOPE, Scope::Singleton);
    assert_eq!(<Cached as Component>::SCOPE, Scope::Fragment);
    assert_eq!(<Holder<u8> as Component>::SCOPE, Scope::Singleton);
}
