use std::marker::PhantomData;
use std::sync::Arc;

use kdi::prelude::*;

pub struct Repository;

#[derive(Inject)]
pub struct Screen {
    #[inject]
    pub repository: Option<Arc<Repository>>,
    #[inject]
    pub title: Arc<String>,
    pub visible: bool,
}

#[derive(Inject, Default)]
pub struct Empty {
    pub count: u32,
}

#[derive(Inject)]
pub struct Generic<T: Send + Sync + 'static> {
    #[inject]
    pub value: Option<Arc<T>>,
    _marker: PhantomData<T>,
}

fn main() {}
