use std::error::Error;

use crate::container::injector::{Injector, InjectorError, TypedInjector};
use crate::container::SharedManaged;
use crate::provider::closure::Closure;

impl<F, T, E> Closure<()> for F
where
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    T: SharedManaged,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    type Constructed = T;

    type Error = E;

    fn run(
        &self,
        _injector: &dyn Injector,
    ) -> Result<Result<Self::Constructed, Self::Error>, InjectorError> {
        Ok(self())
    }
}

macro_rules! for_all_arities {
    ($implementation:ident) => {
        $implementation!(D1);
        $implementation!(D1, D2);
        $implementation!(D1, D2, D3);
        $implementation!(D1, D2, D3, D4);
        $implementation!(D1, D2, D3, D4, D5);
        $implementation!(D1, D2, D3, D4, D5, D6);
        $implementation!(D1, D2, D3, D4, D5, D6, D7);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12);
    };
}

macro_rules! impl_closure {
    ($($dep:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, T, E, $($dep,)*> Closure<($($dep,)*)> for F
        where
            F: Fn($($dep,)*) -> Result<T, E> + Send + Sync + 'static,
            T: SharedManaged,
            E: Into<Box<dyn Error + Send + Sync>>,
            $($dep: SharedManaged,)*
        {
            type Constructed = T;

            type Error = E;

            fn run(
                &self,
                injector: &dyn Injector,
            ) -> Result<Result<Self::Constructed, Self::Error>, InjectorError> {
                $(
                    let $dep = injector.get::<$dep>()?;
                )*
                Ok(self($($dep,)*))
            }
        }
    };
}

for_all_arities!(impl_closure);

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;

    use crate::container::injector::MockInjector;
    use crate::key::{self, TypeKey};

    use super::*;

    #[test]
    fn closure_run_resolves_arguments_in_order() {
        let mut injector = MockInjector::new();
        injector.expect_dyn_get().returning(|key: TypeKey| {
            if key == key::of::<Arc<i32>>() {
                Ok(Box::new(Arc::new(4)))
            } else if key == key::of::<Arc<String>>() {
                Ok(Box::new(Arc::new(String::from("apps"))))
            } else {
                Err(InjectorError::UnresolvedDependency { key })
            }
        });

        let closure = |count: Arc<i32>, label: Arc<String>| {
            Ok::<_, Infallible>(Arc::new(format!("{count} {label}")))
        };
        let res = closure.run(&injector).unwrap().unwrap();
        assert_eq!(res.as_str(), "4 apps");
    }

    #[test]
    fn closure_run_stops_at_first_unresolved_argument() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .times(1)
            .returning(|key: TypeKey| Err(InjectorError::UnresolvedDependency { key }));

        let closure = |_: Arc<u8>, _: Arc<u16>| Ok::<_, Infallible>(Arc::new(()));
        let res = closure.run(&injector);
        assert!(matches!(
            res,
            Err(InjectorError::UnresolvedDependency { key }) if key == key::of::<Arc<u8>>()
        ));
    }

    #[test]
    fn closure_without_parameters_runs_directly() {
        let injector = MockInjector::new();
        let closure = || Ok::<_, Infallible>(Arc::new(7u8));
        assert_eq!(*closure.run(&injector).unwrap().unwrap(), 7);
    }
}
