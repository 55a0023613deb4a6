use std::any::{self, Any};
use std::ops::Deref;

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

pub trait DowncastRef {
    fn is<T: Any>(&self) -> bool;
}

impl<S> DowncastRef for S
where
    S: Deref<Target: AsAny>,
{
    #[inline]
    fn is<T: Any>(&self) -> bool {
        (**self).as_any().is::<T>()
    }
}

pub trait Downcast: DowncastRef + Sized {
    type Output<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self>;
}

impl<S> Downcast for Box<S>
where
    S: AsAny + ?Sized,
{
    type Output<T> = Box<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self> {
        if self.is::<T>() {
            let res = self
                .into_any()
                .downcast::<T>()
                .unwrap_or_else(|_| std::unreachable!("`self` should be `Box<T>`"));
            Ok(res)
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    trait Handle: AsAny + Send + Sync {}

    impl Handle for Arc<i32> {}

    impl Handle for Arc<str> {}

    #[test]
    fn downcast_succeeds_when_type_matches() {
        let x: Box<dyn Handle> = Box::new(Arc::new(7i32));
        assert!(x.is::<Arc<i32>>());

        let y = x.downcast::<Arc<i32>>().unwrap_or_else(|_| Box::new(Arc::new(0)));
        assert_eq!(**y, 7);
    }

    #[test]
    fn downcast_fails_when_type_differs() {
        let x: Box<dyn Handle> = Box::new(Arc::<str>::from("screen"));
        assert!(!x.is::<Arc<i32>>());

        let x = x.downcast::<Arc<i32>>().unwrap_err();
        assert_eq!((*x).type_name(), any::type_name::<Arc<str>>());
    }
}
