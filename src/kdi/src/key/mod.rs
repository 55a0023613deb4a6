use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

/// An identifier of a managed type.
///
/// Two keys are equal iff they are built from the same type. The type name is
/// only carried along for diagnostics and does not take part in comparisons.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Creates the key identifying `T`.
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the identified type.
    pub fn target(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the identified type.
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

/// Shorthand for [`TypeKey::of`].
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use kdi::key::{self, TypeKey};
/// assert_eq!(key::of::<Arc<i32>>(), TypeKey::of::<Arc<i32>>());
/// assert_ne!(key::of::<Arc<i32>>(), key::of::<Arc<i64>>());
/// ```
pub fn of<T>() -> TypeKey
where
    T: ?Sized + 'static,
{
    TypeKey::of::<T>()
}
