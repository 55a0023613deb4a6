use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A partition that decides how long a managed object lives and with whom it
/// is shared.
///
/// Variants are ordered by lifetime: [`Scope::Singleton`] outlives
/// [`Scope::Activity`], which outlives [`Scope::Fragment`]. Singleton objects
/// are shared by the whole container, while objects of the other scopes are
/// cached per [`Owner`] and discarded once the owner terminates.
///
/// [`Owner`]: crate::lifecycle::Owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance for the whole container.
    #[default]
    Singleton,
    /// One instance per screen-like owner.
    Activity,
    /// One instance per sub-component owner.
    Fragment,
}

impl Scope {
    /// Returns true if `self` lives at least as long as `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kdi::scope::Scope;
    /// assert!(Scope::Singleton.outlive(Scope::Activity));
    /// assert!(Scope::Activity.outlive(Scope::Activity));
    /// assert!(!Scope::Fragment.outlive(Scope::Activity));
    /// ```
    pub fn outlive(self, other: Self) -> bool {
        self >= other
    }

    /// Returns true if objects of this scope are cached per owner.
    pub fn is_owner_bound(self) -> bool {
        !matches!(self, Self::Singleton)
    }

    /// Returns the name of the scope in a string literal.
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Activity => "Activity",
            Self::Fragment => "Fragment",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Singleton => 3,
            Self::Activity => 2,
            Self::Fragment => 1,
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}
