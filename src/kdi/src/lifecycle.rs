use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::trace;

/// A process-unique identity of an [`Owner`].
///
/// Identities handed out by [`OwnerId::next`] are never reused, so a torn
/// down owner can't be confused with a newly created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocates a fresh identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw identity supplied by an external lifecycle layer.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "owner#{}", self.0)
    }
}

/// A callback invoked once an [`Owner`] reaches its terminal state.
pub type TerminateObserver = Box<dyn FnOnce() + Send + Sync>;

/// An external entity that hosts owner-bound scopes, e.g. a screen, a
/// sub-component or a view model.
///
/// The container calls [`Owner::on_terminate`] on the first resolution of an
/// owner-bound object, and keeps that subscription until the observer fires.
/// Only a container recreating the scopes of an owner whose terminal event has
/// already fired subscribes again. Implementations must invoke the observer at
/// most once, and should invoke it immediately if the owner has already
/// terminated.
#[cfg_attr(test, mockall::automock)]
pub trait Owner: Send + Sync {
    /// Returns the stable identity used as the key of the owner's scopes.
    fn owner_id(&self) -> OwnerId;

    /// Subscribes to the terminal lifecycle event.
    fn on_terminate(&self, observer: TerminateObserver);
}

/// A ready-made [`Owner`] whose terminal event fires on [`Lifecycle::terminate`]
/// or, at the latest, when the handle is dropped.
///
/// # Examples
///
/// ```rust
/// # use kdi::lifecycle::{Lifecycle, Owner};
/// let screen = Lifecycle::new();
/// assert!(!screen.is_terminated());
/// assert!(screen.terminate());
/// assert!(!screen.terminate());
/// ```
pub struct Lifecycle {
    id: OwnerId,
    state: Mutex<LifecycleState>,
}

enum LifecycleState {
    Active { observers: Vec<TerminateObserver> },
    Terminated,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            id: OwnerId::next(),
            state: Mutex::new(LifecycleState::Active {
                observers: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn is_terminated(&self) -> bool {
        matches!(*self.state.lock(), LifecycleState::Terminated)
    }

    /// Moves the lifecycle to its terminal state and notifies every observer.
    ///
    /// Returns false if the lifecycle had already terminated, in which case
    /// nothing is notified.
    pub fn terminate(&self) -> bool {
        let previous = mem::replace(&mut *self.state.lock(), LifecycleState::Terminated);
        let LifecycleState::Active { observers } = previous else {
            return false;
        };

        trace!(owner = %self.id, observers = observers.len(), "lifecycle terminated");
        for observer in observers {
            observer();
        }
        true
    }
}

impl Owner for Lifecycle {
    fn owner_id(&self) -> OwnerId {
        self.id
    }

    fn on_terminate(&self, observer: TerminateObserver) {
        let mut state = self.state.lock();
        match &mut *state {
            LifecycleState::Active { observers } => observers.push(observer),
            LifecycleState::Terminated => {
                drop(state);
                observer();
            }
        }
    }
}

impl Debug for Lifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Lifecycle")
            .field("id", &self.id)
            .field("terminated", &self.is_terminated())
            .finish()
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;

    fn counting_observer(counter: &Arc<AtomicUsize>) -> TerminateObserver {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn owner_id_next_never_repeats() {
        let a = OwnerId::next();
        let b = OwnerId::next();
        assert_ne!(a, b);
        assert_eq!(OwnerId::from_raw(a.as_raw()), a);
    }

    #[test]
    fn lifecycle_terminate_notifies_observers_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let lifecycle = Lifecycle::new();
        lifecycle.on_terminate(counting_observer(&counter));
        lifecycle.on_terminate(counting_observer(&counter));

        assert!(lifecycle.terminate());
        assert!(!lifecycle.terminate());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn lifecycle_on_terminate_fires_immediately_after_termination() {
        let counter = Arc::new(AtomicUsize::new(0));
        let lifecycle = Lifecycle::new();
        lifecycle.terminate();

        lifecycle.on_terminate(counting_observer(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lifecycle_drop_terminates() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let lifecycle = Lifecycle::new();
            lifecycle.on_terminate(counting_observer(&counter));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
