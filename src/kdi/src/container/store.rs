use std::collections::HashMap;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::SharedManaged;
use crate::key::TypeKey;
use crate::lifecycle::OwnerId;
use crate::provider::Provider;
use crate::scope::Scope;

/// The objects of one scope partition: the singleton partition or one
/// (owner, scope) pair.
pub(super) struct ScopeStore {
    scope: Scope,
    owner: Option<OwnerId>,
    data: RwLock<StoreData>,
}

impl ScopeStore {
    pub fn new(scope: Scope, owner: Option<OwnerId>) -> Self {
        Self {
            scope,
            owner,
            data: RwLock::new(StoreData::new()),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn len(&self) -> usize {
        self.data.read().objects.len()
    }

    pub fn get(&self, key: TypeKey) -> Option<Box<dyn SharedManaged>> {
        let data = self.data.read();
        data.objects.get(&key).map(|object| object.dyn_clone())
    }

    /// Returns the object stored under `key`, invoking `provider` if it is
    /// absent. `context` must be the context in which the dependencies of
    /// `key` are requested.
    ///
    /// A key is constructed at most once per store. Requests for a key under
    /// construction on another thread block until that construction finishes,
    /// while a request from the constructing thread itself is a cycle. So is a
    /// request whose wait would close a loop in `waits`, the threads of one
    /// container blocked on each other.
    pub fn get_or_construct(
        &self,
        key: TypeKey,
        provider: &dyn Provider,
        injector: &dyn Injector,
        context: &CallContext<'_>,
        waits: &WaitGraph,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        let data = self.data.write();

        if let Some(object) = data.objects.get(&key) {
            trace!(%key, scope = %self.scope, "object constructed concurrently");
            return Ok(object.dyn_clone());
        }

        let reentered = data
            .constructing
            .get(&key)
            .map(PendingObject::is_constructed_by_current_thread);
        match reentered {
            Some(true) => Err(self.stop_construction_on_cyclic_dependency(data, key, waits)),
            Some(false) => self.wait_for_constructed_object(data, key, waits),
            None => self.construct_object(data, key, provider, injector, context, waits),
        }
    }

    fn stop_construction_on_cyclic_dependency(
        &self,
        data: RwLockWriteGuard<StoreData>,
        key: TypeKey,
        waits: &WaitGraph,
    ) -> InjectorError {
        let err = InjectorError::CyclicDependency { key };
        self.notify_waiters(data, key, WaitResponse::Error(err.clone()), waits);
        err
    }

    fn wait_for_constructed_object(
        &self,
        mut data: RwLockWriteGuard<StoreData>,
        key: TypeKey,
        waits: &WaitGraph,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        let Some(pending) = data.constructing.get_mut(&key) else {
            unreachable!("whether `pending` exists should be checked before calling this method")
        };
        let current = thread::current().id();
        if !waits.try_wait(current, pending.on_thread) {
            debug!(%key, scope = %self.scope, "threads wait for each other's objects");
            return Err(InjectorError::CyclicDependency { key });
        }
        let (sender, receiver) = oneshot::channel();
        pending.register_waiter(current, sender);
        drop(data);

        trace!(%key, scope = %self.scope, "waiting for object under construction");
        self.get_object_on_response(receiver, key)
    }

    fn get_object_on_response(
        &self,
        receiver: Receiver<WaitResponse>,
        key: TypeKey,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        match receiver.recv() {
            Ok(WaitResponse::Constructed(object)) => Ok(object),
            Ok(WaitResponse::Error(err)) => Err(err),
            Err(_) => unreachable!("the constructing thread of `{key}` should send a message"),
        }
    }

    fn construct_object(
        &self,
        mut data: RwLockWriteGuard<StoreData>,
        key: TypeKey,
        provider: &dyn Provider,
        injector: &dyn Injector,
        context: &CallContext<'_>,
        waits: &WaitGraph,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        let pending = PendingObject::new(thread::current().id());
        data.constructing.insert(key, pending);
        drop(data);

        debug!(%key, scope = %self.scope, owner = ?self.owner, "constructing object");
        match provider.dyn_provide(injector, context) {
            Ok(object) => {
                let mut data = self.data.write();
                data.objects.insert(key, object.dyn_clone());
                let response = WaitResponse::Constructed(object.dyn_clone());
                self.notify_waiters(data, key, response, waits);
                Ok(object)
            }
            Err(err) => {
                debug!(%key, scope = %self.scope, error = %err, "object construction failed");
                let data = self.data.write();
                self.notify_waiters(data, key, WaitResponse::Error(err.clone()), waits);
                Err(err)
            }
        }
    }

    fn notify_waiters(
        &self,
        mut data: RwLockWriteGuard<StoreData>,
        key: TypeKey,
        response: WaitResponse,
        waits: &WaitGraph,
    ) {
        if let Some(pending) = data.constructing.remove(&key) {
            drop(data);
            pending.notify(response, waits);
        }
    }
}

/// The threads blocked on an object under construction, each mapped to the
/// thread constructing it.
///
/// Edges are only added when they keep the graph acyclic, and a waiter's edge
/// is removed before it is woken up.
pub(super) struct WaitGraph {
    edges: Mutex<HashMap<ThreadId, ThreadId>>,
}

impl WaitGraph {
    pub fn new() -> Self {
        Self {
            edges: Mutex::new(HashMap::new()),
        }
    }

    /// Records that `waiter` blocks until `holder` finishes a construction.
    /// Returns false and records nothing if `holder` already waits, directly
    /// or transitively, for `waiter`.
    fn try_wait(&self, waiter: ThreadId, holder: ThreadId) -> bool {
        let mut edges = self.edges.lock();
        let mut current = holder;
        loop {
            if current == waiter {
                return false;
            }
            match edges.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        edges.insert(waiter, holder);
        true
    }

    fn release(&self, waiter: ThreadId) {
        self.edges.lock().remove(&waiter);
    }
}

struct StoreData {
    objects: HashMap<TypeKey, Box<dyn SharedManaged>>,
    constructing: HashMap<TypeKey, PendingObject>,
}

impl StoreData {
    fn new() -> Self {
        Self {
            objects: HashMap::new(),
            constructing: HashMap::new(),
        }
    }
}

struct PendingObject {
    on_thread: ThreadId,
    waiters: Vec<(ThreadId, Sender<WaitResponse>)>,
}

impl PendingObject {
    fn new(on_thread: ThreadId) -> Self {
        Self {
            on_thread,
            waiters: Vec::new(),
        }
    }

    fn is_constructed_by_current_thread(&self) -> bool {
        thread::current().id() == self.on_thread
    }

    fn register_waiter(&mut self, waiter: ThreadId, sender: Sender<WaitResponse>) {
        self.waiters.push((waiter, sender));
    }

    fn notify(self, response: WaitResponse, waits: &WaitGraph) {
        for (waiter, sender) in self.waiters {
            waits.release(waiter);
            let _ = sender.send(response.clone());
        }
    }
}

enum WaitResponse {
    Constructed(Box<dyn SharedManaged>),
    Error(InjectorError),
}

impl Clone for WaitResponse {
    fn clone(&self) -> Self {
        match self {
            Self::Constructed(object) => Self::Constructed(object.dyn_clone()),
            Self::Error(err) => Self::Error(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    use crate::container::injector::MockInjector;
    use crate::key;
    use crate::provider::closure::ClosureProvider;
    use crate::provider::factory::FactoryProvider;
    use crate::util::any::Downcast;

    use super::*;

    fn downcast<T: SharedManaged>(object: Box<dyn SharedManaged>) -> T {
        match object.downcast::<T>() {
            Ok(object) => *object,
            Err(_) => panic!("unexpected object type"),
        }
    }

    #[test]
    fn scope_store_constructs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = FactoryProvider::new({
            let calls = Arc::clone(&calls);
            move || Arc::new(calls.fetch_add(1, Ordering::SeqCst))
        });
        let store = ScopeStore::new(Scope::Singleton, None);
        let waits = WaitGraph::new();
        let injector = MockInjector::new();
        let key = key::of::<Arc<usize>>();
        let root = CallContext::new(None);
        let context = root.append(key, Scope::Singleton);

        assert!(store.get(key).is_none());
        let first = store
            .get_or_construct(key, &provider, &injector, &context, &waits)
            .unwrap();
        let second = store
            .get_or_construct(key, &provider, &injector, &context, &waits)
            .unwrap();

        assert!(Arc::ptr_eq(
            &downcast::<Arc<usize>>(first),
            &downcast::<Arc<usize>>(second)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn scope_store_does_not_cache_failures() {
        let store = ScopeStore::new(Scope::Activity, Some(OwnerId::next()));
        let waits = WaitGraph::new();
        let provider = ClosureProvider::new(|| Err::<Arc<u8>, _>("offline"));
        let injector = MockInjector::new();
        let key = key::of::<Arc<u8>>();
        let root = CallContext::new(None);
        let context = root.append(key, Scope::Activity);

        let res = store.get_or_construct(key, &provider, &injector, &context, &waits);
        assert!(matches!(res, Err(InjectorError::ObjectConstruction { .. })));
        assert!(store.get(key).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn scope_store_waiters_receive_the_constructed_object() {
        const THREADS: usize = 8;
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));
        let store = Arc::new(ScopeStore::new(Scope::Singleton, None));
        let waits = Arc::new(WaitGraph::new());
        let provider = Arc::new(ClosureProvider::new({
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Ok::<_, Infallible>(Arc::new(String::from("catalogue")))
            }
        }));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let provider = Arc::clone(&provider);
                let barrier = Arc::clone(&barrier);
                let waits = Arc::clone(&waits);
                thread::spawn(move || {
                    let injector = MockInjector::new();
                    let key = key::of::<Arc<String>>();
                    let root = CallContext::new(None);
                    let context = root.append(key, Scope::Singleton);
                    barrier.wait();
                    let object = store
                        .get_or_construct(key, provider.as_ref(), &injector, &context, &waits)
                        .unwrap();
                    downcast::<Arc<String>>(object)
                })
            })
            .collect();

        let objects: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("Each thread should not `panic!()`"))
            .collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(objects.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn wait_graph_refuses_edges_closing_a_loop() {
        let spawn_id = || thread::spawn(|| thread::current().id()).join().unwrap();
        let (a, b, c) = (spawn_id(), spawn_id(), spawn_id());
        let waits = WaitGraph::new();

        assert!(waits.try_wait(a, b));
        assert!(waits.try_wait(b, c));
        assert!(!waits.try_wait(c, a));
        assert!(!waits.try_wait(c, c));

        waits.release(a);
        assert!(waits.try_wait(c, a));
    }
}
