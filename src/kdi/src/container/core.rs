use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::container::binder;
use crate::container::handle::{ContainerConfig, StaleOwnerPolicy};
use crate::container::injector::{CallContext, InjectionTrace, Injector, InjectorError};
use crate::container::registry::{ProviderEntry, ProviderMap};
use crate::container::scopes::{BoundStore, RetiredOwner, ScopeTable};
use crate::container::store::{ScopeStore, WaitGraph};
use crate::container::SharedManaged;
use crate::key::TypeKey;
use crate::lifecycle::{Owner, OwnerId};
use crate::scope::Scope;

pub struct ContainerCore {
    this: Weak<Self>,
    providers: ProviderMap,
    singletons: Arc<ScopeStore>,
    scopes: Mutex<ScopeTable>,
    waits: WaitGraph,
    config: ContainerConfig,
}

impl ContainerCore {
    pub fn new(providers: ProviderMap, config: ContainerConfig) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: Weak::clone(this),
            providers,
            singletons: Arc::new(ScopeStore::new(Scope::Singleton, None)),
            scopes: Mutex::new(ScopeTable::new()),
            waits: WaitGraph::new(),
            config,
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Starts a new resolution request on behalf of `owner`.
    pub fn resolve(
        &self,
        key: TypeKey,
        owner: Option<&dyn Owner>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        let context = CallContext::new(owner);
        self.get_object(key, &context)
    }

    /// Discards every store of `owner`. Returns false if the owner had already
    /// been torn down.
    pub fn teardown(&self, owner: OwnerId) -> bool {
        let stores = self.scopes.lock().retire(owner);
        Self::discard(owner, stores)
    }

    /// Tears `owner` down once its terminal event has fired.
    pub fn terminate(&self, owner: OwnerId) -> bool {
        let stores = self.scopes.lock().terminate(owner);
        Self::discard(owner, stores)
    }

    pub fn is_owner_active(&self, owner: OwnerId) -> bool {
        self.scopes.lock().is_active(owner)
    }

    fn discard(owner: OwnerId, stores: Option<Vec<Arc<ScopeStore>>>) -> bool {
        match stores {
            Some(stores) => {
                let mut objects = 0;
                for store in &stores {
                    trace!(%owner, scope = %store.scope(), objects = store.len(), "discarding scope");
                    objects += store.len();
                }
                debug!(%owner, stores = stores.len(), objects, "owner scopes torn down");
                drop(stores);
                true
            }
            None => {
                trace!(%owner, "owner scopes already torn down");
                false
            }
        }
    }

    fn get_object(
        &self,
        key: TypeKey,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        let entry = self.try_get_provider_by_key(key)?;
        let scope = entry.scope();

        if let Some(requester) = context.trace() {
            Self::check_dependency(key, scope, requester)?;
        }

        let store = self.locate_store(key, scope, context.owner())?;
        if let Some(object) = store.get(key) {
            trace!(%key, %scope, "object found in scope");
            return Ok(object);
        }

        let context = context.append(key, scope);
        store.get_or_construct(key, entry.provider(), self, &context, &self.waits)
    }

    fn try_get_provider_by_key(&self, key: TypeKey) -> Result<&ProviderEntry, InjectorError> {
        if let Some(entry) = self.providers.get(key) {
            Ok(entry)
        } else {
            Err(InjectorError::UnresolvedDependency { key })
        }
    }

    fn check_dependency(
        key: TypeKey,
        scope: Scope,
        requester: &InjectionTrace<'_>,
    ) -> Result<(), InjectorError> {
        if !scope.outlive(requester.scope()) {
            return Err(InjectorError::ShortLifetime {
                key,
                scope,
                requester: requester.key(),
                requester_scope: requester.scope(),
            });
        }
        if requester.contains(key) {
            return Err(InjectorError::CyclicDependency { key });
        }
        Ok(())
    }

    fn locate_store(
        &self,
        key: TypeKey,
        scope: Scope,
        owner: Option<&dyn Owner>,
    ) -> Result<Arc<ScopeStore>, InjectorError> {
        if !scope.is_owner_bound() {
            return Ok(Arc::clone(&self.singletons));
        }
        let Some(owner) = owner else {
            return Err(InjectorError::OwnerRequired { key, scope });
        };

        let id = owner.owner_id();
        let bound = self.bind_store(key, scope, id)?;
        if bound.needs_subscription {
            binder::bind(Weak::clone(&self.this), owner);
            // An owner that has already terminated is torn down by the
            // subscription itself.
            let retired = self.scopes.lock().is_retired(id);
            if retired && self.config.stale_owners == StaleOwnerPolicy::Reject {
                return Err(Self::reject_stale_owner(key, id));
            }
        }
        Ok(bound.store)
    }

    fn reject_stale_owner(key: TypeKey, owner: OwnerId) -> InjectorError {
        warn!(%key, %owner, "rejected access to a torn down owner");
        InjectorError::StaleOwnerAccess { key, owner }
    }

    fn bind_store(
        &self,
        key: TypeKey,
        scope: Scope,
        owner: OwnerId,
    ) -> Result<BoundStore, InjectorError> {
        let mut scopes = self.scopes.lock();
        match scopes.store_for(owner, scope) {
            Ok(bound) => Ok(bound),
            Err(RetiredOwner) => match self.config.stale_owners {
                StaleOwnerPolicy::Reject => Err(Self::reject_stale_owner(key, owner)),
                StaleOwnerPolicy::Recreate => {
                    warn!(%key, %owner, "recreating scopes of a torn down owner");
                    scopes.revive(owner);
                    match scopes.store_for(owner, scope) {
                        Ok(bound) => Ok(bound),
                        Err(RetiredOwner) => unreachable!("a revived owner should be bound"),
                    }
                }
            },
        }
    }
}

impl Injector for ContainerCore {
    fn dyn_get(&self, key: TypeKey) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.resolve(key, None)
    }

    fn dyn_get_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn SharedManaged>, InjectorError> {
        self.get_object(key, context)
    }
}
