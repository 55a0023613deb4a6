use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::container::store::ScopeStore;
use crate::lifecycle::OwnerId;
use crate::scope::Scope;

/// The owner-bound scope stores of a container, keyed by owner and scope.
///
/// `retired` keeps one id per torn down owner for the lifetime of the table.
/// `subscribed` holds the owners whose terminal event is observed and has not
/// fired yet.
pub(super) struct ScopeTable {
    owners: HashMap<OwnerId, HashMap<Scope, Arc<ScopeStore>>>,
    retired: HashSet<OwnerId>,
    subscribed: HashSet<OwnerId>,
}

/// A store located by [`ScopeTable::store_for`].
pub(super) struct BoundStore {
    pub store: Arc<ScopeStore>,
    /// Whether the owner's terminal event still needs a subscription.
    pub needs_subscription: bool,
}

/// The owner's stores have been torn down.
#[derive(Debug)]
pub(super) struct RetiredOwner;

impl ScopeTable {
    pub fn new() -> Self {
        Self {
            owners: HashMap::new(),
            retired: HashSet::new(),
            subscribed: HashSet::new(),
        }
    }

    /// Returns the store of `(owner, scope)`, creating it if absent.
    pub fn store_for(&mut self, owner: OwnerId, scope: Scope) -> Result<BoundStore, RetiredOwner> {
        if self.retired.contains(&owner) {
            return Err(RetiredOwner);
        }

        let needs_subscription = self.subscribed.insert(owner);
        let store = self
            .owners
            .entry(owner)
            .or_default()
            .entry(scope)
            .or_insert_with(|| Arc::new(ScopeStore::new(scope, Some(owner))));
        Ok(BoundStore {
            store: Arc::clone(store),
            needs_subscription,
        })
    }

    /// Forgets that `owner` was torn down, so the next request binds it again.
    pub fn revive(&mut self, owner: OwnerId) -> bool {
        self.retired.remove(&owner)
    }

    /// Removes every store of `owner` and remembers it as torn down. Returns
    /// `None` if the owner was already retired.
    ///
    /// The stores are returned so that the caller can drop them after
    /// releasing the table.
    pub fn retire(&mut self, owner: OwnerId) -> Option<Vec<Arc<ScopeStore>>> {
        if !self.retired.insert(owner) {
            return None;
        }
        let stores = self
            .owners
            .remove(&owner)
            .map(|stores| stores.into_values().collect())
            .unwrap_or_default();
        Some(stores)
    }

    /// Like [`ScopeTable::retire`], for an owner whose terminal event has
    /// fired, so a later binding subscribes again.
    pub fn terminate(&mut self, owner: OwnerId) -> Option<Vec<Arc<ScopeStore>>> {
        self.subscribed.remove(&owner);
        self.retire(owner)
    }

    pub fn is_active(&self, owner: OwnerId) -> bool {
        self.owners.contains_key(&owner)
    }

    pub fn is_retired(&self, owner: OwnerId) -> bool {
        self.retired.contains(&owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_table_store_for_creates_stores_lazily() {
        let mut table = ScopeTable::new();
        let owner = OwnerId::next();
        assert!(!table.is_active(owner));

        let activity = table.store_for(owner, Scope::Activity).unwrap();
        assert!(activity.needs_subscription);
        assert_eq!(activity.store.scope(), Scope::Activity);

        let again = table.store_for(owner, Scope::Activity).unwrap();
        assert!(!again.needs_subscription);
        assert!(Arc::ptr_eq(&activity.store, &again.store));

        let fragment = table.store_for(owner, Scope::Fragment).unwrap();
        assert!(!fragment.needs_subscription);
        assert!(!Arc::ptr_eq(&activity.store, &fragment.store));
        assert!(table.is_active(owner));
    }

    #[test]
    fn scope_table_retire_is_idempotent() {
        let mut table = ScopeTable::new();
        let owner = OwnerId::next();
        table.store_for(owner, Scope::Activity).unwrap();
        table.store_for(owner, Scope::Fragment).unwrap();

        assert_eq!(table.retire(owner).map(|stores| stores.len()), Some(2));
        assert!(table.retire(owner).is_none());
        assert!(!table.is_active(owner));
        assert!(table.is_retired(owner));
        assert!(table.store_for(owner, Scope::Activity).is_err());
    }

    #[test]
    fn scope_table_revive_keeps_live_subscription() {
        let mut table = ScopeTable::new();
        let owner = OwnerId::next();
        let old = table.store_for(owner, Scope::Activity).unwrap().store;
        table.retire(owner);

        assert!(table.revive(owner));
        let new = table.store_for(owner, Scope::Activity).unwrap();
        assert!(!new.needs_subscription);
        assert!(!Arc::ptr_eq(&old, &new.store));
    }

    #[test]
    fn scope_table_terminate_requires_new_subscription() {
        let mut table = ScopeTable::new();
        let owner = OwnerId::next();
        table.store_for(owner, Scope::Fragment).unwrap();

        assert_eq!(table.terminate(owner).map(|stores| stores.len()), Some(1));
        assert!(table.is_retired(owner));
        assert!(table.revive(owner));
        assert!(table.store_for(owner, Scope::Fragment).unwrap().needs_subscription);
    }

    #[test]
    fn scope_table_retire_unknown_owner_marks_it_retired() {
        let mut table = ScopeTable::new();
        let owner = OwnerId::next();
        assert_eq!(table.retire(owner).map(|stores| stores.len()), Some(0));
        assert!(table.is_retired(owner));
    }
}
