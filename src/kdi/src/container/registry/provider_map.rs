use std::collections::HashMap;

use tracing::debug;

use crate::key::TypeKey;
use crate::provider::Provider;
use crate::scope::Scope;

/// Where a binding comes from.
///
/// Explicit bindings always take precedence over bindings synthesized from a
/// [`Component`] implementation of the same key.
///
/// [`Component`]: crate::provider::component::Component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Explicit,
    Component,
}

#[derive(Debug)]
pub struct ProviderMap {
    explicit: HashMap<TypeKey, ProviderEntry>,
    components: HashMap<TypeKey, ProviderEntry>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self {
            explicit: HashMap::new(),
            components: HashMap::new(),
        }
    }

    /// Stores `entry`, replacing and returning the entry previously stored for
    /// the same key and origin.
    pub fn insert(&mut self, entry: ProviderEntry) -> Option<ProviderEntry> {
        let key = entry.key();
        let replaced = self.tier_mut(entry.origin()).insert(key, entry);
        if replaced.is_some() {
            debug!(%key, "replacing a previously registered provider");
        }
        replaced
    }

    pub fn get(&self, key: TypeKey) -> Option<&ProviderEntry> {
        self.explicit
            .get(&key)
            .or_else(|| self.components.get(&key))
    }

    pub fn len(&self) -> usize {
        self.explicit.len()
            + self
                .components
                .keys()
                .filter(|key| !self.explicit.contains_key(key))
                .count()
    }

    fn tier_mut(&mut self, origin: Origin) -> &mut HashMap<TypeKey, ProviderEntry> {
        match origin {
            Origin::Explicit => &mut self.explicit,
            Origin::Component => &mut self.components,
        }
    }
}

#[derive(Debug)]
pub struct ProviderEntry {
    key: TypeKey,
    provider: Box<dyn Provider>,
    scope: Scope,
    origin: Origin,
}

impl ProviderEntry {
    pub fn new(key: TypeKey, provider: Box<dyn Provider>, scope: Scope, origin: Origin) -> Self {
        Self {
            key,
            provider,
            scope,
            origin,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}
