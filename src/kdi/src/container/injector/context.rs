use crate::key::TypeKey;
use crate::lifecycle::Owner;
use crate::scope::Scope;

/// Information carried along one resolution request: the owner the request is
/// made on behalf of, and the chain of keys being constructed.
#[derive(Clone)]
pub struct CallContext<'a> {
    owner: Option<&'a dyn Owner>,
    trace: Option<InjectionTrace<'a>>,
}

impl<'a> CallContext<'a> {
    pub fn new(owner: Option<&'a dyn Owner>) -> Self {
        Self { owner, trace: None }
    }

    /// Derives the context in which the dependencies of `key` are requested.
    pub fn append<'b>(&'b self, key: TypeKey, scope: Scope) -> CallContext<'b> {
        let trace = match &self.trace {
            Some(trace) => trace.append(key, scope),
            None => InjectionTrace::new(key, scope),
        };
        CallContext {
            owner: self.owner,
            trace: Some(trace),
        }
    }

    pub fn owner(&self) -> Option<&'a dyn Owner> {
        self.owner
    }

    /// Returns the key under construction, or `None` for a top-level request.
    pub fn key(&self) -> Option<TypeKey> {
        self.trace.as_ref().map(InjectionTrace::key)
    }

    pub fn trace(&self) -> Option<&InjectionTrace<'a>> {
        self.trace.as_ref()
    }
}

#[derive(Clone)]
pub struct InjectionTrace<'a> {
    key: TypeKey,
    scope: Scope,
    previous: Option<&'a InjectionTrace<'a>>,
}

impl<'a> InjectionTrace<'a> {
    pub fn new(key: TypeKey, scope: Scope) -> Self {
        Self {
            key,
            scope,
            previous: None,
        }
    }

    pub fn append<'b>(&'b self, key: TypeKey, scope: Scope) -> InjectionTrace<'b> {
        InjectionTrace {
            key,
            scope,
            previous: Some(self),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn previous(&self) -> Option<&InjectionTrace<'a>> {
        self.previous
    }

    /// Tests whether `key` is this node or any node before it.
    pub fn contains(&self, key: TypeKey) -> bool {
        let mut this = Some(self);
        while let Some(trace) = this {
            if trace.key == key {
                return true;
            }
            this = trace.previous();
        }
        false
    }

    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut this = self;
        while let Some(previous) = this.previous() {
            depth += 1;
            this = previous;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::key;

    use super::*;

    #[test]
    fn call_context_append_builds_trace() {
        let root = CallContext::new(None);
        assert!(root.key().is_none());

        let first = root.append(key::of::<Arc<i32>>(), Scope::Activity);
        let second = first.append(key::of::<Arc<u32>>(), Scope::Singleton);

        assert_eq!(second.key(), Some(key::of::<Arc<u32>>()));
        let trace = second.trace().unwrap();
        assert_eq!(trace.depth(), 2);
        assert_eq!(trace.previous().map(InjectionTrace::scope), Some(Scope::Activity));
        assert!(trace.contains(key::of::<Arc<i32>>()));
        assert!(trace.contains(key::of::<Arc<u32>>()));
        assert!(!trace.contains(key::of::<Arc<i64>>()));
    }
}
