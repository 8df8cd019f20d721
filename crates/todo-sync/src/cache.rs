//! Cache Store
//!
//! Keyed store of last-known query results, shared by the query binding and
//! every mutation binding. Values are type-erased; reads are typed and cloned out.
//!
//! Listeners are told which key changed after each write, patch or removal.
//! They run once the internal borrow is released, so they may read the store.

use std::any::Any;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

/// Opaque identity of a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Cow<'static, str>);

impl QueryKey {
    /// The todo collection
    pub const TODOS: QueryKey = QueryKey::from_static("todos");

    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

type Listener = Rc<dyn Fn(&QueryKey)>;

#[derive(Default)]
struct CacheInner {
    entries: RefCell<HashMap<QueryKey, Rc<dyn Any>>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_listener: Cell<u64>,
}

/// Shared handle to the cache; clones point at the same store
#[derive(Clone, Default)]
pub struct CacheStore {
    inner: Rc<CacheInner>,
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.inner.entries.borrow().keys().cloned().collect();
        f.debug_struct("CacheStore").field("keys", &keys).finish()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value under `key`, if present and of type `T`
    pub fn read<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.inner.entries.borrow();
        let value = entries.get(key)?;
        match value.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                warn!(%key, "cache entry has unexpected type");
                None
            }
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.entries.borrow().contains_key(key)
    }

    /// Replace the entry wholesale
    pub fn write<T: 'static>(&self, key: &QueryKey, value: T) {
        self.inner
            .entries
            .borrow_mut()
            .insert(key.clone(), Rc::new(value));
        debug!(%key, "cache write");
        self.notify(key);
    }

    /// Apply `f` to the current value and store the result.
    ///
    /// `f` sees `None` when the entry is absent. Returning `None` leaves the
    /// entry as it was and notifies nobody. Returns whether the entry changed.
    pub fn patch<T, F>(&self, key: &QueryKey, f: F) -> bool
    where
        T: Clone + 'static,
        F: FnOnce(Option<T>) -> Option<T>,
    {
        let current = self.read::<T>(key);
        let Some(next) = f(current) else {
            debug!(%key, "cache patch was a no-op");
            return false;
        };
        self.inner
            .entries
            .borrow_mut()
            .insert(key.clone(), Rc::new(next));
        debug!(%key, "cache patch");
        self.notify(key);
        true
    }

    /// Drop the entry. Returns whether one was present.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.inner.entries.borrow_mut().remove(key).is_some();
        if removed {
            debug!(%key, "cache entry removed");
            self.notify(key);
        }
        removed
    }

    pub fn subscribe(&self, listener: impl Fn(&QueryKey) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self, key: &QueryKey) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(key);
        }
    }
}
