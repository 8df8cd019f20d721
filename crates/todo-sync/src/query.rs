//! Query Binding
//!
//! Binds a cache key to an async read operation and exposes
//! `Loading` / `Error` / `Success` to the view.
//!
//! Transitions:
//! - `Loading -> Success` when the first fetch lands (the result is written to the cache)
//! - `Loading -> Error` when it fails
//! - a later fetch from `Error` passes through `Loading` again
//! - a later fetch from `Success` keeps showing the cached value until it lands
//!
//! Subscribers are also notified whenever the cache entry for the key changes,
//! so mutation patches reach the view without a re-fetch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::TodoApi;
use crate::cache::{CacheStore, QueryKey, SubscriptionId};
use crate::error::{ApiError, ApiResult};
use crate::models::Todo;

/// Async read operation behind a query
#[async_trait(?Send)]
pub trait QueryFn<T> {
    async fn fetch(&self) -> ApiResult<T>;
}

/// Reads the whole todo collection
pub struct TodosQuery {
    api: Rc<dyn TodoApi>,
}

impl TodosQuery {
    pub fn new(api: Rc<dyn TodoApi>) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl QueryFn<Vec<Todo>> for TodosQuery {
    async fn fetch(&self) -> ApiResult<Vec<Todo>> {
        self.api.fetch_todos().await
    }
}

/// What the view renders
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error(ApiError),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Loading,
    Error(ApiError),
    Success,
}

type Subscriber<T> = Rc<dyn Fn(&QueryState<T>)>;

struct QueryInner<T> {
    key: QueryKey,
    cache: CacheStore,
    query: Box<dyn QueryFn<T>>,
    status: RefCell<Status>,
    in_flight: Cell<usize>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_subscriber: Cell<u64>,
    cache_subscription: Cell<Option<SubscriptionId>>,
}

impl<T: Clone + 'static> QueryInner<T> {
    fn state(&self) -> QueryState<T> {
        match &*self.status.borrow() {
            // a failed load never shows stale data
            Status::Error(err) => QueryState::Error(err.clone()),
            Status::Loading | Status::Success => match self.cache.read::<T>(&self.key) {
                Some(data) => QueryState::Success(data),
                None => QueryState::Loading,
            },
        }
    }

    fn set_status(&self, status: Status) {
        *self.status.borrow_mut() = status;
    }

    fn publish(&self) {
        let state = self.state();
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&state);
        }
    }
}

impl<T> Drop for QueryInner<T> {
    fn drop(&mut self) {
        if let Some(id) = self.cache_subscription.take() {
            self.cache.unsubscribe(id);
        }
    }
}

/// Read-side binding of one query key; clones share state
pub struct QueryBinding<T> {
    inner: Rc<QueryInner<T>>,
}

impl<T> Clone for QueryBinding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for QueryBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBinding")
            .field("key", &self.inner.key)
            .field("status", &self.inner.status.borrow())
            .field("in_flight", &self.inner.in_flight.get())
            .finish()
    }
}

impl<T: Clone + 'static> QueryBinding<T> {
    pub fn new(key: QueryKey, cache: CacheStore, query: impl QueryFn<T> + 'static) -> Self {
        let inner = Rc::new(QueryInner {
            key,
            cache,
            query: Box::new(query),
            status: RefCell::new(Status::Loading),
            in_flight: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(0),
            cache_subscription: Cell::new(None),
        });

        let weak: Weak<QueryInner<T>> = Rc::downgrade(&inner);
        let key = inner.key.clone();
        let id = inner.cache.subscribe(move |changed| {
            if *changed != key {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.publish();
            }
        });
        inner.cache_subscription.set(Some(id));

        Self { inner }
    }

    pub fn state(&self) -> QueryState<T> {
        self.inner.state()
    }

    /// Whether a fetch is in flight
    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.get() > 0
    }

    /// Issue the read (on mount, or whenever fresh data is wanted).
    ///
    /// Success replaces the cache entry wholesale; failure moves the binding to `Error`.
    pub async fn refresh(&self) -> ApiResult<()> {
        let inner = &self.inner;
        if matches!(*inner.status.borrow(), Status::Error(_)) {
            // the data the failed load hid stays hidden: drop it and start over from Loading
            inner.set_status(Status::Loading);
            if !inner.cache.remove(&inner.key) {
                inner.publish();
            }
        }

        inner.in_flight.set(inner.in_flight.get() + 1);
        debug!(key = %inner.key, "query fetch started");
        let result = inner.query.fetch().await;
        inner.in_flight.set(inner.in_flight.get() - 1);

        match result {
            Ok(data) => {
                debug!(key = %inner.key, "query fetch succeeded");
                inner.set_status(Status::Success);
                // the cache listener publishes the new state
                inner.cache.write(&inner.key, data);
                Ok(())
            }
            Err(err) => {
                warn!(key = %inner.key, error = %err, "query fetch failed");
                inner.set_status(Status::Error(err.clone()));
                inner.publish();
                Err(err)
            }
        }
    }

    /// Drop the cached value and fetch again from `Loading`
    pub async fn invalidate(&self) -> ApiResult<()> {
        let inner = &self.inner;
        inner.set_status(Status::Loading);
        if !inner.cache.remove(&inner.key) {
            inner.publish();
        }
        self.refresh().await
    }

    /// Call `subscriber` on every state change
    pub fn subscribe(&self, subscriber: impl Fn(&QueryState<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.inner.next_subscriber.get());
        self.inner.next_subscriber.set(self.inner.next_subscriber.get() + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(subscriber_id, _)| *subscriber_id != id);
    }
}
