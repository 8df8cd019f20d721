//! Mutation Bindings
//!
//! A mutation is a remote write plus a pure projection of its result onto the
//! cached todo list. The projection runs only after the write succeeded; a
//! failed write never touches the cache.
//!
//! Concurrent invocations are neither deduplicated nor serialized: each patch
//! lands when its own response does.

mod todo;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::TodoApi;
use crate::cache::{CacheStore, QueryKey};
use crate::error::{ApiError, ApiResult};
use crate::models::Todo;

pub use todo::{append_todo, remove_todo, replace_todo, CreateTodo, DeleteTodo, UpdateTodo};

/// One kind of write: the remote call and the cache patch built from its result
#[async_trait(?Send)]
pub trait MutationStrategy {
    type Input: 'static;
    type Output: Clone + 'static;

    /// Name used in logs
    const NAME: &'static str;

    /// Step 1: the remote write
    async fn call(&self, api: &dyn TodoApi, input: Self::Input) -> ApiResult<Self::Output>;

    /// Step 2: project a successful result onto the cached list.
    /// `None` leaves the cache as it was.
    fn patch(&self, output: &Self::Output, cached: Option<Vec<Todo>>) -> Option<Vec<Todo>>;
}

struct MutationInner<S> {
    api: Rc<dyn TodoApi>,
    cache: CacheStore,
    key: QueryKey,
    strategy: S,
    in_flight: Cell<usize>,
    last_error: RefCell<Option<ApiError>>,
}

/// Invocable binding of one strategy; clones share state
pub struct Mutation<S> {
    inner: Rc<MutationInner<S>>,
}

impl<S> Clone for Mutation<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: MutationStrategy> fmt::Debug for Mutation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("name", &S::NAME)
            .field("key", &self.inner.key)
            .field("in_flight", &self.inner.in_flight.get())
            .finish()
    }
}

impl<S: MutationStrategy> Mutation<S> {
    /// Bind `strategy` to the todo list entry of `cache`
    pub fn new(api: Rc<dyn TodoApi>, cache: CacheStore, strategy: S) -> Self {
        Self {
            inner: Rc::new(MutationInner {
                api,
                cache,
                key: QueryKey::TODOS,
                strategy,
                in_flight: Cell::new(0),
                last_error: RefCell::new(None),
            }),
        }
    }

    /// Run the remote write, then patch the cache if it succeeded
    pub async fn invoke(&self, input: S::Input) -> ApiResult<S::Output> {
        let inner = &self.inner;
        inner.in_flight.set(inner.in_flight.get() + 1);
        let result = inner.strategy.call(inner.api.as_ref(), input).await;
        inner.in_flight.set(inner.in_flight.get() - 1);

        match &result {
            Ok(output) => {
                *inner.last_error.borrow_mut() = None;
                let changed = inner
                    .cache
                    .patch::<Vec<Todo>, _>(&inner.key, |cached| inner.strategy.patch(output, cached));
                debug!(mutation = S::NAME, changed, "mutation applied");
            }
            Err(err) => {
                warn!(mutation = S::NAME, error = %err, "mutation failed, cache untouched");
                *inner.last_error.borrow_mut() = Some(err.clone());
            }
        }
        result
    }

    pub fn is_pending(&self) -> bool {
        self.inner.in_flight.get() > 0
    }

    /// Error of the most recent completed invocation, cleared by the next success
    pub fn last_error(&self) -> Option<ApiError> {
        self.inner.last_error.borrow().clone()
    }
}
