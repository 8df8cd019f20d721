//! Todo Sync
//!
//! Client-side state synchronization for the todo list page.
//!
//! Layers, leaf first:
//! - api: REST client for the `/todos` resource
//! - cache: keyed store of last-known query results
//! - query: loading/error/success binding of a cache key to a fetch
//! - mutation: remote writes that patch the cache after success
//! - view / session: the page's pure state and the bundle it holds
//!
//! Everything here is single-threaded (`Rc`, `RefCell`) and runtime-agnostic;
//! the embedding event loop drives the futures.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod mutation;
pub mod query;
pub mod session;
pub mod view;

#[cfg(test)]
mod tests;

pub use api::{HttpTodoApi, TodoApi};
pub use cache::{CacheStore, QueryKey, SubscriptionId};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ConfigError};
pub use models::{NewTodo, Todo, TodoId};
pub use mutation::{Mutation, MutationStrategy};
pub use query::{QueryBinding, QueryFn, QueryState};
pub use session::TodoSession;
pub use view::{Screen, SubmitIntent, TodoForm};
