//! Todo Session
//!
//! One cache, the todo query bound to it and the three mutations, all over the
//! same remote client. This is what the page holds for its lifetime.

use std::rc::Rc;

use tracing::info;

use crate::api::{HttpTodoApi, TodoApi};
use crate::cache::{CacheStore, QueryKey};
use crate::config::ClientConfig;
use crate::error::{ApiResult, ConfigError};
use crate::models::{NewTodo, Todo, TodoId};
use crate::mutation::{CreateTodo, DeleteTodo, Mutation, UpdateTodo};
use crate::query::{QueryBinding, QueryState, TodosQuery};
use crate::view::{Screen, SubmitIntent};

#[derive(Clone, Debug)]
pub struct TodoSession {
    config: ClientConfig,
    cache: CacheStore,
    query: QueryBinding<Vec<Todo>>,
    create: Mutation<CreateTodo>,
    update: Mutation<UpdateTodo>,
    delete: Mutation<DeleteTodo>,
}

impl TodoSession {
    /// Session over any [`TodoApi`] with a fresh cache
    pub fn new(api: Rc<dyn TodoApi>, config: ClientConfig) -> Self {
        let cache = CacheStore::new();
        Self {
            query: QueryBinding::new(QueryKey::TODOS, cache.clone(), TodosQuery::new(api.clone())),
            create: Mutation::new(api.clone(), cache.clone(), CreateTodo),
            update: Mutation::new(api.clone(), cache.clone(), UpdateTodo),
            delete: Mutation::new(api, cache.clone(), DeleteTodo),
            cache,
            config,
        }
    }

    /// Session over HTTP at `config.base_url`
    pub fn connect(config: ClientConfig) -> Result<Self, ConfigError> {
        let api = HttpTodoApi::new(&config)?;
        info!(base_url = %api.base_url(), "todo session created");
        Ok(Self::new(Rc::new(api), config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn query(&self) -> &QueryBinding<Vec<Todo>> {
        &self.query
    }

    /// Fetch the list (on mount)
    pub async fn load(&self) -> ApiResult<()> {
        self.query.refresh().await
    }

    pub fn state(&self) -> QueryState<Vec<Todo>> {
        self.query.state()
    }

    pub fn screen(&self) -> Screen {
        Screen::from_state(&self.state(), self.config.display_limit)
    }

    pub async fn create(&self, new: NewTodo) -> ApiResult<Todo> {
        self.create.invoke(new).await
    }

    pub async fn update(&self, todo: Todo) -> ApiResult<Todo> {
        self.update.invoke(todo).await
    }

    pub async fn delete(&self, id: TodoId) -> ApiResult<TodoId> {
        self.delete.invoke(id).await
    }

    /// Route a form submit to the create or update mutation
    pub async fn dispatch(&self, intent: SubmitIntent) -> ApiResult<Todo> {
        match intent {
            SubmitIntent::Create(new) => self.create(new).await,
            SubmitIntent::Update(todo) => self.update(todo).await,
        }
    }

    /// Whether any mutation is in flight
    pub fn is_busy(&self) -> bool {
        self.create.is_pending() || self.update.is_pending() || self.delete.is_pending()
    }
}
