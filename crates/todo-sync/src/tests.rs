//! Session Scenario Tests
//!
//! Drives a `TodoSession` against an in-memory todo resource.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::TodoApi;
use crate::cache::{CacheStore, QueryKey};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewTodo, Todo, TodoId};
use crate::mutation::{CreateTodo, DeleteTodo, Mutation};
use crate::query::QueryState;
use crate::session::TodoSession;
use crate::view::{Screen, SubmitIntent, TodoForm};

/// In-memory stand-in for the `/todos` resource.
///
/// Deletes always succeed (like the public placeholder API); updates of unknown ids are 404s.
#[derive(Default)]
struct InMemoryTodoApi {
    todos: RefCell<Vec<Todo>>,
    next_id: Cell<TodoId>,
    calls: RefCell<Vec<&'static str>>,
    fail_next: RefCell<Option<ApiError>>,
    sent_updates: RefCell<Vec<Todo>>,
    /// Queued per-call latencies, by operation name
    delays: RefCell<HashMap<&'static str, Vec<Duration>>>,
}

impl InMemoryTodoApi {
    fn seeded(titles: &[&str]) -> Rc<Self> {
        let api = Self::default();
        for title in titles {
            api.insert(NewTodo::new(1, *title));
        }
        Rc::new(api)
    }

    fn insert(&self, new: NewTodo) -> Todo {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let todo = Todo {
            id,
            user_id: new.user_id,
            title: new.title,
            completed: new.completed,
        };
        self.todos.borrow_mut().push(todo.clone());
        todo
    }

    fn fail_next(&self, err: ApiError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn delay_next(&self, op: &'static str, delay: Duration) {
        self.delays.borrow_mut().entry(op).or_default().push(delay);
    }

    fn count(&self, op: &str) -> usize {
        self.calls.borrow().iter().filter(|call| **call == op).count()
    }

    async fn enter(&self, op: &'static str) -> ApiResult<()> {
        self.calls.borrow_mut().push(op);
        let delay = {
            let mut delays = self.delays.borrow_mut();
            delays
                .get_mut(op)
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl TodoApi for InMemoryTodoApi {
    async fn fetch_todos(&self) -> ApiResult<Vec<Todo>> {
        self.enter("fetch").await?;
        Ok(self.todos.borrow().clone())
    }

    async fn add_todo(&self, new: &NewTodo) -> ApiResult<Todo> {
        self.enter("add").await?;
        Ok(self.insert(new.clone()))
    }

    async fn update_todo(&self, todo: &Todo) -> ApiResult<Todo> {
        self.enter("update").await?;
        self.sent_updates.borrow_mut().push(todo.clone());
        let mut todos = self.todos.borrow_mut();
        let slot = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or_else(|| ApiError::NotFound(format!("/todos/{}", todo.id)))?;
        *slot = todo.clone();
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: TodoId) -> ApiResult<TodoId> {
        self.enter("delete").await?;
        self.todos.borrow_mut().retain(|t| t.id != id);
        Ok(id)
    }
}

fn session(api: &Rc<InMemoryTodoApi>) -> TodoSession {
    TodoSession::new(api.clone(), ClientConfig::default())
}

fn cached(session: &TodoSession) -> Option<Vec<Todo>> {
    session.cache().read::<Vec<Todo>>(&QueryKey::TODOS)
}

fn titles(todos: &[Todo]) -> Vec<String> {
    todos.iter().map(|t| t.title.clone()).collect()
}

/// What the page does on submit: dispatch, and reset the form only on success
async fn submit(session: &TodoSession, form: &RefCell<TodoForm>) -> Option<ApiResult<Todo>> {
    let intent = form.borrow().submit_intent(session.config().user_id)?;
    let result = session.dispatch(intent.clone()).await;
    if result.is_ok() {
        form.borrow_mut().finish(&intent);
    }
    Some(result)
}

#[tokio::test]
async fn test_load_renders_at_most_five_in_order() {
    let api = InMemoryTodoApi::seeded(&["1", "2", "3", "4", "5", "6", "7"]);
    let session = session(&api);
    assert_eq!(session.screen(), Screen::Loading);

    session.load().await.unwrap();

    let Screen::List(rows) = session.screen() else {
        panic!("expected list");
    };
    assert_eq!(titles(&rows), ["1", "2", "3", "4", "5"]);
    assert_eq!(cached(&session).map(|t| t.len()), Some(7));
}

#[tokio::test]
async fn test_add_scenario() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    session.load().await.unwrap();
    assert!(matches!(session.screen(), Screen::List(rows) if rows.len() == 2));

    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().set_input("C");
    let created = submit(&session, &form).await.unwrap().unwrap();

    assert_eq!(
        created,
        Todo { id: 3, user_id: 1, title: "C".into(), completed: false }
    );
    assert_eq!(titles(&cached(&session).unwrap()), ["A", "B", "C"]);
    assert_eq!(form.borrow().input(), "");
    // patched locally, never re-fetched
    assert_eq!(api.count("fetch"), 1);
}

#[tokio::test]
async fn test_edit_scenario() {
    let api = InMemoryTodoApi::seeded(&["A", "B", "C"]);
    let session = session(&api);
    session.load().await.unwrap();

    let b = cached(&session).unwrap()[1].clone();
    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().begin_edit(&b);
    assert_eq!(form.borrow().input(), "B");

    form.borrow_mut().set_input("B2");
    submit(&session, &form).await.unwrap().unwrap();

    assert_eq!(
        api.sent_updates.borrow().as_slice(),
        [Todo { id: 2, user_id: 1, title: "B2".into(), completed: false }]
    );
    let todos = cached(&session).unwrap();
    assert_eq!(titles(&todos), ["A", "B2", "C"]);
    assert_eq!(todos.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 2, 3]);
    assert!(!form.borrow().is_editing());
    assert_eq!(form.borrow().input(), "");
    assert_eq!(api.count("fetch"), 1);
}

#[tokio::test]
async fn test_blank_submit_sends_nothing() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);
    session.load().await.unwrap();

    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().set_input("   ");
    assert!(submit(&session, &form).await.is_none());
    assert_eq!(api.count("add"), 0);
}

#[tokio::test]
async fn test_delete_and_idempotence() {
    let api = InMemoryTodoApi::seeded(&["A", "B", "C"]);
    let session = session(&api);
    session.load().await.unwrap();

    session.delete(2).await.unwrap();
    let once = cached(&session).unwrap();
    assert_eq!(titles(&once), ["A", "C"]);

    session.delete(2).await.unwrap();
    assert_eq!(cached(&session).unwrap(), once);

    session.delete(99).await.unwrap();
    assert_eq!(cached(&session).unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_shows_error_not_stale_data() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    session.load().await.unwrap();

    api.fail_next(ApiError::Network("connection refused".into()));
    let err = session.load().await.unwrap_err();

    assert_eq!(err, ApiError::Network("connection refused".into()));
    assert!(session.state().is_error());
    assert_eq!(session.screen(), Screen::Failed);
    // still in memory, just not rendered
    assert!(cached(&session).is_some());
}

#[tokio::test]
async fn test_failed_create_leaves_cache_and_form() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);
    session.load().await.unwrap();
    let before = cached(&session);

    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().set_input("C");
    api.fail_next(ApiError::Server { status: 503 });
    let result = submit(&session, &form).await.unwrap();

    assert_eq!(result, Err(ApiError::Server { status: 503 }));
    assert_eq!(cached(&session), before);
    assert_eq!(form.borrow().input(), "C");

    // resubmitting works and clears the stored error
    submit(&session, &form).await.unwrap().unwrap();
    assert_eq!(titles(&cached(&session).unwrap()), ["A", "C"]);
}

#[tokio::test]
async fn test_failed_update_keeps_edit_selection() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    session.load().await.unwrap();

    // gone server-side but still cached
    api.todos.borrow_mut().retain(|t| t.id != 2);
    let b = cached(&session).unwrap()[1].clone();
    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().begin_edit(&b);
    form.borrow_mut().set_input("B2");

    let result = submit(&session, &form).await.unwrap();

    assert_eq!(result, Err(ApiError::NotFound("/todos/2".into())));
    assert_eq!(titles(&cached(&session).unwrap()), ["A", "B"]);
    assert_eq!(form.borrow().editing(), Some(&b));
    assert_eq!(form.borrow().input(), "B2");
}

#[tokio::test]
async fn test_create_before_load_establishes_list() {
    let api = InMemoryTodoApi::seeded(&[]);
    let session = session(&api);

    session.create(NewTodo::new(1, "first")).await.unwrap();

    assert_eq!(titles(&cached(&session).unwrap()), ["first"]);
    assert!(matches!(session.state(), QueryState::Success(todos) if todos.len() == 1));
}

#[tokio::test]
async fn test_update_and_delete_before_load_are_noops() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);

    session
        .update(Todo { id: 1, user_id: 1, title: "A2".into(), completed: false })
        .await
        .unwrap();
    session.delete(1).await.unwrap();

    assert_eq!(cached(&session), None);
    assert_eq!(session.state(), QueryState::Loading);
}

#[tokio::test]
async fn test_subscribers_follow_mutations() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    let rendered = Rc::new(RefCell::new(Vec::new()));
    let log = rendered.clone();
    let limit = session.config().display_limit;
    session
        .query()
        .subscribe(move |state| log.borrow_mut().push(Screen::from_state(state, limit)));

    session.load().await.unwrap();
    let intent = SubmitIntent::Create(NewTodo::new(1, "C"));
    session.dispatch(intent).await.unwrap();
    session.delete(1).await.unwrap();

    let lens: Vec<_> = rendered
        .borrow()
        .iter()
        .map(|screen| match screen {
            Screen::List(rows) => rows.len(),
            _ => 0,
        })
        .collect();
    assert_eq!(lens, [2, 3, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_updates_last_response_wins() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);
    session.load().await.unwrap();
    let a = cached(&session).unwrap()[0].clone();

    api.delay_next("update", Duration::from_millis(30));
    api.delay_next("update", Duration::from_millis(10));
    let (slow, fast) = tokio::join!(
        session.update(a.with_title("slow")),
        session.update(a.with_title("fast")),
    );
    slow.unwrap();
    fast.unwrap();

    // issued first, landed last
    assert_eq!(titles(&cached(&session).unwrap()), ["slow"]);
    assert!(!session.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_pending_while_in_flight() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);
    session.load().await.unwrap();

    api.delay_next("delete", Duration::from_millis(50));
    let watcher = session.clone();
    let (result, busy) = tokio::join!(session.delete(1), async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        watcher.is_busy()
    });

    result.unwrap();
    assert!(busy);
    assert!(!session.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_failed_load_starts_from_loading() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    session.load().await.unwrap();
    api.fail_next(ApiError::Network("connection reset".into()));
    session.load().await.unwrap_err();

    let published = Rc::new(RefCell::new(Vec::new()));
    let log = published.clone();
    session
        .query()
        .subscribe(move |state| log.borrow_mut().push(state.clone()));

    api.delay_next("fetch", Duration::from_millis(20));
    let watcher = session.clone();
    let (result, mid_flight) = tokio::join!(session.load(), async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        (watcher.state(), watcher.query().is_fetching())
    });
    result.unwrap();

    // the list hidden by the failure is not shown again while retrying
    assert_eq!(mid_flight, (QueryState::Loading, true));
    assert_eq!(session.screen(), Screen::List(cached(&session).unwrap()));
    let published = published.borrow();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0], QueryState::Loading);
    assert!(matches!(&published[1], QueryState::Success(todos) if todos.len() == 2));
    assert!(!session.query().is_fetching());
}

#[tokio::test(start_paused = true)]
async fn test_is_fetching_while_first_load_in_flight() {
    let api = InMemoryTodoApi::seeded(&["A"]);
    let session = session(&api);
    assert!(!session.query().is_fetching());

    api.delay_next("fetch", Duration::from_millis(30));
    let watcher = session.clone();
    let (result, mid_flight) = tokio::join!(session.load(), async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        (watcher.query().is_fetching(), watcher.screen())
    });
    result.unwrap();

    assert_eq!(mid_flight, (true, Screen::Loading));
    assert!(!session.query().is_fetching());
}

#[tokio::test]
async fn test_last_error_tracks_latest_outcome() {
    let api = InMemoryTodoApi::seeded(&[]);
    let create = Mutation::new(api.clone(), CacheStore::new(), CreateTodo);
    assert_eq!(create.last_error(), None);

    api.fail_next(ApiError::Server { status: 502 });
    create.invoke(NewTodo::new(1, "C")).await.unwrap_err();
    assert_eq!(create.last_error(), Some(ApiError::Server { status: 502 }));

    create.invoke(NewTodo::new(1, "C")).await.unwrap();
    assert_eq!(create.last_error(), None);
}

#[tokio::test]
async fn test_failed_delete_leaves_cache() {
    let api = InMemoryTodoApi::seeded(&["A", "B"]);
    let session = session(&api);
    session.load().await.unwrap();
    let before = cached(&session);

    let delete = Mutation::new(api.clone(), session.cache().clone(), DeleteTodo);
    api.fail_next(ApiError::Network("timed out".into()));
    let result = delete.invoke(1).await;

    assert_eq!(result, Err(ApiError::Network("timed out".into())));
    assert_eq!(cached(&session), before);
    assert_eq!(delete.last_error(), Some(ApiError::Network("timed out".into())));
    assert_eq!(session.screen(), Screen::List(before.unwrap()));
}

#[tokio::test]
async fn test_configured_user_id_stamps_new_todos() {
    let api = InMemoryTodoApi::seeded(&[]);
    let session = TodoSession::new(api.clone(), ClientConfig::default().with_user_id(7));
    session.load().await.unwrap();

    let form = RefCell::new(TodoForm::default());
    form.borrow_mut().set_input("mine");
    let created = submit(&session, &form).await.unwrap().unwrap();

    assert_eq!(created.user_id, 7);
    assert_eq!(cached(&session).unwrap(), vec![created]);
}
