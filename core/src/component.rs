//! The `ToDoList` component: state holder, fetch layer, debounced updater
//! and renderer in one handle.
//!
//! # Design
//! - `ToDoList` is a cheap `Clone` handle around shared state so a host can
//!   run several event handlers concurrently on a tokio runtime.
//! - All state lives behind one `RwLock`. Locks are never held across a
//!   network round-trip; each state change is a short critical section.
//! - Edits are applied locally first, then pushed through a per-task
//!   `Debouncer`, so edits to one task coalesce and edits to different tasks
//!   never clobber each other.
//! - List fetches are stamped with a sequence number. Only the response to
//!   the most recent fetch is applied; older in-flight fetches are left to
//!   complete and then discarded.
//! - Every failed backend call returns its error to the caller and also lands
//!   in the notice slot rendered by `View`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::store::{ListState, TaskList};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTask, Filter, Task, TaskChange, TaskId, UpdateTask};
use crate::view::{self, View};

pub const SUBMIT_KEY: &str = "Enter";

#[derive(Debug, Default)]
struct State {
    list: ListState,
    draft: String,
    filter: Filter,
    notice: Option<String>,
    /// A create for the current draft is in flight.
    submitting: bool,
}

struct Inner<T> {
    client: TodoClient,
    transport: T,
    state: RwLock<State>,
    updates: Debouncer<TaskId>,
    mounted: AtomicBool,
    list_seq: AtomicU64,
}

pub struct ToDoList<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ToDoList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ToDoList<ReqwestTransport> {
    /// Component talking to `config.api_url` over `reqwest`.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config, ReqwestTransport::new(config)?))
    }
}

impl<T: Transport> ToDoList<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                client: TodoClient::new(&config.api_url),
                transport,
                state: RwLock::new(State::default()),
                updates: Debouncer::new(config.update_debounce),
                mounted: AtomicBool::new(false),
                list_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Initial load. Only the first call fetches; later calls return
    /// `Ok(false)` without touching the backend.
    pub async fn mount(&self) -> Result<bool, ApiError> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            debug!("already mounted, skipping initial load");
            return Ok(false);
        }
        let filter = self.inner.state.read().await.filter;
        self.load(filter).await?;
        Ok(true)
    }

    /// Re-fetch the list for the current filter.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let filter = self.inner.state.read().await.filter;
        self.load(filter).await
    }

    /// Switch the completion filter and fetch the list scoped to it.
    pub async fn set_filter(&self, filter: Filter) -> Result<(), ApiError> {
        self.inner.state.write().await.filter = filter;
        self.load(filter).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.inner.state.write().await.draft = text.into();
    }

    /// Key handler for the draft input. `Enter` submits; other keys are
    /// ignored.
    pub async fn key_down(&self, key: &str) -> Result<Option<Task>, ApiError> {
        if key != SUBMIT_KEY {
            return Ok(None);
        }
        self.submit().await
    }

    /// Create a task from the draft. Returns `Ok(None)` when the draft is
    /// empty or a submission is already in flight.
    pub async fn submit(&self) -> Result<Option<Task>, ApiError> {
        let name = {
            let mut state = self.inner.state.write().await;
            if state.draft.is_empty() || state.submitting {
                return Ok(None);
            }
            state.submitting = true;
            state.draft.clone()
        };

        let result = self.inner.create(&name).await;

        let mut state = self.inner.state.write().await;
        state.submitting = false;
        match result {
            Ok(task) => {
                info!(task_id = %task.id, "task created");
                match state.list.tasks_mut() {
                    Some(list) => list.push(task.clone()),
                    None => debug!(task_id = %task.id, "no list loaded, next fetch will include the task"),
                }
                // Keep anything typed while the request was in flight.
                if state.draft == name {
                    state.draft.clear();
                }
                Ok(Some(task))
            }
            Err(e) => {
                warn!(error = %e, "task create failed");
                state.notice = Some(format!("Could not add \"{name}\": {e}"));
                Err(e)
            }
        }
    }

    /// Apply an edit forwarded by an item view. The change is visible
    /// immediately; the backend update is debounced per task.
    pub async fn change_task(&self, id: &TaskId, change: TaskChange) -> Result<Task, ApiError> {
        let updated = {
            let mut state = self.inner.state.write().await;
            let list = state
                .list
                .tasks_mut()
                .ok_or_else(|| ApiError::UnknownTask(id.clone()))?;
            let current = list.get(id).ok_or_else(|| ApiError::UnknownTask(id.clone()))?;
            let next = current.with_change(&change);
            list.replace(next.clone());
            next
        };

        debug!(task_id = %id, ?change, "task update scheduled");
        self.schedule_update(updated.clone());
        Ok(updated)
    }

    /// Delete a task on the backend, then drop it locally. A pending update
    /// for the task is withdrawn first and only rescheduled if the delete
    /// fails.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let known = self
            .inner
            .state
            .read()
            .await
            .list
            .tasks()
            .is_some_and(|list| list.contains(id));
        if !known {
            return Err(ApiError::UnknownTask(id.clone()));
        }

        let withdrawn = self.inner.updates.cancel(id);
        if withdrawn {
            debug!(task_id = %id, "pending update withdrawn for delete");
        }

        let request = self.inner.client.build_delete_task(id);
        let result = match self.inner.round_trip(request).await {
            Ok(response) => self.inner.client.parse_delete_task(response),
            Err(e) => Err(e),
        };

        let mut state = self.inner.state.write().await;
        match result {
            Ok(()) => {
                // Drop any edit made while the delete was in flight.
                self.inner.updates.cancel(id);
                if let Some(list) = state.list.tasks_mut() {
                    list.remove(id);
                }
                info!(task_id = %id, "task deleted");
                Ok(())
            }
            Err(e) => {
                warn!(task_id = %id, error = %e, "task delete failed");
                state.notice = Some(format!("Could not delete task {id}: {e}"));
                if withdrawn {
                    if let Some(task) = state.list.tasks().and_then(|list| list.get(id)).cloned() {
                        self.schedule_update(task);
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn dismiss_notice(&self) {
        self.inner.state.write().await.notice = None;
    }

    pub async fn render(&self) -> View {
        let state = self.inner.state.read().await;
        view::render(&state.list, &state.draft, state.filter, state.notice.as_deref())
    }

    pub async fn list_state(&self) -> ListState {
        self.inner.state.read().await.list.clone()
    }

    pub async fn filter(&self) -> Filter {
        self.inner.state.read().await.filter
    }

    pub async fn draft(&self) -> String {
        self.inner.state.read().await.draft.clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.inner.state.read().await.notice.clone()
    }

    /// Tasks with an edit that has not been pushed yet.
    pub fn pending_updates(&self) -> usize {
        self.inner.updates.pending()
    }

    fn schedule_update(&self, task: Task) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .updates
            .schedule(task.id.clone(), async move { inner.push_update(task).await });
    }

    async fn load(&self, filter: Filter) -> Result<(), ApiError> {
        let seq = self.inner.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.write().await.list.begin_loading();
        debug!(seq, ?filter, "list fetch issued");

        let request = self.inner.client.build_list_tasks(filter);
        let result = match self.inner.round_trip(request).await {
            Ok(response) => self.inner.client.parse_list_tasks(response),
            Err(e) => Err(e),
        };

        let mut state = self.inner.state.write().await;
        if self.inner.list_seq.load(Ordering::SeqCst) != seq {
            debug!(seq, ?filter, "discarding superseded list response");
            return Ok(());
        }
        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), ?filter, "tasks loaded");
                state.list = ListState::Loaded(TaskList::from(tasks));
                Ok(())
            }
            Err(e) => {
                warn!(?filter, error = %e, "task list fetch failed");
                state.list.restore();
                state.notice = Some(format!("Could not load tasks: {e}"));
                Err(e)
            }
        }
    }
}

impl<T: Transport> Inner<T> {
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        self.transport.execute(request).await
    }

    async fn create(&self, name: &str) -> Result<Task, ApiError> {
        let request = self.client.build_create_task(&CreateTask::named(name))?;
        let response = self.round_trip(request).await?;
        self.client.parse_create_task(response)
    }

    async fn send_update(&self, task: &Task) -> Result<(), ApiError> {
        let request = self.client.build_update_task(&task.id, &UpdateTask::from(task))?;
        let response = self.round_trip(request).await?;
        self.client.parse_update_task(response)
    }

    /// Debounced backend write for one task. The optimistic local value is
    /// kept either way; a failure only surfaces as a notice.
    async fn push_update(&self, task: Task) {
        match self.send_update(&task).await {
            Ok(()) => debug!(task_id = %task.id, "task update pushed"),
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "task update failed");
                self.state.write().await.notice = Some(format!("Could not save \"{}\": {e}", task.name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::http::HttpMethod;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    /// In-memory stand-in for the REST backend. Records every request and
    /// can be told to fail the next call or to delay certain paths.
    #[derive(Default)]
    struct FakeBackend {
        tasks: Mutex<Vec<Task>>,
        next_id: Mutex<u64>,
        requests: Mutex<Vec<HttpRequest>>,
        fail_next: Mutex<Option<u16>>,
        slow_paths: Mutex<Vec<(String, Duration)>>,
    }

    impl FakeBackend {
        fn with_tasks(tasks: Vec<Task>) -> Arc<Self> {
            let next = tasks
                .iter()
                .filter_map(|t| match t.id {
                    TaskId::Int(n) => Some(n),
                    TaskId::Text(_) => None,
                })
                .max()
                .unwrap_or(0);
            Arc::new(Self {
                tasks: Mutex::new(tasks),
                next_id: Mutex::new(next),
                ..Self::default()
            })
        }

        fn fail_next(&self, status: u16) {
            *self.fail_next.lock().unwrap() = Some(status);
        }

        fn slow(&self, path_suffix: &str, latency: Duration) {
            self.slow_paths.lock().unwrap().push((path_suffix.to_string(), latency));
        }

        fn requests(&self, method: HttpMethod) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.method == method)
                .cloned()
                .collect()
        }

        fn respond(&self, request: &HttpRequest) -> HttpResponse {
            if let Some(status) = self.fail_next.lock().unwrap().take() {
                return HttpResponse::new(status, "injected failure");
            }
            let path = request.path.strip_prefix(BASE).unwrap();
            let mut tasks = self.tasks.lock().unwrap();
            match request.method {
                HttpMethod::Get => {
                    let wanted = path.strip_prefix("/todos?completed=").map(|v| v == "true");
                    let listed: Vec<&Task> = tasks
                        .iter()
                        .filter(|t| wanted.map_or(true, |c| t.completed == c))
                        .collect();
                    HttpResponse::new(200, serde_json::to_string(&listed).unwrap())
                }
                HttpMethod::Post => {
                    let input: CreateTask = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                    let mut next_id = self.next_id.lock().unwrap();
                    *next_id += 1;
                    let task = Task {
                        id: TaskId::Int(*next_id),
                        name: input.name,
                        completed: input.completed,
                    };
                    tasks.push(task.clone());
                    HttpResponse::new(201, serde_json::to_string(&task).unwrap())
                }
                HttpMethod::Put => {
                    let id = path.strip_prefix("/todos/").unwrap();
                    let input: UpdateTask = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                    match tasks.iter_mut().find(|t| t.id.to_string() == id) {
                        Some(task) => {
                            task.name = input.name;
                            task.completed = input.completed;
                            HttpResponse::new(200, serde_json::to_string(task).unwrap())
                        }
                        None => HttpResponse::new(404, ""),
                    }
                }
                HttpMethod::Delete => {
                    let id = path.strip_prefix("/todos/").unwrap();
                    let before = tasks.len();
                    tasks.retain(|t| t.id.to_string() != id);
                    if tasks.len() < before {
                        HttpResponse::new(204, "")
                    } else {
                        HttpResponse::new(404, "")
                    }
                }
            }
        }
    }

    #[async_trait]
    impl Transport for FakeBackend {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            let latency = self
                .slow_paths
                .lock()
                .unwrap()
                .iter()
                .find(|(suffix, _)| request.path.ends_with(suffix.as_str()))
                .map(|(_, latency)| *latency);
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Ok(self.respond(&request))
        }
    }

    const BASE: &str = "http://api.test";

    fn task(id: u64, name: &str, completed: bool) -> Task {
        Task {
            id: id.into(),
            name: name.to_string(),
            completed,
        }
    }

    fn component(backend: &Arc<FakeBackend>) -> ToDoList<Arc<FakeBackend>> {
        let config = ClientConfig::new(BASE).with_update_debounce(DEBOUNCE);
        ToDoList::new(&config, Arc::clone(backend))
    }

    async fn mounted(tasks: Vec<Task>) -> (Arc<FakeBackend>, ToDoList<Arc<FakeBackend>>) {
        let backend = FakeBackend::with_tasks(tasks);
        let list = component(&backend);
        assert!(list.mount().await.unwrap());
        (backend, list)
    }

    #[tokio::test]
    async fn renders_loading_before_mount() {
        let backend = FakeBackend::with_tasks(vec![]);
        let list = component(&backend);
        assert!(list.render().await.is_loading());
        assert!(backend.requests(HttpMethod::Get).is_empty());
    }

    #[tokio::test]
    async fn initial_load_shows_every_backend_task() {
        let (backend, list) = mounted(vec![task(1, "buy milk", false), task(2, "walk dog", true)]).await;

        let view = list.render().await;
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.items()[0].name, "buy milk");
        assert!(!view.items()[0].completed);
        assert_eq!(backend.requests(HttpMethod::Get)[0].path, "http://api.test/todos");
    }

    #[tokio::test]
    async fn mount_fetches_only_once() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;
        assert!(!list.mount().await.unwrap());
        assert!(!list.clone().mount().await.unwrap());
        assert_eq!(backend.requests(HttpMethod::Get).len(), 1);
    }

    #[tokio::test]
    async fn filter_change_refetches_scoped_list() {
        let (backend, list) = mounted(vec![task(1, "a", false), task(2, "b", true), task(3, "c", true)]).await;

        list.set_filter(Filter::Completed).await.unwrap();
        let view = list.render().await;
        assert_eq!(view.active_filter(), Some(Filter::Completed));
        let ids: Vec<_> = view.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, [TaskId::Int(2), TaskId::Int(3)]);

        list.set_filter(Filter::Active).await.unwrap();
        assert_eq!(list.render().await.items().len(), 1);

        let paths: Vec<_> = backend.requests(HttpMethod::Get).into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            [
                "http://api.test/todos",
                "http://api.test/todos?completed=true",
                "http://api.test/todos?completed=false",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_from_older_fetch_is_discarded() {
        let (backend, list) = mounted(vec![task(1, "a", false), task(2, "b", true)]).await;
        backend.slow("?completed=true", Duration::from_millis(300));

        let slow = tokio::spawn({
            let list = list.clone();
            async move { list.set_filter(Filter::Completed).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        list.set_filter(Filter::Active).await.unwrap();
        slow.await.unwrap().unwrap();

        let view = list.render().await;
        assert_eq!(view.active_filter(), Some(Filter::Active));
        let names: Vec<_> = view.items().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, ["a"]);
    }

    #[tokio::test]
    async fn failed_load_restores_previous_list_and_surfaces_notice() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        backend.fail_next(500);
        let err = list.set_filter(Filter::Completed).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));

        let view = list.render().await;
        assert_eq!(view.items().len(), 1);
        assert!(view.notice.as_deref().unwrap().starts_with("Could not load tasks"));

        list.dismiss_notice().await;
        assert!(list.render().await.notice.is_none());
    }

    #[tokio::test]
    async fn failed_initial_load_can_be_retried() {
        let backend = FakeBackend::with_tasks(vec![task(1, "a", false)]);
        let list = component(&backend);

        backend.fail_next(503);
        assert!(list.mount().await.is_err());
        assert_eq!(list.list_state().await, ListState::Uninitialized);

        list.refresh().await.unwrap();
        assert_eq!(list.render().await.items().len(), 1);
    }

    #[tokio::test]
    async fn submitting_draft_creates_one_task_and_clears_draft() {
        let (backend, list) = mounted(vec![task(1, "buy milk", false)]).await;

        list.set_draft("walk dog").await;
        let created = list.key_down(SUBMIT_KEY).await.unwrap().unwrap();
        assert_eq!(created.name, "walk dog");
        assert!(!created.completed);

        let posts = backend.requests(HttpMethod::Post);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].path, "http://api.test/todos/");

        let view = list.render().await;
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.items()[1].id, created.id);
        assert!(view.input.value.is_empty());
    }

    #[tokio::test]
    async fn empty_draft_and_other_keys_do_nothing() {
        let (backend, list) = mounted(vec![]).await;

        assert!(list.key_down(SUBMIT_KEY).await.unwrap().is_none());
        list.set_draft("x").await;
        assert!(list.key_down("a").await.unwrap().is_none());
        assert!(backend.requests(HttpMethod::Post).is_empty());
        assert_eq!(list.draft().await, "x");
    }

    #[tokio::test]
    async fn failed_create_keeps_draft_and_list() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        list.set_draft("b").await;
        backend.fail_next(500);
        assert!(list.submit().await.is_err());

        let view = list.render().await;
        assert_eq!(view.items().len(), 1);
        assert_eq!(view.input.value, "b");
        assert!(view.notice.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_is_optimistic_and_pushes_one_update() {
        let (backend, list) = mounted(vec![task(1, "buy milk", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Completed(true)).await.unwrap();
        assert!(list.render().await.items()[0].completed);
        assert!(backend.requests(HttpMethod::Put).is_empty());
        assert_eq!(list.pending_updates(), 1);

        tokio::time::sleep(DEBOUNCE * 2).await;
        let puts = backend.requests(HttpMethod::Put);
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].path, "http://api.test/todos/1");
        let body: serde_json::Value = serde_json::from_str(puts[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "buy milk", "completed": true}));
    }

    #[tokio::test(start_paused = true)]
    async fn two_quick_renames_push_only_the_latest() {
        let (backend, list) = mounted(vec![task(1, "buy milk", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Name("buy oat".into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        list.change_task(&TaskId::Int(1), TaskChange::Name("buy oat milk".into())).await.unwrap();

        tokio::time::sleep(DEBOUNCE * 2).await;
        let puts = backend.requests(HttpMethod::Put);
        assert_eq!(puts.len(), 1);
        assert!(puts[0].body.as_deref().unwrap().contains("buy oat milk"));
    }

    #[tokio::test(start_paused = true)]
    async fn edits_to_different_tasks_are_not_coalesced() {
        let (backend, list) = mounted(vec![task(1, "a", false), task(2, "b", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Completed(true)).await.unwrap();
        list.change_task(&TaskId::Int(2), TaskChange::Name("b2".into())).await.unwrap();

        tokio::time::sleep(DEBOUNCE * 2).await;
        let mut paths: Vec<_> = backend.requests(HttpMethod::Put).into_iter().map(|r| r.path).collect();
        paths.sort();
        assert_eq!(paths, ["http://api.test/todos/1", "http://api.test/todos/2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_update_keeps_local_value_and_surfaces_notice() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Name("a2".into())).await.unwrap();
        backend.fail_next(500);
        tokio::time::sleep(DEBOUNCE * 2).await;

        let view = list.render().await;
        assert_eq!(view.items()[0].name, "a2");
        assert!(view.notice.as_deref().unwrap().starts_with("Could not save \"a2\""));
    }

    #[tokio::test]
    async fn change_to_unknown_task_is_rejected() {
        let (_backend, list) = mounted(vec![task(1, "a", false)]).await;
        let err = list.change_task(&TaskId::Int(9), TaskChange::Completed(true)).await.unwrap_err();
        assert_eq!(err, ApiError::UnknownTask(TaskId::Int(9)));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_task_after_success() {
        let (backend, list) = mounted(vec![task(1, "a", false), task(2, "b", false), task(3, "c", false)]).await;

        list.delete_task(&TaskId::Int(2)).await.unwrap();
        let ids: Vec<_> = list.render().await.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, [TaskId::Int(1), TaskId::Int(3)]);
        assert_eq!(backend.requests(HttpMethod::Delete)[0].path, "http://api.test/todos/2");
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_untouched() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        backend.fail_next(500);
        assert!(list.delete_task(&TaskId::Int(1)).await.is_err());
        assert_eq!(list.render().await.items().len(), 1);
        assert!(list.notice().await.is_some());

        let err = list.delete_task(&TaskId::Int(7)).await.unwrap_err();
        assert_eq!(err, ApiError::UnknownTask(TaskId::Int(7)));
        assert_eq!(backend.requests(HttpMethod::Delete).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_delete_is_not_followed_by_pending_update() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;
        backend.slow("/todos/1", DEBOUNCE + Duration::from_millis(300));

        list.change_task(&TaskId::Int(1), TaskChange::Name("a2".into())).await.unwrap();
        list.delete_task(&TaskId::Int(1)).await.unwrap();

        tokio::time::sleep(DEBOUNCE * 2).await;
        let methods: Vec<_> = backend.requests.lock().unwrap().iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Delete]);
        assert!(list.render().await.items().is_empty());
        assert!(list.notice().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delete_reschedules_pending_update() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Completed(true)).await.unwrap();
        backend.fail_next(500);
        assert!(list.delete_task(&TaskId::Int(1)).await.is_err());
        assert_eq!(list.pending_updates(), 1);

        tokio::time::sleep(DEBOUNCE * 2).await;
        let puts = backend.requests(HttpMethod::Put);
        assert_eq!(puts.len(), 1);
        let body: serde_json::Value = serde_json::from_str(puts[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "a", "completed": true}));
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_keeps_showing_loaded_list() {
        let (backend, list) = mounted(vec![task(1, "a", false), task(2, "b", true)]).await;
        backend.slow("?completed=true", Duration::from_millis(300));

        let fetch = tokio::spawn({
            let list = list.clone();
            async move { list.set_filter(Filter::Completed).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(list.list_state().await.is_loading());
        let view = list.render().await;
        assert!(!view.is_loading());
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.active_filter(), Some(Filter::Completed));

        fetch.await.unwrap().unwrap();
        let names: Vec<_> = list.render().await.items().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, ["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_cancels_pending_update() {
        let (backend, list) = mounted(vec![task(1, "a", false)]).await;

        list.change_task(&TaskId::Int(1), TaskChange::Completed(true)).await.unwrap();
        list.delete_task(&TaskId::Int(1)).await.unwrap();

        tokio::time::sleep(DEBOUNCE * 2).await;
        assert!(backend.requests(HttpMethod::Put).is_empty());
        assert_eq!(list.pending_updates(), 0);
        assert!(list.notice().await.is_none());
    }
}
