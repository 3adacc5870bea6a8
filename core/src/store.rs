//! Local task state: an ordered task list keyed by id, and the load state
//! machine wrapped around it.

use crate::types::{Task, TaskId};

/// Ordered tasks with at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Append `task`, or replace the existing entry with the same id in place.
    pub fn push(&mut self, task: Task) {
        match self.position(&task.id) {
            Some(idx) => self.tasks[idx] = task,
            None => self.tasks.push(task),
        }
    }

    /// Replace the entry keyed by `task.id`. Returns the previous value, or
    /// `None` (and leaves the list untouched) when no such entry exists.
    pub fn replace(&mut self, task: Task) -> Option<Task> {
        let idx = self.position(&task.id)?;
        Some(std::mem::replace(&mut self.tasks[idx], task))
    }

    /// Remove the entry keyed by `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        Some(self.tasks.remove(idx))
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

impl FromIterator<Task> for TaskList {
    /// Later duplicates of an id overwrite earlier ones in place.
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut list = TaskList::new();
        for task in iter {
            list.push(task);
        }
        list
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        tasks.into_iter().collect()
    }
}

/// Where the component is in fetching its task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListState {
    /// No fetch has been issued yet.
    #[default]
    Uninitialized,
    /// A fetch is in flight. `stale` is whatever was loaded before it, kept
    /// so edits still land somewhere and a failed fetch can restore it.
    Loading { stale: Option<TaskList> },
    Loaded(TaskList),
}

impl ListState {
    /// Enter `Loading`, carrying the current list along.
    pub fn begin_loading(&mut self) {
        let stale = match std::mem::take(self) {
            ListState::Uninitialized => None,
            ListState::Loading { stale } => stale,
            ListState::Loaded(list) => Some(list),
        };
        *self = ListState::Loading { stale };
    }

    /// Abandon a failed fetch: back to the list held before it, if any.
    pub fn restore(&mut self) {
        *self = match std::mem::take(self) {
            ListState::Loading { stale: Some(list) } | ListState::Loaded(list) => ListState::Loaded(list),
            ListState::Loading { stale: None } | ListState::Uninitialized => ListState::Uninitialized,
        };
    }

    /// The list edits should apply to, loaded or stale.
    pub fn tasks(&self) -> Option<&TaskList> {
        match self {
            ListState::Loaded(list) | ListState::Loading { stale: Some(list) } => Some(list),
            _ => None,
        }
    }

    pub fn tasks_mut(&mut self) -> Option<&mut TaskList> {
        match self {
            ListState::Loaded(list) | ListState::Loading { stale: Some(list) } => Some(list),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading { .. })
    }
}
