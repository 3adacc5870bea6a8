//! Framework-neutral view model produced by `ToDoList::render`.
//!
//! A host maps these plain structs onto its own widgets. The `Display`
//! impl gives a compact text rendering used in logs and tests.

use std::fmt;

use crate::store::ListState;
use crate::types::{Filter, Task, TaskId};

pub const INPUT_PLACEHOLDER: &str = "What needs to be done?";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub input: InputView,
    pub body: Body,
    pub filters: Vec<FilterButton>,
    /// Last surfaced failure, until dismissed.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub value: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Items(Vec<ItemView>),
}

/// Everything an item view needs to render one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
}

impl From<&Task> for ItemView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            completed: task.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub filter: Filter,
    pub label: &'static str,
    pub active: bool,
}

/// Map component state onto a `View`.
pub fn render(list: &ListState, draft: &str, filter: Filter, notice: Option<&str>) -> View {
    // A refetch keeps showing the list it will replace.
    let body = match list.tasks() {
        Some(tasks) => Body::Items(tasks.iter().map(ItemView::from).collect()),
        None => Body::Loading,
    };
    View {
        input: InputView {
            value: draft.to_string(),
            placeholder: INPUT_PLACEHOLDER,
        },
        body,
        filters: Filter::ALL
            .iter()
            .map(|&f| FilterButton {
                filter: f,
                label: f.label(),
                active: f == filter,
            })
            .collect(),
        notice: notice.map(str::to_string),
    }
}

impl View {
    pub fn items(&self) -> &[ItemView] {
        match &self.body {
            Body::Items(items) => items.as_slice(),
            Body::Loading => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        self.body == Body::Loading
    }

    pub fn active_filter(&self) -> Option<Filter> {
        self.filters.iter().find(|b| b.active).map(|b| b.filter)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.input.value.is_empty() {
            writeln!(f, "> ({})", self.input.placeholder)?;
        } else {
            writeln!(f, "> {}", self.input.value)?;
        }
        match &self.body {
            Body::Loading => writeln!(f, "{LOADING_TEXT}")?,
            Body::Items(items) => {
                for item in items {
                    let mark = if item.completed { 'x' } else { ' ' };
                    writeln!(f, "[{mark}] {}", item.name)?;
                }
            }
        }
        let buttons: Vec<String> = self
            .filters
            .iter()
            .map(|b| if b.active { format!("<{}>", b.label) } else { b.label.to_string() })
            .collect();
        write!(f, "{}", buttons.join(" "))?;
        if let Some(notice) = &self.notice {
            write!(f, "\n! {notice}")?;
        }
        Ok(())
    }
}
