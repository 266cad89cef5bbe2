use chrono::{DateTime, NaiveDate, Utc};

use crate::model::app::AppState;
use crate::model::project::{ProjectId, SystemList};
use crate::model::task::{Item, ItemId, Priority};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("list not found: {0}")]
    ListNotFound(ProjectId),
    #[error("task not found: {0} in list {1}")]
    NotFound(ItemId, ProjectId),
    #[error("subtask not found: {0}")]
    SubtaskNotFound(u32),
    #[error("title cannot be empty")]
    EmptyTitle,
}

fn item_mut(state: &mut AppState, list: ProjectId, id: ItemId) -> Result<&mut Item, TaskError> {
    if state.project(list).is_none() {
        return Err(TaskError::ListNotFound(list));
    }
    state
        .item_mut(list, id)
        .ok_or(TaskError::NotFound(id, list))
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// Add a task to `list` and return where it landed.
///
/// System views own no items: adding while one is the target puts the task
/// in "Tasks" and sets the view's flag (My Day, Bookmarked, or due today for
/// Planned).
pub fn add_item(
    state: &mut AppState,
    list: ProjectId,
    title: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(ProjectId, ItemId), TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let view = SystemList::from_id(list);
    let owner = if list.is_aggregate() {
        SystemList::Tasks.id()
    } else {
        list
    };

    let project = state
        .project_mut(owner)
        .ok_or(TaskError::ListNotFound(owner))?;
    let id = project.add_item(title, now).ok_or(TaskError::EmptyTitle)?;
    let item = project
        .item_mut(id)
        .ok_or(TaskError::NotFound(id, owner))?;
    match view {
        Some(SystemList::MyDay) => item.is_my_day = true,
        Some(SystemList::Bookmarked) => item.is_important = true,
        Some(SystemList::Planned) => item.date = Some(today),
        _ => {}
    }

    tracing::debug!(list = %owner, item = %id, "added task");
    Ok((owner, id))
}

/// Remove a task, returning it
pub fn remove_item(state: &mut AppState, list: ProjectId, id: ItemId) -> Result<Item, TaskError> {
    let project = state
        .project_mut(list)
        .ok_or(TaskError::ListNotFound(list))?;
    let removed = project
        .remove_item(id)
        .ok_or(TaskError::NotFound(id, list))?;
    tracing::debug!(list = %list, item = %id, "removed task");
    Ok(removed)
}

/// Rename a task. Empty titles are refused and leave the task unchanged.
pub fn rename_item(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    title: &str,
) -> Result<(), TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    item_mut(state, list, id)?.title = title.to_string();
    Ok(())
}

// ---------------------------------------------------------------------------
// Flags and fields
// ---------------------------------------------------------------------------

/// Toggle completion, returning the new value
pub fn toggle_complete(state: &mut AppState, list: ProjectId, id: ItemId) -> Result<bool, TaskError> {
    let item = item_mut(state, list, id)?;
    item.is_complete = !item.is_complete;
    Ok(item.is_complete)
}

/// Toggle the bookmark flag, returning the new value
pub fn toggle_important(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
) -> Result<bool, TaskError> {
    let item = item_mut(state, list, id)?;
    item.is_important = !item.is_important;
    Ok(item.is_important)
}

/// Toggle My Day membership, returning the new value
pub fn toggle_my_day(state: &mut AppState, list: ProjectId, id: ItemId) -> Result<bool, TaskError> {
    let item = item_mut(state, list, id)?;
    item.is_my_day = !item.is_my_day;
    Ok(item.is_my_day)
}

/// Set or clear the due date
pub fn set_due(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    date: Option<NaiveDate>,
) -> Result<(), TaskError> {
    item_mut(state, list, id)?.date = date;
    Ok(())
}

pub fn set_priority(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    priority: Priority,
) -> Result<(), TaskError> {
    item_mut(state, list, id)?.priority = priority;
    Ok(())
}

pub fn set_note(state: &mut AppState, list: ProjectId, id: ItemId, note: &str) -> Result<(), TaskError> {
    item_mut(state, list, id)?.note = note.to_string();
    Ok(())
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

/// Add a subtask and return its id
pub fn add_subtask(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    name: &str,
) -> Result<u32, TaskError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(item_mut(state, list, id)?.add_subtask(name.to_string()))
}

pub fn remove_subtask(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    sub: u32,
) -> Result<(), TaskError> {
    if item_mut(state, list, id)?.remove_subtask(sub) {
        Ok(())
    } else {
        Err(TaskError::SubtaskNotFound(sub))
    }
}

/// Rename a subtask; an empty name is ignored
pub fn rename_subtask(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    sub: u32,
    name: &str,
) -> Result<(), TaskError> {
    let item = item_mut(state, list, id)?;
    if !item.subtasks.iter().any(|s| s.id == sub) {
        return Err(TaskError::SubtaskNotFound(sub));
    }
    item.rename_subtask(sub, name.trim());
    Ok(())
}

/// Toggle a subtask's completion, returning the new value
pub fn toggle_subtask(
    state: &mut AppState,
    list: ProjectId,
    id: ItemId,
    sub: u32,
) -> Result<bool, TaskError> {
    let item = item_mut(state, list, id)?;
    if !item.toggle_subtask(sub) {
        return Err(TaskError::SubtaskNotFound(sub));
    }
    Ok(item
        .subtasks
        .iter()
        .find(|s| s.id == sub)
        .is_some_and(|s| s.is_complete))
}

// ---------------------------------------------------------------------------
// My Day
// ---------------------------------------------------------------------------

/// Start a new My Day when the date has changed: every flag is cleared.
/// Returns true if a rollover happened.
pub fn roll_my_day(state: &mut AppState, today: NaiveDate) -> bool {
    if state.my_day == Some(today) {
        return false;
    }
    let first_run = state.my_day.is_none();
    state.my_day = Some(today);
    if first_run {
        return false;
    }

    let mut cleared = 0usize;
    for project in &mut state.projects {
        for item in project.items.iter_mut().filter(|i| i.is_my_day) {
            item.is_my_day = false;
            cleared += 1;
        }
    }
    tracing::info!(%today, cleared, "my day rolled over");
    true
}
