use crate::model::app::AppState;
use crate::model::project::{Project, ProjectId};

/// Error type for list operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("list not found: {0}")]
    NotFound(ProjectId),
    #[error("no list matches '{0}'")]
    Unknown(String),
    #[error("list name cannot be empty")]
    EmptyName,
    #[error("'{0}' is a system list and cannot be changed")]
    Reserved(String),
    #[error("list '{name}' still has {open} open task(s); use --force to delete it")]
    HasOpenItems { name: String, open: usize },
}

/// Create a user list and return its id
pub fn add_project(state: &mut AppState, name: &str) -> Result<ProjectId, ProjectError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProjectError::EmptyName);
    }
    let next = state.projects.iter().map(|p| p.id.0).max().unwrap_or(5) + 1;
    let id = ProjectId(next);
    state.projects.push(Project::new(id, name));
    tracing::debug!(list = %id, name, "added list");
    Ok(id)
}

/// Delete a user list.
///
/// System lists are refused. A list with incomplete tasks needs `force`.
/// If the deleted list was selected, the previous list becomes selected.
pub fn remove_project(
    state: &mut AppState,
    id: ProjectId,
    force: bool,
) -> Result<Project, ProjectError> {
    let index = state.project_index(id).ok_or(ProjectError::NotFound(id))?;
    let project = &state.projects[index];
    if id.is_reserved() {
        return Err(ProjectError::Reserved(project.name.clone()));
    }
    let open = project.open_count();
    if open > 0 && !force {
        return Err(ProjectError::HasOpenItems {
            name: project.name.clone(),
            open,
        });
    }

    let removed = state.projects.remove(index);
    match state.selected {
        Some(sel) if sel == index => state.set_selected(Some(index.saturating_sub(1))),
        Some(sel) if sel > index => state.set_selected(Some(sel - 1)),
        _ => {}
    }
    if state.last_selected >= state.projects.len() {
        state.last_selected = state.projects.len().saturating_sub(1);
    }
    tracing::info!(list = %id, name = %removed.name, items = removed.items.len(), "deleted list");
    Ok(removed)
}

/// Rename a user list
pub fn rename_project(state: &mut AppState, id: ProjectId, name: &str) -> Result<(), ProjectError> {
    let project = state.project_mut(id).ok_or(ProjectError::NotFound(id))?;
    if id.is_reserved() {
        return Err(ProjectError::Reserved(project.name.clone()));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(ProjectError::EmptyName);
    }
    project.name = name.to_string();
    Ok(())
}

/// Make `id` the selected list
pub fn select(state: &mut AppState, id: ProjectId) -> Result<(), ProjectError> {
    let index = state.project_index(id).ok_or(ProjectError::NotFound(id))?;
    state.set_selected(Some(index));
    Ok(())
}

/// Find a list by id number or (case-insensitive) name
pub fn resolve(state: &AppState, key: &str) -> Result<ProjectId, ProjectError> {
    if let Ok(n) = key.parse::<u32>()
        && state.project(ProjectId(n)).is_some()
    {
        return Ok(ProjectId(n));
    }
    state
        .projects
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(key.trim()))
        .map(|p| p.id)
        .ok_or_else(|| ProjectError::Unknown(key.to_string()))
}
