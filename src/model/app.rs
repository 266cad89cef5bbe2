use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::project::{Project, ProjectId, SystemList};
use super::task::{Item, ItemId};

/// Open/closed state of a Planned bucket header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    #[default]
    Open,
    Closed,
}

/// The whole application: every list plus view selection.
///
/// Constructed once by the caller and passed by reference to the
/// operations, the views and the drag controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// System lists first (ids 1–5), then user lists in creation order
    pub projects: Vec<Project>,
    /// Index of the selected list; `None` while searching
    #[serde(default)]
    pub selected: Option<usize>,
    /// Last list index that was selected
    #[serde(default = "default_selected")]
    pub last_selected: usize,
    /// Date of the last My Day rollover
    #[serde(default)]
    pub my_day: Option<NaiveDate>,
    /// Planned bucket headers, in bucket order
    #[serde(default)]
    pub planned_tabs: [TabState; 6],
}

fn default_selected() -> usize {
    4
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh state with the five system lists and "Tasks" selected
    pub fn new() -> Self {
        AppState {
            projects: SystemList::ALL
                .iter()
                .map(|s| Project::new(s.id(), s.name()))
                .collect(),
            selected: Some(default_selected()),
            last_selected: default_selected(),
            my_day: None,
            planned_tabs: [TabState::Open; 6],
        }
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn project_index(&self, id: ProjectId) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    /// The selected list, if not in search mode
    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|idx| self.projects.get(idx))
    }

    pub fn selected_project_mut(&mut self) -> Option<&mut Project> {
        match self.selected {
            Some(idx) => self.projects.get_mut(idx),
            None => None,
        }
    }

    /// Select by index; `None` enters search mode and keeps `last_selected`
    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index;
        if let Some(idx) = index {
            self.last_selected = idx;
        }
    }

    /// Leave search mode, returning to the last selected list
    pub fn restore_selection(&mut self) {
        if self.selected.is_none() {
            let idx = self.last_selected.min(self.projects.len().saturating_sub(1));
            self.selected = Some(idx);
        }
    }

    /// Every item of every list, in list order then canonical order
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.projects.iter().flat_map(|p| p.items.iter())
    }

    /// Look up an item by owning list and id
    pub fn item(&self, project: ProjectId, id: ItemId) -> Option<&Item> {
        self.project(project)?.item(id)
    }

    pub fn item_mut(&mut self, project: ProjectId, id: ItemId) -> Option<&mut Item> {
        self.project_mut(project)?.item_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_system_lists_and_selects_tasks() {
        let state = AppState::new();
        let ids: Vec<u32> = state.projects.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(state.selected_project().unwrap().name, "Tasks");
        assert!(state.planned_tabs.iter().all(|t| *t == TabState::Open));
    }

    #[test]
    fn search_mode_keeps_last_selected() {
        let mut state = AppState::new();
        state.set_selected(Some(1));
        state.set_selected(None);
        assert!(state.selected_project().is_none());
        assert_eq!(state.last_selected, 1);
        state.restore_selection();
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let state: AppState = serde_json::from_str(r#"{"projects":[]}"#).unwrap();
        assert_eq!(state.last_selected, 4);
        assert!(state.selected.is_none());
        assert!(state.my_day.is_none());
    }
}
