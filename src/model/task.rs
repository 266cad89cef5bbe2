use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// Identifier of an item, unique within the project that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-level task priority. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority name (case-insensitive)
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checklist entry inside an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub is_complete: bool,
}

/// A single task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// The concrete list that owns this item
    pub project_id: ProjectId,
    #[serde(default)]
    pub is_complete: bool,
    /// Shown in the Bookmarked view
    #[serde(default)]
    pub is_important: bool,
    /// Shown in the My Day view until the next day rollover
    #[serde(default)]
    pub is_my_day: bool,
    /// Due date; dated items are shown in the Planned view
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Item {
    /// Create a new incomplete item with default attributes
    pub fn new(id: ItemId, project_id: ProjectId, title: String, created: DateTime<Utc>) -> Self {
        Item {
            id,
            title,
            project_id,
            is_complete: false,
            is_important: false,
            is_my_day: false,
            date: None,
            priority: Priority::Low,
            creation_date: created,
            note: String::new(),
            subtasks: Vec::new(),
        }
    }

    /// Append a subtask and return its id (one past the last id, or 1)
    pub fn add_subtask(&mut self, name: String) -> u32 {
        let id = self.subtasks.last().map_or(1, |s| s.id + 1);
        self.subtasks.push(Subtask {
            id,
            name,
            is_complete: false,
        });
        id
    }

    /// Remove a subtask. Returns false if no subtask has this id.
    pub fn remove_subtask(&mut self, id: u32) -> bool {
        match self.subtasks.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.subtasks.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Rename a subtask. Empty names are ignored.
    pub fn rename_subtask(&mut self, id: u32, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        match self.subtasks.iter_mut().find(|s| s.id == id) {
            Some(sub) => {
                sub.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Flip a subtask's completion
    pub fn toggle_subtask(&mut self, id: u32) -> bool {
        match self.subtasks.iter_mut().find(|s| s.id == id) {
            Some(sub) => {
                sub.is_complete = !sub.is_complete;
                true
            }
            None => false,
        }
    }

    /// `(done, total)` subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.is_complete).count();
        (done, self.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item() -> Item {
        Item::new(
            ItemId(1),
            ProjectId(5),
            "Write report".into(),
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn subtask_ids_follow_last_entry() {
        let mut it = item();
        assert_eq!(it.add_subtask("outline".into()), 1);
        assert_eq!(it.add_subtask("draft".into()), 2);
        assert!(it.remove_subtask(1));
        // Next id follows the last remaining entry, not the count
        assert_eq!(it.add_subtask("review".into()), 3);
        let ids: Vec<u32> = it.subtasks.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn rename_subtask_ignores_empty_name() {
        let mut it = item();
        let id = it.add_subtask("outline".into());
        assert!(!it.rename_subtask(id, ""));
        assert_eq!(it.subtasks[0].name, "outline");
        assert!(it.rename_subtask(id, "structure"));
        assert_eq!(it.subtasks[0].name, "structure");
    }

    #[test]
    fn toggle_and_progress() {
        let mut it = item();
        let a = it.add_subtask("a".into());
        it.add_subtask("b".into());
        assert!(it.toggle_subtask(a));
        assert_eq!(it.subtask_progress(), (1, 2));
        assert!(!it.toggle_subtask(99));
    }

    #[test]
    fn priority_ordering_and_parse() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn serde_defaults_on_minimal_item() {
        let json = r#"{"id":3,"title":"x","project_id":6,"creation_date":"2025-01-01T00:00:00Z"}"#;
        let it: Item = serde_json::from_str(json).unwrap();
        assert_eq!(it.id, ItemId(3));
        assert_eq!(it.priority, Priority::Low);
        assert!(it.date.is_none());
        assert!(it.subtasks.is_empty());
    }
}
