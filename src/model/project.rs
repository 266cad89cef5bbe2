use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sort::SortState;
use super::task::{Item, ItemId};

/// Identifier of a list. Ids 1–5 are reserved for the system lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u32);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed lists every application state starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemList {
    All,
    MyDay,
    Bookmarked,
    Planned,
    Tasks,
}

impl SystemList {
    pub const ALL: [SystemList; 5] = [
        SystemList::All,
        SystemList::MyDay,
        SystemList::Bookmarked,
        SystemList::Planned,
        SystemList::Tasks,
    ];

    pub fn id(self) -> ProjectId {
        ProjectId(match self {
            SystemList::All => 1,
            SystemList::MyDay => 2,
            SystemList::Bookmarked => 3,
            SystemList::Planned => 4,
            SystemList::Tasks => 5,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            SystemList::All => "All Tasks",
            SystemList::MyDay => "My Day",
            SystemList::Bookmarked => "Bookmarked",
            SystemList::Planned => "Planned",
            SystemList::Tasks => "Tasks",
        }
    }

    pub fn from_id(id: ProjectId) -> Option<SystemList> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }
}

impl ProjectId {
    /// Reserved for a system list (cannot be deleted or renamed)
    pub fn is_reserved(self) -> bool {
        (1..=5).contains(&self.0)
    }

    /// A virtual view aggregating items of other lists (All, My Day,
    /// Bookmarked, Planned). These own no items.
    pub fn is_aggregate(self) -> bool {
        (1..=4).contains(&self.0)
    }
}

/// A named list with its canonical item order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Canonical order, used for manual reordering
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub sort: SortState,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Project {
            id,
            name: name.into(),
            items: Vec::new(),
            sort: SortState::default(),
        }
    }

    /// Manual drag reordering is only meaningful on a concrete list
    /// shown in its canonical order.
    pub fn supports_manual_order(&self) -> bool {
        !self.id.is_aggregate() && self.sort.selected.is_none()
    }

    /// Append a new item and return its id (one past the max, or 1).
    /// Empty titles are refused.
    pub fn add_item(&mut self, title: &str, created: DateTime<Utc>) -> Option<ItemId> {
        if title.trim().is_empty() {
            return None;
        }
        let id = ItemId(self.items.iter().map(|i| i.id.0).max().map_or(1, |m| m + 1));
        self.items
            .push(Item::new(id, self.id, title.to_string(), created));
        Some(id)
    }

    /// Remove an item, returning it
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.position_of(id)?;
        Some(self.items.remove(idx))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position_of(id).is_some()
    }

    /// Canonical id sequence
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|i| i.id).collect()
    }

    /// Rearrange items to follow `order`. Ids in `order` that no longer
    /// exist are skipped; live items missing from `order` keep their
    /// relative order after the ordered ones. Returns true if the
    /// canonical order changed.
    pub fn apply_order(&mut self, order: &[ItemId]) -> bool {
        let before = self.item_ids();
        let mut remaining = std::mem::take(&mut self.items);
        let mut next = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(idx) = remaining.iter().position(|i| i.id == *id) {
                next.push(remaining.remove(idx));
            }
        }
        next.append(&mut remaining);
        self.items = next;
        self.item_ids() != before
    }

    /// Number of incomplete items
    pub fn open_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_complete).count()
    }
}
