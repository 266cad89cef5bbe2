use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A named comparator selectable per list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortCriterion {
    #[serde(rename = "Alphabetically")]
    Alphabetical,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Added to My Day")]
    MyDay,
    #[serde(rename = "Bookmarked")]
    Bookmarked,
    #[serde(rename = "Due date")]
    DueDate,
    #[serde(rename = "Creation date")]
    CreationDate,
    #[serde(rename = "Priority")]
    Priority,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 7] = [
        SortCriterion::Alphabetical,
        SortCriterion::Completed,
        SortCriterion::MyDay,
        SortCriterion::Bookmarked,
        SortCriterion::DueDate,
        SortCriterion::CreationDate,
        SortCriterion::Priority,
    ];

    /// Human label, also the persisted name
    pub fn label(self) -> &'static str {
        match self {
            SortCriterion::Alphabetical => "Alphabetically",
            SortCriterion::Completed => "Completed",
            SortCriterion::MyDay => "Added to My Day",
            SortCriterion::Bookmarked => "Bookmarked",
            SortCriterion::DueDate => "Due date",
            SortCriterion::CreationDate => "Creation date",
            SortCriterion::Priority => "Priority",
        }
    }

    /// Direction used until the user flips it
    pub fn default_direction(self) -> Direction {
        match self {
            SortCriterion::Alphabetical
            | SortCriterion::Completed
            | SortCriterion::DueDate
            | SortCriterion::CreationDate => Direction::Asc,
            SortCriterion::MyDay | SortCriterion::Bookmarked | SortCriterion::Priority => {
                Direction::Desc
            }
        }
    }

    /// Whether completed items are pinned last regardless of direction
    pub fn pins_completed(self) -> bool {
        matches!(self, SortCriterion::DueDate | SortCriterion::Priority)
    }

    /// Parse either the persisted label or a short CLI name
    /// (`alpha`, `completed`, `myday`, `bookmarked`, `due`, `created`, `priority`).
    pub fn parse(s: &str) -> Option<SortCriterion> {
        if let Some(c) = Self::ALL.iter().find(|c| c.label().eq_ignore_ascii_case(s)) {
            return Some(*c);
        }
        match s.to_ascii_lowercase().as_str() {
            "alpha" | "alphabetical" | "name" | "title" => Some(SortCriterion::Alphabetical),
            "completed" | "complete" | "done" => Some(SortCriterion::Completed),
            "myday" | "my-day" => Some(SortCriterion::MyDay),
            "bookmarked" | "important" | "star" => Some(SortCriterion::Bookmarked),
            "due" | "due-date" | "date" => Some(SortCriterion::DueDate),
            "created" | "creation" | "creation-date" => Some(SortCriterion::CreationDate),
            "priority" => Some(SortCriterion::Priority),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort direction, realised as a sign multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `+1` for ascending, `-1` for descending
    pub fn sign(self) -> i8 {
        match self {
            Direction::Asc => 1,
            Direction::Desc => -1,
        }
    }

    /// Apply the sign to an ascending comparison result
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        if self.sign() < 0 { ord.reverse() } else { ord }
    }

    pub fn flipped(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Asc),
            "desc" | "descending" => Some(Direction::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

/// Per-list sort selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    /// `None` means manual (canonical) order
    #[serde(default, deserialize_with = "lenient_criterion")]
    pub selected: Option<SortCriterion>,
    /// Single-use override consumed by the next sort
    #[serde(skip)]
    pub pending: Option<Direction>,
    #[serde(default = "default_directions")]
    pub directions: IndexMap<SortCriterion, Direction>,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            selected: None,
            pending: None,
            directions: default_directions(),
        }
    }
}

impl SortState {
    /// Stored direction for a criterion, falling back to its default
    pub fn direction_for(&self, criterion: SortCriterion) -> Direction {
        self.directions
            .get(&criterion)
            .copied()
            .unwrap_or_else(|| criterion.default_direction())
    }

    /// Queue a one-shot direction for the next sort
    pub fn set_pending(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    /// Queue the opposite of the selected criterion's direction.
    /// Returns the queued direction, or None when no criterion is selected.
    pub fn flip(&mut self) -> Option<Direction> {
        let criterion = self.selected?;
        let next = self.direction_for(criterion).flipped();
        self.pending = Some(next);
        Some(next)
    }

    /// Consume the pending override (writing it as the selected criterion's
    /// direction) and return the criterion with its effective direction.
    pub fn resolve(&mut self) -> Option<(SortCriterion, Direction)> {
        let pending = self.pending.take();
        let criterion = self.selected?;
        if let Some(dir) = pending {
            self.directions.insert(criterion, dir);
        }
        Some((criterion, self.direction_for(criterion)))
    }
}

fn default_directions() -> IndexMap<SortCriterion, Direction> {
    SortCriterion::ALL
        .iter()
        .map(|c| (*c, c.default_direction()))
        .collect()
}

/// Unknown or "none" labels load as manual order
fn lenient_criterion<'de, D>(deserializer: D) -> Result<Option<SortCriterion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SortCriterion::parse))
}
