use chrono::{Datelike, NaiveDate};
use regex::RegexBuilder;

use crate::model::app::{AppState, TabState};
use crate::model::project::{ProjectId, SystemList};
use crate::model::task::Item;
use crate::ops::sort::sorted_items;

/// Error type for view queries
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("list not found: {0}")]
    ListNotFound(ProjectId),
    #[error("invalid search pattern: {0}")]
    BadPattern(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// List views
// ---------------------------------------------------------------------------

/// Items shown for a list, in display order.
///
/// System views collect from every list; All, My Day and Bookmarked go
/// through the sort engine with the aggregate base order, Planned is
/// ordered by due date and never sorted.
pub fn view_items(state: &mut AppState, id: ProjectId) -> Result<Vec<Item>, ViewError> {
    let collected: Vec<Item> = match SystemList::from_id(id) {
        Some(SystemList::All) => state.all_items().cloned().collect(),
        Some(SystemList::MyDay) => state.all_items().filter(|i| i.is_my_day).cloned().collect(),
        Some(SystemList::Bookmarked) => state
            .all_items()
            .filter(|i| i.is_important)
            .cloned()
            .collect(),
        Some(SystemList::Planned) => {
            let mut dated: Vec<Item> = state.all_items().filter(|i| i.date.is_some()).cloned().collect();
            dated.sort_by_key(|i| i.date);
            return Ok(dated);
        }
        Some(SystemList::Tasks) | None => state
            .project(id)
            .ok_or(ViewError::ListNotFound(id))?
            .items
            .clone(),
    };

    let project = state.project_mut(id).ok_or(ViewError::ListNotFound(id))?;
    Ok(sorted_items(&collected, &mut project.sort, id.is_aggregate()))
}

// ---------------------------------------------------------------------------
// Planned buckets
// ---------------------------------------------------------------------------

/// Date group in the Planned view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannedBucket {
    Earlier,
    Today,
    Tomorrow,
    LaterThisWeek,
    NextWeek,
    Later,
}

impl PlannedBucket {
    pub const ALL: [PlannedBucket; 6] = [
        PlannedBucket::Earlier,
        PlannedBucket::Today,
        PlannedBucket::Tomorrow,
        PlannedBucket::LaterThisWeek,
        PlannedBucket::NextWeek,
        PlannedBucket::Later,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlannedBucket::Earlier => "Earlier",
            PlannedBucket::Today => "Today",
            PlannedBucket::Tomorrow => "Tomorrow",
            PlannedBucket::LaterThisWeek => "Later this week",
            PlannedBucket::NextWeek => "Next week",
            PlannedBucket::Later => "Later",
        }
    }

    /// Position in `AppState::planned_tabs`
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|b| *b == self).unwrap_or(0)
    }
}

/// Which Planned group a due date falls into, relative to `today`.
/// Weeks start on Sunday.
pub fn bucket_for(date: NaiveDate, today: NaiveDate) -> PlannedBucket {
    let days = (date - today).num_days();
    let weekday = today.weekday().num_days_from_sunday() as i64;

    if days < 0 {
        PlannedBucket::Earlier
    } else if days == 0 {
        PlannedBucket::Today
    } else if days == 1 {
        PlannedBucket::Tomorrow
    } else if weekday != 0 && weekday != 6 && days <= 7 - weekday {
        PlannedBucket::LaterThisWeek
    } else if (days > 7 - weekday && days <= 14 - weekday) || (weekday == 0 && days <= 7) {
        PlannedBucket::NextWeek
    } else {
        PlannedBucket::Later
    }
}

/// A non-empty Planned group with its header state
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    pub bucket: PlannedBucket,
    pub tab: TabState,
    pub items: Vec<Item>,
}

/// Group dated items into Planned buckets, skipping empty ones.
/// Items keep their relative (date) order within a bucket.
pub fn planned_groups(state: &AppState, today: NaiveDate) -> Vec<PlannedGroup> {
    let mut dated: Vec<&Item> = state.all_items().filter(|i| i.date.is_some()).collect();
    dated.sort_by_key(|i| i.date);

    PlannedBucket::ALL
        .iter()
        .filter_map(|bucket| {
            let items: Vec<Item> = dated
                .iter()
                .filter(|i| i.date.is_some_and(|d| bucket_for(d, today) == *bucket))
                .map(|i| (*i).clone())
                .collect();
            if items.is_empty() {
                return None;
            }
            Some(PlannedGroup {
                bucket: *bucket,
                tab: state.planned_tabs[bucket.index()],
                items,
            })
        })
        .collect()
}

/// Open or close a Planned bucket header
pub fn set_planned_tab(state: &mut AppState, bucket: PlannedBucket, tab: TabState) {
    state.planned_tabs[bucket.index()] = tab;
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Friendly due-date text such as "Due Tomorrow" or "Overdue, Mon, January 5"
pub fn due_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "Due Today".to_string(),
        1 => "Due Tomorrow".to_string(),
        -1 => "Overdue Yesterday".to_string(),
        _ => {
            let prefix = if days < 0 { "Overdue," } else { "Due" };
            if date.year() != today.year() {
                format!("{} {}", prefix, date.format("%a, %B %-d, %Y"))
            } else {
                format!("{} {}", prefix, date.format("%a, %B %-d"))
            }
        }
    }
}

/// Creation text such as "Created Today" or "Created Tue, March 4, 2024"
pub fn created_label(created: NaiveDate, today: NaiveDate) -> String {
    match (today - created).num_days() {
        0 => "Created Today".to_string(),
        1 => "Created Yesterday".to_string(),
        _ if created.year() != today.year() => {
            format!("Created {}", created.format("%a, %B %-d, %Y"))
        }
        _ => format!("Created {}", created.format("%a, %B %-d")),
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Items from every list whose title matches `pattern` (case-insensitive
/// regex), ordered by title. An empty pattern matches nothing.
pub fn search(state: &AppState, pattern: &str) -> Result<Vec<Item>, ViewError> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
    let mut hits: Vec<Item> = state
        .all_items()
        .filter(|i| re.is_match(&i.title))
        .cloned()
        .collect();
    hits.sort_by_key(|i| i.title.to_uppercase());
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sort::SortCriterion;
    use crate::ops::{project_ops, task_ops};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    /// Tasks: a (starred), b (my day, due 06-12), c (due 06-10); Errands: d (starred)
    fn sample() -> AppState {
        let mut state = AppState::new();
        let tasks = SystemList::Tasks.id();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        for (n, title) in ["a", "b", "c"].iter().enumerate() {
            let t = now + chrono::Duration::minutes(n as i64 * 2);
            task_ops::add_item(&mut state, tasks, title, date(2025, 6, 1), t).unwrap();
        }
        let errands = project_ops::add_project(&mut state, "Errands").unwrap();
        task_ops::add_item(
            &mut state,
            errands,
            "d",
            date(2025, 6, 1),
            now + chrono::Duration::minutes(1),
        )
        .unwrap();
        state.item_mut(tasks, crate::model::ItemId(1)).unwrap().is_important = true;
        let b = state.item_mut(tasks, crate::model::ItemId(2)).unwrap();
        b.is_my_day = true;
        b.date = Some(date(2025, 6, 12));
        state.item_mut(tasks, crate::model::ItemId(3)).unwrap().date = Some(date(2025, 6, 10));
        state.item_mut(errands, crate::model::ItemId(1)).unwrap().is_important = true;
        state
    }

    #[test]
    fn all_tasks_view_uses_creation_order() {
        let mut state = sample();
        let items = view_items(&mut state, SystemList::All.id()).unwrap();
        assert_eq!(titles(&items), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn flag_views_filter_across_lists() {
        let mut state = sample();
        let starred = view_items(&mut state, SystemList::Bookmarked.id()).unwrap();
        assert_eq!(titles(&starred), vec!["a", "d"]);
        let my_day = view_items(&mut state, SystemList::MyDay.id()).unwrap();
        assert_eq!(titles(&my_day), vec!["b"]);
    }

    #[test]
    fn planned_view_orders_by_date_and_ignores_sort() {
        let mut state = sample();
        state.project_mut(SystemList::Planned.id()).unwrap().sort.selected =
            Some(SortCriterion::Alphabetical);
        let planned = view_items(&mut state, SystemList::Planned.id()).unwrap();
        assert_eq!(titles(&planned), vec!["c", "b"]);
    }

    #[test]
    fn concrete_list_view_applies_sort() {
        let mut state = sample();
        let tasks = SystemList::Tasks.id();
        state.project_mut(tasks).unwrap().sort.selected = Some(SortCriterion::Bookmarked);
        let items = view_items(&mut state, tasks).unwrap();
        assert_eq!(titles(&items)[0], "a");
        assert!(view_items(&mut state, ProjectId(42)).is_err());
    }

    #[test]
    fn buckets_on_a_wednesday() {
        // 2025-06-11 is a Wednesday; the week runs through Sunday
        let today = date(2025, 6, 11);
        assert_eq!(bucket_for(date(2025, 6, 9), today), PlannedBucket::Earlier);
        assert_eq!(bucket_for(today, today), PlannedBucket::Today);
        assert_eq!(bucket_for(date(2025, 6, 12), today), PlannedBucket::Tomorrow);
        assert_eq!(bucket_for(date(2025, 6, 14), today), PlannedBucket::LaterThisWeek);
        assert_eq!(bucket_for(date(2025, 6, 15), today), PlannedBucket::LaterThisWeek);
        assert_eq!(bucket_for(date(2025, 6, 16), today), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 22), today), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 23), today), PlannedBucket::Later);
    }

    #[test]
    fn buckets_on_weekends() {
        // Sunday 2025-06-08: nothing is "later this week"
        let sunday = date(2025, 6, 8);
        assert_eq!(bucket_for(date(2025, 6, 10), sunday), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 15), sunday), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 22), sunday), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 23), sunday), PlannedBucket::Later);
        // Saturday 2025-06-14
        let saturday = date(2025, 6, 14);
        assert_eq!(bucket_for(date(2025, 6, 16), saturday), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 22), saturday), PlannedBucket::NextWeek);
        assert_eq!(bucket_for(date(2025, 6, 23), saturday), PlannedBucket::Later);
    }

    #[test]
    fn planned_groups_skip_empty_buckets() {
        let mut state = sample();
        set_planned_tab(&mut state, PlannedBucket::Tomorrow, TabState::Closed);
        let groups = planned_groups(&state, date(2025, 6, 11));
        let summary: Vec<(PlannedBucket, TabState, Vec<&str>)> = groups
            .iter()
            .map(|g| (g.bucket, g.tab, titles(&g.items)))
            .collect();
        assert_eq!(
            summary,
            vec![
                (PlannedBucket::Earlier, TabState::Open, vec!["c"]),
                (PlannedBucket::Tomorrow, TabState::Closed, vec!["b"]),
            ]
        );
    }

    #[test]
    fn due_labels() {
        let today = date(2025, 6, 11);
        assert_eq!(due_label(today, today), "Due Today");
        assert_eq!(due_label(date(2025, 6, 12), today), "Due Tomorrow");
        assert_eq!(due_label(date(2025, 6, 10), today), "Overdue Yesterday");
        assert_eq!(due_label(date(2025, 6, 16), today), "Due Mon, June 16");
        assert_eq!(due_label(date(2025, 6, 2), today), "Overdue, Mon, June 2");
        assert_eq!(due_label(date(2026, 1, 5), today), "Due Mon, January 5, 2026");
    }

    #[test]
    fn created_labels() {
        let today = date(2025, 6, 11);
        assert_eq!(created_label(today, today), "Created Today");
        assert_eq!(created_label(date(2025, 6, 10), today), "Created Yesterday");
        assert_eq!(created_label(date(2025, 6, 3), today), "Created Tue, June 3");
        assert_eq!(created_label(date(2024, 3, 4), today), "Created Mon, March 4, 2024");
    }

    #[test]
    fn search_is_case_insensitive_and_sorted() {
        let mut state = sample();
        let tasks = SystemList::Tasks.id();
        task_ops::add_item(&mut state, tasks, "Buy Milk", date(2025, 6, 1), Utc::now()).unwrap();
        task_ops::add_item(&mut state, tasks, "almond milk", date(2025, 6, 1), Utc::now()).unwrap();
        let hits = search(&state, "MILK").unwrap();
        assert_eq!(titles(&hits), vec!["almond milk", "Buy Milk"]);
        assert!(search(&state, "").unwrap().is_empty());
        assert!(search(&state, "(").is_err());
    }
}
