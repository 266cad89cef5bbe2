use chrono::NaiveDate;
use serde::Serialize;

use crate::model::app::TabState;
use crate::model::project::Project;
use crate::model::sort::{Direction, SortCriterion};
use crate::model::task::{Item, ItemId, Priority};
use crate::ops::views::{self, PlannedBucket, PlannedGroup};
use crate::util::unicode::fit_to_width;

/// Width of the title column in listings
const TITLE_CELLS: usize = 32;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub list: u32,
    pub id: u32,
    pub title: String,
    pub complete: bool,
    pub bookmarked: bool,
    pub my_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub id: u32,
    pub name: String,
    pub complete: bool,
}

#[derive(Serialize)]
pub struct ListJson {
    pub id: u32,
    pub name: String,
    pub system: bool,
    pub selected: bool,
    pub open: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

#[derive(Serialize)]
pub struct ViewJson {
    pub list: u32,
    pub name: String,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct PlannedGroupJson {
    pub bucket: String,
    pub open: bool,
    pub items: Vec<ItemJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json(item: &Item) -> ItemJson {
    ItemJson {
        list: item.project_id.0,
        id: item.id.0,
        title: item.title.clone(),
        complete: item.is_complete,
        bookmarked: item.is_important,
        my_day: item.is_my_day,
        due: item.date,
        priority: item.priority,
        created: item
            .creation_date
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        note: item.note.clone(),
        subtasks: item
            .subtasks
            .iter()
            .map(|s| SubtaskJson {
                id: s.id,
                name: s.name.clone(),
                complete: s.is_complete,
            })
            .collect(),
    }
}

pub fn list_to_json(project: &Project, selected: bool) -> ListJson {
    let sort = project.sort.selected;
    ListJson {
        id: project.id.0,
        name: project.name.clone(),
        system: project.id.is_reserved(),
        selected,
        open: project.open_count(),
        total: project.items.len(),
        sort: sort.map(|c| c.label().to_string()),
        direction: sort.map(|c| project.sort.direction_for(c)),
    }
}

pub fn planned_to_json(groups: &[PlannedGroup]) -> Vec<PlannedGroupJson> {
    groups
        .iter()
        .map(|g| PlannedGroupJson {
            bucket: g.bucket.label().to_string(),
            open: g.tab == TabState::Open,
            items: g.items.iter().map(item_to_json).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn check(done: bool) -> char {
    if done { 'x' } else { ' ' }
}

/// One task per line: checkbox, id, title column, flags, due text
pub fn format_item_line(item: &Item, today: NaiveDate) -> String {
    let mut flags = Vec::new();
    if item.is_important {
        flags.push("★".to_string());
    }
    if item.is_my_day {
        flags.push("☀".to_string());
    }
    if item.priority != Priority::Low {
        flags.push(format!("!{}", item.priority.as_str()));
    }
    let (done, total) = item.subtask_progress();
    if total > 0 {
        flags.push(format!("{}/{}", done, total));
    }
    if let Some(date) = item.date {
        flags.push(views::due_label(date, today));
    }

    let line = format!(
        "[{}] {:>3}  {}  {}",
        check(item.is_complete),
        item.id.0,
        fit_to_width(&item.title, TITLE_CELLS),
        flags.join("  ")
    );
    line.trim_end().to_string()
}

/// Full view of a single task
pub fn format_item_detail(item: &Item, list_name: &str, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("[{}] {} {}", check(item.is_complete), item.id, item.title)];
    lines.push(format!("list: {}", list_name));
    lines.push(format!("priority: {}", item.priority.as_str()));
    if item.is_important {
        lines.push("bookmarked".to_string());
    }
    if item.is_my_day {
        lines.push("in my day".to_string());
    }
    if let Some(date) = item.date {
        lines.push(format!("due: {} ({})", date, views::due_label(date, today)));
    }
    lines.push(views::created_label(item.creation_date.date_naive(), today));
    if !item.note.is_empty() {
        lines.push("note:".to_string());
        for line in item.note.lines() {
            lines.push(format!("  {}", line));
        }
    }
    if !item.subtasks.is_empty() {
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        for sub in &item.subtasks {
            lines.push(format!("  [{}] {} {}", check(sub.is_complete), sub.id, sub.name));
        }
    }
    lines
}

/// List header: name, id, open count, active sort
pub fn format_list_header(project: &Project) -> String {
    let sort = match project.sort.selected {
        Some(c) => format!(
            ", sorted {} {}",
            c.label().to_lowercase(),
            project.sort.direction_for(c)
        ),
        None => String::new(),
    };
    format!(
        "== {} ({}) {} open{} ==",
        project.name,
        project.id,
        project.open_count(),
        sort
    )
}

/// One line per list for `td lists`
pub fn format_list_line(project: &Project, selected: bool) -> String {
    let marker = if selected { '*' } else { ' ' };
    let kind = if project.id.is_aggregate() {
        "view"
    } else if project.id.is_reserved() {
        "system"
    } else {
        "list"
    };
    format!(
        "{} {:>3}  {}  {}",
        marker,
        project.id.0,
        fit_to_width(&project.name, 20),
        kind
    )
    .trim_end()
    .to_string()
}

/// Planned groups with their headers; closed groups show only the header
pub fn format_planned(groups: &[PlannedGroup], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        let arrow = match group.tab {
            TabState::Open => 'v',
            TabState::Closed => '>',
        };
        lines.push(format!("{} {} ({})", arrow, group.bucket.label(), group.items.len()));
        if group.tab == TabState::Open {
            lines.extend(
                group
                    .items
                    .iter()
                    .map(|item| format!("  {}", format_item_line(item, today))),
            );
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Split `LIST:ID` or a bare `ID` into its parts
pub fn parse_item_ref(s: &str) -> Result<(Option<&str>, ItemId), String> {
    let (list, id) = match s.rsplit_once(':') {
        Some((list, id)) => (Some(list), id),
        None => (None, s),
    };
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid task reference '{}' (expected ID or LIST:ID)", s))?;
    Ok((list.filter(|l| !l.is_empty()), ItemId(id)))
}

/// Parse a due date: `YYYY-MM-DD`, `today`, `tomorrow` or `none`
pub fn parse_due(s: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" | "clear" | "" => Ok(None),
        "today" => Ok(Some(today)),
        "tomorrow" => Ok(today.succ_opt()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                format!(
                    "invalid date '{}' (expected YYYY-MM-DD, today, tomorrow or none)",
                    s
                )
            }),
    }
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
}

/// Parse a sort criterion; `none` means manual order
pub fn parse_criterion(s: &str) -> Result<Option<SortCriterion>, String> {
    if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("manual") {
        return Ok(None);
    }
    SortCriterion::parse(s).map(Some).ok_or_else(|| {
        format!(
            "unknown sort '{}' (expected: alpha, completed, myday, bookmarked, due, created, priority, none)",
            s
        )
    })
}

pub fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| format!("unknown direction '{}' (expected: asc, desc)", s))
}

pub fn parse_bucket(s: &str) -> Result<PlannedBucket, String> {
    match s.to_ascii_lowercase().as_str() {
        "earlier" => Ok(PlannedBucket::Earlier),
        "today" => Ok(PlannedBucket::Today),
        "tomorrow" => Ok(PlannedBucket::Tomorrow),
        "this-week" | "later-this-week" => Ok(PlannedBucket::LaterThisWeek),
        "next-week" => Ok(PlannedBucket::NextWeek),
        "later" => Ok(PlannedBucket::Later),
        _ => Err(format!(
            "unknown group '{}' (expected: earlier, today, tomorrow, this-week, next-week, later)",
            s
        )),
    }
}

pub fn parse_tab_state(s: &str) -> Result<TabState, String> {
    match s.to_ascii_lowercase().as_str() {
        "open" => Ok(TabState::Open),
        "closed" | "close" => Ok(TabState::Closed),
        _ => Err(format!("unknown state '{}' (expected: open, closed)", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::ProjectId;
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
    }

    fn sample_project() -> Project {
        let mut project = Project::new(ProjectId(6), "Errands");
        let created = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        project.add_item("Buy milk", created);
        project.add_item("Return library books before the fine doubles", created);
        project.add_item("Call plumber", created);
        let milk = project.item_mut(ItemId(1)).unwrap();
        milk.is_important = true;
        milk.date = Some(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        let books = project.item_mut(ItemId(2)).unwrap();
        books.priority = Priority::High;
        books.add_subtask("find card".into());
        let plumber = project.item_mut(ItemId(3)).unwrap();
        plumber.is_complete = true;
        plumber.is_my_day = true;
        project
    }

    #[test]
    fn list_rendering() {
        let project = sample_project();
        let mut lines = vec![format_list_header(&project)];
        lines.extend(project.items.iter().map(|i| format_item_line(i, today())));
        assert_snapshot!(lines.join("\n"), @r"
        == Errands (6) 2 open ==
        [ ]   1  Buy milk                          ★  Due Tomorrow
        [ ]   2  Return library books before the…  !high  0/1
        [x]   3  Call plumber                      ☀
        ");
    }

    #[test]
    fn header_shows_sort() {
        let mut project = sample_project();
        project.sort.selected = Some(SortCriterion::Priority);
        assert_eq!(
            format_list_header(&project),
            "== Errands (6) 2 open, sorted priority desc =="
        );
    }

    #[test]
    fn detail_rendering() {
        let mut project = sample_project();
        let item = project.item_mut(ItemId(1)).unwrap();
        item.note = "semi-skimmed\n2 litres".into();
        let item = project.item(ItemId(1)).unwrap();
        assert_snapshot!(format_item_detail(item, "Errands", today()).join("\n"), @r"
        [ ] 1 Buy milk
        list: Errands
        priority: low
        bookmarked
        due: 2025-06-12 (Due Tomorrow)
        Created Yesterday
        note:
          semi-skimmed
          2 litres
        ");
    }

    #[test]
    fn json_skips_empty_fields() {
        let project = sample_project();
        let json = serde_json::to_value(item_to_json(project.item(ItemId(3)).unwrap())).unwrap();
        assert_eq!(json["complete"], true);
        assert_eq!(json["priority"], "low");
        assert!(json.get("note").is_none());
        assert!(json.get("due").is_none());
        let list = serde_json::to_value(list_to_json(&project, true)).unwrap();
        assert_eq!(list["open"], 2);
        assert!(list.get("sort").is_none());
    }

    #[test]
    fn item_refs() {
        assert_eq!(parse_item_ref("3").unwrap(), (None, ItemId(3)));
        assert_eq!(parse_item_ref("Errands:12").unwrap(), (Some("Errands"), ItemId(12)));
        assert_eq!(parse_item_ref(":4").unwrap(), (None, ItemId(4)));
        assert!(parse_item_ref("Errands:x").is_err());
    }

    #[test]
    fn due_dates() {
        assert_eq!(parse_due("today", today()).unwrap(), Some(today()));
        assert_eq!(
            parse_due("tomorrow", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 12)
        );
        assert_eq!(parse_due("none", today()).unwrap(), None);
        assert_eq!(
            parse_due("2025-12-31", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert!(parse_due("next tuesday", today()).is_err());
    }

    #[test]
    fn criteria_and_groups() {
        assert_eq!(parse_criterion("none").unwrap(), None);
        assert_eq!(parse_criterion("due").unwrap(), Some(SortCriterion::DueDate));
        assert!(parse_criterion("size").is_err());
        assert_eq!(parse_bucket("this-week").unwrap(), PlannedBucket::LaterThisWeek);
        assert_eq!(parse_tab_state("closed").unwrap(), TabState::Closed);
        assert!(parse_tab_state("ajar").is_err());
    }
}
