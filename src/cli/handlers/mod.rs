mod drag;
mod init;
pub use drag::cmd_drag;
pub use init::cmd_init;

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, store_io};
use crate::model::app::AppState;
use crate::model::config::Config;
use crate::model::project::{ProjectId, SystemList};
use crate::model::task::ItemId;
use crate::ops::{project_ops, task_ops, views};

/// Environment variable that pins "today" (YYYY-MM-DD)
pub const TODAY_ENV: &str = "TD_TODAY";

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = cli.dir.as_deref();

    match cli.command {
        Commands::Init => cmd_init(dir),

        // Read commands
        Commands::Lists => cmd_lists(dir, json),
        Commands::Show(args) => cmd_show(dir, args, json),
        Commands::Info(args) => cmd_info(dir, args, json),
        Commands::Search(args) => cmd_search(dir, args, json),

        // List management
        Commands::List(args) => cmd_list(dir, args),

        // Task writes
        Commands::Add(args) => cmd_add(dir, args),
        Commands::Rm(args) => cmd_rm(dir, args),
        Commands::Done(args) => cmd_toggle(dir, args, Toggle::Complete),
        Commands::Star(args) => cmd_toggle(dir, args, Toggle::Bookmark),
        Commands::Myday(args) => cmd_toggle(dir, args, Toggle::MyDay),
        Commands::Due(args) => cmd_due(dir, args),
        Commands::Priority(args) => cmd_priority(dir, args),
        Commands::Note(args) => cmd_note(dir, args),
        Commands::Title(args) => cmd_title(dir, args),
        Commands::Sub(args) => cmd_sub(dir, args),

        // Ordering
        Commands::Sort(args) => cmd_sort(dir, args, json),
        Commands::SortFlip(args) => cmd_sort_flip(dir, args, json),
        Commands::Drag(args) => cmd_drag(dir, args, json),

        Commands::Planned(args) => cmd_planned(dir, args),
        Commands::Config(args) => cmd_config(dir, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A loaded workspace: where it lives, its state and its config
pub(crate) struct Workspace {
    pub todo_dir: PathBuf,
    pub state: AppState,
    pub config: Config,
    pub today: NaiveDate,
}

impl Workspace {
    pub fn save(&self) -> Result<(), store_io::StoreError> {
        store_io::save_state(&self.todo_dir, &self.state)
    }
}

/// "Today", from `TD_TODAY` when set
pub(crate) fn today() -> Result<NaiveDate, String> {
    match std::env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("{} must be YYYY-MM-DD, got '{}'", TODAY_ENV, raw)),
        _ => Ok(Local::now().date_naive()),
    }
}

/// Directory that discovery starts from: `-C` or the current directory
pub fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

/// Find and load the workspace, rolling My Day over to today
pub(crate) fn load_workspace(dir: Option<&str>) -> Result<Workspace, Box<dyn std::error::Error>> {
    let root = store_io::discover_workspace(&start_dir(dir)?)?;
    let todo_dir = root.join(store_io::TODO_DIR);
    let mut state = store_io::load_state(&todo_dir)?;
    let config = config_io::load_config(&todo_dir)?;
    let today = today()?;

    let last_roll = state.my_day;
    if task_ops::roll_my_day(&mut state, today) || last_roll != state.my_day {
        store_io::save_state(&todo_dir, &state)?;
    }
    Ok(Workspace {
        todo_dir,
        state,
        config,
        today,
    })
}

/// The selected list, or an error when none is
fn selected_list(state: &AppState) -> Result<ProjectId, String> {
    state
        .selected_project()
        .map(|p| p.id)
        .ok_or_else(|| "no list is selected (use `td list select`)".to_string())
}

/// A list argument, or the selected list when absent
fn list_or_selected(
    state: &AppState,
    key: Option<&str>,
) -> Result<ProjectId, Box<dyn std::error::Error>> {
    match key {
        Some(key) => Ok(project_ops::resolve(state, key)?),
        None => Ok(selected_list(state)?),
    }
}

/// Resolve `ID` or `LIST:ID` to the list that owns the task
pub(crate) fn resolve_item(
    state: &AppState,
    raw: &str,
) -> Result<(ProjectId, ItemId), Box<dyn std::error::Error>> {
    let (list, id) = parse_item_ref(raw)?;
    let list = match list {
        Some(key) => project_ops::resolve(state, key)?,
        None => {
            let selected = selected_list(state)?;
            if selected.is_aggregate() {
                return Err(format!(
                    "a system view is selected; refer to the task as LIST:{}",
                    id
                )
                .into());
            }
            selected
        }
    };
    if state.item(list, id).is_none() {
        return Err(task_ops::TaskError::NotFound(id, list).into());
    }
    Ok((list, id))
}

fn list_name(state: &AppState, id: ProjectId) -> String {
    state
        .project(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Print a list in display order
pub(crate) fn print_view(ws: &mut Workspace, id: ProjectId, json: bool) -> CmdResult {
    if id == SystemList::Planned.id() {
        let groups = views::planned_groups(&ws.state, ws.today);
        if json {
            println!("{}", serde_json::to_string_pretty(&planned_to_json(&groups))?);
        } else {
            println!("== {} ==", SystemList::Planned.name());
            for line in format_planned(&groups, ws.today) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let items = views::view_items(&mut ws.state, id)?;
    let project = ws
        .state
        .project(id)
        .ok_or(project_ops::ProjectError::NotFound(id))?;
    if json {
        let view = ViewJson {
            list: id.0,
            name: project.name.clone(),
            items: items.iter().map(item_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", format_list_header(project));
        if items.is_empty() {
            println!("(no tasks)");
        }
        for item in &items {
            if id.is_aggregate() {
                println!(
                    "{}  [{}]",
                    format_item_line(item, ws.today),
                    list_name(&ws.state, item.project_id)
                );
            } else {
                println!("{}", format_item_line(item, ws.today));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_lists(dir: Option<&str>, json: bool) -> CmdResult {
    let ws = load_workspace(dir)?;
    let state = &ws.state;
    if json {
        let lists: Vec<ListJson> = state
            .projects
            .iter()
            .enumerate()
            .map(|(i, p)| list_to_json(p, state.selected == Some(i)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&lists)?);
    } else {
        for (i, project) in state.projects.iter().enumerate() {
            println!("{}", format_list_line(project, state.selected == Some(i)));
        }
    }
    Ok(())
}

fn cmd_show(dir: Option<&str>, args: ShowArgs, json: bool) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let id = list_or_selected(&ws.state, args.list.as_deref())?;
    print_view(&mut ws, id, json)
}

fn cmd_info(dir: Option<&str>, args: ItemArgs, json: bool) -> CmdResult {
    let ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    let item = ws
        .state
        .item(list, id)
        .ok_or(task_ops::TaskError::NotFound(id, list))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&item_to_json(item))?);
    } else {
        for line in format_item_detail(item, &list_name(&ws.state, list), ws.today) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(dir: Option<&str>, args: SearchArgs, json: bool) -> CmdResult {
    let ws = load_workspace(dir)?;
    let hits = views::search(&ws.state, &args.pattern)?;
    if json {
        let items: Vec<ItemJson> = hits.iter().map(item_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &hits {
            println!(
                "[{}] {}",
                list_name(&ws.state, item.project_id),
                format_item_line(item, ws.today)
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// List management
// ---------------------------------------------------------------------------

fn cmd_list(dir: Option<&str>, args: ListCmd) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    match args.action {
        ListAction::Add { name } => {
            let id = project_ops::add_project(&mut ws.state, &name)?;
            ws.save()?;
            println!("{}", id);
        }
        ListAction::Rm { list, force } => {
            let id = project_ops::resolve(&ws.state, &list)?;
            let removed = project_ops::remove_project(&mut ws.state, id, force)?;
            ws.save()?;
            println!("deleted {}", removed.name);
        }
        ListAction::Rename { list, name } => {
            let id = project_ops::resolve(&ws.state, &list)?;
            project_ops::rename_project(&mut ws.state, id, &name)?;
            ws.save()?;
            println!("{} renamed", id);
        }
        ListAction::Select { list } => {
            let id = project_ops::resolve(&ws.state, &list)?;
            project_ops::select(&mut ws.state, id)?;
            ws.save()?;
            println!("selected {}", list_name(&ws.state, id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task writes
// ---------------------------------------------------------------------------

fn cmd_add(dir: Option<&str>, args: AddArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let target = list_or_selected(&ws.state, args.list.as_deref())?;
    let (list, id) = task_ops::add_item(&mut ws.state, target, &args.title, ws.today, Utc::now())?;
    ws.save()?;
    println!("{}:{}", list, id);
    Ok(())
}

fn cmd_rm(dir: Option<&str>, args: ItemArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    let removed = task_ops::remove_item(&mut ws.state, list, id)?;
    ws.save()?;
    println!("deleted {}:{} {}", list, id, removed.title);
    Ok(())
}

enum Toggle {
    Complete,
    Bookmark,
    MyDay,
}

fn cmd_toggle(dir: Option<&str>, args: ItemArgs, which: Toggle) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    let (now, label) = match which {
        Toggle::Complete => (task_ops::toggle_complete(&mut ws.state, list, id)?, "complete"),
        Toggle::Bookmark => (task_ops::toggle_important(&mut ws.state, list, id)?, "bookmarked"),
        Toggle::MyDay => (task_ops::toggle_my_day(&mut ws.state, list, id)?, "my day"),
    };
    ws.save()?;
    println!("{}:{} {} {}", list, id, label, if now { "on" } else { "off" });
    Ok(())
}

fn cmd_due(dir: Option<&str>, args: DueArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    let date = parse_due(&args.date, ws.today)?;
    task_ops::set_due(&mut ws.state, list, id, date)?;
    ws.save()?;
    match date {
        Some(date) => println!("{}:{} {}", list, id, views::due_label(date, ws.today)),
        None => println!("{}:{} no due date", list, id),
    }
    Ok(())
}

fn cmd_priority(dir: Option<&str>, args: PriorityArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    let priority = parse_priority(&args.priority)?;
    task_ops::set_priority(&mut ws.state, list, id, priority)?;
    ws.save()?;
    println!("{}:{} priority {}", list, id, priority);
    Ok(())
}

fn cmd_note(dir: Option<&str>, args: TextArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    task_ops::set_note(&mut ws.state, list, id, &args.text)?;
    ws.save()?;
    Ok(())
}

fn cmd_title(dir: Option<&str>, args: TextArgs) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, id) = resolve_item(&ws.state, &args.item)?;
    task_ops::rename_item(&mut ws.state, list, id, &args.text)?;
    ws.save()?;
    Ok(())
}

fn cmd_sub(dir: Option<&str>, args: SubCmd) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    match args.action {
        SubAction::Add { item, name } => {
            let (list, id) = resolve_item(&ws.state, &item)?;
            let sub = task_ops::add_subtask(&mut ws.state, list, id, &name)?;
            ws.save()?;
            println!("{}", sub);
        }
        SubAction::Rm { item, sub } => {
            let (list, id) = resolve_item(&ws.state, &item)?;
            task_ops::remove_subtask(&mut ws.state, list, id, sub)?;
            ws.save()?;
        }
        SubAction::Done { item, sub } => {
            let (list, id) = resolve_item(&ws.state, &item)?;
            let done = task_ops::toggle_subtask(&mut ws.state, list, id, sub)?;
            ws.save()?;
            println!("{}:{}.{} {}", list, id, sub, if done { "done" } else { "open" });
        }
        SubAction::Rename { item, sub, name } => {
            let (list, id) = resolve_item(&ws.state, &item)?;
            task_ops::rename_subtask(&mut ws.state, list, id, sub, &name)?;
            ws.save()?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

fn cmd_sort(dir: Option<&str>, args: SortArgs, json: bool) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let id = project_ops::resolve(&ws.state, &args.list)?;
    if id == SystemList::Planned.id() {
        return Err("Planned is ordered by due date and cannot be sorted".into());
    }
    let criterion = parse_criterion(&args.criterion)?;
    let direction = args.dir.as_deref().map(parse_direction).transpose()?;

    let project = ws
        .state
        .project_mut(id)
        .ok_or(project_ops::ProjectError::NotFound(id))?;
    project.sort.selected = criterion;
    if let Some(direction) = direction {
        project.sort.set_pending(direction);
    }
    tracing::info!(list = %id, criterion = ?criterion, "sort selected");

    // Rendering consumes the pending direction
    print_view(&mut ws, id, json)?;
    ws.save()?;
    Ok(())
}

fn cmd_sort_flip(dir: Option<&str>, args: ListRefArgs, json: bool) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let id = project_ops::resolve(&ws.state, &args.list)?;
    let project = ws
        .state
        .project_mut(id)
        .ok_or(project_ops::ProjectError::NotFound(id))?;
    if project.sort.flip().is_none() {
        return Err(format!("{} is not sorted", project.name).into());
    }
    print_view(&mut ws, id, json)?;
    ws.save()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Planned and config
// ---------------------------------------------------------------------------

fn cmd_planned(dir: Option<&str>, args: PlannedCmd) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    match args.action {
        PlannedAction::Tab { bucket, state } => {
            let bucket = parse_bucket(&bucket)?;
            let tab = parse_tab_state(&state)?;
            views::set_planned_tab(&mut ws.state, bucket, tab);
            ws.save()?;
            println!("{} {}", bucket.label(), state.to_ascii_lowercase());
        }
    }
    Ok(())
}

fn cmd_config(dir: Option<&str>, args: ConfigCmd) -> CmdResult {
    let root = store_io::discover_workspace(&start_dir(dir)?)?;
    let todo_dir = root.join(store_io::TODO_DIR);
    match args.action {
        ConfigAction::Get { key } => {
            let config = config_io::load_config(&todo_dir)?;
            println!("{}", config_io::get_value(&config, &key)?);
        }
        ConfigAction::Set { key, value } => {
            let (_, mut doc) = config_io::read_config(&todo_dir)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_config(&todo_dir, &doc)?;
            tracing::info!(key = %key, value = %value, "config updated");
        }
    }
    Ok(())
}
