use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("td v", env!("CARGO_PKG_VERSION"), " - lists, tasks and drag-to-reorder"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .todo/ workspace in the current directory
    Init,
    /// Show all lists
    Lists,
    /// Manage lists
    List(ListCmd),
    /// Show a list's tasks in display order (default: selected list)
    Show(ShowArgs),
    /// Show one task with its subtasks
    Info(ItemArgs),
    /// Search task titles across all lists
    Search(SearchArgs),
    /// Add a task
    Add(AddArgs),
    /// Delete a task
    Rm(ItemArgs),
    /// Toggle completion
    Done(ItemArgs),
    /// Toggle the bookmark flag
    Star(ItemArgs),
    /// Toggle My Day membership
    Myday(ItemArgs),
    /// Set or clear a due date
    Due(DueArgs),
    /// Set priority
    Priority(PriorityArgs),
    /// Set the note
    Note(TextArgs),
    /// Change the title
    Title(TextArgs),
    /// Manage subtasks
    Sub(SubCmd),
    /// Choose a sort for a list ("none" restores manual order)
    Sort(SortArgs),
    /// Reverse the direction of a list's active sort
    SortFlip(ListRefArgs),
    /// Reorder a task by replaying a drag gesture
    Drag(DragArgs),
    /// Planned view settings
    Planned(PlannedCmd),
    /// Read or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// List management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListCmd {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Create a list
    Add { name: String },
    /// Delete a list
    Rm {
        /// List name or id
        list: String,
        /// Delete even if it still has open tasks
        #[arg(long)]
        force: bool,
    },
    /// Rename a list
    Rename { list: String, name: String },
    /// Make a list the selected one
    Select { list: String },
}

#[derive(Args)]
pub struct ShowArgs {
    /// List name or id
    pub list: Option<String>,
}

#[derive(Args)]
pub struct ListRefArgs {
    /// List name or id
    pub list: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern (case-insensitive)
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Target list (default: selected list)
    #[arg(short, long)]
    pub list: Option<String>,
}

/// A task is `ID` in the selected list, or `LIST:ID`
#[derive(Args)]
pub struct ItemArgs {
    pub item: String,
}

#[derive(Args)]
pub struct DueArgs {
    pub item: String,
    /// YYYY-MM-DD, "today", "tomorrow" or "none"
    pub date: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    pub item: String,
    /// low, medium or high
    pub priority: String,
}

#[derive(Args)]
pub struct TextArgs {
    pub item: String,
    pub text: String,
}

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask
    Add { item: String, name: String },
    /// Delete a subtask
    Rm { item: String, sub: u32 },
    /// Toggle a subtask's completion
    Done { item: String, sub: u32 },
    /// Rename a subtask
    Rename { item: String, sub: u32, name: String },
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SortArgs {
    /// List name or id
    pub list: String,
    /// alpha, completed, myday, bookmarked, due, created, priority or none
    pub criterion: String,
    /// Use this direction once instead of the remembered one (asc, desc)
    #[arg(long)]
    pub dir: Option<String>,
}

#[derive(Args)]
pub struct DragArgs {
    /// Task to pick up (in the selected list)
    pub item: String,
    /// Task to drop onto
    #[arg(long)]
    pub onto: String,
    /// Use a touch long-press instead of a mouse drag
    #[arg(long)]
    pub touch: bool,
}

// ---------------------------------------------------------------------------
// Planned and config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PlannedCmd {
    #[command(subcommand)]
    pub action: PlannedAction,
}

#[derive(Subcommand)]
pub enum PlannedAction {
    /// Open or close a date group header
    Tab {
        /// earlier, today, tomorrow, this-week, next-week or later
        bucket: String,
        /// open or closed
        state: String,
    },
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a value, e.g. `drag.long_press_ms`
    Get { key: String },
    /// Set a value, keeping the file's formatting
    Set { key: String, value: String },
}
