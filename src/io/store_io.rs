use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::app::AppState;

/// Name of the workspace directory
pub const TODO_DIR: &str = ".todo";
const STATE_FILE: &str = "state.json";

/// Error type for workspace and state file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a todo workspace: no .todo/ directory found (run `td init`)")]
    NotAWorkspace,
    #[error("workspace already initialized at {0}")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize state: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Find the workspace by walking up from `start`, looking for `.todo/`.
/// Returns the directory that contains it.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(TODO_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAWorkspace);
        }
    }
}

/// Create `.todo/` under `root` with a fresh state file
pub fn init_workspace(root: &Path) -> Result<PathBuf, StoreError> {
    let todo_dir = root.join(TODO_DIR);
    if todo_dir.join(STATE_FILE).exists() {
        return Err(StoreError::AlreadyInitialized(todo_dir));
    }
    fs::create_dir_all(&todo_dir).map_err(|e| StoreError::WriteError {
        path: todo_dir.clone(),
        source: e,
    })?;
    save_state(&todo_dir, &AppState::new())?;
    tracing::info!(path = %todo_dir.display(), "initialized workspace");
    Ok(todo_dir)
}

/// Load the state file. A missing file gives a fresh state; malformed JSON
/// is an error.
pub fn load_state(todo_dir: &Path) -> Result<AppState, StoreError> {
    let path = todo_dir.join(STATE_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, starting fresh");
        return Ok(AppState::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::ParseError { path, source: e })
}

/// Write the state file atomically
pub fn save_state(todo_dir: &Path, state: &AppState) -> Result<(), StoreError> {
    let path = todo_dir.join(STATE_FILE);
    let mut content = serde_json::to_string_pretty(state)?;
    content.push('\n');
    atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "saved state");
    Ok(())
}

/// Write through a temp file in the same directory, then rename over `path`
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
