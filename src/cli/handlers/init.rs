use std::path::Path;

use crate::io::config_io;
use crate::io::store_io;

const CONFIG_TEMPLATE: &str = r##"# td configuration. Every key is optional; defaults are shown.

[drag]
# mouse movement (px, either axis) before a press becomes a drag
# move_threshold_px = 5.0
# touch hold time before a press becomes a drag
# long_press_ms = 500
# distance from the list edge that starts auto-scroll
# scroll_band_px = 40.0
# delay between 1px auto-scroll steps
# scroll_step_ms = 5

[layout]
# geometry of the list `td drag` replays against
# container_top = 100.0
# viewport_height = 480.0
# item_height = 48.0
# item_margin = 8.0

[log]
# tracing filter; TD_LOG overrides it
# filter = "warn"
"##;

/// Create `.todo/` with an empty state and a commented config
pub fn cmd_init(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    if let Some(parent) = root.parent()
        && let Ok(outer) = store_io::discover_workspace(parent)
    {
        eprintln!(
            "Note: enclosing workspace found at {}/",
            outer.join(store_io::TODO_DIR).display()
        );
    }

    let todo_dir = store_io::init_workspace(&root)?;
    write_config_template(&todo_dir)?;
    println!("Initialized {}/", todo_dir.display());
    Ok(())
}

fn write_config_template(todo_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = todo_dir.join("config.toml");
    if path.exists() {
        return Ok(());
    }
    store_io::atomic_write(&path, CONFIG_TEMPLATE.as_bytes())?;
    // The template must load as the defaults
    config_io::load_config(todo_dir)?;
    Ok(())
}
