use clap::Parser;
use todolist::cli::commands::{Cli, Commands};
use todolist::cli::handlers;
use todolist::io::{config_io, store_io};
use todolist::logging;

/// Configured log filter of the workspace the command will run in, if any
fn configured_filter(dir: Option<&str>) -> Option<String> {
    let start = handlers::start_dir(dir).ok()?;
    let root = store_io::discover_workspace(&start).ok()?;
    let config = config_io::load_config(&root.join(store_io::TODO_DIR)).ok()?;
    Some(config.log.filter)
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.command {
        Commands::Init => None,
        _ => configured_filter(cli.dir.as_deref()),
    };
    logging::init(filter.as_deref());

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
