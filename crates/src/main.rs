// Entry point: reads target names, builds the menu and runs the picker.

use clap::Parser;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process;
use tmenu::config::Config;
use tmenu::error::Result;
use tmenu::menu::build_menu;
use tmenu::ui::{initial_model, print_grid, run};
use tracing::debug;

/// Group build targets into a keyed grid and pick one.
///
/// Target names come from the arguments, or one per line on stdin. The
/// selected target is printed to stdout.
#[derive(Parser, Debug)]
#[command(name = "tmenu", version)]
struct Cli {
    /// Target names; read from stdin when omitted
    names: Vec<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Screen width for --print (defaults to the terminal width)
    #[arg(short, long)]
    width: Option<usize>,

    /// Maximum number of columns
    #[arg(long)]
    columns: Option<usize>,

    /// Give every column an equal share of the width
    #[arg(long)]
    spread: bool,

    /// Line shown above the grid
    #[arg(long)]
    heading: Option<String>,

    /// Print the grid and exit instead of running the picker
    #[arg(short, long)]
    print: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn read_names(cli: &Cli) -> io::Result<Vec<String>> {
    if !cli.names.is_empty() {
        return Ok(cli.names.clone());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    stdin.lock().lines().collect()
}

async fn try_main(cli: Cli) -> Result<Option<String>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut layout = config.layout_options();
    if cli.columns.is_some() {
        layout.column_limit = cli.columns;
    }
    if cli.spread {
        layout.spread = true;
    }
    if cli.heading.is_some() {
        layout.heading = cli.heading.clone();
    }

    let names = read_names(&cli)?;
    let menu = build_menu(&names, &config.menu_options()?)?;
    debug!(blocks = menu.blocks.len(), "menu built");

    if cli.print {
        let width = cli.width.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(w, _)| w as usize)
                .unwrap_or(tmenu::ui::model::DEFAULT_WIDTH)
        });
        println!("{}", print_grid(&menu, &layout, width));
        return Ok(None);
    }
    if menu.is_empty() {
        return Ok(None);
    }
    run(initial_model(menu, layout)).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tmenu::logging::init(cli.verbose);
    let print = cli.print;
    match try_main(cli).await {
        Ok(Some(target)) => println!("{target}"),
        Ok(None) if print => {}
        // nothing selected
        Ok(None) => process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    }
}
