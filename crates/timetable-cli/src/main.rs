//! Timetable CLI: the `timetable` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();
    let config = support::load_config_or_exit(cli.config.as_deref(), cli.store.as_deref());

    match cli.command {
        Commands::Init => commands::init::run(&config, cli.json),

        Commands::Add { args } => commands::add::run(&config, args, cli.json),

        Commands::Schedule => commands::schedule::run(&config, cli.json),

        Commands::Hide { number } => commands::hide::run(&config, number, cli.json),

        Commands::Usage => commands::usage::run(cli.json),
    }
}
