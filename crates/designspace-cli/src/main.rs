//! designspace CLI - explore and filter design-space tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let options = GlobalOptions {
        config: cli.config,
        locale: cli.locale,
        delimiter: cli.delimiter,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Summary { file, json } => commands::summary::run(file, json, &options),

        Commands::Levels {
            file,
            parameter,
            json,
        } => commands::levels::run(file, parameter, json, &options),

        Commands::Filter {
            file,
            ranges,
            invert_filter,
            invert_axis,
            limit,
            json,
        } => commands::filter::run(
            file,
            ranges,
            invert_filter,
            invert_axis,
            limit,
            json,
            &options,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
