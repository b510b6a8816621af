//! FreshRoute - package and delivery route tracking for a small logistics operation
//!
//! Runs the interactive console by default, or a single command when one is given.

mod cli;
mod commands;
mod logging;
mod menu;
mod output;
mod prompt;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
