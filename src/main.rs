mod agents;
mod cli;
mod error;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::VERBOSE_ENV, "1");
        }
    }

    let result = match cli.command {
        Commands::Update {
            target,
            no_install,
            no_git,
            no_push,
            bot_identity,
        } => workflow::execute_update(
            &cli.path,
            &target.pairs,
            &target.scope_prefixes,
            workflow::UpdateOptions {
                no_install,
                no_git,
                no_push,
                bot_identity,
            },
        ),
        Commands::Check { target, json } => {
            workflow::execute_check(&cli.path, &target.pairs, &target.scope_prefixes, json)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
