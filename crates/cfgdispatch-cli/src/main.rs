//! cfgdispatch CLI
//!
//! Command-line front end for replaying captured diff trees through the
//! callback dispatcher

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cfgdispatch")]
#[command(about = "cfgdispatch - priority-ordered configuration change dispatch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the outline of a diff tree
    Show(commands::show::ShowArgs),
    /// Dispatch a diff tree to the callbacks declared in a config file
    Dispatch(commands::dispatch::DispatchArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show(args) => commands::show::execute(args),
        Commands::Dispatch(args) => commands::dispatch::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
