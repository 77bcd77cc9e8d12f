pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "restock",
    about = "Restock operator CLI",
    long_about = "Apply migrations, load demo history, compute purchase suggestions, and inspect configuration.",
    after_help = "Examples:\n  restock migrate\n  restock seed\n  restock suggest 101 --json\n  restock doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load and verify the deterministic demo sales and stock history")]
    Seed,
    #[command(about = "Compute a purchase suggestion for one product from stored history")]
    Suggest {
        #[arg(value_parser = clap::value_parser!(i64).range(1..), help = "Positive product id")]
        product_id: i64,
        #[arg(long, help = "Emit the full suggestion, including its basis, as JSON")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, replenishment policy, and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Suggest { product_id, json } => commands::suggest::run(product_id, json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
