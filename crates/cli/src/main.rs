mod command;

use anyhow::Result;
use clap::Parser;
use command::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Carve(args) => command::run_carve(args),
        Command::Incremental(args) => command::run_incremental(args),
        Command::Repair(args) => command::run_repair(args),
    }
}
