use std::process::ExitCode;

use clap::Parser;

use crate::{cli::Cli, error::Result};

mod cli;
mod commands;
mod error;
mod settings;
mod shell;
mod view;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error::report(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "stratify={level},engine={level},remote={level}",
            level = settings.level
        ))
        .init();

    commands::run(cli.command, &settings, cli.memory).await
}
