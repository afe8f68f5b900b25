use std::{env, io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use command::Cli;
use config::{Config, CONFIG_ENV, CONFIG_FILE};
use traits::json::JsonSync;

pub mod command;
pub mod config;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path =
        env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);

    let config = Config::from_file_or_create(&config_path)
        .with_context(|| format!("Reading configuration from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(config.level())
        .with_writer(io::stderr)
        .init();

    let output = cli.command.run()?;

    match output {
        serde_json::Value::String(text) => println!("{text}"),
        other => println!("{}", config.render(&other)?),
    }

    Ok(())
}
