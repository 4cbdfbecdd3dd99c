use clap::Parser;

mod cli;
mod commands;
mod domain;
mod feed;
mod services;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = services::config::load_config()?;
    commands::handle_run(&cli, &config)
}
