//! avatar-parts - split a layered avatar SVG into standalone part files.

mod cli;
mod config;
mod extract;
mod index;
mod logger;
mod part;
mod svg;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PartsConfig;
use extract::Naming;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors go to stdout with status 1; help and version exit normally.
        Err(e) if e.use_stderr() => {
            print!("{}", e.render());
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let config = PartsConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match &cli.command {
        Commands::Extract { args } => cli::run_extract(args, Naming::Numbered, &config).map(|_| ()),
        Commands::Export { args } => cli::run_extract(args, Naming::Labeled, &config).map(|_| ()),
        Commands::Index { root, skip_invalid } => {
            cli::run_index(root.as_deref(), *skip_invalid, &config)
        }
    }
}
