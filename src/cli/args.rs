//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Avatar part extraction CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Extract part layers as numbered files (category_NNNN.svg)
    #[command(visible_alias = "x")]
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Export part layers named after their label (category_suffix.svg)
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Write an index.html listing the parts of each category folder
    #[command(visible_alias = "i")]
    Index {
        /// Root folder holding one folder per category [default: from config]
        #[arg(value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,

        /// Leave files without the expected metadata off the page instead of failing
        #[arg(short, long)]
        skip_invalid: bool,
    },
}

/// Shared arguments of Extract and Export.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// An avatar with each part on its own layer
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub src: PathBuf,

    /// The root folder to export to
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dst: PathBuf,

    /// Stored as creator in the metadata of every part
    pub author: String,

    /// Comma-separated keywords for every part. `extract` asks per part
    /// when omitted; `export` then writes no keywords.
    pub tags: Option<String>,
}
