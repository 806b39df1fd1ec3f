//! Command-line interface module.

mod args;
mod prompt;

pub use args::{Cli, Commands, ExtractArgs};
pub use prompt::{ConsoleIdentifiers, ConsoleKeywords};

use anyhow::Result;
use std::path::Path;

use crate::{
    config::PartsConfig,
    extract::{self, ExtractOptions, FixedKeywords, KeywordSource, Naming, Report},
    index,
    log,
};

/// Run `extract` (numbered) or `export` (labeled).
pub fn run_extract(args: &ExtractArgs, naming: Naming, config: &PartsConfig) -> Result<Report> {
    let module = match naming {
        Naming::Numbered => "extract",
        Naming::Labeled => "export",
    };
    log!(module; "extracting parts from {} to {}", args.src.display(), args.dst.display());
    log!(module; "author: {}", args.author);

    let mut keywords: Box<dyn KeywordSource> = match (&args.tags, naming) {
        (Some(tags), _) => Box::new(FixedKeywords(extract::parse_keywords(tags))),
        (None, Naming::Numbered) => Box::new(ConsoleKeywords),
        (None, Naming::Labeled) => Box::new(FixedKeywords::default()),
    };

    let options = ExtractOptions {
        dst: &args.dst,
        author: &args.author,
        naming,
        config,
    };
    extract::extract_file(
        &args.src,
        &options,
        keywords.as_mut(),
        &mut ConsoleIdentifiers,
    )
}

/// Run `index` over `root`, or the configured parts root.
pub fn run_index(root: Option<&Path>, skip_invalid: bool, config: &PartsConfig) -> Result<()> {
    let root = root.unwrap_or(&config.index.root);
    index::build_indexes(root, skip_invalid)?;
    Ok(())
}
