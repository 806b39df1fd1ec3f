//! Writing part documents.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::svg::Document;

/// Write `doc` to `path`, then rewrite it pretty-printed.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let xml = doc
        .to_xml()
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, xml).with_context(|| format!("Failed to write {}", path.display()))?;
    prettify_file(path)
}

/// Re-parse a written document and replace it with its indented form,
/// without blank lines.
pub fn prettify_file(path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::parse(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let pretty = doc
        .to_pretty_xml()
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, pretty).with_context(|| format!("Failed to write {}", path.display()))
}
