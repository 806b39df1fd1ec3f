//! Per-category index pages.
//!
//! Writes `<root>/<category>/index.html`, a minimal HTML5 page listing
//! every part file with its keywords and creator read from the embedded
//! metadata block:
//!
//! ```html
//! <li><a href="hair_0001.svg" data-tags="curly long" data-creator="Crashoz">hair_0001.svg</a></li>
//! ```
//!
//! Entries are sorted by file name.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    log,
    part::Category,
    svg::{
        Document, EXTENSION,
        metadata::{Attribution, read_attribution},
    },
    utils::{
        html::escape,
        text::{capitalize, plural_count},
    },
};

/// Name of the generated page inside each category folder.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("`{}` has no `{element}` element", .path.display())]
    MissingMetadata {
        path: PathBuf,
        element: &'static str,
    },
}

/// One listed part file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub file_name: String,
    pub attribution: Attribution,
}

/// Build the index page of every category under `root`.
///
/// Returns the number of listed parts per category; categories without a
/// folder are left out. With `skip_invalid`, files that cannot be read as
/// part documents are reported and left off the page instead of aborting.
pub fn build_indexes(root: &Path, skip_invalid: bool) -> Result<Vec<(Category, usize)>> {
    let mut counts = Vec::new();
    for category in Category::ALL {
        let folder = root.join(category.name());
        if !folder.is_dir() {
            log!("index"; "no {} folder in {}", category, root.display());
            continue;
        }

        let count = build_index(&folder, category, skip_invalid)?;
        log!("index"; "found {}", plural_count(count, &format!("{category} part")));
        counts.push((category, count));
    }
    Ok(counts)
}

/// Build and write `index.html` for one category folder.
pub fn build_index(folder: &Path, category: Category, skip_invalid: bool) -> Result<usize> {
    let entries = collect_entries(folder, skip_invalid)?;
    let page = render_page(category, &entries);

    let path = folder.join(INDEX_FILE);
    fs::write(&path, page).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(entries.len())
}

/// Read the attribution of every part file in `folder`, sorted by name.
pub fn collect_entries(folder: &Path, skip_invalid: bool) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for dir_entry in
        fs::read_dir(folder).with_context(|| format!("Failed to read {}", folder.display()))?
    {
        let path = dir_entry
            .with_context(|| format!("Invalid entry in {}", folder.display()))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }

        match read_entry(&path) {
            Ok(entry) => entries.push(entry),
            Err(e) if skip_invalid => {
                log!("warning"; "skipping {}: {:#}", path.display(), e);
            }
            Err(e) => return Err(e),
        }
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

fn read_entry(path: &Path) -> Result<Entry> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc =
        Document::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    let attribution = read_attribution(&doc).map_err(|missing| IndexError::MissingMetadata {
        path: path.to_path_buf(),
        element: missing.path(),
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Entry {
        file_name,
        attribution,
    })
}

/// Render the page for `category`.
pub fn render_page(category: Category, entries: &[Entry]) -> String {
    let mut html = String::with_capacity(256 + entries.len() * 128);

    html.push_str("<!doctype html>\n<html lang=en>\n    <head>\n        <meta charset=utf-8>\n");
    html.push_str(&format!(
        "        <title>{}</title>\n",
        capitalize(category.name())
    ));
    html.push_str("    </head>\n    <body>\n        <ul>\n");

    for entry in entries {
        let file_name = escape(&entry.file_name);
        html.push_str(&format!(
            "            <li><a href=\"{file_name}\" data-tags=\"{}\" data-creator=\"{}\">{file_name}</a></li>\n",
            escape(&entry.attribution.keywords.join(" ")),
            escape(&entry.attribution.creator),
        ));
    }

    html.push_str("        </ul>\n    </body>\n</html>");
    html
}
