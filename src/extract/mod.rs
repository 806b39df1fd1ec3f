//! Layer extraction driver.
//!
//! Reads a layered source document once and exports every part layer to
//! `<dst>/<category>/`:
//!
//! ```text
//! source <svg>
//!   └─ <g inkscape:label="hair_a">  ──► label ──► number ──► sanitize ──► wrap ──► write
//!   └─ <g inkscape:label="backhair_a"> ─┐ (numbered naming only)
//!                                       ▼
//!                        deferred: operator supplies the hair number
//! ```
//!
//! Two naming schemes exist. [`Naming::Numbered`] allocates `category_NNNN`
//! numbers from the destination folders; [`Naming::Labeled`] keeps the
//! literal label as file name. A failure aborts the run; files written
//! before it stay in place.

mod operator;
mod output;

pub use operator::{FixedKeywords, IdentifierSource, KeywordSource, parse_keywords};
pub use output::write_document;

use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::PartsConfig,
    debug, log,
    part::{Category, Numbering, PartLabel, numbered_file_name},
    svg::{
        Document, Element, INKSCAPE_NS, Name, Node, SVG_NS,
        metadata::{Attribution, wrap_layer},
        sanitize::sanitize_layer,
    },
    utils::text::plural_count,
};

/// How exported files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `category_NNNN.svg`, numbers allocated per category; back hairs
    /// are deferred to the operator; layers get a `class` of their category.
    Numbered,
    /// `category_suffix.svg`, the literal label.
    Labeled,
}

/// Inputs of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions<'a> {
    pub dst: &'a Path,
    pub author: &'a str,
    pub naming: Naming,
    pub config: &'a PartsConfig,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct Report {
    /// Written files, in write order.
    pub written: Vec<PathBuf>,
    /// Layers that did not name an exportable part.
    pub skipped: usize,
}

/// Read `src` and extract its part layers.
pub fn extract_file(
    src: &Path,
    options: &ExtractOptions<'_>,
    keywords: &mut dyn KeywordSource,
    identifiers: &mut dyn IdentifierSource,
) -> Result<Report> {
    let content =
        fs::read_to_string(src).with_context(|| format!("Failed to read {}", src.display()))?;
    let source =
        Document::parse(&content).with_context(|| format!("Failed to parse {}", src.display()))?;
    extract(source, options, keywords, identifiers)
        .with_context(|| format!("Failed to extract parts from {}", src.display()))
}

/// Extract every part layer of `source`.
///
/// Layers are moved out of `source`, so the document is consumed.
pub fn extract(
    source: Document,
    options: &ExtractOptions<'_>,
    keywords: &mut dyn KeywordSource,
    identifiers: &mut dyn IdentifierSource,
) -> Result<Report> {
    if !source.root.name.is(SVG_NS, "svg") {
        bail!(
            "root element `{}` is not an svg element",
            source.root.name.local
        );
    }

    prepare_folders(options.dst)?;

    let mut extractor = Extractor {
        options,
        keywords,
        identifiers,
        numbering: match options.naming {
            Naming::Numbered => Numbering::scan(options.dst)?,
            Naming::Labeled => Numbering::default(),
        },
        report: Report::default(),
    };

    let layers = extractor.select_layers(source.root);
    if options.naming == Naming::Numbered {
        extractor.reserve_explicit(&layers);
    }

    let mut deferred = Vec::new();
    for (label, layer) in layers {
        match options.naming {
            Naming::Numbered => {
                let number = match label.explicit_number() {
                    Some(number) => number,
                    None if label.category.is_deferred() => {
                        debug!("extract"; "deferring {}", label);
                        deferred.push((label, layer));
                        continue;
                    }
                    None => extractor.numbering.allocate(label.category),
                };
                extractor.write_numbered(&label, layer, number)?;
            }
            Naming::Labeled => {
                let file_name = label.labeled_file_name();
                extractor.write_part(&label, layer, &file_name, None)?;
            }
        }
    }

    for (label, layer) in deferred {
        let number = extractor
            .identifiers
            .identifier(&label)
            .with_context(|| format!("No number for {label}"))?;
        if !extractor.numbering.reserve(label.category, number) {
            log!("warning"; "{} overwrites {} written earlier in this run",
                label, numbered_file_name(label.category, number));
        }
        extractor.write_numbered(&label, layer, number)?;
    }

    let report = extractor.report;
    log!(
        "extract";
        "wrote {}, skipped {}",
        plural_count(report.written.len(), "part"),
        plural_count(report.skipped, "layer")
    );
    Ok(report)
}

/// Create the destination root and one folder per category.
fn prepare_folders(dst: &Path) -> Result<()> {
    for category in Category::ALL {
        let folder = dst.join(category.name());
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create {}", folder.display()))?;
    }
    Ok(())
}

struct Extractor<'a, 'o> {
    options: &'a ExtractOptions<'o>,
    keywords: &'a mut dyn KeywordSource,
    identifiers: &'a mut dyn IdentifierSource,
    numbering: Numbering,
    report: Report,
}

impl Extractor<'_, '_> {
    /// Detach the top-level groups of `root` whose label names a part.
    fn select_layers(&mut self, root: Element) -> Vec<(PartLabel, Element)> {
        let label_attr = Name::new(INKSCAPE_NS, "label");
        let mut layers = Vec::new();

        for node in root.children {
            let Node::Element(layer) = node else {
                continue;
            };
            if !layer.name.is(SVG_NS, "g") {
                continue;
            }

            let Some(raw) = layer.attr(&label_attr) else {
                debug!("extract"; "skipping unlabeled group");
                self.report.skipped += 1;
                continue;
            };
            match PartLabel::parse(raw) {
                Ok(label) => layers.push((label, layer)),
                Err(reason) => {
                    debug!("extract"; "skipping {}: {}", raw, reason);
                    self.report.skipped += 1;
                }
            }
        }
        layers
    }

    /// Claim the explicit numbers up front so allocation steps around them.
    fn reserve_explicit(&mut self, layers: &[(PartLabel, Element)]) {
        for (label, _) in layers {
            if let Some(number) = label.explicit_number()
                && !self.numbering.reserve(label.category, number)
            {
                log!("warning"; "{} appears more than once, last one wins", label);
            }
        }
    }

    fn write_numbered(&mut self, label: &PartLabel, layer: Element, number: u32) -> Result<()> {
        let file_name = numbered_file_name(label.category, number);
        self.write_part(label, layer, &file_name, Some(label.category.name()))
    }

    fn write_part(
        &mut self,
        label: &PartLabel,
        mut layer: Element,
        file_name: &str,
        class: Option<&str>,
    ) -> Result<()> {
        log!("extract"; "extracting {} as {}", label, file_name);

        let keywords = self.keywords.keywords(label)?;
        sanitize_layer(&mut layer, class);

        let attribution = Attribution {
            creator: self.options.author.to_string(),
            keywords,
        };
        let config = self.options.config;
        let doc = wrap_layer(layer, &attribution, &config.canvas, &config.metadata);

        let path = self
            .options
            .dst
            .join(label.category.name())
            .join(file_name);
        write_document(&path, &doc)?;
        self.report.written.push(path);
        Ok(())
    }
}
