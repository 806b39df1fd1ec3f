//! SVG document handling.
//!
//! # Modules
//!
//! - [`tree`]: owned, namespace-resolved element tree (quick-xml based)
//! - [`sanitize`]: strip editor state from an extracted layer
//! - [`metadata`]: wrap a layer into a standalone, attributed document
//!
//! ```text
//! source.svg ──► tree::Document ──► layer <g>
//!                                      │
//!                                      ▼
//!                                ┌──────────┐
//!                                │ sanitize │ ──► drop sodipodi:*, unhide
//!                                └────┬─────┘
//!                                     ▼
//!                                ┌──────────┐
//!                                │ metadata │ ──► <svg> + rdf/cc/dc block
//!                                └──────────┘
//! ```

pub mod metadata;
pub mod sanitize;
pub mod tree;

pub use tree::{Document, Element, Name, Node};

// ============================================================================
// Namespaces
// ============================================================================

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const CC_NS: &str = "http://creativecommons.org/ns#";
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefixes used when serializing. An empty prefix is the default namespace.
pub const PREFIXES: &[(&str, &str)] = &[
    ("", SVG_NS),
    ("inkscape", INKSCAPE_NS),
    ("sodipodi", SODIPODI_NS),
    ("xlink", XLINK_NS),
    ("rdf", RDF_NS),
    ("cc", CC_NS),
    ("dc", DC_NS),
];

/// File extension of part files.
pub const EXTENSION: &str = "svg";
