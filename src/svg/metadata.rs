//! Standalone part documents and their RDF metadata block.
//!
//! ```xml
//! <svg width="..mm" height="..mm" viewBox="0 0 .. .." version="1.1" id="svg151">
//!   <g class="hair">...</g>
//!   <metadata>
//!     <rdf:RDF>
//!       <cc:Work>
//!         <dc:creator><cc:Agent><dc:title>author</dc:title></cc:Agent></dc:creator>
//!         <dc:source>https://...</dc:source>
//!         <dc:subject><rdf:Bag><rdf:li>keyword</rdf:li></rdf:Bag></dc:subject>
//!       </cc:Work>
//!       <cc:License rdf:about="http://creativecommons.org/licenses/by/4.0/">...</cc:License>
//!     </rdf:RDF>
//!   </metadata>
//! </svg>
//! ```

use super::{CC_NS, DC_NS, Document, Element, Name, RDF_NS};
use crate::config::{CanvasConfig, MetadataConfig};

/// Creative Commons Attribution 4.0.
pub const LICENSE_URI: &str = "http://creativecommons.org/licenses/by/4.0/";

/// License terms, in the order they are written.
const LICENSE_TERMS: &[(&str, &str)] = &[
    ("permits", "http://creativecommons.org/ns#Reproduction"),
    ("permits", "http://creativecommons.org/ns#Distribution"),
    ("requires", "http://creativecommons.org/ns#Notice"),
    ("requires", "http://creativecommons.org/ns#Attribution"),
    ("permits", "http://creativecommons.org/ns#DerivativeWorks"),
];

/// Creator and keywords of one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub creator: String,
    pub keywords: Vec<String>,
}

/// Wrap a sanitized layer in a standalone document with a fixed canvas
/// and the attribution/license metadata block.
pub fn wrap_layer(
    layer: Element,
    attribution: &Attribution,
    canvas: &CanvasConfig,
    metadata: &MetadataConfig,
) -> Document {
    let size = canvas.size;
    let mut root = Element::new(Name::svg("svg"))
        .with_attr(Name::plain("width"), format!("{size}{}", canvas.unit))
        .with_attr(Name::plain("height"), format!("{size}{}", canvas.unit))
        .with_attr(Name::plain("viewBox"), format!("0 0 {size} {size}"))
        .with_attr(Name::plain("version"), "1.1")
        .with_attr(Name::plain("id"), canvas.id.as_str());

    root.push(layer);
    root.push(metadata_block(attribution, &metadata.source));
    Document::new(root)
}

fn metadata_block(attribution: &Attribution, source: &str) -> Element {
    let mut agent = Element::new(Name::new(CC_NS, "Agent"));
    agent.push(Element::new(Name::new(DC_NS, "title")).with_text(attribution.creator.as_str()));
    let mut creator = Element::new(Name::new(DC_NS, "creator"));
    creator.push(agent);

    let mut work = Element::new(Name::new(CC_NS, "Work"));
    work.push(creator);
    work.push(Element::new(Name::new(DC_NS, "source")).with_text(source));

    if !attribution.keywords.is_empty() {
        let mut bag = Element::new(Name::new(RDF_NS, "Bag"));
        for keyword in &attribution.keywords {
            bag.push(Element::new(Name::new(RDF_NS, "li")).with_text(keyword.as_str()));
        }
        let mut subject = Element::new(Name::new(DC_NS, "subject"));
        subject.push(bag);
        work.push(subject);
    }

    let mut license =
        Element::new(Name::new(CC_NS, "License")).with_attr(Name::new(RDF_NS, "about"), LICENSE_URI);
    for (term, resource) in LICENSE_TERMS {
        license.push(
            Element::new(Name::new(CC_NS, term)).with_attr(Name::new(RDF_NS, "resource"), *resource),
        );
    }

    let mut rdf = Element::new(Name::new(RDF_NS, "RDF"));
    rdf.push(work);
    rdf.push(license);

    let mut block = Element::new(Name::svg("metadata"));
    block.push(rdf);
    block
}

/// Where a part document lacks the expected metadata shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMetadata {
    Work,
    Creator,
}

impl MissingMetadata {
    /// Path of the missing element, for error messages.
    pub fn path(self) -> &'static str {
        match self {
            Self::Work => "metadata/rdf:RDF/cc:Work",
            Self::Creator => "cc:Work/dc:creator/cc:Agent/dc:title",
        }
    }
}

/// Read creator and keywords back from a part document.
///
/// A missing keyword list is an empty list; a missing work or creator is
/// reported.
pub fn read_attribution(doc: &Document) -> Result<Attribution, MissingMetadata> {
    let work = doc
        .root
        .find(&[
            Name::svg("metadata"),
            Name::new(RDF_NS, "RDF"),
            Name::new(CC_NS, "Work"),
        ])
        .ok_or(MissingMetadata::Work)?;

    let creator = work
        .find(&[
            Name::new(DC_NS, "creator"),
            Name::new(CC_NS, "Agent"),
            Name::new(DC_NS, "title"),
        ])
        .ok_or(MissingMetadata::Creator)?
        .text();

    let keywords = work
        .find_all(&[
            Name::new(DC_NS, "subject"),
            Name::new(RDF_NS, "Bag"),
            Name::new(RDF_NS, "li"),
        ])
        .into_iter()
        .map(Element::text)
        .collect();

    Ok(Attribution { creator, keywords })
}
