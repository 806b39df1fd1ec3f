//! Owned XML element tree.
//!
//! Built from quick-xml events. Element and attribute names are resolved
//! against their namespace declarations while parsing, so a layer can be
//! moved into another document without dragging the source prefixes along.
//! Prefixes are reassigned on serialization from [`PREFIXES`](super::PREFIXES)
//! and every declaration is written on the root element.

use quick_xml::{
    Reader, Writer,
    escape::{EscapeError, unescape},
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::AttrError},
};
use thiserror::Error;

use super::{PREFIXES, SVG_NS, XML_NS};

/// Errors raised while reading or writing a document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml near byte {position}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute")]
    Attribute(#[from] AttrError),

    #[error("invalid character or entity reference")]
    Escape(#[from] EscapeError),

    #[error("document is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("namespace prefix `{0}` is not declared")]
    UnboundPrefix(String),

    #[error("unclosed element `{0}`")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("element `{0}` follows the root element")]
    MultipleRoots(String),

    #[error("failed to serialize document")]
    Write(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn write_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> XmlError {
    XmlError::Write(Box::new(e))
}

// ============================================================================
// Names and nodes
// ============================================================================

/// Namespace-resolved name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub ns: Option<String>,
    pub local: String,
}

impl Name {
    /// Name bound to namespace `ns`.
    pub fn new(ns: &str, local: &str) -> Self {
        Self {
            ns: Some(ns.to_string()),
            local: local.to_string(),
        }
    }

    /// Name without namespace (plain attributes such as `style`).
    pub fn plain(local: &str) -> Self {
        Self {
            ns: None,
            local: local.to_string(),
        }
    }

    /// Name in the SVG namespace.
    pub fn svg(local: &str) -> Self {
        Self::new(SVG_NS, local)
    }

    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }
}

/// Child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

/// An element with its attributes (in document order) and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Name,
    pub attrs: Vec<(Name, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: Name, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push_text`](Self::push_text).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn attr(&self, name: &Name) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: Name, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &Name) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append text, merging with a trailing text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.children.last_mut() {
            Some(Node::Text(last)) => last.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First element reached by following `path` one child level per step.
    pub fn find(&self, path: &[Name]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        let child = self.elements().find(|e| e.name == *first)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.find(rest)
        }
    }

    /// All elements matching `path`, in document order.
    pub fn find_all(&self, path: &[Name]) -> Vec<&Element> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };
        let matches = self.elements().filter(|e| e.name == *first);
        if rest.is_empty() {
            matches.collect()
        } else {
            matches.flat_map(|e| e.find_all(rest)).collect()
        }
    }

    /// Visit this element and every descendant element, depth first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.walk_mut(f);
            }
        }
    }

    fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for e in self.elements() {
            e.walk(f);
        }
    }

    /// Drop whitespace-only text between child elements. Whitespace that is
    /// the sole content of an element is kept.
    fn drop_indentation(&mut self) {
        if !self.children.iter().any(|c| matches!(c, Node::Element(_))) {
            return;
        }
        self.children
            .retain(|c| !matches!(c, Node::Text(t) if t.trim().is_empty()));
    }
}

// ============================================================================
// Document
// ============================================================================

/// A parsed document: just its root element.
///
/// The prolog (declaration, doctype, processing instructions) is not kept;
/// serialization always writes a fresh `<?xml version="1.0" encoding="utf-8"?>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

type Scope = Vec<(String, String)>;

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a document from a string.
    ///
    /// Whitespace-only text between elements is dropped unless
    /// `xml:space="preserve"` is in scope. Comments and CDATA are kept.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut scopes: Vec<Scope> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut preserve: Vec<bool> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|source| XmlError::Syntax {
                position: reader.buffer_position() as u64,
                source,
            })?;

            match event {
                Event::Start(start) => {
                    let element = open_element(&start, &mut scopes)?;
                    let inherited = preserve.last().copied().unwrap_or(false);
                    preserve.push(preserves_space(&element, inherited));
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&start, &mut scopes)?;
                    scopes.pop();
                    close_element(element, true, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    // quick-xml already verified the end name matches
                    if let Some(element) = stack.pop() {
                        scopes.pop();
                        let keep = preserve.pop().unwrap_or(false);
                        close_element(element, keep, &mut stack, &mut root)?;
                    }
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(&text)?;
                        parent.push_text(unescape(raw)?);
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = std::str::from_utf8(&reference)?;
                        parent.push_text(unescape(&format!("&{name};"))?);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(&data)?;
                        parent.children.push(Node::CData(raw.to_string()));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(&comment)?;
                        parent.children.push(Node::Comment(raw.to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name.local));
        }
        root.map(Self::new).ok_or(XmlError::NoRoot)
    }

    /// Serialize on a single line after the declaration.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        self.serialize(Writer::new(Vec::new()))
    }

    /// Serialize with one tab of indentation per level, text kept inline,
    /// and no blank lines.
    pub fn to_pretty_xml(&self) -> Result<String, XmlError> {
        let pretty = self.serialize(Writer::new_with_indent(Vec::new(), b'\t', 1))?;
        Ok(strip_blank_lines(&pretty))
    }

    fn serialize(&self, mut writer: Writer<Vec<u8>>) -> Result<String, XmlError> {
        let namespaces = NamespaceTable::collect(&self.root);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
        write_element(&mut writer, &self.root, &namespaces, true)?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|e| XmlError::Utf8(e.utf8_error()))
    }
}

/// Drop lines that hold only whitespace.
pub fn strip_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn open_element(start: &BytesStart<'_>, scopes: &mut Vec<Scope>) -> Result<Element, XmlError> {
    let mut declarations = Scope::new();
    let mut raw_attrs = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();

        if key == "xmlns" {
            declarations.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value));
        } else {
            raw_attrs.push((key.to_string(), value));
        }
    }
    scopes.push(declarations);

    let qname = start.name();
    let tag = std::str::from_utf8(qname.as_ref())?;
    let name = resolve(tag, scopes, true)?;
    let attrs = raw_attrs
        .into_iter()
        .map(|(key, value)| Ok((resolve(&key, scopes, false)?, value)))
        .collect::<Result<Vec<_>, XmlError>>()?;

    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn close_element(
    mut element: Element,
    preserve: bool,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    if !preserve {
        element.drop_indentation();
    }
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRoots(element.name.local)),
        None => *root = Some(element),
    }
    Ok(())
}

/// Whether `element` keeps whitespace, given the enclosing `xml:space` mode.
fn preserves_space(element: &Element, inherited: bool) -> bool {
    match element.attr(&Name::new(XML_NS, "space")) {
        Some(mode) => mode == "preserve",
        None => inherited,
    }
}

fn lookup<'a>(prefix: &str, scopes: &'a [Scope]) -> Option<&'a str> {
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter().rev())
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.as_str())
}

/// Resolve a qualified name. Unprefixed attributes never take the default
/// namespace; unprefixed elements do.
fn resolve(qname: &str, scopes: &[Scope], is_element: bool) -> Result<Name, XmlError> {
    match qname.split_once(':') {
        Some(("xml", local)) => Ok(Name::new(XML_NS, local)),
        Some((prefix, local)) => lookup(prefix, scopes)
            .filter(|uri| !uri.is_empty())
            .map(|uri| Name::new(uri, local))
            .ok_or_else(|| XmlError::UnboundPrefix(prefix.to_string())),
        None if is_element => Ok(match lookup("", scopes) {
            Some(uri) if !uri.is_empty() => Name::new(uri, qname),
            _ => Name::plain(qname),
        }),
        None => Ok(Name::plain(qname)),
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

/// Prefix assignment for one serialization pass.
struct NamespaceTable {
    /// (prefix, uri) pairs declared on the root, registered ones first.
    declared: Vec<(String, String)>,
}

impl NamespaceTable {
    fn collect(root: &Element) -> Self {
        let mut used: Vec<&str> = Vec::new();
        root.walk(&mut |element| {
            let names = std::iter::once(&element.name).chain(element.attrs.iter().map(|(n, _)| n));
            for name in names {
                if let Some(uri) = name.ns.as_deref()
                    && uri != XML_NS
                    && !used.contains(&uri)
                {
                    used.push(uri);
                }
            }
        });

        let mut declared: Vec<(String, String)> = PREFIXES
            .iter()
            .filter(|(_, uri)| used.contains(uri))
            .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
            .collect();

        let unknown = used
            .iter()
            .filter(|uri| !PREFIXES.iter().any(|(_, known)| known == *uri));
        for (i, uri) in unknown.enumerate() {
            declared.push((format!("ns{i}"), uri.to_string()));
        }

        Self { declared }
    }

    fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_NS {
            return Some("xml");
        }
        self.declared
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }

    /// Qualified name. Attributes in the default namespace are written bare.
    fn qualify(&self, name: &Name) -> String {
        match name.ns.as_deref().and_then(|uri| self.prefix(uri)) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", name.local),
            _ => name.local.clone(),
        }
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    namespaces: &NamespaceTable,
    is_root: bool,
) -> Result<(), XmlError> {
    let tag = namespaces.qualify(&element.name);
    let mut start = BytesStart::new(tag.as_str());

    if is_root {
        for (prefix, uri) in &namespaces.declared {
            let key = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{prefix}")
            };
            start.push_attribute((key.as_str(), uri.as_str()));
        }
    }
    for (name, value) in &element.attrs {
        let key = namespaces.qualify(name);
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e, namespaces, false)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_error)?,
            Node::Comment(c) => writer
                .write_event(Event::Comment(BytesText::from_escaped(c.as_str())))
                .map_err(write_error)?,
            Node::CData(c) => writer
                .write_event(Event::CData(BytesCData::new(c.as_str())))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag.as_str())))
        .map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{INKSCAPE_NS, SODIPODI_NS};

    const LAYERED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape -->
<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     width="124mm" height="124mm">
  <sodipodi:namedview id="base" inkscape:zoom="1.4"/>
  <g inkscape:label="hair_0001" inkscape:groupmode="layer" id="layer1">
    <path d="M 0,0 L 1,1" sodipodi:nodetypes="cc"/>
    <text>Tom &amp; Jerry &#x41;</text>
  </g>
</svg>"#;

    #[test]
    fn test_parse_resolves_namespaces() {
        let doc = Document::parse(LAYERED).unwrap();
        assert!(doc.root.name.is(SVG_NS, "svg"));

        let children: Vec<_> = doc.root.elements().collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].name.is(SODIPODI_NS, "namedview"));

        let layer = children[1];
        assert!(layer.name.is(SVG_NS, "g"));
        assert_eq!(
            layer.attr(&Name::new(INKSCAPE_NS, "label")),
            Some("hair_0001")
        );
        assert_eq!(layer.attr(&Name::plain("id")), Some("layer1"));
    }

    #[test]
    fn test_parse_resolves_entities_and_drops_blank_text() {
        let doc = Document::parse(LAYERED).unwrap();
        let layer = doc.root.elements().nth(1).unwrap();
        assert_eq!(layer.children.len(), 2);

        let text = layer.find(&[Name::svg("text")]).unwrap();
        assert_eq!(text.text(), "Tom & Jerry A");
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let doc = Document::parse(LAYERED).unwrap();
        let compact = Document::parse(&doc.to_xml().unwrap()).unwrap();
        let pretty = Document::parse(&doc.to_pretty_xml().unwrap()).unwrap();
        assert_eq!(doc, compact);
        assert_eq!(doc, pretty);
    }

    #[test]
    fn test_serialize_uses_registered_prefixes() {
        let doc = Document::parse(LAYERED).unwrap();
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(xml.contains(r#"inkscape:label="hair_0001""#));
        assert!(xml.contains("<sodipodi:namedview"));
        assert!(xml.contains("Tom &amp; Jerry A"));
    }

    #[test]
    fn test_serialize_declares_only_used_namespaces() {
        let root = Element::new(Name::svg("svg")).with_attr(Name::plain("width"), "1");
        let xml = Document::new(root).to_xml().unwrap();

        assert!(xml.contains(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1"/>"#));
        assert!(!xml.contains("xmlns:inkscape"));
    }

    #[test]
    fn test_unknown_namespace_gets_generated_prefix() {
        let mut root = Element::new(Name::svg("svg"));
        root.set_attr(Name::new("urn:example", "flag"), "on");
        let xml = Document::new(root).to_xml().unwrap();

        assert!(xml.contains(r#"xmlns:ns0="urn:example""#));
        assert!(xml.contains(r#"ns0:flag="on""#));
    }

    #[test]
    fn test_pretty_output_indents_and_has_no_blank_lines() {
        let mut root = Element::new(Name::svg("svg")).with_attr(Name::plain("id"), "root");
        root.push(Element::new(Name::svg("title")).with_text("hello"));
        let pretty = Document::new(root).to_pretty_xml().unwrap();

        let lines: Vec<_> = pretty.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="utf-8"?>"#);
        assert!(lines[1].starts_with("<svg "));
        assert_eq!(lines[2], "\t<title>hello</title>");
        assert_eq!(lines[3], "</svg>");
        assert!(lines.iter().all(|l| !l.trim().is_empty()));
    }

    #[test]
    fn test_unbound_prefix_is_an_error() {
        let err = Document::parse(r#"<svg><foo:bar/></svg>"#).unwrap_err();
        assert!(matches!(err, XmlError::UnboundPrefix(p) if p == "foo"));
    }

    #[test]
    fn test_mismatched_end_is_an_error() {
        assert!(Document::parse("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_sole_whitespace_content_is_kept() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <text><tspan> </tspan></text>
               </svg>"#,
        )
        .unwrap();
        let text = doc.root.find(&[Name::svg("text")]).unwrap();
        assert_eq!(text.children.len(), 1);
        let tspan = text.find(&[Name::svg("tspan")]).unwrap();
        assert_eq!(tspan.text(), " ");

        let pretty = doc.to_pretty_xml().unwrap();
        assert!(pretty.contains("<tspan> </tspan>"));
        assert_eq!(Document::parse(&pretty).unwrap(), doc);
    }

    #[test]
    fn test_preserved_space_keeps_whitespace_between_elements() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <text xml:space="preserve"><tspan>a</tspan> <tspan>b</tspan></text>
                 <g>
                   <rect/>
                 </g>
               </svg>"#,
        )
        .unwrap();

        let text = doc.root.find(&[Name::svg("text")]).unwrap();
        assert_eq!(text.children.len(), 3);
        assert_eq!(text.children[1], Node::Text(" ".into()));
        assert_eq!(
            text.attr(&Name::new(XML_NS, "space")),
            Some("preserve")
        );

        let g = doc.root.find(&[Name::svg("g")]).unwrap();
        assert_eq!(g.children.len(), 1);
    }

    #[test]
    fn test_second_root_is_an_error() {
        let err = Document::parse("<svg/><svg/>").unwrap_err();
        assert!(matches!(err, XmlError::MultipleRoots(name) if name == "svg"));
    }

    #[test]
    fn test_empty_input_has_no_root() {
        assert!(matches!(Document::parse("   "), Err(XmlError::NoRoot)));
    }

    #[test]
    fn test_set_and_remove_attr() {
        let mut el = Element::new(Name::svg("g"));
        el.set_attr(Name::plain("class"), "a");
        el.set_attr(Name::plain("class"), "b");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.attr(&Name::plain("class")), Some("b"));
        assert_eq!(el.remove_attr(&Name::plain("class")), Some("b".into()));
        assert_eq!(el.remove_attr(&Name::plain("class")), None);
    }

    #[test]
    fn test_strip_blank_lines() {
        assert_eq!(strip_blank_lines("a\n\n  \nb\n\t\nc"), "a\nb\nc");
    }
}
