//! Strip editor state from an extracted layer.

use super::{Element, Name, SODIPODI_NS};

/// Sodipodi attributes Inkscape leaves on shapes and layers.
pub const SODIPODI_ATTRS: &[&str] = &[
    "absref", "arg1", "arg2", "argument", "cx", "cy", "docbase", "docname", "end", "expansion",
    "insensitive", "linespacing", "modified", "nodetypes", "nonprintable", "open", "original",
    "r1", "r2", "radius", "revolution", "role", "rx", "ry", "sides", "spiral", "star", "start",
    "t0", "type", "version",
];

/// Make a layer standalone-ready, in place.
///
/// Unhides the layer and strips sodipodi attributes from it and every
/// descendant. With `class`, the layer is tagged with that class so the
/// part can be selected in the final document.
pub fn sanitize_layer(layer: &mut Element, class: Option<&str>) {
    unhide(layer);
    strip_editor_attrs(layer);
    if let Some(class) = class {
        layer.set_attr(Name::plain("class"), class);
    }
}

/// Remove `display:none` from the `style` attribute, dropping the
/// attribute once nothing else is left.
pub fn unhide(element: &mut Element) {
    let style = Name::plain("style");
    let Some(current) = element.attr(&style) else {
        return;
    };
    if !current.split(';').any(is_display_none) {
        return;
    }

    let remaining = current
        .split(';')
        .filter(|decl| !decl.trim().is_empty() && !is_display_none(decl))
        .collect::<Vec<_>>()
        .join(";");

    if remaining.is_empty() {
        element.remove_attr(&style);
    } else {
        element.set_attr(style, remaining);
    }
}

fn is_display_none(declaration: &str) -> bool {
    declaration
        .split_once(':')
        .is_some_and(|(prop, value)| prop.trim() == "display" && value.trim() == "none")
}

/// Remove every sodipodi attribute listed in [`SODIPODI_ATTRS`] from the
/// element and its descendants.
pub fn strip_editor_attrs(element: &mut Element) {
    element.walk_mut(&mut |e| {
        e.attrs.retain(|(name, _)| !is_editor_attr(name));
    });
}

fn is_editor_attr(name: &Name) -> bool {
    name.ns.as_deref() == Some(SODIPODI_NS) && SODIPODI_ATTRS.contains(&name.local.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{Document, INKSCAPE_NS};

    fn layer(xml: &str) -> Element {
        let doc = Document::parse(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"
                xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
                xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">{xml}</svg>"#
        ))
        .unwrap();
        doc.root.elements().next().unwrap().clone()
    }

    fn style(e: &Element) -> Option<&str> {
        e.attr(&Name::plain("style"))
    }

    #[test]
    fn test_unhide_removes_only_style() {
        let mut g = layer(r#"<g style="display:none"/>"#);
        unhide(&mut g);
        assert_eq!(style(&g), None);
    }

    #[test]
    fn test_unhide_keeps_other_declarations() {
        let mut g = layer(r#"<g style="display:none;opacity:0.5"/>"#);
        unhide(&mut g);
        assert_eq!(style(&g), Some("opacity:0.5"));

        let mut g = layer(r#"<g style="fill:red; display : none ;stroke:blue"/>"#);
        unhide(&mut g);
        assert_eq!(style(&g), Some("fill:red;stroke:blue"));
    }

    #[test]
    fn test_unhide_leaves_visible_style_untouched() {
        let mut g = layer(r#"<g style="display:inline"/>"#);
        unhide(&mut g);
        assert_eq!(style(&g), Some("display:inline"));
    }

    #[test]
    fn test_unhide_is_idempotent() {
        let mut once = layer(r#"<g style="display:none;fill:#000;"/>"#);
        unhide(&mut once);
        let mut twice = once.clone();
        unhide(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(style(&once), Some("fill:#000"));
    }

    #[test]
    fn test_strip_editor_attrs_recursively() {
        let mut g = layer(
            r#"<g sodipodi:insensitive="true" inkscape:label="eyes_a" id="g1">
                 <path d="M0 0" sodipodi:nodetypes="cc" sodipodi:type="arc"/>
                 <g><circle sodipodi:cx="1" sodipodi:custom="keep" r="2"/></g>
               </g>"#,
        );
        strip_editor_attrs(&mut g);

        assert_eq!(g.attrs.len(), 2);
        assert_eq!(g.attr(&Name::new(INKSCAPE_NS, "label")), Some("eyes_a"));

        let path = g.find(&[Name::svg("path")]).unwrap();
        assert_eq!(path.attrs, vec![(Name::plain("d"), "M0 0".to_string())]);

        let circle = g.find(&[Name::svg("g"), Name::svg("circle")]).unwrap();
        assert_eq!(circle.attr(&Name::new(SODIPODI_NS, "cx")), None);
        assert_eq!(circle.attr(&Name::new(SODIPODI_NS, "custom")), Some("keep"));
        assert_eq!(circle.attr(&Name::plain("r")), Some("2"));
    }

    #[test]
    fn test_plain_attrs_with_editor_names_survive() {
        let mut g = layer(r#"<g><ellipse cx="1" cy="2" rx="3" ry="4"/></g>"#);
        let before = g.clone();
        strip_editor_attrs(&mut g);
        assert_eq!(g, before);
    }

    #[test]
    fn test_sanitize_layer_sets_class() {
        let mut g = layer(r#"<g style="display:none" sodipodi:role="line"/>"#);
        sanitize_layer(&mut g, Some("hair"));
        assert_eq!(g.attrs, vec![(Name::plain("class"), "hair".to_string())]);

        let mut g = layer(r#"<g id="x"/>"#);
        sanitize_layer(&mut g, None);
        assert_eq!(g.attr(&Name::plain("class")), None);
    }
}
