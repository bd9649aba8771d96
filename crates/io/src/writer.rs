use crate::error::Result;
use gridcarve_model::{Element, Property};
use quick_xml::escape::escape;
use std::path::Path;

/// Serialize the selected elements under the captured document envelope and
/// write the result to `path`.
pub fn write_model(
    path: &Path,
    root_tag: &str,
    root_attrs: &[(String, String)],
    elements: &[&Element],
) -> Result<()> {
    let text = model_to_string(root_tag, root_attrs, elements);
    std::fs::write(path, text)?;
    log::info!("Wrote {} elements to {}", elements.len(), path.display());
    Ok(())
}

/// Serialize a model document to text.
///
/// Output shape matches the input format: one root node wrapping the selected
/// elements. Childless nodes always render with explicit open/close tags —
/// the downstream model loader rejects self-closing elements.
pub fn model_to_string(
    root_tag: &str,
    root_attrs: &[(String, String)],
    elements: &[&Element],
) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push('<');
    out.push_str(root_tag);
    for (name, value) in root_attrs {
        push_attr(&mut out, name, value);
    }
    out.push_str(">\n");
    for element in elements {
        push_element(&mut out, element);
    }
    out.push_str("</");
    out.push_str(root_tag);
    out.push_str(">\n");
    out
}

fn push_element(out: &mut String, element: &Element) {
    out.push_str("  <");
    out.push_str(&element.tag);
    if let Some(id) = &element.id {
        push_attr(out, "rdf:ID", id);
    }
    for (name, value) in &element.attrs {
        push_attr(out, name, value);
    }
    out.push_str(">\n");
    for property in &element.properties {
        push_property(out, property, 2);
    }
    out.push_str("  </");
    out.push_str(&element.tag);
    out.push_str(">\n");
}

fn push_property(out: &mut String, property: &Property, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&property.tag);
    for (name, value) in &property.attrs {
        push_attr(out, name, value);
    }
    out.push('>');
    if property.children.is_empty() {
        if let Some(text) = &property.text {
            out.push_str(&escape(text.as_str()));
        }
    } else {
        out.push('\n');
        for child in &property.children {
            push_property(out, child, depth + 1);
        }
        if let Some(text) = &property.text {
            out.push_str(&indent);
            out.push_str(&escape(text.as_str()));
            out.push('\n');
        }
        out.push_str(&indent);
    }
    out.push_str("</");
    out.push_str(&property.tag);
    out.push_str(">\n");
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}
