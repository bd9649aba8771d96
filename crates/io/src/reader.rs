use crate::error::{malformed, IoError, Result};
use gridcarve_model::{Element, Property};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// A parsed model document: the element sequence plus everything needed to
/// reproduce the document envelope on output.
#[derive(Debug)]
pub struct ModelDocument {
    /// Qualified root tag, e.g. `rdf:RDF`.
    pub root_tag: String,
    /// Root attributes in document order — namespace declarations included.
    pub root_attrs: Vec<(String, String)>,
    pub elements: Vec<Element>,
}

/// Read and parse a model file.
pub fn read_model(path: &Path) -> Result<ModelDocument> {
    let text = std::fs::read_to_string(path)?;
    let doc = parse_model(&text)?;
    log::info!(
        "Read {} model elements from {}",
        doc.elements.len(),
        path.display()
    );
    Ok(doc)
}

/// Parse a model document from text.
///
/// Fails with [`IoError::Malformed`] if the input is not a well-formed
/// element tree; parse failures are fatal and never recovered.
pub fn parse_model(text: &str) -> Result<ModelDocument> {
    let mut reader = Reader::from_str(text);

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(t) => {
                let s = t.unescape().map_err(malformed)?;
                if !s.trim().is_empty() {
                    return Err(IoError::Malformed(
                        "text content before document root".to_string(),
                    ));
                }
            }
            Event::Start(start) => {
                let (root_tag, root_attrs) = read_root(&start)?;
                let elements = read_elements(&mut reader)?;
                return Ok(ModelDocument {
                    root_tag,
                    root_attrs,
                    elements,
                });
            }
            Event::Empty(start) => {
                let (root_tag, root_attrs) = read_root(&start)?;
                return Ok(ModelDocument {
                    root_tag,
                    root_attrs,
                    elements: Vec::new(),
                });
            }
            Event::Eof => return Err(IoError::Malformed("missing document root".to_string())),
            _ => {
                return Err(IoError::Malformed(
                    "unexpected content before document root".to_string(),
                ))
            }
        }
    }
}

fn read_root(start: &BytesStart) -> Result<(String, Vec<(String, String)>)> {
    let tag = qualified_name(start);
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attrs.push((name, value));
    }
    Ok((tag, attrs))
}

/// Read the top-level element sequence until the root closes.
fn read_elements(reader: &mut Reader<&[u8]>) -> Result<Vec<Element>> {
    let mut elements = Vec::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                let start = start.to_owned();
                let mut element = element_from_start(&start)?;
                element.properties = read_properties(reader)?;
                elements.push(element);
            }
            Event::Empty(start) => elements.push(element_from_start(&start)?),
            Event::Text(t) => {
                // Indentation whitespace between elements.
                t.unescape().map_err(malformed)?;
            }
            Event::Comment(_) | Event::PI(_) => {}
            Event::End(_) => return Ok(elements),
            Event::Eof => {
                return Err(IoError::Malformed(
                    "document root never closed".to_string(),
                ))
            }
            _ => {
                return Err(IoError::Malformed(
                    "unexpected node at element level".to_string(),
                ))
            }
        }
    }
}

/// Read the children of an open node until it closes.
fn read_properties(reader: &mut Reader<&[u8]>) -> Result<Vec<Property>> {
    let mut properties = Vec::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                let start = start.to_owned();
                let mut property = property_from_start(&start)?;
                let mut text = String::new();
                property.children = read_property_body(reader, &mut text)?;
                // Text is payload and stays verbatim; only all-whitespace
                // segments (indentation) are dropped.
                if !text.trim().is_empty() {
                    property.text = Some(text);
                }
                properties.push(property);
            }
            Event::Empty(start) => properties.push(property_from_start(&start)?),
            Event::Text(t) => {
                t.unescape().map_err(malformed)?;
            }
            Event::Comment(_) | Event::PI(_) => {}
            Event::End(_) => return Ok(properties),
            Event::Eof => {
                return Err(IoError::Malformed("element never closed".to_string()))
            }
            _ => {
                return Err(IoError::Malformed(
                    "unexpected node inside element".to_string(),
                ))
            }
        }
    }
}

/// Like [`read_properties`], but also accumulates text content.
fn read_property_body(
    reader: &mut Reader<&[u8]>,
    text: &mut String,
) -> Result<Vec<Property>> {
    let mut children = Vec::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                let start = start.to_owned();
                let mut property = property_from_start(&start)?;
                let mut inner = String::new();
                property.children = read_property_body(reader, &mut inner)?;
                if !inner.trim().is_empty() {
                    property.text = Some(inner);
                }
                children.push(property);
            }
            Event::Empty(start) => children.push(property_from_start(&start)?),
            Event::Text(t) => text.push_str(&t.unescape().map_err(malformed)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Comment(_) | Event::PI(_) => {}
            Event::End(_) => return Ok(children),
            Event::Eof => {
                return Err(IoError::Malformed("property never closed".to_string()))
            }
            _ => {
                return Err(IoError::Malformed(
                    "unexpected node inside property".to_string(),
                ))
            }
        }
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let mut element = Element::new(qualified_name(start), None);
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        // Only `rdf:ID` identifies an element. Anything else, a bare `ID`
        // included, is payload the writer must reproduce in place.
        if element.id.is_none() && name == "rdf:ID" {
            element.id = Some(value);
        } else {
            element.attrs.push((name, value));
        }
    }
    Ok(element)
}

fn property_from_start(start: &BytesStart) -> Result<Property> {
    let mut property = Property::new(qualified_name(start));
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        property.attrs.push((name, value));
    }
    Ok(property)
}

fn qualified_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}
