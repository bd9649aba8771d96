/// A child node of a model element.
///
/// CIM properties are either plain values (`<cim:IdentifiedObject.name>ALVIN
/// </cim:IdentifiedObject.name>`) or references to another element
/// (`<cim:VoltageLevel.MemberOf_Substation rdf:resource="#_SUB1"/>`). Anything
/// else on the node is opaque payload carried through to output untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Qualified tag name, e.g. `cim:Substation.Region`.
    pub tag: String,
    /// All attributes in document order, names kept qualified.
    pub attrs: Vec<(String, String)>,
    /// Text content, if any.
    pub text: Option<String>,
    /// Nested children. Flat CIM models leave this empty, but payload below
    /// the property level is preserved rather than dropped.
    pub children: Vec<Property>,
}

impl Property {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Tag name with the namespace prefix stripped.
    pub fn local_tag(&self) -> &str {
        local_part(&self.tag)
    }

    /// Same-document reference target, if this property carries one.
    ///
    /// A reference is a `*resource` attribute whose value starts with the `#`
    /// fragment marker; anything else (absolute URIs, plain values) does not
    /// participate in the graph.
    pub fn reference(&self) -> Option<&str> {
        self.attrs.iter().find_map(|(name, value)| {
            if name.ends_with("resource") {
                value.strip_prefix('#')
            } else {
                None
            }
        })
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(target) = self.reference() {
            out.push(target);
        }
        for child in &self.children {
            child.collect_references(out);
        }
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        for (name, value) in &self.attrs {
            if name == "rdf:ID" {
                out.push(value);
            }
        }
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// One identified (or anonymous) top-level node of the model document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, e.g. `cim:Substation`.
    pub tag: String,
    /// The `rdf:ID` identifier. Elements without one cannot be referenced or
    /// looked up; they are only emitted when a categorical scan selects them.
    pub id: Option<String>,
    /// Remaining attributes (identifier excluded) in document order.
    pub attrs: Vec<(String, String)>,
    pub properties: Vec<Property>,
}

impl Element {
    pub fn new(tag: impl Into<String>, id: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            id,
            attrs: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Category tag with the namespace prefix stripped, e.g. `Substation`.
    pub fn kind(&self) -> &str {
        local_part(&self.tag)
    }

    /// The CIM object name (`IdentifiedObject.name` property text), trimmed.
    pub fn name(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.local_tag() == "IdentifiedObject.name")
            .and_then(|p| p.text.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// All same-document reference targets, in document order, including
    /// those nested below the property level.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for property in &self.properties {
            property.collect_references(&mut out);
        }
        out
    }

    /// Every `rdf:ID` this element defines: its own identifier plus any
    /// carried on nested payload. Nested definitions cannot be looked up,
    /// but they do satisfy references.
    pub fn defined_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(id) = self.id.as_deref() {
            out.push(id);
        }
        for property in &self.properties {
            property.collect_ids(&mut out);
        }
        out
    }
}

fn local_part(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}
